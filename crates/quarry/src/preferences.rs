//! Process-wide output preference.
//!
//! The preference is written at most once. Re-setting the same value is a
//! no-op; asking for a different value afterwards fails, so every call in the
//! process sees the same shape.

use quarry_data::{DataError, Result};
use std::fmt;
use std::sync::OnceLock;

/// Shape of the values returned by the facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputType {
    /// Polars `DataFrame`
    #[default]
    DataFrame,
    /// One JSON object per row
    Records,
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DataFrame => "dataframe",
            Self::Records => "records",
        })
    }
}

/// A write-once preference slot.
#[derive(Debug)]
pub struct Preferences {
    output_type: OnceLock<OutputType>,
}

impl Preferences {
    /// An unset slot.
    pub const fn new() -> Self {
        Self {
            output_type: OnceLock::new(),
        }
    }

    /// Set the output type; first writer wins.
    pub fn set_output_type(&self, requested: OutputType) -> Result<()> {
        let current = *self.output_type.get_or_init(|| requested);
        if current == requested {
            Ok(())
        } else {
            Err(DataError::PreferenceAlreadySet {
                current: current.to_string(),
                requested: requested.to_string(),
            })
        }
    }

    /// Output type in effect (`DataFrame` until set).
    pub fn output_type(&self) -> OutputType {
        self.output_type.get().copied().unwrap_or_default()
    }

    /// Whether a value has been set.
    pub fn is_set(&self) -> bool {
        self.output_type.get().is_some()
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: Preferences = Preferences::new();

/// Set the process-wide output type.
pub fn set_output_type(output_type: OutputType) -> Result<()> {
    GLOBAL.set_output_type(output_type)?;
    tracing::debug!(%output_type, "output preference set");
    Ok(())
}

/// Process-wide output type.
pub fn output_type() -> OutputType {
    GLOBAL.output_type()
}
