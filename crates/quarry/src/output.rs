//! Values returned by the facade.

use crate::preferences::OutputType;
use polars::prelude::DataFrame;
use quarry_data::Result;
use quarry_data::table::frame_to_records;
use serde_json::Value;

/// A provider table in the shape selected by the output preference.
#[derive(Debug, Clone)]
pub enum Output {
    /// Polars frame
    Frame(DataFrame),
    /// One JSON object per row
    Records(Vec<Value>),
}

impl Output {
    /// Shape a provider frame according to `output_type`.
    pub fn shape(df: DataFrame, output_type: OutputType) -> Result<Self> {
        Ok(match output_type {
            OutputType::DataFrame => Self::Frame(df),
            OutputType::Records => Self::Records(frame_to_records(&df)?),
        })
    }

    /// The shape this value carries.
    pub const fn output_type(&self) -> OutputType {
        match self {
            Self::Frame(_) => OutputType::DataFrame,
            Self::Records(_) => OutputType::Records,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Self::Frame(df) => df.height(),
            Self::Records(rows) => rows.len(),
        }
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the frame, if this is one.
    pub const fn as_frame(&self) -> Option<&DataFrame> {
        match self {
            Self::Frame(df) => Some(df),
            Self::Records(_) => None,
        }
    }

    /// Take the frame, if this is one.
    pub fn into_frame(self) -> Option<DataFrame> {
        match self {
            Self::Frame(df) => Some(df),
            Self::Records(_) => None,
        }
    }

    /// Borrow the records, if this is a record list.
    pub fn records(&self) -> Option<&[Value]> {
        match self {
            Self::Frame(_) => None,
            Self::Records(rows) => Some(rows),
        }
    }

    /// Row records regardless of shape.
    pub fn to_records(&self) -> Result<Vec<Value>> {
        match self {
            Self::Frame(df) => frame_to_records(df),
            Self::Records(rows) => Ok(rows.clone()),
        }
    }
}
