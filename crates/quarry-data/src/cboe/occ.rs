//! OCC option contract symbols.
//!
//! An OCC symbol is the underlying root followed by a fixed 15-character
//! tail: expiration as `YYMMDD`, `C` or `P`, and the strike times 1000
//! zero-padded to eight digits. `SPY240119C00400000` is the SPY call
//! expiring 2024-01-19 struck at 400.

use crate::error::DataError;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

const TAIL_LEN: usize = 15;

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionType {
    /// Right to buy
    Call,
    /// Right to sell
    Put,
}

impl OptionType {
    /// Lowercase name used in output tables.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Put => "put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded OCC contract symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct OccSymbol {
    /// Underlying root, e.g. `SPY` or `SPXW`
    pub root: String,
    /// Expiration date
    pub expiration: NaiveDate,
    /// Call or put
    pub option_type: OptionType,
    /// Strike price
    pub strike: f64,
}

impl FromStr for OccSymbol {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let invalid = |reason: &str| DataError::Parse(format!("invalid OCC symbol '{s}': {reason}"));

        if !compact.is_ascii() || compact.len() <= TAIL_LEN {
            return Err(invalid("too short"));
        }

        let (root, tail) = compact.split_at(compact.len() - TAIL_LEN);
        let root = root.trim_start_matches('_');
        if root.is_empty() {
            return Err(invalid("missing root"));
        }

        let expiration = NaiveDate::parse_from_str(&tail[..6], "%y%m%d")
            .map_err(|_| invalid("bad expiration"))?;

        let option_type = match &tail[6..7] {
            "C" | "c" => OptionType::Call,
            "P" | "p" => OptionType::Put,
            _ => return Err(invalid("expected C or P")),
        };

        let strike_digits = &tail[7..];
        if !strike_digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("bad strike"));
        }
        let strike = strike_digits
            .parse::<u64>()
            .map_err(|_| invalid("bad strike"))? as f64
            / 1000.0;

        Ok(Self {
            root: root.to_string(),
            expiration,
            option_type,
            strike,
        })
    }
}
