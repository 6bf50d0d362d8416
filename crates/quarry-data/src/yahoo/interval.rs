//! Bar intervals accepted by the Yahoo chart API.

use crate::error::DataError;
use std::fmt;
use std::str::FromStr;

/// Sampling interval of historical bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interval {
    /// One minute
    OneMinute,
    /// Five minutes
    FiveMinutes,
    /// Fifteen minutes
    FifteenMinutes,
    /// Thirty minutes
    ThirtyMinutes,
    /// One hour
    OneHour,
    /// One trading day
    #[default]
    OneDay,
    /// One week
    OneWeek,
    /// One month
    OneMonth,
}

impl Interval {
    /// Wire representation used by the Yahoo chart API.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::OneHour => "1h",
            Self::OneDay => "1d",
            Self::OneWeek => "1wk",
            Self::OneMonth => "1mo",
        }
    }

    /// Whether bars at this interval carry an intraday timestamp.
    pub const fn is_intraday(&self) -> bool {
        !matches!(self, Self::OneDay | Self::OneWeek | Self::OneMonth)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1m" => Ok(Self::OneMinute),
            "5m" => Ok(Self::FiveMinutes),
            "15m" => Ok(Self::FifteenMinutes),
            "30m" => Ok(Self::ThirtyMinutes),
            "1h" | "60m" => Ok(Self::OneHour),
            "1d" => Ok(Self::OneDay),
            "1w" | "1wk" => Ok(Self::OneWeek),
            "1mo" => Ok(Self::OneMonth),
            other => Err(DataError::Parse(format!("unknown interval '{other}'"))),
        }
    }
}
