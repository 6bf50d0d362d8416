//! Provider selection.

use quarry_data::DataError;
use std::fmt;
use std::str::FromStr;

/// Name of the default historical-price provider.
pub const DEFAULT_PROVIDER: &str = "yfinance";

/// External source of market data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Provider {
    /// Yahoo Finance chart API
    #[default]
    Yfinance,
    /// Cboe delayed data and futures settlements
    Cboe,
}

impl Provider {
    /// Canonical provider name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Yfinance => "yfinance",
            Self::Cboe => "cboe",
        }
    }

    /// Error for an operation this provider does not serve.
    pub(crate) fn unsupported(&self, operation: &str) -> DataError {
        DataError::UnsupportedProvider {
            provider: self.as_str().to_string(),
            operation: operation.to_string(),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yfinance" | "yahoo" => Ok(Self::Yfinance),
            "cboe" => Ok(Self::Cboe),
            _ => Err(DataError::UnsupportedProvider {
                provider: s.to_string(),
                operation: "provider selection".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("yfinance", Provider::Yfinance)]
    #[case("YFinance", Provider::Yfinance)]
    #[case("yahoo", Provider::Yfinance)]
    #[case(" cboe ", Provider::Cboe)]
    fn test_parse(#[case] name: &str, #[case] expected: Provider) {
        assert_eq!(name.parse::<Provider>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "polygon".parse::<Provider>().unwrap_err();
        assert!(matches!(
            err,
            DataError::UnsupportedProvider { ref provider, .. } if provider == "polygon"
        ));
    }

    #[test]
    fn test_default_matches_constant() {
        assert_eq!(DEFAULT_PROVIDER.parse::<Provider>().unwrap(), Provider::default());
    }
}
