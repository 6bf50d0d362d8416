//! Daily price history from the Cboe CDN.

use super::client::{CboeClient, cdn_symbol};
use super::de_flex_f64;
use crate::error::{DataError, Result};
use crate::table::date_column;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct HistoricalResponse {
    #[serde(default)]
    data: Vec<HistoricalBar>,
}

#[derive(Debug, Deserialize)]
struct HistoricalBar {
    date: String,
    #[serde(default, deserialize_with = "de_flex_f64")]
    open: Option<f64>,
    #[serde(default, deserialize_with = "de_flex_f64")]
    high: Option<f64>,
    #[serde(default, deserialize_with = "de_flex_f64")]
    low: Option<f64>,
    #[serde(default, deserialize_with = "de_flex_f64")]
    close: Option<f64>,
    #[serde(default, deserialize_with = "de_flex_f64")]
    volume: Option<f64>,
}

impl CboeClient {
    /// Fetch daily OHLCV history for `symbol` between `start` and `end` inclusive.
    ///
    /// # Returns
    /// A Polars DataFrame with columns: symbol, date, open, high, low, close, volume
    pub async fn fetch_historical(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DataFrame> {
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        let path_symbol = cdn_symbol(symbol)?;
        let url = format!("{}/charts/historical/{path_symbol}.json", self.cdn_url());
        let body = self.get_text(&url).await?;

        let df = parse_historical(&body, symbol.trim(), start, end)?;
        if df.height() == 0 {
            return Err(DataError::missing(
                symbol,
                format!("No Cboe history between {start} and {end}"),
            ));
        }

        info!(symbol, rows = df.height(), "fetched Cboe price history");
        Ok(df)
    }
}

/// Decode a Cboe chart-history payload, keeping bars inside `start..=end`.
pub fn parse_historical(
    body: &str,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<DataFrame> {
    let response: HistoricalResponse = serde_json::from_str(body)?;

    let mut dates = Vec::with_capacity(response.data.len());
    let mut opens = Vec::with_capacity(response.data.len());
    let mut highs = Vec::with_capacity(response.data.len());
    let mut lows = Vec::with_capacity(response.data.len());
    let mut closes = Vec::with_capacity(response.data.len());
    let mut volumes = Vec::with_capacity(response.data.len());

    for bar in response.data {
        // Dates come as `2024-01-02` or with a time suffix.
        let Some(date) = bar
            .date
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        else {
            warn!(symbol, date = %bar.date, "skipping bar with unparseable date");
            continue;
        };
        if date < start || date > end {
            continue;
        }

        dates.push(date);
        opens.push(bar.open);
        highs.push(bar.high);
        lows.push(bar.low);
        closes.push(bar.close);
        volumes.push(bar.volume.map(|v| v as u64));
    }

    let symbol = symbol.to_uppercase();
    let df = DataFrame::new(vec![
        Series::new("symbol".into(), vec![symbol.as_str(); dates.len()]).into(),
        date_column("date", &dates)?,
        Series::new("open".into(), opens).into(),
        Series::new("high".into(), highs).into(),
        Series::new("low".into(), lows).into(),
        Series::new("close".into(), closes).into(),
        Series::new("volume".into(), volumes).into(),
    ])?;

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BODY: &str = r#"{
        "symbol": "SPY",
        "data": [
            {"date": "2024-01-02", "open": "472.16", "high": "473.67", "low": "470.49", "close": "472.65", "volume": "123623700"},
            {"date": "2024-01-03", "open": 470.43, "high": 471.19, "low": 468.17, "close": 468.79, "volume": 103585900},
            {"date": "garbage", "open": 1, "high": 1, "low": 1, "close": 1, "volume": 1},
            {"date": "2024-01-04T00:00:00", "open": 468.3, "high": 470.96, "low": 467.05, "close": 467.28, "volume": null}
        ]
    }"#;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_parse_historical() {
        let df = parse_historical(BODY, "spy", day(1), day(31)).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(
            df.get_column_names(),
            vec!["symbol", "date", "open", "high", "low", "close", "volume"]
        );

        let close = df.column("close").unwrap().f64().unwrap();
        assert_relative_eq!(close.get(0).unwrap(), 472.65);
        assert_relative_eq!(close.get(1).unwrap(), 468.79);

        let volume = df.column("volume").unwrap().u64().unwrap();
        assert_eq!(volume.get(0), Some(123_623_700));
        assert_eq!(volume.get(2), None);
    }

    #[test]
    fn test_parse_historical_filters_range() {
        let df = parse_historical(BODY, "SPY", day(3), day(3)).unwrap();
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn test_parse_historical_empty() {
        let df = parse_historical(r#"{"data": []}"#, "SPY", day(1), day(31)).unwrap();
        assert_eq!(df.height(), 0);
    }
}
