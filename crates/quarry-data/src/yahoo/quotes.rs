//! Quote data fetching from Yahoo Finance.

use super::interval::Interval;
use crate::error::{DataError, Result};
use crate::http::HttpSettings;
use chrono::{DateTime, Utc};
use polars::prelude::*;
use std::time::Duration;
use tracing::{debug, info};
use yahoo_finance_api as yahoo;

/// Yahoo Finance historical quote provider.
pub struct YahooQuoteProvider {
    provider: yahoo::YahooConnector,
    timeout: Duration,
}

impl std::fmt::Debug for YahooQuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooQuoteProvider").finish_non_exhaustive()
    }
}

impl YahooQuoteProvider {
    /// Create a new Yahoo Finance quote provider.
    pub fn new() -> Result<Self> {
        Self::with_settings(&HttpSettings::default())
    }

    /// Create a provider whose requests use the configured timeout.
    ///
    /// The connector keeps its own user agent; Yahoo ties it to the session
    /// cookie and crumb the connector negotiates.
    pub fn with_settings(settings: &HttpSettings) -> Result<Self> {
        let provider = yahoo::YahooConnector::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self {
            provider,
            timeout: settings.timeout,
        })
    }

    /// Per-request timeout of the connector.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch daily OHLCV data for a single symbol.
    ///
    /// # Returns
    /// A Polars DataFrame with columns: symbol, date, open, high, low, close, volume, adjusted_close
    pub async fn fetch_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<DataFrame> {
        self.fetch_quotes_interval(symbol, start, end, Interval::OneDay)
            .await
    }

    /// Fetch OHLCV bars at the given interval.
    ///
    /// Daily and coarser bars get a `Date` column; intraday bars keep the
    /// full timestamp as a `Datetime` column. Both are named `date`.
    pub async fn fetch_quotes_interval(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: Interval,
    ) -> Result<DataFrame> {
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }

        if symbol.trim().is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let start_time = time::OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| DataError::TimeConversion(e.to_string()))?;
        let end_time = time::OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| DataError::TimeConversion(e.to_string()))?;

        debug!(symbol, %interval, %start, %end, "requesting Yahoo quote history");
        let response = self
            .provider
            .get_quote_history_interval(symbol, start_time, end_time, interval.as_str())
            .await?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::YahooApi(e.to_string()))?;

        let df = quotes_to_frame(symbol, &quotes, interval)?;
        info!(symbol, rows = df.height(), "fetched Yahoo quote history");
        Ok(df)
    }
}

/// Build the quote table from raw Yahoo bars.
///
/// An empty bar list is [`DataError::MissingData`]: Yahoo answers unknown
/// tickers with no bars rather than an error status.
pub fn quotes_to_frame(
    symbol: &str,
    quotes: &[yahoo::Quote],
    interval: Interval,
) -> Result<DataFrame> {
    if quotes.is_empty() {
        return Err(DataError::missing(
            symbol,
            "No data returned from Yahoo Finance",
        ));
    }

    let dates: Vec<i64> = quotes.iter().map(|q| q.timestamp as i64).collect();
    let opens: Vec<f64> = quotes.iter().map(|q| q.open).collect();
    let highs: Vec<f64> = quotes.iter().map(|q| q.high).collect();
    let lows: Vec<f64> = quotes.iter().map(|q| q.low).collect();
    let closes: Vec<f64> = quotes.iter().map(|q| q.close).collect();
    let volumes: Vec<u64> = quotes.iter().map(|q| q.volume).collect();
    let adj_closes: Vec<f64> = quotes.iter().map(|q| q.adjclose).collect();

    let mut df = DataFrame::new(vec![
        Series::new("timestamp".into(), dates).into(),
        Series::new("open".into(), opens).into(),
        Series::new("high".into(), highs).into(),
        Series::new("low".into(), lows).into(),
        Series::new("close".into(), closes).into(),
        Series::new("volume".into(), volumes).into(),
        Series::new("adjusted_close".into(), adj_closes).into(),
    ])?;

    let symbol_col: Column = Series::new("symbol".into(), vec![symbol; df.height()]).into();
    df.with_column(symbol_col)?;

    let timestamp = (col("timestamp") * lit(1_000_000_000))
        .cast(DataType::Datetime(TimeUnit::Nanoseconds, None));
    let date = if interval.is_intraday() {
        timestamp.alias("date")
    } else {
        timestamp.cast(DataType::Date).alias("date")
    };

    let df = df
        .lazy()
        .with_column(date)
        .select(&[
            col("symbol"),
            col("date"),
            col("open"),
            col("high"),
            col("low"),
            col("close"),
            col("volume"),
            col("adjusted_close"),
        ])
        .collect()?;

    Ok(df)
}
