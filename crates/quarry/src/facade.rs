//! The provider facade.

use crate::config::QuarryConfig;
use crate::output::Output;
use crate::preferences::output_type;
use crate::provider::Provider;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use quarry_data::cboe::CboeClient;
use quarry_data::french::{FamaFrenchDataset, FrenchClient, THREE_FACTOR_DATASET};
use quarry_data::yahoo::{Interval, YahooQuoteProvider};
use quarry_data::{DataError, Result};
use tracing::debug;

/// Default futures product: VIX futures.
pub const DEFAULT_FUTURES_SYMBOL: &str = "VX";

/// Default options underlying.
pub const DEFAULT_OPTIONS_SYMBOL: &str = "SPY";

/// Default look-back of a historical request.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// Parameters of a historical price request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalQuery {
    /// Ticker symbol
    pub symbol: String,
    /// Provider to ask
    pub provider: Provider,
    /// First day (defaults to one year before `end`)
    pub start: Option<NaiveDate>,
    /// Last day, inclusive (defaults to today)
    pub end: Option<NaiveDate>,
    /// Bar interval
    pub interval: Interval,
}

impl HistoricalQuery {
    /// Daily bars for the last year from the default provider.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            provider: Provider::default(),
            start: None,
            end: None,
            interval: Interval::default(),
        }
    }

    /// Select the provider.
    pub const fn provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    /// Set the first day.
    pub const fn start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the last day.
    pub const fn end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    /// Set the bar interval.
    pub const fn interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    /// Concrete `(start, end)` after applying defaults.
    ///
    /// Fails with [`DataError::InvalidDateRange`] when the default start falls
    /// outside the calendar.
    pub fn date_range(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        let end = self.end.unwrap_or(today);
        let start = match self.start {
            Some(start) => start,
            None => end
                .checked_sub_signed(Duration::days(DEFAULT_LOOKBACK_DAYS))
                .ok_or_else(|| {
                    invalid_range(format!("{end} - {DEFAULT_LOOKBACK_DAYS} days"), end)
                })?,
        };
        Ok((start, end))
    }
}

/// The Fama-French 3-factor dataset split into its parts.
#[derive(Debug, Clone)]
pub struct FamaFrenchFactors {
    /// Monthly factor returns
    pub monthly: Output,
    /// Annual factor returns
    pub annual: Output,
    /// Dataset description and table index
    pub description: String,
}

/// Entry point owning one client per provider.
///
/// Every call reads the process-wide output preference when shaping its
/// result.
#[derive(Debug)]
pub struct Quarry {
    yahoo: YahooQuoteProvider,
    cboe: CboeClient,
    french: FrenchClient,
}

impl Quarry {
    /// Build with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(&QuarryConfig::default())
    }

    /// Build with a custom configuration.
    pub fn with_config(config: &QuarryConfig) -> Result<Self> {
        Ok(Self {
            yahoo: YahooQuoteProvider::with_settings(&config.http)?,
            cboe: CboeClient::with_settings(&config.http)?
                .with_base_urls(config.cboe_cdn_url.as_str(), config.cboe_site_url.as_str()),
            french: FrenchClient::with_settings(&config.http)?
                .with_base_url(config.french_url.as_str()),
        })
    }

    /// Historical prices for a query.
    pub async fn stock_data(&self, query: &HistoricalQuery) -> Result<Output> {
        let (start, end) = query.date_range(Utc::now().date_naive())?;
        debug!(symbol = %query.symbol, provider = %query.provider, %start, %end, "stock data");

        let df = match query.provider {
            Provider::Yfinance => {
                // Yahoo's end bound is exclusive.
                let end_exclusive = end
                    .checked_add_signed(Duration::days(1))
                    .ok_or_else(|| invalid_range(start, format!("{end} + 1 day")))?;
                self.yahoo
                    .fetch_quotes_interval(
                        &query.symbol,
                        start_of_day(start),
                        start_of_day(end_exclusive),
                        query.interval,
                    )
                    .await?
            }
            Provider::Cboe => {
                if query.interval != Interval::OneDay {
                    return Err(query.provider.unsupported("non-daily equity history"));
                }
                self.cboe.fetch_historical(&query.symbol, start, end).await?
            }
        };

        Output::shape(df, output_type())
    }

    /// Futures settlement curve for a product, latest or at `date`.
    pub async fn futures_curve(&self, symbol: &str, date: Option<NaiveDate>) -> Result<Output> {
        let df = self.cboe.fetch_futures_curve(symbol, date).await?;
        Output::shape(df, output_type())
    }

    /// Option chain for an underlying.
    pub async fn options_chain(&self, symbol: &str) -> Result<Output> {
        let df = self.cboe.fetch_options_chain(symbol).await?;
        Output::shape(df, output_type())
    }

    /// Any dataset of the French data library, unshaped.
    pub async fn fama_french_dataset(&self, name: &str) -> Result<FamaFrenchDataset> {
        self.french.fetch_dataset(name).await
    }

    /// Fama-French 3-factor monthly and annual tables with description.
    pub async fn fama_french_factors(&self) -> Result<FamaFrenchFactors> {
        let dataset = self.french.fetch_dataset(THREE_FACTOR_DATASET).await?;
        let description = dataset.description;

        let mut tables = dataset.tables.into_iter();
        let (Some(monthly), Some(annual)) = (tables.next(), tables.next()) else {
            return Err(DataError::missing(
                THREE_FACTOR_DATASET,
                "expected monthly and annual tables",
            ));
        };

        let shape = output_type();
        Ok(FamaFrenchFactors {
            monthly: Output::shape(monthly.frame, shape)?,
            annual: Output::shape(annual.frame, shape)?,
            description,
        })
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::default()).and_utc()
}

fn invalid_range(start: impl ToString, end: impl ToString) -> DataError {
    DataError::InvalidDateRange {
        start: start.to_string(),
        end: end.to_string(),
    }
}
