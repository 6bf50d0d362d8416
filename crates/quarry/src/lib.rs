#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/quarry/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod facade;
pub mod output;
pub mod preferences;
pub mod provider;

pub use quarry_data as data;
pub use quarry_data::{DataError, Result};

pub use config::QuarryConfig;
pub use facade::{
    DEFAULT_FUTURES_SYMBOL, DEFAULT_OPTIONS_SYMBOL, FamaFrenchFactors, HistoricalQuery, Quarry,
};
pub use output::Output;
pub use preferences::{OutputType, output_type, set_output_type};
pub use provider::{DEFAULT_PROVIDER, Provider};

use quarry_data::french::FamaFrenchDataset;
use std::sync::OnceLock;

static SHARED: OnceLock<Quarry> = OnceLock::new();

/// Facade shared by the free functions, created on first use.
pub fn shared() -> Result<&'static Quarry> {
    if let Some(quarry) = SHARED.get() {
        return Ok(quarry);
    }
    let quarry = Quarry::new()?;
    Ok(SHARED.get_or_init(|| quarry))
}

/// Historical prices for `ticker` from the named provider (`"yfinance"` by default).
///
/// Provider errors, including an unknown provider name, are returned as-is.
pub async fn get_stock_data(ticker: &str, provider: &str) -> Result<Output> {
    let provider: Provider = provider.parse()?;
    shared()?
        .stock_data(&HistoricalQuery::new(ticker).provider(provider))
        .await
}

/// Current futures curve for `symbol` (`"VX"` by default).
pub async fn get_futures_curve(symbol: &str) -> Result<Output> {
    shared()?.futures_curve(symbol, None).await
}

/// Option chain for `symbol` (`"SPY"` by default).
pub async fn get_options_chain(symbol: &str) -> Result<Output> {
    shared()?.options_chain(symbol).await
}

/// Fama-French 3-factor data: monthly table, annual table and description.
pub async fn get_fama_french_factors() -> Result<FamaFrenchFactors> {
    shared()?.fama_french_factors().await
}

/// Any dataset of the French data library by name.
pub async fn get_fama_french_dataset(name: &str) -> Result<FamaFrenchDataset> {
    shared()?.fama_french_dataset(name).await
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
