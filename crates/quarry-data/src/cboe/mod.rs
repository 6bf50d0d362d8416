//! Cboe delayed market data.
//!
//! Cboe publishes delayed quotes on a public CDN and daily futures
//! settlements as CSV on its main site. This module covers:
//! - Daily price history for equities, ETFs and indices
//! - Futures settlement curves (e.g. `VX` for VIX futures)
//! - Option chains, with OCC contract symbols decoded into their parts
//!
//! # Example
//!
//! ```no_run
//! use quarry_data::cboe::CboeClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CboeClient::new()?;
//!
//!     let curve = client.fetch_futures_curve("VX", None).await?;
//!     println!("{curve}");
//!
//!     let chain = client.fetch_options_chain("SPY").await?;
//!     println!("{} contracts", chain.height());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod futures;
pub mod historical;
pub mod occ;
pub mod options;

pub use client::{CBOE_CDN_URL, CBOE_SITE_URL, CboeClient};
pub use futures::{SettlementRow, curve_to_frame, parse_settlements};
pub use historical::parse_historical;
pub use occ::{OccSymbol, OptionType};
pub use options::parse_options_chain;

use serde::{Deserialize, Deserializer};

/// Cboe quotes numbers either as JSON numbers or as strings; accept both.
pub(crate) fn de_flex_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flex {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Flex>::deserialize(deserializer)? {
        Some(Flex::Number(v)) => Some(v),
        Some(Flex::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}
