//! Option chains from the Cboe delayed-quotes CDN.

use super::client::{CboeClient, cdn_symbol};
use super::de_flex_f64;
use super::occ::OccSymbol;
use crate::error::Result;
use crate::table::date_column;
use chrono::{NaiveDate, Utc};
use polars::prelude::*;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct OptionsResponse {
    data: OptionsData,
}

#[derive(Debug, Deserialize)]
struct OptionsData {
    #[serde(default)]
    options: Vec<OptionQuote>,
}

#[derive(Debug, Deserialize)]
struct OptionQuote {
    option: String,
    #[serde(default, deserialize_with = "de_flex_f64")]
    bid: Option<f64>,
    #[serde(default, deserialize_with = "de_flex_f64")]
    ask: Option<f64>,
    #[serde(default, deserialize_with = "de_flex_f64")]
    last_trade_price: Option<f64>,
    #[serde(default, deserialize_with = "de_flex_f64")]
    volume: Option<f64>,
    #[serde(default, deserialize_with = "de_flex_f64")]
    open_interest: Option<f64>,
    #[serde(default, deserialize_with = "de_flex_f64")]
    iv: Option<f64>,
    #[serde(default, deserialize_with = "de_flex_f64")]
    delta: Option<f64>,
    #[serde(default, deserialize_with = "de_flex_f64")]
    gamma: Option<f64>,
    #[serde(default, deserialize_with = "de_flex_f64")]
    theta: Option<f64>,
    #[serde(default, deserialize_with = "de_flex_f64")]
    vega: Option<f64>,
    #[serde(default, deserialize_with = "de_flex_f64")]
    rho: Option<f64>,
}

struct ChainRow {
    contract: OccSymbol,
    quote: OptionQuote,
}

impl CboeClient {
    /// Fetch the full option chain for an underlying.
    ///
    /// # Returns
    /// A Polars DataFrame with one row per listed contract, ordered by
    /// expiration, strike and type. An underlying without listed options
    /// yields an empty table.
    pub async fn fetch_options_chain(&self, symbol: &str) -> Result<DataFrame> {
        let path_symbol = cdn_symbol(symbol)?;
        let url = format!("{}/options/{path_symbol}.json", self.cdn_url());
        let body = self.get_text(&url).await?;

        let today = Utc::now().date_naive();
        let df = parse_options_chain(&body, symbol.trim(), today)?;
        info!(symbol, contracts = df.height(), "fetched options chain");
        Ok(df)
    }
}

/// Decode a Cboe options payload into a chain table.
///
/// `today` anchors the `dte` (days to expiration) column.
pub fn parse_options_chain(body: &str, underlying: &str, today: NaiveDate) -> Result<DataFrame> {
    let response: OptionsResponse = serde_json::from_str(body)?;

    let mut rows: Vec<ChainRow> = response
        .data
        .options
        .into_iter()
        .filter_map(|quote| match quote.option.parse::<OccSymbol>() {
            Ok(contract) => Some(ChainRow { contract, quote }),
            Err(e) => {
                warn!(contract = %quote.option, error = %e, "skipping contract");
                None
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        a.contract
            .expiration
            .cmp(&b.contract.expiration)
            .then_with(|| a.contract.strike.total_cmp(&b.contract.strike))
            .then_with(|| a.contract.option_type.as_str().cmp(b.contract.option_type.as_str()))
    });

    let underlying = underlying.to_uppercase();
    let n = rows.len();
    let expirations: Vec<NaiveDate> = rows.iter().map(|r| r.contract.expiration).collect();

    let quote_col = |name: &str, f: fn(&OptionQuote) -> Option<f64>| -> Column {
        let values: Vec<Option<f64>> = rows.iter().map(|r| f(&r.quote)).collect();
        Series::new(name.into(), values).into()
    };
    let count_col = |name: &str, f: fn(&OptionQuote) -> Option<f64>| -> Column {
        let values: Vec<Option<u64>> = rows.iter().map(|r| f(&r.quote).map(|v| v as u64)).collect();
        Series::new(name.into(), values).into()
    };

    let df = DataFrame::new(vec![
        Series::new("underlying_symbol".into(), vec![underlying.as_str(); n]).into(),
        Series::new(
            "contract_symbol".into(),
            rows.iter().map(|r| r.quote.option.as_str()).collect::<Vec<_>>(),
        )
        .into(),
        date_column("expiration", &expirations)?,
        Series::new(
            "dte".into(),
            expirations
                .iter()
                .map(|e| (*e - today).num_days())
                .collect::<Vec<i64>>(),
        )
        .into(),
        Series::new(
            "strike".into(),
            rows.iter().map(|r| r.contract.strike).collect::<Vec<f64>>(),
        )
        .into(),
        Series::new(
            "option_type".into(),
            rows.iter()
                .map(|r| r.contract.option_type.as_str())
                .collect::<Vec<_>>(),
        )
        .into(),
        quote_col("bid", |q| q.bid),
        quote_col("ask", |q| q.ask),
        quote_col("last_trade_price", |q| q.last_trade_price),
        count_col("volume", |q| q.volume),
        count_col("open_interest", |q| q.open_interest),
        quote_col("implied_volatility", |q| q.iv),
        quote_col("delta", |q| q.delta),
        quote_col("gamma", |q| q.gamma),
        quote_col("theta", |q| q.theta),
        quote_col("vega", |q| q.vega),
        quote_col("rho", |q| q.rho),
    ])?;

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BODY: &str = r#"{
        "timestamp": "2024-01-05 16:15:00",
        "data": {
            "symbol": "SPY",
            "current_price": 467.92,
            "options": [
                {"option": "SPY240119P00470000", "bid": 6.1, "ask": 6.15, "iv": 0.1182, "open_interest": 20311.0, "volume": 5123.0, "delta": -0.55, "gamma": 0.03, "theta": -0.2, "vega": 0.31, "rho": -0.1, "last_trade_price": 6.12},
                {"option": "SPY240112C00470000", "bid": "2.01", "ask": "2.03", "iv": "0.1034", "open_interest": 1500, "volume": 900, "last_trade_price": 2.02},
                {"option": "SPY240119C00470000", "bid": 4.3, "ask": 4.33, "iv": 0.1101, "open_interest": 30123, "volume": 4102},
                {"option": "NOT-A-CONTRACT", "bid": 1.0}
            ]
        }
    }"#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    }

    #[test]
    fn test_parse_options_chain() {
        let df = parse_options_chain(BODY, "spy", today()).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 17);

        let contracts = df.column("contract_symbol").unwrap().str().unwrap();
        assert_eq!(contracts.get(0), Some("SPY240112C00470000"));
        assert_eq!(contracts.get(1), Some("SPY240119C00470000"));
        assert_eq!(contracts.get(2), Some("SPY240119P00470000"));

        let dte = df.column("dte").unwrap().i64().unwrap();
        assert_eq!(dte.get(0), Some(7));
        assert_eq!(dte.get(2), Some(14));

        let types = df.column("option_type").unwrap().str().unwrap();
        assert_eq!(types.get(1), Some("call"));
        assert_eq!(types.get(2), Some("put"));

        let bid = df.column("bid").unwrap().f64().unwrap();
        assert_relative_eq!(bid.get(0).unwrap(), 2.01);

        let oi = df.column("open_interest").unwrap().u64().unwrap();
        assert_eq!(oi.get(1), Some(30123));

        let delta = df.column("delta").unwrap().f64().unwrap();
        assert_eq!(delta.get(0), None);

        let underlying = df.column("underlying_symbol").unwrap().str().unwrap();
        assert_eq!(underlying.get(0), Some("SPY"));
    }

    #[test]
    fn test_parse_options_chain_empty() {
        let body = r#"{"data": {"symbol": "XYZ", "options": []}}"#;
        let df = parse_options_chain(body, "XYZ", today()).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 17);
    }

    #[test]
    fn test_parse_options_chain_malformed() {
        assert!(parse_options_chain("not json", "SPY", today()).is_err());
    }
}
