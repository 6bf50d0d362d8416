//! Futures settlement curves from Cboe Futures Exchange.

use super::client::CboeClient;
use crate::error::{DataError, Result};
use crate::table::date_column;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// One settlement line of the CFE settlement file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SettlementRow {
    /// Product code, e.g. `VX`
    #[serde(rename = "Product")]
    pub product: String,
    /// Contract symbol, e.g. `VX/F5`
    #[serde(rename = "Symbol")]
    pub symbol: String,
    /// Contract expiration
    #[serde(rename = "Expiration Date")]
    pub expiration: NaiveDate,
    /// Settlement price
    #[serde(rename = "Price")]
    pub price: f64,
}

impl CboeClient {
    /// Fetch the settlement curve for a futures product.
    ///
    /// `date` selects a settlement date; `None` asks for the latest one.
    ///
    /// # Returns
    /// A Polars DataFrame with columns: symbol, expiration, price, ordered by expiration
    pub async fn fetch_futures_curve(
        &self,
        product: &str,
        date: Option<NaiveDate>,
    ) -> Result<DataFrame> {
        let product = product.trim();
        if product.is_empty() {
            return Err(DataError::InvalidSymbol("Empty futures symbol".to_string()));
        }

        let mut url = format!("{}/us/futures/market_statistics/settlement/csv", self.site_url());
        if let Some(date) = date {
            url.push_str(&format!("?dt={}", date.format("%Y-%m-%d")));
        }

        let body = self.get_text(&url).await?;
        let rows = parse_settlements(&body, product)?;
        debug!(product, contracts = rows.len(), "parsed settlements");

        if rows.is_empty() {
            return Err(DataError::missing(
                product,
                "No settlements published for this product",
            ));
        }

        let df = curve_to_frame(rows)?;
        info!(product, rows = df.height(), "fetched futures curve");
        Ok(df)
    }
}

/// Parse the settlement CSV and keep the rows of `product`.
///
/// Rows are filtered on the `Product` field before they are decoded, so
/// malformed lines of other products never fail the curve. Malformed lines
/// of `product` itself are skipped.
pub fn parse_settlements(body: &str, product: &str) -> Result<Vec<SettlementRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    let product_idx = headers
        .iter()
        .position(|h| h == "Product")
        .ok_or_else(|| {
            DataError::Parse("settlement file without a Product column".to_string())
        })?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let matches = record
            .get(product_idx)
            .is_some_and(|p| p.eq_ignore_ascii_case(product));
        if !matches {
            continue;
        }

        match record.deserialize::<SettlementRow>(Some(&headers)) {
            Ok(row) => rows.push(row),
            Err(e) => {
                let line = record.position().map(|p| p.line());
                warn!(product, ?line, error = %e, "skipping settlement row");
            }
        }
    }

    Ok(rows)
}

/// Turn settlement rows into a curve table sorted by expiration.
pub fn curve_to_frame(mut rows: Vec<SettlementRow>) -> Result<DataFrame> {
    rows.sort_by(|a, b| a.expiration.cmp(&b.expiration).then_with(|| a.symbol.cmp(&b.symbol)));

    let symbols: Vec<&str> = rows.iter().map(|r| r.symbol.as_str()).collect();
    let expirations: Vec<NaiveDate> = rows.iter().map(|r| r.expiration).collect();
    let prices: Vec<f64> = rows.iter().map(|r| r.price).collect();

    let df = DataFrame::new(vec![
        Series::new("symbol".into(), symbols).into(),
        date_column("expiration", &expirations)?,
        Series::new("price".into(), prices).into(),
    ])?;

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CSV: &str = "Product,Symbol,Expiration Date,Price
VX,VX/Z4,2024-12-18,15.4250
VX,VX/F5,2025-01-22,16.9750
VX,VX51/Z4,2024-12-17,15.2000
VXM,VXM/Z4,2024-12-18,15.4250
IBHY,IBHY/Z4,2024-12-31,101.2300
";

    #[test]
    fn test_parse_settlements_filters_product() {
        let rows = parse_settlements(CSV, "vx").unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.product == "VX"));
    }

    #[test]
    fn test_parse_settlements_unknown_product() {
        let rows = parse_settlements(CSV, "ZZ").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_settlements_ignores_bad_rows_of_other_products() {
        let body = "Product,Symbol,Expiration Date,Price
VX,VX/Z4,2024-12-18,15.4250
VX,VX/F5,2025-01-22,16.9750
IBHY,IBHY/Z4,2024-12-31,
IBHY,IBHY/F5,not-a-date,101.5
IBHY,IBHY/G5
";
        let rows = parse_settlements(body, "VX").unwrap();
        assert_eq!(rows.len(), 2);
        assert_relative_eq!(rows[1].price, 16.975);
    }

    #[test]
    fn test_parse_settlements_skips_malformed_rows_of_product() {
        let body = "Product,Symbol,Expiration Date,Price
VX,VX/Z4,2024-12-18,n/a
VX,VX/F5,2025-01-22,16.9750
";
        let rows = parse_settlements(body, "VX").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "VX/F5");
    }

    #[test]
    fn test_parse_settlements_requires_product_column() {
        let body = "Symbol,Expiration Date,Price\nVX/Z4,2024-12-18,15.4\n";
        assert!(matches!(parse_settlements(body, "VX"), Err(DataError::Parse(_))));
    }

    #[test]
    fn test_curve_sorted_by_expiration() {
        let rows = parse_settlements(CSV, "VX").unwrap();
        let df = curve_to_frame(rows).unwrap();

        assert_eq!(df.get_column_names(), vec!["symbol", "expiration", "price"]);
        assert_eq!(df.height(), 3);

        let symbols = df.column("symbol").unwrap().str().unwrap();
        assert_eq!(symbols.get(0), Some("VX51/Z4"));
        assert_eq!(symbols.get(1), Some("VX/Z4"));
        assert_eq!(symbols.get(2), Some("VX/F5"));

        let prices = df.column("price").unwrap().f64().unwrap();
        assert_relative_eq!(prices.get(2).unwrap(), 16.975);
    }
}
