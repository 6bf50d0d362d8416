//! Fixtures shared by the facade integration tests.

#![allow(dead_code, unreachable_pub)]

use httpmock::prelude::*;
use quarry::{Quarry, QuarryConfig};
use std::io::{Cursor, Write};
use zip::write::{FileOptions, ZipWriter};

/// Facade whose HTTP providers all point at `server`.
pub fn quarry_for(server: &MockServer) -> Quarry {
    let config = QuarryConfig::default()
        .with_cboe_urls(server.url("/cdn"), server.url("/site"))
        .with_french_url(server.url("/ftp"));
    Quarry::with_config(&config).unwrap()
}

pub const SETTLEMENTS: &str = "Product,Symbol,Expiration Date,Price
VX,VX/F5,2025-01-22,16.9750
VX,VX/Z4,2024-12-18,15.4250
VX,VX/G5,2025-02-19,17.6250
VXM,VXM/Z4,2024-12-18,15.4250
IBHY,IBHY/Z4,2024-12-31,n/a
";

pub fn options_body() -> serde_json::Value {
    serde_json::json!({
        "data": {
            "symbol": "SPY",
            "options": [
                {"option": "SPY251219C00600000", "bid": 30.1, "ask": 30.4, "iv": 0.17, "open_interest": 1200, "volume": 80},
                {"option": "SPY251219P00600000", "bid": 25.0, "ask": 25.3, "iv": 0.19, "open_interest": 900, "volume": 55}
            ]
        }
    })
}

/// Zipped 3-factor CSV with `months` monthly rows and `years` annual rows.
pub fn three_factor_zip(months: usize, years: usize) -> Vec<u8> {
    let mut csv = String::from(
        "This file was created by CMPT_ME_BEME_RETS using the 202401 CRSP database.\r\n\r\n",
    );
    csv.push_str(",Mkt-RF,SMB,HML,RF\r\n");
    for i in 0..months {
        let year = 1926 + (i + 6) / 12;
        let month = (i + 6) % 12 + 1;
        csv.push_str(&format!("{year}{month:02},    2.96,   -2.56,   -2.43,    0.22\r\n"));
    }
    csv.push_str("\r\n Annual Factors: January-December \r\n,Mkt-RF,SMB,HML,RF\r\n");
    for i in 0..years {
        csv.push_str(&format!("  {},   29.47,  -2.04,  -4.54,   3.12\r\n", 1927 + i));
    }
    csv.push_str("\r\nCopyright 2024 Kenneth R. French\r\n");

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file::<_, ()>("F-F_Research_Data_Factors.CSV", FileOptions::default())
        .unwrap();
    zip.write_all(csv.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

pub async fn mock_all(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/site/us/futures/market_statistics/settlement/csv");
            then.status(200).body(SETTLEMENTS);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/cdn/options/SPY.json");
            then.status(200).json_body(options_body());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/ftp/F-F_Research_Data_Factors_CSV.zip");
            then.status(200).body(three_factor_zip(120, 40));
        })
        .await;
}
