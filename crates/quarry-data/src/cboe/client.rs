//! Cboe HTTP client.

use crate::error::{DataError, Result};
use crate::http::{HttpSettings, get_checked};

/// Base URL of Cboe's delayed-quotes CDN.
pub const CBOE_CDN_URL: &str = "https://cdn.cboe.com/api/global/delayed_quotes";

/// Base URL of Cboe's main site (futures settlements).
pub const CBOE_SITE_URL: &str = "https://www.cboe.com";

/// Indices that Cboe files under an underscore prefix (`_SPX`).
const INDEX_SYMBOLS: &[&str] = &["SPX", "VIX", "NDX", "RUT", "DJX", "XSP", "OEX", "VIX9D", "MRUT"];

/// Client for Cboe's public delayed data.
pub struct CboeClient {
    client: reqwest::Client,
    cdn_url: String,
    site_url: String,
}

impl CboeClient {
    /// Create a client with default HTTP settings.
    pub fn new() -> Result<Self> {
        Self::with_settings(&HttpSettings::default())
    }

    /// Create a client with custom HTTP settings.
    pub fn with_settings(settings: &HttpSettings) -> Result<Self> {
        Ok(Self {
            client: settings.build_client()?,
            cdn_url: CBOE_CDN_URL.to_string(),
            site_url: CBOE_SITE_URL.to_string(),
        })
    }

    /// Point the client at different hosts (mirrors, test servers).
    pub fn with_base_urls(mut self, cdn_url: impl Into<String>, site_url: impl Into<String>) -> Self {
        self.cdn_url = cdn_url.into().trim_end_matches('/').to_string();
        self.site_url = site_url.into().trim_end_matches('/').to_string();
        self
    }

    /// CDN base URL in use.
    pub fn cdn_url(&self) -> &str {
        &self.cdn_url
    }

    /// Site base URL in use.
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    pub(crate) async fn get_text(&self, url: &str) -> Result<String> {
        let response = get_checked(&self.client, url).await?;
        Ok(response.text().await?)
    }
}

impl std::fmt::Debug for CboeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CboeClient")
            .field("cdn_url", &self.cdn_url)
            .field("site_url", &self.site_url)
            .finish_non_exhaustive()
    }
}

/// Normalize a user-facing symbol to the form used in CDN paths.
///
/// `^VIX` and bare index names such as `SPX` become `_VIX` / `_SPX`.
pub(crate) fn cdn_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() || symbol == "^" {
        return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
    }

    if let Some(index) = symbol.strip_prefix('^') {
        return Ok(format!("_{index}"));
    }
    if INDEX_SYMBOLS.contains(&symbol.as_str()) {
        return Ok(format!("_{symbol}"));
    }
    Ok(symbol)
}
