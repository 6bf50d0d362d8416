//! Facade configuration.

use quarry_data::HttpSettings;
use quarry_data::cboe::{CBOE_CDN_URL, CBOE_SITE_URL};
use quarry_data::french::FRENCH_LIBRARY_URL;
use std::time::Duration;

/// Settings used to build the provider clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarryConfig {
    /// User agent and timeout for HTTP providers
    pub http: HttpSettings,
    /// Cboe delayed-quotes CDN
    pub cboe_cdn_url: String,
    /// Cboe main site (futures settlements)
    pub cboe_site_url: String,
    /// French data library directory
    pub french_url: String,
}

impl Default for QuarryConfig {
    fn default() -> Self {
        Self {
            http: HttpSettings::default(),
            cboe_cdn_url: CBOE_CDN_URL.to_string(),
            cboe_site_url: CBOE_SITE_URL.to_string(),
            french_url: FRENCH_LIBRARY_URL.to_string(),
        }
    }
}

impl QuarryConfig {
    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout = timeout;
        self
    }

    /// Override the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.http.user_agent = user_agent.into();
        self
    }

    /// Override both Cboe hosts.
    pub fn with_cboe_urls(mut self, cdn_url: impl Into<String>, site_url: impl Into<String>) -> Self {
        self.cboe_cdn_url = cdn_url.into();
        self.cboe_site_url = site_url.into();
        self
    }

    /// Override the French data library directory.
    pub fn with_french_url(mut self, url: impl Into<String>) -> Self {
        self.french_url = url.into();
        self
    }
}
