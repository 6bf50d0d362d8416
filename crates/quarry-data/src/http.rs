//! Shared HTTP plumbing for the provider clients.

use crate::error::{DataError, Result};
use std::time::Duration;
use tracing::debug;

/// Browser-like user agent; Cboe's CDN rejects requests without one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings applied to every HTTP client built by this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Value of the `User-Agent` header
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl HttpSettings {
    /// Build a `reqwest` client from these settings.
    pub fn build_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.timeout)
            .build()
            .map_err(DataError::Network)
    }
}

/// Issue a GET and fail with [`DataError::Http`] on a non-success status.
pub(crate) async fn get_checked(client: &reqwest::Client, url: &str) -> Result<reqwest::Response> {
    debug!(%url, "GET");
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DataError::Http {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    Ok(response)
}
