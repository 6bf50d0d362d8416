//! Download client for the French data library.

use super::parser::{FamaFrenchDataset, parse_dataset};
use crate::error::{DataError, Result};
use crate::http::{HttpSettings, get_checked};
use std::io::{Cursor, Read};
use tracing::info;

/// Directory holding the zipped datasets.
pub const FRENCH_LIBRARY_URL: &str = "https://mba.tuck.dartmouth.edu/pages/faculty/ken.french/ftp";

/// Fama-French 3-factor dataset (monthly and annual).
pub const THREE_FACTOR_DATASET: &str = "F-F_Research_Data_Factors";

/// Client for the French data library.
pub struct FrenchClient {
    client: reqwest::Client,
    base_url: String,
}

impl FrenchClient {
    /// Create a client with default HTTP settings.
    pub fn new() -> Result<Self> {
        Self::with_settings(&HttpSettings::default())
    }

    /// Create a client with custom HTTP settings.
    pub fn with_settings(settings: &HttpSettings) -> Result<Self> {
        Ok(Self {
            client: settings.build_client()?,
            base_url: FRENCH_LIBRARY_URL.to_string(),
        })
    }

    /// Point the client at a different directory.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// URL of the zipped CSV for `dataset`.
    pub fn dataset_url(&self, dataset: &str) -> String {
        format!("{}/{dataset}_CSV.zip", self.base_url)
    }

    /// Download and parse a dataset by name.
    ///
    /// # Example
    /// ```no_run
    /// use quarry_data::french::{FrenchClient, THREE_FACTOR_DATASET};
    ///
    /// # async fn example() -> quarry_data::Result<()> {
    /// let client = FrenchClient::new()?;
    /// let dataset = client.fetch_dataset(THREE_FACTOR_DATASET).await?;
    /// println!("{}", dataset.description);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_dataset(&self, dataset: &str) -> Result<FamaFrenchDataset> {
        let dataset = dataset.trim();
        if dataset.is_empty() {
            return Err(DataError::InvalidSymbol("Empty dataset name".to_string()));
        }

        let url = self.dataset_url(dataset);
        let bytes = get_checked(&self.client, &url).await?.bytes().await?;
        let text = unzip_single_csv(&bytes)?;

        let parsed = parse_dataset(dataset, &text)?;
        info!(dataset, tables = parsed.tables.len(), "fetched Fama-French dataset");
        Ok(parsed)
    }
}

impl std::fmt::Debug for FrenchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrenchClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Read the first entry of a zip archive as text.
///
/// Files are mostly ASCII; stray Latin-1 bytes are replaced rather than rejected.
fn unzip_single_csv(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    if archive.is_empty() {
        return Err(DataError::Parse("empty zip archive".to_string()));
    }

    let mut entry = archive.by_index(0)?;
    let mut raw = Vec::new();
    entry.read_to_end(&mut raw)?;
    Ok(String::from_utf8_lossy(&raw).into_owned())
}
