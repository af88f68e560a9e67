//! HTTP access to the Fair Trading site.

use crate::catalog::DATA_LIST_URL;
use crate::DataError;

/// HTTP client for the listing page and workbook downloads.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct DataClient {
    http: reqwest::Client,
}

impl DataClient {
    /// Create a client with a descriptive User-Agent. The government site
    /// rejects requests with none.
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("bondsheet/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to construct HTTP client");
        Self { http }
    }

    /// Fetch the dataset listing page.
    pub async fn listing_page(&self) -> Result<String, DataError> {
        let err = |e: reqwest::Error| DataError::Fetch {
            url: DATA_LIST_URL.to_string(),
            message: e.to_string(),
        };
        let response = self.http.get(DATA_LIST_URL).send().await.map_err(err)?;
        let response = response.error_for_status().map_err(err)?;
        response.text().await.map_err(err)
    }

    /// Download one workbook.
    pub async fn fetch_workbook(&self, url: &str) -> Result<Vec<u8>, DataError> {
        let err = |e: reqwest::Error| DataError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        };
        let response = self.http.get(url).send().await.map_err(err)?;
        let response = response.error_for_status().map_err(err)?;
        let bytes = response.bytes().await.map_err(err)?;
        Ok(bytes.to_vec())
    }
}

impl Default for DataClient {
    fn default() -> Self {
        Self::new()
    }
}
