//! Artifact content retrieval

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Retrieves the raw bytes behind an artifact URL
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch the full body of `url`
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// [`ContentFetcher`] doing a plain HTTP GET
///
/// Artifact URLs are presigned, so no credentials or extra headers are sent.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with its own HTTP client
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fetcher sharing an existing HTTP client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}
