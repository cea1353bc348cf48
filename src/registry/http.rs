use crate::error::{Error, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use super::RegistrySource;

const USER_AGENT: &str = concat!("tfmodcheck/", env!("CARGO_PKG_VERSION"));

/// Fetches the module index over HTTP.
pub struct HttpRegistry {
    client: reqwest::Client,
    index_url: String,
}

impl HttpRegistry {
    pub fn new(index_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            index_url: index_url.into(),
        }
    }

    pub fn index_url(&self) -> &str {
        &self.index_url
    }
}

#[async_trait]
impl RegistrySource for HttpRegistry {
    fn location(&self) -> String {
        self.index_url.clone()
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        let fetch_error = |source: reqwest::Error| Error::RegistryFetch {
            url: self.index_url.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.index_url)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Module index request returned status {}: {}", status, self.index_url);
            return Err(Error::RegistryStatus {
                url: self.index_url.clone(),
                status,
            });
        }

        let body = response.bytes().await.map_err(fetch_error)?;
        debug!("Downloaded {} bytes from {}", body.len(), self.index_url);
        Ok(body.to_vec())
    }
}
