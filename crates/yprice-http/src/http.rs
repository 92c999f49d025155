//! reqwest-backed fetcher
//!
//! Issues plain GET requests, follows redirects (reqwest's default policy),
//! and decodes bodies using the response charset.

use crate::{CancelToken, FetchError, HttpConfig, Page, PageFetcher};
use tracing::debug;

/// Fetcher that talks to the real services
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Build a fetcher from configuration
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the TLS backend or client cannot be
    /// initialized.
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<Page, FetchError> {
        let response = self.client.get(url).send().await?;
        let final_url = response.url().to_string();
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("GET {} -> {} ({} bytes, final url {})", url, status, body.len(), final_url);

        Ok(Page {
            url: final_url,
            status,
            body,
        })
    }
}

impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str, cancel: &CancelToken) -> Result<Page, FetchError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            page = self.get(url) => page,
        }
    }
}
