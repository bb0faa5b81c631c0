//! Upstream page fetcher.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::QuakeError;

const USER_AGENT: &str = concat!("Mozilla/5.0 quake-backend/", env!("CARGO_PKG_VERSION"));

/// Source of raw upstream HTML. The cache manager only depends on this
/// trait, which keeps it testable without a network.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Retrieve the raw page body. Any failure (timeout, DNS, TLS,
    /// non-2xx) maps to [`QuakeError::Network`]; never retries.
    async fn fetch_page(&self) -> Result<String, QuakeError>;
}

/// Fetcher for the PHIVOLCS latest-earthquake page.
pub struct PhivolcsFetcher {
    client: Client,
    url: String,
}

impl PhivolcsFetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                // The PHIVOLCS host serves a misconfigured certificate
                // chain. Relaxed verification is scoped to this one client,
                // which only ever talks to the configured upstream page;
                // do not reuse it against arbitrary hosts.
                .danger_accept_invalid_certs(true)
                .build()
                .expect("Failed to build reqwest client"),
            url: url.into(),
        }
    }
}

#[async_trait]
impl PageFetcher for PhivolcsFetcher {
    async fn fetch_page(&self) -> Result<String, QuakeError> {
        debug!("Fetching earthquake page from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| QuakeError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(QuakeError::Network(format!(
                "upstream returned HTTP {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| QuakeError::Network(e.to_string()))
    }
}
