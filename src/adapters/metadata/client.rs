//! Metadata Client
//!
//! Fetches the JSON document a token's metadata `uri` points at, with retry and
//! exponential backoff on rate limits and server errors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::types::RawMetadata;
use crate::ports::{MetadataError, MetadataResolver, TokenMetadata};

/// Public gateway used for `ipfs://` URIs
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

/// Configuration for the HttpMetadataResolver
#[derive(Debug, Clone)]
pub struct MetadataConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Number of attempts per URI
    pub max_retries: u32,
    /// Base delay for exponential backoff (milliseconds)
    pub retry_base_delay_ms: u64,
    /// Prefix `ipfs://` URIs are rewritten to
    pub ipfs_gateway: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_retries: 3,
            retry_base_delay_ms: 500,
            ipfs_gateway: DEFAULT_IPFS_GATEWAY.to_string(),
        }
    }
}

/// Resolves token metadata over HTTP(S) and IPFS gateways
#[derive(Debug, Clone)]
pub struct HttpMetadataResolver {
    config: MetadataConfig,
    http: Client,
}

impl HttpMetadataResolver {
    pub fn new() -> Result<Self, MetadataError> {
        Self::with_config(MetadataConfig::default())
    }

    pub fn with_config(config: MetadataConfig) -> Result<Self, MetadataError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MetadataError::Http(e.to_string()))?;

        Ok(Self { config, http })
    }

    /// Map a metadata URI to a fetchable URL. Only http(s) and ipfs are accepted.
    pub fn fetch_url(&self, uri: &str) -> Result<String, MetadataError> {
        let uri = uri.trim();
        if let Some(cid) = uri.strip_prefix("ipfs://") {
            let gateway = self.config.ipfs_gateway.trim_end_matches('/');
            return Ok(format!("{}/{}", gateway, cid.trim_start_matches("ipfs/")));
        }
        if uri.starts_with("https://") || uri.starts_with("http://") {
            return Ok(uri.to_string());
        }
        Err(MetadataError::Http(format!("Unsupported metadata URI: {}", uri)))
    }

    async fn fetch_with_retry(&self, url: &str) -> Result<RawMetadata, MetadataError> {
        let mut last_error = None;

        for attempt in 0..self.config.max_retries.max(1) {
            match self.http.get(url).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                        let backoff = Duration::from_millis(
                            self.config.retry_base_delay_ms * 2u64.pow(attempt),
                        );
                        warn!(
                            "Metadata fetch returned {}, backing off for {:?} (attempt {}/{})",
                            status,
                            backoff,
                            attempt + 1,
                            self.config.max_retries
                        );
                        last_error = Some(MetadataError::Status(status.as_u16()));
                        tokio::time::sleep(backoff).await;
                        continue;
                    }

                    if !status.is_success() {
                        return Err(MetadataError::Status(status.as_u16()));
                    }

                    return response
                        .json::<RawMetadata>()
                        .await
                        .map_err(|e| MetadataError::Parse(e.to_string()));
                }
                Err(e) => {
                    debug!("Metadata fetch failed: {}", e);
                    last_error = Some(MetadataError::Http(e.to_string()));
                    let backoff = Duration::from_millis(
                        self.config.retry_base_delay_ms * (attempt as u64 + 1),
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| MetadataError::Http("Max retries exceeded".into())))
    }
}

#[async_trait]
impl MetadataResolver for HttpMetadataResolver {
    async fn resolve(&self, uri: &str) -> Result<TokenMetadata, MetadataError> {
        let url = self.fetch_url(uri)?;
        debug!("Resolving metadata from {}", url);
        Ok(self.fetch_with_retry(&url).await?.into())
    }
}
