//! Metadata Port
//!
//! Resolves the off-chain metadata JSON a token's `uri` points at.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Metadata request returned status {0}")]
    Status(u16),

    #[error("Failed to parse metadata: {0}")]
    Parse(String),
}

/// Off-chain token metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub website: Option<String>,
}

impl TokenMetadata {
    pub fn has_socials(&self) -> bool {
        self.twitter.is_some() || self.telegram.is_some() || self.website.is_some()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    async fn resolve(&self, uri: &str) -> Result<TokenMetadata, MetadataError>;
}
