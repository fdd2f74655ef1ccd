//! Token Metadata Adapter
//!
//! Resolves the off-chain JSON behind a token's metadata URI (name, symbol,
//! image, socials). `ipfs://` URIs are routed through a configurable gateway.

mod client;
mod types;

pub use client::{HttpMetadataResolver, MetadataConfig, DEFAULT_IPFS_GATEWAY};
pub use types::RawMetadata;
