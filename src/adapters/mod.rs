//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - PumpPortal: reconnecting real-time feed client over WebSocket
//! - Solana: bonding curve reads over RPC
//! - Metadata: off-chain token metadata over HTTP
//! - CLI: Command-line interface definitions

pub mod pump_portal;
pub mod solana;
pub mod metadata;
pub mod cli;

pub use pump_portal::{PumpPortalClient, StreamConfig, StreamConfigBuilder, StreamError, WsConnector};
pub use solana::SolanaCurveReader;
pub use metadata::HttpMetadataResolver;
pub use cli::CliApp;
