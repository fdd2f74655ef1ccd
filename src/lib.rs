//! pump-stream - PumpPortal market-data client and bonding curve quoter
//!
//! A reconnecting client for the PumpPortal real-time feed of pump.fun launches,
//! trades and migrations, plus exact constant-product quoting for bonding curves.
//!
//! # Modules
//!
//! - `domain`: Curve math, curve accounts, token feed and filter
//! - `ports`: Trait abstractions (Connector, CurveReader, MetadataResolver)
//! - `adapters`: External implementations (PumpPortal, Solana RPC, HTTP metadata, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Feed and quote services

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
