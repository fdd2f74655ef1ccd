//! Ports Layer - Trait definitions for external dependencies
//!
//! Following hexagonal architecture, these traits abstract:
//! - The duplex message transport behind the stream client
//! - On-chain bonding curve reads
//! - Off-chain token metadata resolution

pub mod transport;
pub mod curve_reader;
pub mod metadata;

pub use transport::{Connection, Connector, Frame, FrameSink, FrameSource, TransportError};
pub use curve_reader::{CurveReader, CurveReaderError};
pub use metadata::{MetadataError, MetadataResolver, TokenMetadata};
