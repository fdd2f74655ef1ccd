//! Transport Port
//!
//! Message-oriented duplex connection used by the stream client. The production
//! implementation wraps tokio-tungstenite; tests drive the client through an
//! in-memory implementation.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    ConnectFailed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Receive failed: {0}")]
    ReceiveFailed(String),
}

/// Inbound frame as delivered by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
    /// Ping/pong and other control frames
    Control,
    /// Peer closed the connection
    Close(Option<String>),
}

/// Write half of a connection
#[async_trait]
pub trait FrameSink: Send {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError>;

    async fn send_ping(&mut self) -> Result<(), TransportError>;

    /// Best-effort close; errors are ignored
    async fn close(&mut self);
}

/// Read half of a connection
#[async_trait]
pub trait FrameSource: Send {
    /// Next frame, or `None` once the connection is gone
    async fn next_frame(&mut self) -> Option<Result<Frame, TransportError>>;
}

/// An open connection split into its two halves
pub struct Connection {
    pub sink: Box<dyn FrameSink>,
    pub source: Box<dyn FrameSource>,
}

/// Opens connections to a URL
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self, url: &str) -> Result<Connection, TransportError>;
}
