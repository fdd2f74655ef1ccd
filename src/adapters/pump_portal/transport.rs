//! WebSocket transport over tokio-tungstenite

use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::ports::{Connection, Connector, Frame, FrameSink, FrameSource, TransportError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Default handshake timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Opens real WebSocket connections
#[derive(Debug, Clone)]
pub struct WsConnector {
    connect_timeout: Duration,
}

impl Default for WsConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(CONNECT_TIMEOUT_SECS))
    }
}

impl WsConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, url: &str) -> Result<Connection, TransportError> {
        debug!("Opening WebSocket to {}", url);
        let (stream, _response) = tokio::time::timeout(self.connect_timeout, connect_async(url))
            .await
            .map_err(|_| {
                TransportError::ConnectFailed(format!(
                    "handshake timed out after {}s",
                    self.connect_timeout.as_secs()
                ))
            })?
            .map_err(|e| TransportError::ConnectFailed(e.to_string()))?;

        let (write, read) = stream.split();
        Ok(Connection {
            sink: Box::new(WsSink { write }),
            source: Box::new(WsSource { read }),
        })
    }
}

struct WsSink {
    write: SplitSink<WsStream, Message>,
}

#[async_trait]
impl FrameSink for WsSink {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.write
            .send(Message::Text(text))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn send_ping(&mut self) -> Result<(), TransportError> {
        self.write
            .send(Message::Ping(Vec::new()))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn close(&mut self) {
        if let Err(e) = self.write.close().await {
            debug!("WebSocket close: {}", e);
        }
    }
}

struct WsSource {
    read: SplitStream<WsStream>,
}

#[async_trait]
impl FrameSource for WsSource {
    async fn next_frame(&mut self) -> Option<Result<Frame, TransportError>> {
        let message = match self.read.next().await? {
            Ok(message) => message,
            Err(e) => return Some(Err(TransportError::ReceiveFailed(e.to_string()))),
        };

        Some(Ok(match message {
            Message::Text(text) => Frame::Text(text),
            Message::Binary(bytes) => Frame::Binary(bytes),
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => Frame::Control,
            Message::Close(frame) => Frame::Close(frame.map(|f| f.reason.into_owned())),
        }))
    }
}
