//! Transport abstraction
//!
//! The client talks to the gateway through a pair of text-frame halves so the
//! engine can run over a real WebSocket or an in-memory channel.

use async_trait::async_trait;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors raised by a transport
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("WebSocket error: {0}")]
    WebSocket(Box<tungstenite::Error>),

    /// The other side is gone
    #[error("Transport closed")]
    Closed,

    /// The connection attempt was rejected before any frame was exchanged
    #[error("Connection refused: {0}")]
    Refused(String),
}

impl From<tungstenite::Error> for TransportError {
    fn from(err: tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

/// The two halves of an open transport
pub type Transport = (Box<dyn FrameSink>, Box<dyn FrameStream>);

/// Opens transports to a gateway URL
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<Transport, TransportError>;
}

/// Write half of a transport
#[async_trait]
pub trait FrameSink: Send {
    /// Write one text frame
    async fn send_text(&mut self, text: String) -> Result<(), TransportError>;

    /// Close the transport
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Read half of a transport
#[async_trait]
pub trait FrameStream: Send {
    /// Read the next text frame, `None` once the transport is closed
    async fn next_frame(&mut self) -> Option<Result<String, TransportError>>;
}
