//! In-memory transport
//!
//! A [`ChannelConnector`] hands the client one end of a pair of channels; the
//! [`GatewayPeer`] plays the gateway on the other end.

use super::transport::{Connector, FrameSink, FrameStream, Transport, TransportError};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;

type Ends = (mpsc::UnboundedSender<String>, mpsc::UnboundedReceiver<String>);

/// Connector backed by in-memory channels
///
/// Connects once; later attempts are refused.
#[derive(Debug)]
pub struct ChannelConnector {
    ends: Mutex<Option<Ends>>,
}

impl ChannelConnector {
    /// Create a connector and the peer that will sit on the other side
    #[must_use]
    pub fn pair() -> (Self, GatewayPeer) {
        let (to_gateway, from_client) = mpsc::unbounded_channel();
        let (to_client, from_gateway) = mpsc::unbounded_channel();

        let connector = Self {
            ends: Mutex::new(Some((to_gateway, from_gateway))),
        };
        let peer = GatewayPeer {
            inbound: from_client,
            outbound: Some(to_client),
        };
        (connector, peer)
    }

    /// Create a connector that refuses every connection attempt
    #[must_use]
    pub fn refusing() -> Self {
        Self {
            ends: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Connector for ChannelConnector {
    async fn connect(&self, url: &str) -> Result<Transport, TransportError> {
        let (sender, receiver) = self
            .ends
            .lock()
            .take()
            .ok_or_else(|| TransportError::Refused(url.to_string()))?;

        Ok((
            Box::new(ChannelSink {
                sender: Some(sender),
            }),
            Box::new(ChannelStream { receiver }),
        ))
    }
}

struct ChannelSink {
    sender: Option<mpsc::UnboundedSender<String>>,
}

#[async_trait]
impl FrameSink for ChannelSink {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        let sender = self.sender.as_ref().ok_or(TransportError::Closed)?;
        sender.send(text).map_err(|_| TransportError::Closed)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.sender = None;
        Ok(())
    }
}

struct ChannelStream {
    receiver: mpsc::UnboundedReceiver<String>,
}

#[async_trait]
impl FrameStream for ChannelStream {
    async fn next_frame(&mut self) -> Option<Result<String, TransportError>> {
        self.receiver.recv().await.map(Ok)
    }
}

/// The gateway side of an in-memory transport
#[derive(Debug)]
pub struct GatewayPeer {
    inbound: mpsc::UnboundedReceiver<String>,
    outbound: Option<mpsc::UnboundedSender<String>>,
}

impl GatewayPeer {
    /// Receive the next frame the client wrote, `None` once the client closed
    pub async fn recv_text(&mut self) -> Option<String> {
        self.inbound.recv().await
    }

    /// Receive the next frame the client wrote, parsed as JSON
    ///
    /// Frames that are not JSON yield `Value::Null`.
    pub async fn recv_json(&mut self) -> Option<Value> {
        let text = self.recv_text().await?;
        Some(serde_json::from_str(&text).unwrap_or(Value::Null))
    }

    /// Deliver a raw text frame to the client
    pub fn send_text(&self, text: impl Into<String>) -> bool {
        self.outbound
            .as_ref()
            .is_some_and(|sender| sender.send(text.into()).is_ok())
    }

    /// Deliver a JSON frame to the client
    pub fn send_json(&self, value: &Value) -> bool {
        self.send_text(value.to_string())
    }

    /// Hang up: the client sees the end of its frame stream
    pub fn disconnect(&mut self) {
        self.outbound = None;
    }
}
