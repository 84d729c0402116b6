//! Test helpers for integration tests
//!
//! [`TestGateway`] listens on a local port and plays the gateway for one bot.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use cqbot_common::AppConfig;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

/// How long a helper waits for a frame before failing the test
pub const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// A gateway listening on localhost
pub struct TestGateway {
    listener: TcpListener,
    addr: SocketAddr,
}

impl TestGateway {
    /// Bind to a free local port
    pub async fn bind() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        Ok(Self { listener, addr })
    }

    /// WebSocket URL of the gateway
    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Accept the next client and complete the WebSocket handshake
    pub async fn accept(&self) -> Result<GatewayConnection> {
        let (stream, peer) = tokio::time::timeout(FRAME_TIMEOUT, self.listener.accept())
            .await
            .context("no client connected")??;
        let socket = accept_async(stream).await?;
        Ok(GatewayConnection { socket, peer })
    }
}

/// The gateway's side of one client connection
pub struct GatewayConnection {
    socket: WebSocketStream<TcpStream>,
    pub peer: SocketAddr,
}

impl GatewayConnection {
    /// Receive the next text frame as JSON, `None` once the client hung up
    pub async fn recv_json(&mut self) -> Result<Option<Value>> {
        tokio::time::timeout(FRAME_TIMEOUT, async {
            while let Some(message) = self.socket.next().await {
                match message {
                    Ok(Message::Text(text)) => return Ok(Some(serde_json::from_str(&text)?)),
                    Ok(Message::Close(_)) | Err(_) => return Ok(None),
                    Ok(_) => {}
                }
            }
            anyhow::Ok(None)
        })
        .await
        .context("timed out waiting for a frame")?
    }

    /// Receive the next frame, failing if the client hung up
    pub async fn expect_json(&mut self) -> Result<Value> {
        self.recv_json().await?.context("client closed the connection")
    }

    /// Send a JSON frame to the client
    pub async fn send_json(&mut self, value: &Value) -> Result<()> {
        self.socket.send(Message::Text(value.to_string())).await?;
        Ok(())
    }

    /// Close the connection from the gateway side
    pub async fn close(&mut self) -> Result<()> {
        self.socket.close(None).await?;
        Ok(())
    }
}

/// Create a bot configuration pointing at a test gateway
pub fn test_config(url: &str) -> Result<AppConfig> {
    AppConfig::new(url, ".").map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Find a local port with nothing listening on it
pub async fn unused_url() -> Result<String> {
    let gateway = TestGateway::bind().await?;
    Ok(gateway.url())
}
