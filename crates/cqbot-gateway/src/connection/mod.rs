//! Connection engine
//!
//! Transports, the gateway client, echo correlation, and listener dispatch.

mod channel;
mod client;
mod listeners;
mod pending;
mod transport;
mod websocket;

pub use channel::{ChannelConnector, GatewayPeer};
pub use client::{ConnectionState, GatewayClient};
pub use listeners::{Listener, ListenerRegistry};
pub use pending::{
    on_message_id, CallbackFuture, MessageIdCallback, PendingRequest, PendingRequests, Responder,
    MAX_ECHO_TOKEN,
};
pub use transport::{Connector, FrameSink, FrameStream, Transport, TransportError};
pub use websocket::WebSocketConnector;
