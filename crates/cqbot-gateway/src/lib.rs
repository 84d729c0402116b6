//! # cqbot-gateway
//!
//! WebSocket client engine for go-cqhttp style chat gateways.
//!
//! - Outbound actions: `{"action", "params", "echo"?}` frames
//! - Inbound responses: matched to their request by `echo`
//! - Inbound events: decoded by a [`JsonProcessor`] and fanned out to listeners

pub mod codec;
pub mod connection;
pub mod error;
pub mod events;
pub mod protocol;

// Re-export commonly used types at crate root
pub use connection::{
    on_message_id, ChannelConnector, ConnectionState, Connector, GatewayClient, GatewayPeer,
    MessageIdCallback, Responder, TransportError, WebSocketConnector,
};
pub use error::{DecodeError, GatewayError, GatewayResult};
pub use events::{CqHttpProcessor, JsonProcessor};
pub use protocol::{Action, EchoDecoder, MessageIdDecoder, RawDecoder};
