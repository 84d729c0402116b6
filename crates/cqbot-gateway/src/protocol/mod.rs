//! Gateway wire protocol: actions, frames, and response decoding

pub mod actions;
pub mod frames;
pub mod responses;

pub use actions::{Action, GroupMessageParams, PrivateMessageParams};
pub use frames::{ActionFrame, InboundFrame, ResponseFrame};
pub use responses::{EchoDecoder, MessageIdDecoder, RawDecoder};
