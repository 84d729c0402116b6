//! # cqbot-core
//!
//! Domain layer containing message chains, chat targets, and gateway events.
//! This crate has no dependency on the transport or the wire format.

pub mod chat;
pub mod event;
pub mod message;

// Re-export commonly used types at crate root
pub use chat::{ChatError, ChatTarget, Group, User};
pub use event::{Event, EventType, HeartBeatEvent, MessageEvent};
pub use message::{MessageChain, MessageSegment};
