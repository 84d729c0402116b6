//! Gateway events - typed representations of inbound event frames

mod event_types;
mod payloads;

pub use event_types::EventType;
pub use payloads::{Event, HeartBeatEvent, MessageEvent};
