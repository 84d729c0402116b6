//! Inbound event decoding

mod processor;

pub use processor::{CqHttpProcessor, JsonProcessor, HEARTBEAT_META, MESSAGE_POST, META_EVENT_POST};
