//! Event decoding
//!
//! Turns the JSON object of an inbound event frame into a typed [`Event`].

use crate::codec::{cq_code, decode_segments, RawSegment};
use crate::error::DecodeError;
use cqbot_core::{ChatTarget, Event, HeartBeatEvent, MessageChain, MessageEvent, User};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// `post_type` of chat messages
pub const MESSAGE_POST: &str = "message";

/// `post_type` of gateway meta events
pub const META_EVENT_POST: &str = "meta_event";

/// `meta_event_type` of heartbeats
pub const HEARTBEAT_META: &str = "heartbeat";

/// Decodes event frames into typed events
///
/// `Ok(None)` means the frame is understood but not surfaced as an event.
pub trait JsonProcessor: Send + Sync {
    fn process(&self, frame: &Map<String, Value>) -> Result<Option<Event>, DecodeError>;
}

/// Decoder for the go-cqhttp (OneBot v11) event format
#[derive(Debug, Clone, Copy, Default)]
pub struct CqHttpProcessor;

/// Message content: a segment array, or the CQ markup string format
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMessage {
    Segments(Vec<RawSegment>),
    Markup(String),
}

#[derive(Debug, Deserialize)]
struct RawSender {
    #[serde(default)]
    user_id: Option<i64>,
    #[serde(default)]
    nickname: Option<String>,
}

impl JsonProcessor for CqHttpProcessor {
    fn process(&self, frame: &Map<String, Value>) -> Result<Option<Event>, DecodeError> {
        let post_type: String = field(frame, "post_type")?;

        match post_type.as_str() {
            MESSAGE_POST => decode_message(frame).map(|message| Some(message.into())),
            META_EVENT_POST => decode_meta_event(frame),
            _ => Err(DecodeError::UnknownPostType(post_type)),
        }
    }
}

fn decode_message(frame: &Map<String, Value>) -> Result<MessageEvent, DecodeError> {
    let chain = match field::<RawMessage>(frame, "message")? {
        RawMessage::Segments(segments) => decode_segments(segments)?,
        RawMessage::Markup(markup) => cq_code::decode(&markup),
    };

    let sender: RawSender = field(frame, "sender")?;
    let user_id = sender
        .user_id
        .ok_or(DecodeError::MissingField("sender.user_id"))?;
    let sender = User::new(user_id.to_string(), sender.nickname.unwrap_or_default());

    let group_id: Option<i64> = optional_field(frame, "group_id")?;
    let source = match group_id {
        Some(group_id) => ChatTarget::group(group_id.to_string()),
        None => ChatTarget::User(sender.clone()),
    };

    let message_id: i32 = field(frame, "message_id")?;
    let raw_message: String = field(frame, "raw_message")?;

    tracing::info!(
        sender = %sender.id(),
        nickname = %sender.display_name(),
        source = %source,
        message = %raw_message,
        "Message received"
    );

    Ok(MessageEvent {
        source,
        sender,
        message_id,
        chain: normalize(chain),
        raw_message,
        is_group: group_id.is_some(),
    })
}

fn decode_meta_event(frame: &Map<String, Value>) -> Result<Option<Event>, DecodeError> {
    let meta_type: String = field(frame, "meta_event_type")?;

    if meta_type == HEARTBEAT_META {
        let interval_ms: i64 = field(frame, "interval")?;
        tracing::trace!(interval_ms, "Heartbeat received");
        Ok(Some(HeartBeatEvent { interval_ms }.into()))
    } else {
        tracing::trace!(meta_event_type = %meta_type, "Ignoring meta event");
        Ok(None)
    }
}

fn normalize(chain: MessageChain) -> MessageChain {
    chain
        .into_iter()
        .filter(|segment| segment.as_text() != Some(""))
        .collect()
}

/// Read a required field
fn field<T: DeserializeOwned>(frame: &Map<String, Value>, name: &'static str) -> Result<T, DecodeError> {
    let value = frame.get(name).ok_or(DecodeError::MissingField(name))?;
    T::deserialize(value).map_err(|e| DecodeError::invalid(name, e))
}

/// Read a field that may be absent or `null`
fn optional_field<T: DeserializeOwned>(
    frame: &Map<String, Value>,
    name: &'static str,
) -> Result<Option<T>, DecodeError> {
    match frame.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(|e| DecodeError::invalid(name, e)),
    }
}
