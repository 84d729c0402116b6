//! JSON segment lists
//!
//! The array form of a message: `[{"type": "text", "data": {"text": "..."}}, ...]`.

use crate::error::DecodeError;
use cqbot_core::message::{REPLY, TEXT};
use cqbot_core::{MessageChain, MessageSegment};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One element of a segment list as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSegment {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl RawSegment {
    fn new(kind: &str, key: &str, value: Value) -> Self {
        let mut data = Map::new();
        data.insert(key.to_string(), value);
        Self {
            kind: kind.to_string(),
            data,
        }
    }
}

impl From<&MessageSegment> for RawSegment {
    fn from(segment: &MessageSegment) -> Self {
        match segment {
            MessageSegment::Text { content } => Self::new(TEXT, "text", Value::from(content.as_str())),
            MessageSegment::Reply { target_message_id } => {
                Self::new(REPLY, "id", Value::from(target_message_id.to_string()))
            }
        }
    }
}

/// Convert a chain to its wire segment list
#[must_use]
pub fn encode_segments(chain: &MessageChain) -> Vec<RawSegment> {
    chain.iter().map(RawSegment::from).collect()
}

/// Convert a wire segment list to a chain
///
/// Segment types this client does not model are skipped.
pub fn decode_segments(raw: Vec<RawSegment>) -> Result<MessageChain, DecodeError> {
    let mut chain = MessageChain::new();

    for segment in raw {
        match segment.kind.as_str() {
            TEXT => {
                let text = segment
                    .data
                    .get("text")
                    .and_then(Value::as_str)
                    .ok_or_else(|| DecodeError::invalid("message", "text segment without data.text"))?;
                chain = chain.add_text(text);
            }
            REPLY => chain = chain.add_reply(reply_id(&segment.data)?),
            other => {
                tracing::trace!(segment_type = other, "Skipping unsupported segment");
            }
        }
    }

    Ok(chain)
}

fn reply_id(data: &Map<String, Value>) -> Result<i32, DecodeError> {
    let id = match data.get("id") {
        Some(Value::String(id)) => id.trim().parse::<i64>().ok(),
        Some(Value::Number(id)) => id.as_i64(),
        _ => None,
    };

    id.and_then(|id| i32::try_from(id).ok())
        .ok_or_else(|| DecodeError::invalid("message", "reply segment without a valid data.id"))
}
