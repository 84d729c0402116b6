//! Response payload decoders
//!
//! A decoder turns the `data` of a response frame into a typed value for the
//! callback registered alongside the request.

use crate::error::DecodeError;
use serde_json::Value;

/// Decodes the payload of an action response
pub trait EchoDecoder: Send + Sync + 'static {
    /// Decoded value handed to the callback
    type Output: Send + 'static;

    /// Decode a response `data` payload
    fn decode(&self, data: &Value) -> Result<Self::Output, DecodeError>;
}

/// Reads `data.message_id` from a send-message response
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageIdDecoder;

impl EchoDecoder for MessageIdDecoder {
    type Output = i32;

    fn decode(&self, data: &Value) -> Result<i32, DecodeError> {
        let id = data
            .get("message_id")
            .ok_or(DecodeError::MissingField("message_id"))?;
        let id = id
            .as_i64()
            .ok_or_else(|| DecodeError::invalid("message_id", format!("expected an integer, got {id}")))?;
        i32::try_from(id).map_err(|e| DecodeError::invalid("message_id", e))
    }
}

/// Passes the payload through untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct RawDecoder;

impl EchoDecoder for RawDecoder {
    type Output = Value;

    fn decode(&self, data: &Value) -> Result<Value, DecodeError> {
        Ok(data.clone())
    }
}
