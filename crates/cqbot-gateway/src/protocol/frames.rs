//! Wire frames
//!
//! Outbound action frames and the classification of inbound frames.

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Outbound action frame: `{"action", "params", "echo"?}`
#[derive(Debug, Clone, Serialize)]
pub struct ActionFrame<'a, P> {
    pub action: &'a str,
    pub params: P,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo: Option<u64>,
}

impl<'a, P: Serialize> ActionFrame<'a, P> {
    /// Create a frame that expects no response
    pub fn new(action: &'a str, params: P) -> Self {
        Self {
            action,
            params,
            echo: None,
        }
    }

    /// Attach a correlation token
    #[must_use]
    pub fn with_echo(mut self, echo: u64) -> Self {
        self.echo = Some(echo);
        self
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Response to an action that carried an echo token
///
/// Only `echo` and `data` drive routing. `status` and `retcode` are kept as
/// raw values since gateways disagree on their shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseFrame {
    /// The token the request carried
    pub echo: Value,
    /// Action-specific payload (`null` when absent)
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub retcode: Value,
}

impl ResponseFrame {
    /// Get the echo as one of our numeric tokens
    #[must_use]
    pub fn token(&self) -> Option<u64> {
        self.echo.as_u64()
    }

    /// Whether the gateway reported the action as failed
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.retcode.as_i64().is_some_and(|code| code != 0) || self.status.as_str() == Some("failed")
    }
}

/// A decoded inbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    /// Carries `"echo"`: the response to an earlier action
    Response(ResponseFrame),
    /// Anything else: an event for the JSON processor
    Event(Map<String, Value>),
}

impl InboundFrame {
    /// Parse and classify a raw text frame
    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(object) = value else {
            return Err(DecodeError::NotAnObject);
        };

        if object.contains_key("echo") {
            let response = serde_json::from_value(Value::Object(object))?;
            Ok(Self::Response(response))
        } else {
            Ok(Self::Event(object))
        }
    }
}

impl fmt::Display for InboundFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Response(response) => write!(f, "InboundFrame(response, echo={})", response.echo),
            Self::Event(object) => match object.get("post_type").and_then(Value::as_str) {
                Some(post_type) => write!(f, "InboundFrame(event, post_type={post_type})"),
                None => write!(f, "InboundFrame(event)"),
            },
        }
    }
}
