//! Gateway error types

use crate::connection::TransportError;
use cqbot_core::ChatError;
use thiserror::Error;

/// Errors returned by the gateway client API
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The transport could not be opened; the client is stopped for good
    #[error("Failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: TransportError,
    },

    /// `start` was called on a client that is not idle
    #[error("Gateway client already started")]
    AlreadyStarted,

    /// The client is not connected (never started, closed, or stopped after a transport failure)
    #[error("Not connected to the gateway")]
    NotConnected,

    /// An outbound frame could not be serialized
    #[error("Failed to encode frame: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The chat target carries an ID the gateway cannot accept
    #[error(transparent)]
    InvalidTarget(#[from] ChatError),
}

/// Gateway result type
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors raised while decoding an inbound frame
///
/// These are isolated to the frame that produced them.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The frame is not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The frame is valid JSON but not an object
    #[error("Frame is not a JSON object")]
    NotAnObject,

    /// A required field is absent
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// A field is present but has the wrong shape
    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// The `post_type` discriminator is not one we decode
    #[error("Unknown post type: {0}")]
    UnknownPostType(String),
}

impl DecodeError {
    pub(crate) fn invalid(field: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidField {
            field,
            reason: reason.to_string(),
        }
    }
}
