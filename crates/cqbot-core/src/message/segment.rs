//! Message segments - the closed set of parts a chat message is built from

use std::fmt;

/// Segment type tag for plain text
pub const TEXT: &str = "text";

/// Segment type tag for a reply reference
pub const REPLY: &str = "reply";

/// A single part of a message chain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageSegment {
    /// Plain text
    Text { content: String },
    /// Reference to an earlier message this one replies to
    Reply { target_message_id: i32 },
}

impl MessageSegment {
    /// Create a text segment
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Create a reply segment
    #[must_use]
    pub const fn reply(target_message_id: i32) -> Self {
        Self::Reply { target_message_id }
    }

    /// Get the segment type tag
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => TEXT,
            Self::Reply { .. } => REPLY,
        }
    }

    /// Get the text content, if this is a text segment
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { content } => Some(content),
            Self::Reply { .. } => None,
        }
    }

    /// Get the referenced message ID, if this is a reply segment
    #[must_use]
    pub const fn as_reply(&self) -> Option<i32> {
        match self {
            Self::Reply { target_message_id } => Some(*target_message_id),
            Self::Text { .. } => None,
        }
    }
}

impl fmt::Display for MessageSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { content } => write!(f, "{content}"),
            Self::Reply { target_message_id } => write!(f, "[reply:{target_message_id}]"),
        }
    }
}
