//! Event payloads
//!
//! Events are built once per inbound frame and shared read-only with every listener.

use super::EventType;
use crate::chat::{ChatTarget, User};
use crate::message::MessageChain;
use std::sync::Arc;

/// A chat message received from the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    /// Where the message was posted (the group, or the sender for direct messages)
    pub source: ChatTarget,
    /// Who sent it
    pub sender: User,
    /// Provider message ID
    pub message_id: i32,
    /// Decoded message content
    pub chain: MessageChain,
    /// Raw markup text as delivered by the gateway
    pub raw_message: String,
    /// Whether the message was posted in a group
    pub is_group: bool,
}

impl MessageEvent {
    /// Get the text of the first segment, if it is a text segment
    #[must_use]
    pub fn leading_text(&self) -> Option<&str> {
        self.chain.first().and_then(|segment| segment.as_text())
    }
}

/// Gateway heartbeat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartBeatEvent {
    /// Heartbeat interval in milliseconds
    pub interval_ms: i64,
}

/// A typed gateway event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Message(Arc<MessageEvent>),
    HeartBeat(HeartBeatEvent),
}

impl Event {
    /// Get the event type tag
    #[must_use]
    pub const fn event_type(&self) -> EventType {
        match self {
            Self::Message(_) => EventType::Message,
            Self::HeartBeat(_) => EventType::HeartBeat,
        }
    }

    /// Get the message payload, if this is a message event
    #[must_use]
    pub fn as_message(&self) -> Option<&Arc<MessageEvent>> {
        match self {
            Self::Message(message) => Some(message),
            Self::HeartBeat(_) => None,
        }
    }
}

impl From<MessageEvent> for Event {
    fn from(event: MessageEvent) -> Self {
        Self::Message(Arc::new(event))
    }
}

impl From<HeartBeatEvent> for Event {
    fn from(event: HeartBeatEvent) -> Self {
        Self::HeartBeat(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageSegment;

    fn sample_message(chain: MessageChain) -> MessageEvent {
        let sender = User::new("100", "alice");
        MessageEvent {
            source: ChatTarget::User(sender.clone()),
            sender,
            message_id: 1,
            chain,
            raw_message: String::new(),
            is_group: false,
        }
    }

    #[test]
    fn test_event_type() {
        let message: Event = sample_message(MessageChain::new()).into();
        assert_eq!(message.event_type(), EventType::Message);

        let heartbeat: Event = HeartBeatEvent { interval_ms: 5000 }.into();
        assert_eq!(heartbeat.event_type(), EventType::HeartBeat);
        assert!(heartbeat.as_message().is_none());
    }

    #[test]
    fn test_leading_text() {
        let text_first = sample_message(MessageChain::from_text(".help"));
        assert_eq!(text_first.leading_text(), Some(".help"));

        let reply_first =
            sample_message(MessageChain::from_text(".help").prepend(MessageSegment::reply(3)));
        assert_eq!(reply_first.leading_text(), None);

        assert_eq!(sample_message(MessageChain::new()).leading_text(), None);
    }
}
