//! Gateway actions
//!
//! Names and parameter payloads of the actions the client sends.

use cqbot_core::ChatTarget;
use serde::Serialize;
use std::fmt;

/// Actions the client knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Send a direct message to a user
    SendPrivateMsg,
    /// Send a message to a group
    SendGroupMsg,
}

impl Action {
    /// Get the wire name of the action
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SendPrivateMsg => "send_private_msg",
            Self::SendGroupMsg => "send_group_msg",
        }
    }

    /// Parse an action from its wire name
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "send_private_msg" => Some(Self::SendPrivateMsg),
            "send_group_msg" => Some(Self::SendGroupMsg),
            _ => None,
        }
    }

    /// Pick the send action for a chat target
    #[must_use]
    pub const fn send_to(target: &ChatTarget) -> Self {
        match target {
            ChatTarget::User(_) => Self::SendPrivateMsg,
            ChatTarget::Group(_) => Self::SendGroupMsg,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parameters of `send_private_msg`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrivateMessageParams {
    pub user_id: i64,
    pub message: String,
}

/// Parameters of `send_group_msg`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupMessageParams {
    pub group_id: i64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names() {
        assert_eq!(Action::SendPrivateMsg.as_str(), "send_private_msg");
        assert_eq!(Action::SendGroupMsg.as_str(), "send_group_msg");
        assert_eq!(Action::from_str("send_group_msg"), Some(Action::SendGroupMsg));
        assert_eq!(Action::from_str("delete_msg"), None);
    }

    #[test]
    fn test_action_for_target() {
        assert_eq!(
            Action::send_to(&ChatTarget::user("1", "a")),
            Action::SendPrivateMsg
        );
        assert_eq!(Action::send_to(&ChatTarget::group("2")), Action::SendGroupMsg);
    }

    #[test]
    fn test_params_serialization() {
        let params = GroupMessageParams {
            group_id: 42,
            message: "hi".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({"group_id": 42, "message": "hi"})
        );
    }
}
