//! Frame fixtures
//!
//! Builders for the event and response frames a go-cqhttp gateway sends.

use serde_json::{json, Value};
use std::sync::atomic::{AtomicI32, Ordering};

static MESSAGE_IDS: AtomicI32 = AtomicI32::new(1000);

/// Get a unique message ID
pub fn next_message_id() -> i32 {
    MESSAGE_IDS.fetch_add(1, Ordering::SeqCst)
}

/// A group text message in segment-array form
pub fn group_message(message_id: i32, group_id: i64, user_id: i64, text: &str) -> Value {
    json!({
        "time": 1_700_000_000,
        "self_id": 1,
        "post_type": "message",
        "message_type": "group",
        "sub_type": "normal",
        "message_id": message_id,
        "group_id": group_id,
        "user_id": user_id,
        "message": [{"type": "text", "data": {"text": text}}],
        "raw_message": text,
        "font": 0,
        "sender": {"user_id": user_id, "nickname": format!("user{user_id}")}
    })
}

/// A private text message in CQ string form
pub fn private_message(message_id: i32, user_id: i64, text: &str) -> Value {
    json!({
        "time": 1_700_000_000,
        "self_id": 1,
        "post_type": "message",
        "message_type": "private",
        "sub_type": "friend",
        "message_id": message_id,
        "user_id": user_id,
        "message": text,
        "raw_message": text,
        "font": 0,
        "sender": {"user_id": user_id, "nickname": format!("user{user_id}")}
    })
}

/// A heartbeat meta event
pub fn heartbeat(interval_ms: i64) -> Value {
    json!({
        "time": 1_700_000_000,
        "self_id": 1,
        "post_type": "meta_event",
        "meta_event_type": "heartbeat",
        "status": {"online": true, "good": true},
        "interval": interval_ms
    })
}

/// A successful send-message response
pub fn send_ok(echo: &Value, message_id: i32) -> Value {
    json!({
        "status": "ok",
        "retcode": 0,
        "data": {"message_id": message_id},
        "echo": echo
    })
}
