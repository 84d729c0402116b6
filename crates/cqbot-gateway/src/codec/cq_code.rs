//! CQ inline markup
//!
//! Messages travel as a single string where text is escaped and non-text
//! segments are embedded as codes of the form `[CQ:type,key=value,...]`.

use cqbot_core::message::REPLY;
use cqbot_core::{MessageChain, MessageSegment};

const CODE_OPEN: &str = "[CQ:";

/// Escape text so it cannot be read back as a code
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '[' => out.push_str("&#91;"),
            ']' => out.push_str("&#93;"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse [`escape`], also accepting the escaped comma used inside code parameters
#[must_use]
pub fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&#91;", "[")
        .replace("&#93;", "]")
        .replace("&#44;", ",")
        .replace("&amp;", "&")
}

/// The code that marks a message as a reply to `message_id`
#[must_use]
pub fn reply_marker(message_id: i32) -> String {
    format!("[CQ:reply,id={message_id}]")
}

/// Render a chain as markup
#[must_use]
pub fn encode(chain: &MessageChain) -> String {
    let mut out = String::new();
    for segment in chain {
        match segment {
            MessageSegment::Text { content } => out.push_str(&escape(content)),
            MessageSegment::Reply { target_message_id } => {
                out.push_str(&reply_marker(*target_message_id));
            }
        }
    }
    out
}

/// Parse markup into a chain
///
/// Adjacent text is merged into one segment. Codes this client does not model
/// are kept verbatim inside the surrounding text.
#[must_use]
pub fn decode(markup: &str) -> MessageChain {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut rest = markup;

    while let Some(start) = rest.find(CODE_OPEN) {
        text.push_str(&unescape(&rest[..start]));
        let code = &rest[start..];

        let Some(end) = code.find(']') else {
            text.push_str(code);
            rest = "";
            break;
        };

        match parse_code(&code[CODE_OPEN.len()..end]) {
            Some(segment) => {
                if !text.is_empty() {
                    segments.push(MessageSegment::text(std::mem::take(&mut text)));
                }
                segments.push(segment);
            }
            None => {
                tracing::trace!(code = &code[..=end], "Keeping unsupported CQ code as text");
                text.push_str(&code[..=end]);
            }
        }
        rest = &code[end + 1..];
    }

    text.push_str(&unescape(rest));
    if !text.is_empty() {
        segments.push(MessageSegment::text(text));
    }

    MessageChain::from(segments)
}

fn parse_code(body: &str) -> Option<MessageSegment> {
    let mut parts = body.split(',');
    let kind = parts.next()?;

    if kind != REPLY {
        return None;
    }

    parts
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| *key == "id")
        .and_then(|(_, value)| unescape(value).trim().parse::<i32>().ok())
        .map(MessageSegment::reply)
}
