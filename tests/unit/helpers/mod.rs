//! Test helper utilities

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use ripcord::discord::types::RawMessage;
use serde_json::json;

pub fn ts(s: &str) -> DateTime<Utc> {
    s.parse().expect("valid timestamp")
}

/// Wire-format message as the API would send it.
pub fn wire_message(id: &str, timestamp: &str, username: &str, content: &str) -> serde_json::Value {
    json!({
        "id": id,
        "channel_id": "500",
        "content": content,
        "timestamp": timestamp,
        "edited_timestamp": null,
        "author": {
            "id": format!("u-{}", username),
            "username": username,
            "global_name": null,
            "bot": false
        },
        "mentions": [],
        "mention_roles": [],
        "attachments": [],
        "embeds": [],
        "type": 0
    })
}

pub fn raw(value: serde_json::Value) -> RawMessage {
    serde_json::from_value(value).expect("valid wire message")
}

pub fn raw_message(id: &str, timestamp: &str, username: &str, content: &str) -> RawMessage {
    raw(wire_message(id, timestamp, username, content))
}

pub fn bot_message(id: &str, timestamp: &str, content: &str) -> RawMessage {
    let mut value = wire_message(id, timestamp, "helper-bot", content);
    value["author"]["bot"] = json!(true);
    raw(value)
}
