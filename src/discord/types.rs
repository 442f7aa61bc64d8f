//! Wire and normalized message types.
//!
//! `Raw*` types mirror the JSON returned by
//! `GET /channels/{channel_id}/messages`. They are deserialized as-is and
//! never modified. [`Message`] is the canonical shape used for filtering
//! and export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit JSON `null` the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// One message exactly as delivered by the API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawMessage {
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub channel_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
    #[serde(default, deserialize_with = "nullable")]
    pub timestamp: String,
    #[serde(default)]
    pub edited_timestamp: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub author: RawAuthor,
    #[serde(default, deserialize_with = "nullable")]
    pub mentions: Vec<RawUser>,
    #[serde(default, deserialize_with = "nullable")]
    pub mention_roles: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub attachments: Vec<RawAttachment>,
    #[serde(default, deserialize_with = "nullable")]
    pub reactions: Vec<RawReaction>,
    /// Embeds are only counted, so their content stays untyped.
    #[serde(default, deserialize_with = "nullable")]
    pub embeds: Vec<serde_json::Value>,
    #[serde(rename = "type", default)]
    pub kind: i64,
    #[serde(default)]
    pub referenced_message: Option<Box<RawReference>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAuthor {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub bot: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawUser {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAttachment {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub filename: String,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawReaction {
    #[serde(default, deserialize_with = "nullable")]
    pub count: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub emoji: RawEmoji,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawEmoji {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// The replied-to message, reduced to what a reply reference needs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawReference {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub author: RawAuthor,
}

/// Body of a 429 response.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitBody {
    pub retry_after: f64,
}

/// Canonical message record used for filtering and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    pub author: Author,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mention_user_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mention_role_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Reaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<ReplyReference>,
    #[serde(rename = "type")]
    pub kind: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub embed_count: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl Message {
    /// Content, attachments and embeds are all absent.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.attachments.is_empty() && self.embed_count == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub bot: bool,
}

impl Author {
    /// Name shown to readers: the display name when set, else the username.
    pub fn shown_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(rename = "size_bytes", default, skip_serializing_if = "is_zero_u64")]
    pub size: u64,
}

fn is_zero_u64(n: &u64) -> bool {
    *n == 0
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub emoji: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyReference {
    pub message_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
}

/// Request counters for one retrieval session. Only ever incremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalMetrics {
    #[serde(rename = "api_requests")]
    pub requests: u64,
    pub rate_limit_hits: u64,
}

impl RetrievalMetrics {
    pub(crate) fn record_request(&mut self) {
        self.requests += 1;
    }

    pub(crate) fn record_rate_limit(&mut self) {
        self.rate_limit_hits += 1;
    }
}
