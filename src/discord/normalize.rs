//! Wire message -> canonical [`Message`] conversion.

use chrono::{DateTime, NaiveDateTime, Utc};

use super::types::{
    Attachment, Author, Message, RawAuthor, RawMessage, RawReaction, Reaction, ReplyReference,
};

/// Parse a wire timestamp into UTC.
///
/// Accepts RFC 3339 with or without fractional seconds. Timestamps without
/// an offset are read as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Build the canonical record for `raw`, stamped with its parsed timestamp.
///
/// Pure: the same input always yields an equal output.
pub fn normalize_message(raw: &RawMessage, timestamp: DateTime<Utc>) -> Message {
    Message {
        id: raw.id.clone(),
        channel_id: raw.channel_id.clone(),
        author: normalize_author(&raw.author),
        content: raw.content.clone(),
        timestamp,
        edited_timestamp: raw.edited_timestamp.as_deref().and_then(parse_timestamp),
        mention_user_ids: raw.mentions.iter().map(|u| u.id.clone()).collect(),
        mention_role_ids: raw.mention_roles.clone(),
        attachments: raw
            .attachments
            .iter()
            .map(|att| Attachment {
                id: att.id.clone(),
                filename: att.filename.clone(),
                url: att.url.clone(),
                content_type: non_empty(att.content_type.as_deref()),
                size: att.size,
            })
            .collect(),
        reactions: raw.reactions.iter().map(normalize_reaction).collect(),
        reply_to: raw.referenced_message.as_ref().map(|r| ReplyReference {
            message_id: r.id.clone(),
            author_id: non_empty(Some(r.author.id.as_str())),
        }),
        kind: raw.kind,
        embed_count: raw.embeds.len(),
    }
}

/// The account's global name replaces the raw handle as `username`; the
/// display name is the server nickname, then the global name.
fn normalize_author(raw: &RawAuthor) -> Author {
    let global_name = non_empty(raw.global_name.as_deref());
    let display_name = non_empty(raw.display_name.as_deref()).or_else(|| global_name.clone());
    Author {
        id: raw.id.clone(),
        username: global_name.unwrap_or_else(|| raw.username.clone()),
        display_name,
        bot: raw.bot,
    }
}

/// Custom emoji without a name are rendered as `:<id>:`.
fn normalize_reaction(raw: &RawReaction) -> Reaction {
    let emoji = match (
        non_empty(raw.emoji.name.as_deref()),
        non_empty(raw.emoji.id.as_deref()),
    ) {
        (Some(name), _) => name,
        (None, Some(id)) => format!(":{}:", id),
        (None, None) => String::new(),
    };
    Reaction {
        emoji,
        count: raw.count,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
