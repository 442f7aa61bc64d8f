//! Markdown rendering for human review.

use std::fmt::Write;

use chrono::SecondsFormat;

use super::Export;
use crate::discord::{Author, Message};

/// "Display (username)" when the two differ, else the username.
pub fn describe_author(author: &Author) -> String {
    match author.display_name.as_deref() {
        Some(display) if display != author.username => {
            format!("{} ({})", display, author.username)
        }
        _ => author.username.clone(),
    }
}

pub fn render_markdown(export: &Export) -> String {
    let mut out = String::new();
    write_header(&mut out, export);
    for message in &export.messages {
        write_message(&mut out, export, message);
    }
    out
}

fn write_header(out: &mut String, export: &Export) {
    let filters = &export.filters;
    let _ = writeln!(out, "# Discord export for channel {}\n", export.channel_id);
    let _ = writeln!(
        out,
        "- Exported at: {}",
        export.exported_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = writeln!(out, "- Messages: {}", export.message_count);
    if export.partial {
        let _ = writeln!(out, "- Partial: retrieval did not complete");
    }
    if let Some(guild) = &export.guild_id {
        let _ = writeln!(out, "- Guild: {}", guild);
    }
    if let Some(since) = filters.since {
        let _ = writeln!(out, "- Since: {}", since.to_rfc3339_opts(SecondsFormat::Secs, true));
    }
    if let Some(until) = filters.until {
        let _ = writeln!(out, "- Until: {}", until.to_rfc3339_opts(SecondsFormat::Secs, true));
    }
    if !filters.keywords.is_empty() {
        let _ = writeln!(out, "- Keywords: {}", filters.keywords.join(", "));
    }
    if !filters.authors.is_empty() {
        let _ = writeln!(out, "- Authors: {}", filters.authors.join(", "));
    }
    if let Some(limit) = filters.limit {
        let _ = writeln!(out, "- Limit: {}", limit);
    }
    let _ = writeln!(out, "- Include bots: {}", filters.include_bots);
    if export.stats.requests > 0 {
        let _ = writeln!(out, "- API requests: {}", export.stats.requests);
    }
    if export.stats.rate_limit_hits > 0 {
        let _ = writeln!(out, "- Rate limit waits: {}", export.stats.rate_limit_hits);
    }
}

fn write_message(out: &mut String, export: &Export, message: &Message) {
    let _ = writeln!(
        out,
        "\n## {} — {}\n",
        message.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        describe_author(&message.author)
    );
    if !message.content.is_empty() {
        let _ = writeln!(out, "{}\n", message.content);
    }
    if !message.attachments.is_empty() {
        out.push_str("**Attachments:**\n");
        for att in &message.attachments {
            if att.size > 0 {
                let _ = writeln!(
                    out,
                    "- [{}]({}) ({})",
                    att.filename,
                    att.url,
                    humansize::format_size(att.size, humansize::BINARY)
                );
            } else {
                let _ = writeln!(out, "- [{}]({})", att.filename, att.url);
            }
        }
        out.push('\n');
    }
    if !message.reactions.is_empty() {
        let parts: Vec<String> = message
            .reactions
            .iter()
            .map(|r| format!("{} ×{}", r.emoji, r.count))
            .collect();
        let _ = writeln!(out, "**Reactions:** {}\n", parts.join(", "));
    }
    if let Some(url) = export.jump_url(message) {
        let _ = writeln!(out, "[Jump to message]({})\n", url);
    }
}
