//! Export of a retrieval to JSON and Markdown files.

mod json;
mod markdown;

pub use json::render_json;
pub use markdown::{describe_author, render_markdown};

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::discord::{FilterSet, Message, RetrievalMetrics};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Which files an export produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Both,
}

impl OutputFormat {
    /// Extensions written for this format, in write order.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            OutputFormat::Json => &[".json"],
            OutputFormat::Markdown => &[".md"],
            OutputFormat::Both => &[".json", ".md"],
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "both" => Ok(OutputFormat::Both),
            other => Err(format!(
                "unknown output format '{}'. Valid: json, markdown, md, both",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Both => "both",
        };
        f.write_str(name)
    }
}

/// Filters as recorded in the export header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    pub include_bots: bool,
}

impl From<&FilterSet> for FilterSummary {
    fn from(filters: &FilterSet) -> Self {
        Self {
            since: filters.since_bound(),
            until: filters.until_bound(),
            keywords: filters.keyword_terms().to_vec(),
            authors: filters.author_terms().to_vec(),
            limit: filters.cap(),
            include_bots: filters.includes_bots(),
        }
    }
}

/// Complete export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Export {
    pub channel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    pub exported_at: DateTime<Utc>,
    pub message_count: usize,
    pub messages: Vec<Message>,
    pub filters: FilterSummary,
    pub stats: RetrievalMetrics,
    /// Set when the retrieval was interrupted or failed part way.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub partial: bool,
}

impl Export {
    pub fn new(
        channel_id: impl Into<String>,
        guild_id: Option<String>,
        messages: Vec<Message>,
        filters: &FilterSet,
        stats: RetrievalMetrics,
        exported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            guild_id: guild_id.filter(|g| !g.trim().is_empty()),
            exported_at,
            message_count: messages.len(),
            messages,
            filters: FilterSummary::from(filters),
            stats,
            partial: false,
        }
    }

    pub fn partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    /// Link to a message in the Discord client, when the guild is known.
    pub fn jump_url(&self, message: &Message) -> Option<String> {
        self.guild_id
            .as_deref()
            .map(|guild| jump_url(guild, &self.channel_id, &message.id))
    }
}

pub fn jump_url(guild_id: &str, channel_id: &str, message_id: &str) -> String {
    format!(
        "https://discord.com/channels/{}/{}/{}",
        guild_id, channel_id, message_id
    )
}

/// Append `ext` unless `prefix` already ends with it (case-insensitive).
pub fn ensure_extension(prefix: &Path, ext: &str) -> PathBuf {
    let text = prefix.to_string_lossy();
    if text.to_lowercase().ends_with(&ext.to_lowercase()) {
        return prefix.to_path_buf();
    }
    PathBuf::from(format!("{}{}", text, ext))
}

/// `discord_<channel>_<YYYYMMDDTHHMMSSZ>`
pub fn default_prefix(channel_id: &str, now: DateTime<Utc>) -> String {
    format!("discord_{}_{}", channel_id, now.format("%Y%m%dT%H%M%SZ"))
}

/// Write `export` in `format`, returning the paths written.
pub fn write_outputs(
    export: &Export,
    prefix: &Path,
    format: OutputFormat,
) -> Result<Vec<PathBuf>, ExportError> {
    let mut written = Vec::new();
    for ext in format.extensions() {
        let path = ensure_extension(prefix, ext);
        let contents = match *ext {
            ".json" => render_json(export)?,
            _ => render_markdown(export),
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ExportError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, contents).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }
    Ok(written)
}
