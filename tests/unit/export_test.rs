//! Unit tests for export file writing

use std::fs;

use ripcord::discord::normalize::normalize_message;
use ripcord::discord::{FilterSet, RetrievalMetrics};
use ripcord::export::{describe_author, render_markdown, write_outputs, Export, OutputFormat};
use tempfile::TempDir;

use crate::helpers::{raw_message, ts};

fn sample_export() -> Export {
    let raw = raw_message("42", "2024-01-01T10:00:00Z", "alice", "hello world");
    let message = normalize_message(&raw, ts("2024-01-01T10:00:00Z"));
    Export::new(
        "500",
        Some("900".to_string()),
        vec![message],
        &FilterSet::new(),
        RetrievalMetrics {
            requests: 2,
            rate_limit_hits: 0,
        },
        ts("2024-01-02T00:00:00Z"),
    )
}

#[test]
fn both_formats_write_two_files() {
    let temp = TempDir::new().unwrap();
    let prefix = temp.path().join("out").join("general");

    let written = write_outputs(&sample_export(), &prefix, OutputFormat::Both).unwrap();

    assert_eq!(
        written,
        vec![
            temp.path().join("out").join("general.json"),
            temp.path().join("out").join("general.md"),
        ]
    );
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
    assert_eq!(json["message_count"], 1);
    assert_eq!(json["messages"][0]["content"], "hello world");

    let md = fs::read_to_string(&written[1]).unwrap();
    assert!(md.contains("[Jump to message](https://discord.com/channels/900/500/42)"));
}

#[test]
fn existing_extension_is_kept() {
    let temp = TempDir::new().unwrap();
    let prefix = temp.path().join("export.md");

    let written = write_outputs(&sample_export(), &prefix, OutputFormat::Markdown).unwrap();

    assert_eq!(written, vec![prefix.clone()]);
    assert!(prefix.exists());
}

#[test]
fn empty_export_is_still_written() {
    let temp = TempDir::new().unwrap();
    let export = Export::new(
        "500",
        None,
        Vec::new(),
        &FilterSet::new(),
        RetrievalMetrics::default(),
        ts("2024-01-02T00:00:00Z"),
    );

    let written = write_outputs(&export, &temp.path().join("empty"), OutputFormat::Json).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
    assert_eq!(json["message_count"], 0);
    assert_eq!(json["messages"], serde_json::json!([]));
}

#[test]
fn markdown_heading_pairs_nickname_with_global_name() {
    let mut raw = raw_message("43", "2024-01-01T11:00:00Z", "bob", "ahoy");
    raw.author.global_name = Some("Bobby".to_string());
    raw.author.display_name = Some("Captain".to_string());
    let message = normalize_message(&raw, ts("2024-01-01T11:00:00Z"));

    assert_eq!(describe_author(&message.author), "Captain (Bobby)");

    let export = Export::new(
        "500",
        None,
        vec![message],
        &FilterSet::new(),
        RetrievalMetrics::default(),
        ts("2024-01-02T00:00:00Z"),
    );
    assert!(render_markdown(&export).contains("## 2024-01-01 11:00:00 UTC — Captain (Bobby)\n"));
}
