//! End-to-end `ripcord fetch` runs against a local mock of the messages endpoint.

use std::fs;
use std::path::Path;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::helpers::{message, ripcord, MockServer};

fn write_config(home: &Path, base_url: &str) {
    let dir = home.join(".config").join("ripcord");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("config.toml"),
        format!(
            "[api]\nbase_url = \"{}\"\nrequests_per_second = 0.0\nmax_attempts = 3\n",
            base_url
        ),
    )
    .unwrap();
}

fn body(messages: Vec<serde_json::Value>) -> String {
    serde_json::Value::Array(messages).to_string()
}

#[test]
fn fetch_exports_json_and_markdown() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start(vec![(
        200,
        body(vec![
            message(12, 12, "alice", "newest"),
            message(11, 11, "bob", "oldest"),
        ]),
    )]);
    write_config(home.path(), &server.base_url);
    let prefix = home.path().join("exports").join("general");

    ripcord(home.path())
        .args(["fetch", "--channel", "500", "--guild", "900", "--all-history"])
        .args(["--token", "secret", "--format", "both", "--quiet", "--output"])
        .arg(&prefix)
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(home.path().join("exports").join("general.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(json["channel_id"], "500");
    assert_eq!(json["guild_id"], "900");
    assert_eq!(json["message_count"], 2);
    assert_eq!(json["messages"][0]["content"], "oldest");
    assert_eq!(json["messages"][1]["content"], "newest");
    assert_eq!(json["stats"]["api_requests"], 2);

    let md = fs::read_to_string(home.path().join("exports").join("general.md")).unwrap();
    assert!(md.contains("[Jump to message](https://discord.com/channels/900/500/12)"));

    let lines = server.request_lines();
    assert_eq!(lines[0], "GET /api/v10/channels/500/messages?limit=100 HTTP/1.1");
    assert_eq!(
        lines[1],
        "GET /api/v10/channels/500/messages?limit=100&before=11 HTTP/1.1"
    );
}

#[test]
fn fetch_reads_token_from_environment() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start(vec![]);
    write_config(home.path(), &server.base_url);
    let prefix = home.path().join("empty");

    ripcord(home.path())
        .env("DISCORD_AUTH_TOKEN", "from-env")
        .args(["fetch", "--channel", "500", "--days", "1", "--output"])
        .arg(&prefix)
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "no messages matched the provided filters",
        ))
        .stdout(predicate::str::contains("empty.json"));

    assert!(home.path().join("empty.json").exists());
}

#[test]
fn fetch_reports_rejected_requests() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start(vec![(401, r#"{"message": "401: Unauthorized", "code": 0}"#.to_string())]);
    write_config(home.path(), &server.base_url);

    ripcord(home.path())
        .args(["fetch", "--channel", "500", "--days", "1", "--token", "bad"])
        .arg("--output")
        .arg(home.path().join("never"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: retrieval failed after 1 request(s)"))
        .stderr(predicate::str::contains("401"));

    assert!(!home.path().join("never.json").exists());
}
