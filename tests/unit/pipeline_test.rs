//! Unit tests for the page pipeline through the public API

use ripcord::discord::pipeline::{PagePipeline, PageVerdict};
use ripcord::discord::FilterSet;

use crate::helpers::{bot_message, raw_message, ts};

#[test]
fn window_bounds_are_respected_across_pages() {
    let filters = FilterSet::new()
        .since(ts("2024-01-02T00:00:00Z"))
        .until(ts("2024-01-04T00:00:00Z"));
    let mut pipeline = PagePipeline::new();

    let first = pipeline.process_page(
        &[
            raw_message("6", "2024-01-05T00:00:00Z", "alice", "too new"),
            raw_message("5", "2024-01-04T00:00:00Z", "alice", "upper edge"),
        ],
        &filters,
    );
    let second = pipeline.process_page(
        &[
            raw_message("4", "2024-01-03T00:00:00Z", "bob", "inside"),
            raw_message("3", "2024-01-02T00:00:00Z", "bob", "lower edge"),
            raw_message("2", "2024-01-01T23:59:59Z", "bob", "too old"),
        ],
        &filters,
    );

    assert_eq!(first, PageVerdict::Continue);
    assert_eq!(second, PageVerdict::WindowExhausted);

    let messages = pipeline.into_chronological();
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["lower edge", "inside", "upper edge"]);
    assert!(messages.iter().all(|m| {
        m.timestamp >= ts("2024-01-02T00:00:00Z") && m.timestamp <= ts("2024-01-04T00:00:00Z")
    }));
}

#[test]
fn keyword_match_ignores_case() {
    let filters = FilterSet::new().keywords(["BREACH"]);
    let mut pipeline = PagePipeline::new();

    pipeline.process_page(
        &[
            raw_message("2", "2024-01-02T00:00:00Z", "alice", "a Breach was found"),
            raw_message("1", "2024-01-01T00:00:00Z", "alice", "nothing to see"),
        ],
        &filters,
    );

    assert_eq!(pipeline.accepted_count(), 1);
    assert_eq!(pipeline.accepted()[0].id, "2");
}

#[test]
fn author_match_ignores_case() {
    let filters = FilterSet::new().authors(["ALICE"]);
    let mut pipeline = PagePipeline::new();

    pipeline.process_page(
        &[
            raw_message("2", "2024-01-02T00:00:00Z", "Alice", "hi"),
            raw_message("1", "2024-01-01T00:00:00Z", "bob", "hello"),
        ],
        &filters,
    );

    let ids: Vec<&str> = pipeline.accepted().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["2"]);
}

#[test]
fn bots_never_appear_unless_included() {
    let page = [
        bot_message("3", "2024-01-03T00:00:00Z", "deploy finished"),
        raw_message("2", "2024-01-02T00:00:00Z", "alice", "thanks bot"),
    ];

    let mut excluded = PagePipeline::new();
    excluded.process_page(&page, &FilterSet::new());
    assert!(excluded.accepted().iter().all(|m| !m.author.bot));

    let mut included = PagePipeline::new();
    included.process_page(&page, &FilterSet::new().include_bots(true));
    assert_eq!(included.accepted_count(), 2);
}

#[test]
fn cap_limits_result_size() {
    let page: Vec<_> = (1..=20)
        .rev()
        .map(|i| raw_message(&i.to_string(), "2024-01-01T00:00:00Z", "alice", "x"))
        .collect();
    let mut pipeline = PagePipeline::new();

    let verdict = pipeline.process_page(&page, &FilterSet::new().max_messages(7));

    assert_eq!(verdict, PageVerdict::CapReached);
    assert_eq!(pipeline.accepted_count(), 7);
}
