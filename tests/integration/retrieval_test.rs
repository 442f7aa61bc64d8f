//! Integration tests for a full retrieval session over a scripted transport.

use std::collections::HashSet;

use ripcord::discord::{
    CancelToken, ClientOptions, DiscordClient, FetchError, FilterSet, HttpResponse, Retriever,
    RetryPolicy, TransportError,
};

use crate::helpers::{message, page, MockTransport};

fn fast_options() -> ClientOptions {
    ClientOptions {
        requests_per_second: 0.0,
        retry: RetryPolicy {
            initial_delay_ms: 1,
            max_delay_ms: 5,
            default_retry_after_ms: 1,
            ..RetryPolicy::default()
        },
        ..ClientOptions::default()
    }
}

fn retriever(transport: &MockTransport) -> Retriever {
    let client = DiscordClient::with_options(Box::new(transport.clone()), "Bot abc", fast_options());
    Retriever::new(client)
}

/// Three pages of history: ids 9..1, hours 9..1, three per page, then empty.
fn three_pages() -> MockTransport {
    MockTransport::new(vec![
        Ok(page(vec![
            message(9, 9, "alice", "nine"),
            message(8, 8, "bob", "eight"),
            message(7, 7, "alice", "seven"),
        ])),
        Ok(page(vec![
            message(6, 6, "carol", "six"),
            message(5, 5, "alice", "five"),
            message(4, 4, "bob", "four"),
        ])),
        Ok(page(vec![
            message(3, 3, "alice", "three"),
            message(2, 2, "bob", "two"),
            message(1, 1, "carol", "one"),
        ])),
        Ok(HttpResponse::new(200, "[]")),
    ])
}

#[test]
fn full_history_is_returned_oldest_first_with_unique_ids() {
    let transport = three_pages();

    let result = retriever(&transport)
        .retrieve("500", &FilterSet::new())
        .unwrap();

    assert_eq!(result.messages.len(), 9);
    assert_eq!(result.metrics.requests, 4);
    assert!(result
        .messages
        .windows(2)
        .all(|pair| pair[0].timestamp <= pair[1].timestamp));
    let ids: HashSet<&str> = result.messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids.len(), 9);
}

#[test]
fn requests_walk_backward_from_last_raw_id() {
    let transport = three_pages();

    retriever(&transport)
        .retrieve("500", &FilterSet::new().authors(["nobody"]))
        .unwrap();

    let cursors: Vec<Option<String>> = transport
        .requests()
        .iter()
        .map(|r| r.query_param("before").map(str::to_string))
        .collect();
    assert_eq!(
        cursors,
        vec![
            None,
            Some("7".to_string()),
            Some("4".to_string()),
            Some("1".to_string())
        ]
    );
}

#[test]
fn requests_target_channel_endpoint_with_credentials() {
    let transport = three_pages();

    retriever(&transport)
        .page_size(3)
        .retrieve("500", &FilterSet::new())
        .unwrap();

    let first = &transport.requests()[0];
    assert_eq!(first.url, "https://discord.com/api/v10/channels/500/messages");
    assert_eq!(first.query_param("limit"), Some("3"));
    assert_eq!(first.header_value("authorization"), Some("Bot abc"));
    assert!(first
        .header_value("user-agent")
        .is_some_and(|ua| ua.starts_with("ripcord/")));
}

#[test]
fn filters_combine_across_pages() {
    let transport = three_pages();
    let filters = FilterSet::new()
        .authors(["ALICE"])
        .keywords(["e"])
        .since("2024-03-01T02:00:00Z".parse().unwrap());

    let result = retriever(&transport).retrieve("500", &filters).unwrap();

    let contents: Vec<&str> = result.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["three", "five", "seven", "nine"]);
    // Message 1 is older than the window, so the empty page is never requested.
    assert_eq!(result.metrics.requests, 3);
}

#[test]
fn cap_returns_newest_matches() {
    let transport = three_pages();

    let result = retriever(&transport)
        .retrieve("500", &FilterSet::new().max_messages(4))
        .unwrap();

    let ids: Vec<&str> = result.messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["6", "7", "8", "9"]);
    assert_eq!(result.metrics.requests, 2);
}

#[test]
fn rate_limit_and_server_errors_are_absorbed() {
    let transport = MockTransport::new(vec![
        Ok(HttpResponse::new(429, r#"{"message":"You are being rate limited.","retry_after":0.001,"global":false}"#)),
        Err(TransportError::Timeout("slow".to_string())),
        Ok(HttpResponse::new(502, "bad gateway")),
        Ok(page(vec![message(2, 2, "alice", "two"), message(1, 1, "bob", "one")])),
        Ok(HttpResponse::new(200, "[]")),
    ]);

    let result = retriever(&transport)
        .retrieve("500", &FilterSet::new())
        .unwrap();

    assert_eq!(result.messages.len(), 2);
    assert_eq!(result.metrics.rate_limit_hits, 1);
    // The timeout produced no response.
    assert_eq!(result.metrics.requests, 4);
}

#[test]
fn forbidden_channel_fails_with_partial_metrics() {
    let transport = MockTransport::new(vec![Ok(HttpResponse::new(
        403,
        r#"{"message": "Missing Access", "code": 50001}"#,
    ))]);

    let err = retriever(&transport)
        .retrieve("500", &FilterSet::new())
        .unwrap_err();

    assert_eq!(err.source.status(), Some(403));
    assert!(err.source.is_rejected());
    assert!(err.source.to_string().contains("Missing Access"));
    assert_eq!(err.metrics.requests, 1);
    assert!(err.partial.is_empty());
}

#[test]
fn exhausted_retries_surface_last_error() {
    let transport = MockTransport::new(
        (0..5)
            .map(|_| Ok(HttpResponse::new(503, "unavailable")))
            .collect(),
    );

    let err = retriever(&transport)
        .retrieve("500", &FilterSet::new())
        .unwrap_err();

    assert!(matches!(err.source, FetchError::ServerError { status: 503 }));
    assert_eq!(err.metrics.requests, 5);
}

#[test]
fn cancelled_session_reports_cancellation() {
    let transport = three_pages();
    let cancel = CancelToken::new();
    cancel.cancel();

    let result = retriever(&transport)
        .cancel_token(cancel)
        .retrieve("500", &FilterSet::new())
        .unwrap();

    assert!(result.cancelled);
    assert!(transport.requests().is_empty());
}
