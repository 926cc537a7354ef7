//! Integration tests for the fetch-and-cache broker
//!
//! These tests use wiremock to stand in for remote servers and exercise the
//! full fetch path end-to-end: transport, parsing, caching, rate limiting,
//! and retry.

use page_broker::config::HttpConfig;
use page_broker::{
    BrokerError, DocumentCache, Fetcher, HtmlParser, HttpTransport, Limiter, MemoryDiagnostics,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a fetcher wired to real HTTP transport and HTML parsing, with a
/// short limiter gap so tests stay fast
fn build_fetcher(
    diagnostics: Arc<MemoryDiagnostics>,
    min_time: Duration,
    attempt_limit: Option<u32>,
) -> Fetcher {
    let transport =
        HttpTransport::new(&HttpConfig::default()).expect("failed to build transport");

    Fetcher::new(
        Arc::new(DocumentCache::new(10)),
        Arc::new(Limiter::new(1, min_time)),
        Arc::new(transport),
        Arc::new(HtmlParser),
        diagnostics,
        attempt_limit,
    )
}

#[tokio::test]
async fn test_fetch_parses_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/x"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><title>Test</title></head><body><p>ok</p><a href="/next">next</a></body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let fetcher = build_fetcher(Arc::clone(&diagnostics), Duration::from_millis(5), Some(3));

    let url = format!("{}/x", mock_server.uri());
    let doc = fetcher.get(&url).await.expect("fetch failed");

    assert_eq!(doc.title, Some("Test".to_string()));
    assert_eq!(doc.text, "Test ok next");
    assert_eq!(doc.links, vec![format!("{}/next", mock_server.uri())]);
    assert_eq!(diagnostics.success_count(), 1);
    assert_eq!(diagnostics.failure_count(), 0);
}

#[tokio::test]
async fn test_second_get_is_served_from_cache() {
    let mock_server = MockServer::start().await;

    // expect(1) makes the mock server itself verify the transport was hit
    // exactly once
    Mock::given(method("GET"))
        .and(path("/x"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>ok</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let fetcher = build_fetcher(diagnostics, Duration::from_millis(5), Some(3));

    let url = format!("{}/x", mock_server.uri());
    let first = fetcher.get(&url).await.expect("first fetch failed");
    let second = fetcher.get(&url).await.expect("second fetch failed");

    // Cache hits hand back the very same document
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.text, "ok");
}

#[tokio::test]
async fn test_keep_alive_header_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/x"))
        .and(header("connection", "keep-alive"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>ok</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = build_fetcher(
        Arc::new(MemoryDiagnostics::new()),
        Duration::from_millis(5),
        Some(3),
    );

    let url = format!("{}/x", mock_server.uri());
    let doc = fetcher.get(&url).await.expect("fetch failed");
    assert_eq!(doc.text, "ok");
}

#[tokio::test]
async fn test_retry_until_server_recovers() {
    let mock_server = MockServer::start().await;

    // Fail twice, then serve the page
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>recovered</p>"))
        .mount(&mock_server)
        .await;

    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let fetcher = build_fetcher(Arc::clone(&diagnostics), Duration::from_millis(5), Some(5));

    let url = format!("{}/flaky", mock_server.uri());
    let doc = fetcher.get(&url).await.expect("fetch failed");

    assert_eq!(doc.text, "recovered");
    assert_eq!(diagnostics.failure_count(), 2);
    assert_eq!(diagnostics.success_count(), 1);
}

#[tokio::test]
async fn test_bounded_retry_gives_up() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let fetcher = build_fetcher(Arc::clone(&diagnostics), Duration::from_millis(5), Some(3));

    let url = format!("{}/down", mock_server.uri());
    let result = fetcher.get(&url).await;

    match result {
        Err(BrokerError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 3),
        other => panic!("expected exhaustion, got {:?}", other.map(|_| ())),
    }
    assert_eq!(diagnostics.failure_count(), 3);
}

#[tokio::test]
async fn test_requests_are_paced_by_the_limiter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>ok</p>"))
        .mount(&mock_server)
        .await;

    let min_time = Duration::from_millis(60);
    let fetcher = Arc::new(build_fetcher(
        Arc::new(MemoryDiagnostics::new()),
        min_time,
        Some(3),
    ));

    // Three distinct URLs, submitted concurrently: the limiter must space
    // the underlying requests even though the callers fan out at once
    let started = Instant::now();
    let mut handles = Vec::new();
    for i in 0..3 {
        let fetcher = Arc::clone(&fetcher);
        let url = format!("{}/page{}", mock_server.uri(), i);
        handles.push(tokio::spawn(async move { fetcher.get(&url).await }));
    }
    for handle in handles {
        handle.await.unwrap().expect("fetch failed");
    }

    // Three starts with two enforced gaps between them
    let elapsed = started.elapsed();
    assert!(
        elapsed >= min_time * 2 - Duration::from_millis(10),
        "three requests finished in {:?}, expected at least two {:?} gaps",
        elapsed,
        min_time
    );
}

#[tokio::test]
async fn test_distinct_urls_are_cached_independently() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>alpha</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>beta</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = build_fetcher(
        Arc::new(MemoryDiagnostics::new()),
        Duration::from_millis(5),
        Some(3),
    );

    let url_a = format!("{}/a", mock_server.uri());
    let url_b = format!("{}/b", mock_server.uri());

    let a = fetcher.get(&url_a).await.expect("fetch /a failed");
    let b = fetcher.get(&url_b).await.expect("fetch /b failed");
    let a_again = fetcher.get(&url_a).await.expect("re-fetch /a failed");

    assert_eq!(a.text, "alpha");
    assert_eq!(b.text, "beta");
    assert!(Arc::ptr_eq(&a, &a_again));
}
