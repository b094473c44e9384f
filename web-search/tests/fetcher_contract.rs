//! Contract tests for the paginating fetcher against mock search APIs.
//!
//! These tests verify request shape, page-walking termination, dedup and
//! error mapping for both providers using wiremock (no real network).
//! Live API tests are marked `#[ignore]` for manual validation.

use std::time::Duration;

use serde_json::{json, Value};
use web_search::{
    CancellationToken, GoogleProvider, SearchConfig, SearchError, SearchFetcher, SerpApiProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn google_body(links: &[String]) -> Value {
    let items: Vec<Value> = links
        .iter()
        .map(|link| {
            json!({
                "link": link,
                "title": format!("Title for {link}"),
                "snippet": format!("Snippet for {link}"),
                "displayLink": link.trim_start_matches("https://"),
            })
        })
        .collect();
    json!({ "kind": "customsearch#search", "items": items })
}

fn serp_body(links: &[String]) -> Value {
    let results: Vec<Value> = links
        .iter()
        .enumerate()
        .map(|(i, link)| {
            json!({
                "position": i + 1,
                "link": link,
                "title": format!("Title for {link}"),
                "snippet": format!("Snippet for {link}"),
            })
        })
        .collect();
    json!({ "organic_results": results })
}

fn links(prefix: &str, range: std::ops::Range<usize>) -> Vec<String> {
    range.map(|i| format!("https://{prefix}{i}.com")).collect()
}

fn google_fetcher(server: &MockServer) -> SearchFetcher<GoogleProvider> {
    let provider = GoogleProvider::new("test-key", "test-cx").with_base_url(server.uri());
    SearchFetcher::new(provider, &SearchConfig::default()).expect("fetcher")
}

fn serp_fetcher(server: &MockServer) -> SearchFetcher<SerpApiProvider> {
    let provider = SerpApiProvider::new("test-key").with_base_url(server.uri());
    SearchFetcher::new(provider, &SearchConfig::default()).expect("fetcher")
}

async fn mount_google_page(server: &MockServer, start: &str, num: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("start", start))
        .and(query_param("num", num))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

// ────────────────────────────────────────────────────────────────────────────
// Pagination and dedup
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicates_across_pages_are_dropped_and_positions_stay_contiguous() {
    let server = MockServer::start().await;

    let page1 = links("a", 0..10);
    let mut page2 = vec!["https://A5.com".to_string()];
    page2.extend(links("b", 0..9));
    let page3 = links("c", 0..3);

    mount_google_page(&server, "1", "10", google_body(&page1)).await;
    mount_google_page(&server, "11", "10", google_body(&page2)).await;
    mount_google_page(&server, "21", "10", google_body(&page3)).await;

    let results = google_fetcher(&server)
        .fetch("rust", 100, &CancellationToken::new())
        .await
        .expect("fetch");

    assert_eq!(results.len(), 22);
    let positions: Vec<u32> = results.iter().map(|r| r.position).collect();
    let expected: Vec<u32> = (1..=22).collect();
    assert_eq!(positions, expected);

    let mut urls: Vec<String> = results.iter().map(|r| r.url.to_lowercase()).collect();
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 22);

    assert_eq!(results[0].url, "https://a0.com");
    assert_eq!(results[10].url, "https://b0.com");
    assert_eq!(results[0].display_link.as_deref(), Some("a0.com"));
}

#[tokio::test]
async fn short_page_stops_pagination() {
    let server = MockServer::start().await;
    mount_google_page(&server, "1", "10", google_body(&links("a", 0..4))).await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("start", "11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(google_body(&links("z", 0..10))))
        .expect(0)
        .mount(&server)
        .await;

    let results = google_fetcher(&server)
        .fetch("rust", 50, &CancellationToken::new())
        .await
        .expect("fetch");
    assert_eq!(results.len(), 4);
}

#[tokio::test]
async fn last_page_requests_only_the_remainder() {
    let server = MockServer::start().await;
    mount_google_page(&server, "1", "10", google_body(&links("a", 0..10))).await;
    mount_google_page(&server, "11", "5", google_body(&links("b", 0..5))).await;

    let results = google_fetcher(&server)
        .fetch("rust", 15, &CancellationToken::new())
        .await
        .expect("fetch");
    assert_eq!(results.len(), 15);
    assert_eq!(results[14].position, 15);
}

#[tokio::test]
async fn duplicate_on_full_page_triggers_another_request() {
    let server = MockServer::start().await;
    mount_google_page(&server, "1", "10", google_body(&links("a", 0..10))).await;
    mount_google_page(
        &server,
        "11",
        "2",
        google_body(&["https://a3.com".to_string(), "https://b0.com".to_string()]),
    )
    .await;
    mount_google_page(&server, "21", "1", google_body(&links("c", 0..1))).await;

    let results = google_fetcher(&server)
        .fetch("rust", 12, &CancellationToken::new())
        .await
        .expect("fetch");
    assert_eq!(results.len(), 12);
    assert_eq!(results[10].url, "https://b0.com");
    assert_eq!(results[11].url, "https://c0.com");
}

#[tokio::test]
async fn empty_page_stops_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "search_metadata": { "status": "Success" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = serp_fetcher(&server)
        .fetch("nothing matches this", 100, &CancellationToken::new())
        .await
        .expect("fetch");
    assert!(results.is_empty());
}

#[tokio::test]
async fn pagination_stops_at_offset_limit() {
    let server = MockServer::start().await;
    for page in 0..10u32 {
        let start = page * 10;
        let body = serp_body(&links(&format!("p{page}-"), 0..10));
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("start", start.to_string()))
            .and(query_param("engine", "google"))
            .and(query_param("api_key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("start", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serp_body(&links("x", 0..10))))
        .expect(0)
        .mount(&server)
        .await;

    let results = serp_fetcher(&server)
        .fetch("rust", 500, &CancellationToken::new())
        .await
        .expect("fetch");
    assert_eq!(results.len(), 100);
    assert_eq!(results[99].position, 100);
}

#[tokio::test]
async fn query_is_trimmed_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("q", "rust lang"))
        .respond_with(ResponseTemplate::new(200).set_body_json(google_body(&links("a", 0..1))))
        .expect(1)
        .mount(&server)
        .await;

    let results = google_fetcher(&server)
        .fetch("  rust lang  ", 10, &CancellationToken::new())
        .await
        .expect("fetch");
    assert_eq!(results.len(), 1);
}

// ────────────────────────────────────────────────────────────────────────────
// Error mapping
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn forbidden_is_quota_or_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .respond_with(ResponseTemplate::new(403).set_body_string("dailyLimitExceeded"))
        .mount(&server)
        .await;

    let err = google_fetcher(&server)
        .fetch("rust", 10, &CancellationToken::new())
        .await
        .expect_err("403 should fail");
    match err {
        SearchError::QuotaOrAuth { provider, body } => {
            assert_eq!(provider, "Google");
            assert!(body.contains("dailyLimitExceeded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn server_error_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = serp_fetcher(&server)
        .fetch("rust", 10, &CancellationToken::new())
        .await
        .expect_err("503 should fail");
    match err {
        SearchError::UpstreamRequestFailed { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn failure_on_later_page_discards_earlier_results() {
    let server = MockServer::start().await;
    mount_google_page(&server, "1", "10", google_body(&links("a", 0..10))).await;
    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("start", "11"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = google_fetcher(&server)
        .fetch("rust", 20, &CancellationToken::new())
        .await;
    assert!(matches!(
        result,
        Err(SearchError::UpstreamRequestFailed { status: 500, .. })
    ));
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>captcha</html>"))
        .mount(&server)
        .await;

    let err = google_fetcher(&server)
        .fetch("rust", 10, &CancellationToken::new())
        .await
        .expect_err("should fail");
    assert!(matches!(err, SearchError::ResponseParse(_)));
}

#[tokio::test]
async fn cancellation_mid_request_returns_cancelled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(google_body(&links("a", 0..10)))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = google_fetcher(&server)
        .fetch("rust", 10, &cancel)
        .await
        .expect_err("should be cancelled");
    assert!(matches!(err, SearchError::Cancelled));
}

// ────────────────────────────────────────────────────────────────────────────
// Live tests
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
#[ignore] // Live test: needs GOOGLE_API_KEY and GOOGLE_CX; run with `cargo test -- --ignored`
async fn live_google_search() {
    let key = std::env::var("GOOGLE_API_KEY").expect("GOOGLE_API_KEY");
    let cx = std::env::var("GOOGLE_CX").expect("GOOGLE_CX");
    let fetcher = SearchFetcher::new(GoogleProvider::new(key, cx), &SearchConfig::default())
        .expect("fetcher");
    let results = fetcher
        .fetch("rust programming", 15, &CancellationToken::new())
        .await
        .expect("live search should work");
    assert!(!results.is_empty());
    for (i, r) in results.iter().enumerate() {
        assert_eq!(r.position as usize, i + 1);
        assert!(!r.url.is_empty());
    }
}
