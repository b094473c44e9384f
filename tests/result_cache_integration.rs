//! Integration tests for the search-and-cache flow against an on-disk store.
//!
//! Providers are mocked with wiremock; the SQLite database lives in a
//! temporary directory so persistence across reopen is exercised.

use serde_json::{Value, json};
use sister_search::{
    AppConfig, MatchTier, ResultCache, ResultSource, SearchOptions, SearchService, match_tier,
};
use tempfile::TempDir;
use web_search::{CancellationToken, ProviderKind};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn serp_page(links: &[&str]) -> Value {
    let results: Vec<Value> = links
        .iter()
        .enumerate()
        .map(|(i, link)| {
            json!({
                "position": i + 1,
                "link": link,
                "title": format!("Result {}", i + 1),
                "snippet": format!("About {link}"),
                "displayed_link": link.trim_start_matches("https://"),
            })
        })
        .collect();
    json!({ "organic_results": results })
}

fn config_for(server: &MockServer, dir: &TempDir) -> AppConfig {
    let mut config = AppConfig::default().with_overrides_from(|name| {
        (name == "SERPAPI_API_KEY").then(|| "serp-test-key".to_owned())
    });
    config.search.provider = ProviderKind::SerpApi;
    config.search.serp_api.base_url = server.uri();
    config.store.database_path = dir.path().join("db").join("results.db");
    config
}

#[tokio::test]
async fn fetched_results_persist_across_reopen() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("q", "rust tokio"))
        .and(query_param("api_key", "serp-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serp_page(&[
            "https://tokio.rs",
            "https://docs.rs/tokio",
            "https://TOKIO.rs",
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    let config = config_for(&server, &dir);
    let db_path = config.store.database_path.clone();
    let cancel = CancellationToken::new();

    {
        let cache = ResultCache::open(&db_path).expect("open store");
        let service = SearchService::new(config.search.clone(), cache).expect("service");
        let outcome = service
            .search("rust tokio", SearchOptions::default(), &cancel)
            .await
            .expect("search");
        assert_eq!(outcome.source, ResultSource::Fetched);

        // The duplicate differing only in case is dropped.
        let urls: Vec<&str> = outcome.rows.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://tokio.rs", "https://docs.rs/tokio"]);
        assert_eq!(outcome.rows[1].display_link.as_deref(), Some("docs.rs/tokio"));
    }

    let reopened = ResultCache::open(&db_path).expect("reopen store");
    let service = SearchService::new(config.search, reopened).expect("service");
    let outcome = service
        .search("  rust tokio ", SearchOptions::default(), &cancel)
        .await
        .expect("cached search");
    assert_eq!(outcome.source, ResultSource::Cache);
    let positions: Vec<u32> = outcome.rows.iter().map(|r| r.position).collect();
    assert_eq!(positions, vec![1, 2]);
}

#[tokio::test]
async fn empty_provider_response_stores_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "organic_results": [] })))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    let config = config_for(&server, &dir);
    let cache = ResultCache::open(&config.store.database_path).expect("open store");
    let service = SearchService::new(config.search, cache).expect("service");

    let outcome = service
        .search("nothing here", SearchOptions::default(), &CancellationToken::new())
        .await
        .expect("search");
    assert_eq!(outcome.source, ResultSource::Fetched);
    assert!(outcome.rows.is_empty());
    assert!(
        service
            .cache()
            .try_get_cached("nothing here")
            .await
            .expect("lookup")
            .is_none()
    );
}

#[tokio::test]
async fn cancelled_search_leaves_store_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serp_page(&["https://a.com"])))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    let config = config_for(&server, &dir);
    let cache = ResultCache::open(&config.store.database_path).expect("open store");
    let service = SearchService::new(config.search, cache).expect("service");

    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = service
        .search("rust", SearchOptions::default(), &cancel)
        .await;
    assert!(result.is_err());
    assert!(service.cache().get_for_query("rust").await.expect("get").is_empty());
}

#[tokio::test]
async fn filter_and_suggest_over_stored_queries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("q", "rust async"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serp_page(&[
            "https://tokio.rs",
            "https://async.rs",
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("q", "rust web"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serp_page(&[
            "https://axum.rs",
            "https://tokio.rs/web",
        ])))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    let config = config_for(&server, &dir);
    let cache = ResultCache::open(&config.store.database_path).expect("open store");
    let service = SearchService::new(config.search, cache).expect("service");
    let cancel = CancellationToken::new();
    for q in ["rust async", "rust web"] {
        service
            .search(q, SearchOptions::default(), &cancel)
            .await
            .expect("search");
    }

    let cache = service.cache();
    let all = cache.filter(None, "TOKIO").await.expect("filter");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].query, "rust web", "newest rows first");

    let scoped = cache.filter(Some("rust async"), "tokio").await.expect("filter");
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].position, 1);

    let suggestions = cache.suggest_queries("rust", 5).await.expect("suggest");
    assert_eq!(suggestions.len(), 2);
    assert!(suggestions.iter().all(|(_, t)| *t == MatchTier::Prefix));
    assert_eq!(match_tier("rust", "rust web"), MatchTier::Prefix);

    let summaries = cache.cached_queries().await.expect("queries");
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|s| s.result_count == 2));
}
