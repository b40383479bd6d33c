use crate::common;
use httpmock::Method::{GET, POST};
use serde_json::json;
use std::time::Duration;
use typesense_rs::CacheMode;

const SEARCH_PATH: &str = "/collections/books/documents/search";

fn search_body() -> String {
    json!({"found": 1, "hits": [{"document": {"id": "1", "title": "Dune"}}]}).to_string()
}

#[tokio::test]
async fn search_serves_from_cache_on_second_call() {
    let server = common::setup_server();

    // This mock only expects to be called ONCE.
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path(SEARCH_PATH)
            .query_param("q", "dune")
            .query_param("query_by", "title");
        then.status(200)
            .header("content-type", "application/json")
            .body(search_body());
    });

    let client = common::builder(vec![common::node_for(&server)])
        .cache_search_results_for(Duration::from_secs(60)) // Enable caching
        .build()
        .unwrap();

    let search = || client.search("books").param("q", "dune").param("query_by", "title");

    let first: serde_json::Value = search().fetch().await.unwrap();
    mock.assert();

    let second: serde_json::Value = search().fetch().await.unwrap();
    mock.assert();
    assert_eq!(first, second);

    // a different parameter set is a different entry
    let _: serde_json::Value = client
        .search("books")
        .param("q", "dune")
        .param("query_by", "title")
        .param("per_page", "5")
        .fetch()
        .await
        .unwrap();
    mock.assert_calls(2);
}

#[tokio::test]
async fn search_cache_refresh_bypasses_cache_get_but_updates_cache() {
    let server = common::setup_server();

    // This mock expects to be called TWICE.
    let mock = server.mock(|when, then| {
        when.method(GET).path(SEARCH_PATH).query_param("q", "*");
        then.status(200)
            .header("content-type", "application/json")
            .body(search_body());
    });

    let client = common::builder(vec![common::node_for(&server)])
        .cache_search_results_for(Duration::from_secs(60))
        .build()
        .unwrap();

    let _: serde_json::Value = client.search("books").param("q", "*").fetch().await.unwrap();
    mock.assert_calls(1);

    let _: serde_json::Value = client
        .search("books")
        .param("q", "*")
        .cache_mode(CacheMode::Refresh)
        .fetch()
        .await
        .unwrap();
    mock.assert_calls(2);

    let _: serde_json::Value = client.search("books").param("q", "*").fetch().await.unwrap();
    mock.assert_calls(2);

    let _: serde_json::Value = client
        .search("books")
        .param("q", "*")
        .cache_mode(CacheMode::Bypass)
        .fetch()
        .await
        .unwrap();
    mock.assert_calls(3);
}

#[tokio::test]
async fn search_cache_is_off_by_default() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET).path(SEARCH_PATH);
        then.status(200)
            .header("content-type", "application/json")
            .body(search_body());
    });

    let client = common::client_for(&server);
    for _ in 0..3 {
        let _: serde_json::Value = client.search("books").param("q", "x").fetch().await.unwrap();
    }
    mock.assert_calls(3);

    // a per-call TTL turns it on
    for _ in 0..3 {
        let _: serde_json::Value = client
            .search("books")
            .param("q", "x")
            .cache_ttl(Duration::from_secs(30))
            .fetch()
            .await
            .unwrap();
    }
    mock.assert_calls(4);
}

#[tokio::test]
async fn failed_searches_are_not_cached() {
    let server = common::setup_server();
    let mut missing = server.mock(|when, then| {
        when.method(GET).path(SEARCH_PATH);
        then.status(404)
            .header("content-type", "application/json")
            .body(r#"{"message":"Not found."}"#);
    });

    let client = common::builder(vec![common::node_for(&server)])
        .cache_search_results_for(Duration::from_secs(60))
        .build()
        .unwrap();

    let err = client
        .search("books")
        .param("q", "x")
        .fetch::<serde_json::Value>()
        .await
        .unwrap_err();
    assert!(matches!(err, typesense_rs::TsError::ObjectNotFound { .. }));
    missing.delete();

    let found = server.mock(|when, then| {
        when.method(GET).path(SEARCH_PATH);
        then.status(200)
            .header("content-type", "application/json")
            .body(search_body());
    });
    let got: serde_json::Value = client.search("books").param("q", "x").fetch().await.unwrap();
    found.assert();
    assert_eq!(got["found"], 1);
}

#[tokio::test]
async fn multi_search_is_cached_by_body() {
    let server = common::setup_server();
    let dune = server.mock(|when, then| {
        when.method(POST)
            .path("/multi_search")
            .query_param("query_by", "title")
            .json_body(json!({"searches": [{"collection": "books", "q": "dune"}]}));
        then.status(200)
            .header("content-type", "application/json")
            .body(json!({"results": [{"found": 1}]}).to_string());
    });
    let emma = server.mock(|when, then| {
        when.method(POST)
            .path("/multi_search")
            .json_body(json!({"searches": [{"collection": "books", "q": "emma"}]}));
        then.status(200)
            .header("content-type", "application/json")
            .body(json!({"results": [{"found": 2}]}).to_string());
    });

    let client = common::builder(vec![common::node_for(&server)])
        .cache_search_results_for(Duration::from_secs(60))
        .build()
        .unwrap();

    for _ in 0..2 {
        let got: serde_json::Value = client
            .multi_search()
            .search(json!({"collection": "books", "q": "dune"}))
            .common_param("query_by", "title")
            .fetch()
            .await
            .unwrap();
        assert_eq!(got["results"][0]["found"], 1);
    }
    dune.assert();

    let got: serde_json::Value = client
        .multi_search()
        .search(json!({"collection": "books", "q": "emma"}))
        .common_param("query_by", "title")
        .fetch()
        .await
        .unwrap();
    emma.assert();
    assert_eq!(got["results"][0]["found"], 2);
}
