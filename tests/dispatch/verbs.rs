use crate::common::{self, API_KEY};
use httpmock::Method::{DELETE, GET, PATCH, POST, PUT};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use typesense_rs::{HeaderParams, QueryParams, ResponseBody};

#[derive(Debug, Deserialize, PartialEq)]
struct Collection {
    name: String,
    num_documents: u64,
}

#[tokio::test]
async fn get_decodes_json_and_sends_key_header() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/collections/books")
            .header("x-typesense-api-key", API_KEY)
            .header("content-type", "application/json");
        then.status(200)
            .header("content-type", "application/json; charset=utf-8")
            .body(r#"{"name":"books","num_documents":3}"#);
    });

    let client = common::client_for(&server);
    let got: Collection = client
        .get("/collections/books", &QueryParams::new(), None)
        .await
        .unwrap();

    mock.assert();
    assert_eq!(
        got,
        Collection {
            name: "books".into(),
            num_documents: 3
        }
    );
}

#[tokio::test]
async fn non_json_bodies_come_back_as_text() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/collections/books/documents/export");
        then.status(200)
            .header("content-type", "text/plain")
            .body("{\"id\":\"1\"}\n{\"id\":\"2\"}");
    });

    let client = common::client_for(&server);
    let raw = client
        .get_raw("/collections/books/documents/export", &QueryParams::new(), None)
        .await
        .unwrap();
    mock.assert();
    assert_eq!(raw.as_text(), Some("{\"id\":\"1\"}\n{\"id\":\"2\"}"));

    let text: String = client
        .get("/collections/books/documents/export", &QueryParams::new(), None)
        .await
        .unwrap();
    assert_eq!(text.lines().count(), 2);
}

#[tokio::test]
async fn query_parameters_are_attached() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(DELETE)
            .path("/collections/books/documents")
            .query_param("filter_by", "year:<1990")
            .query_param("batch_size", "100");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"num_deleted":7}"#);
    });

    let client = common::client_for(&server);
    let query = BTreeMap::from([
        ("filter_by".to_string(), "year:<1990".to_string()),
        ("batch_size".to_string(), "100".to_string()),
    ]);
    let got: serde_json::Value = client
        .delete("/collections/books/documents", &query)
        .await
        .unwrap();

    mock.assert();
    assert_eq!(got["num_deleted"], 7);
}

#[tokio::test]
async fn api_key_can_travel_as_query_param() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/collections")
            .query_param("x-typesense-api-key", API_KEY);
        then.status(200)
            .header("content-type", "application/json")
            .body("[]");
    });

    let client = common::builder(vec![common::node_for(&server)])
        .send_api_key_as_query_param(true)
        .build()
        .unwrap();
    let got: Vec<serde_json::Value> = client
        .get("/collections", &QueryParams::new(), None)
        .await
        .unwrap();

    mock.assert();
    assert!(got.is_empty());
}

#[tokio::test]
async fn post_sends_json_body_and_layers_headers() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/collections/books/documents/import")
            .query_param("action", "upsert")
            .header("content-type", "text/plain")
            .header("x-app", "demo")
            .body("{\"id\":\"1\"}\n{\"id\":\"2\"}");
        then.status(200)
            .header("content-type", "text/plain")
            .body("{\"success\":true}\n{\"success\":true}");
    });

    let client = common::builder(vec![common::node_for(&server)])
        .additional_header("x-app", "demo")
        .build()
        .unwrap();
    let query = BTreeMap::from([("action".to_string(), "upsert".to_string())]);
    let headers: HeaderParams =
        BTreeMap::from([("content-type".to_string(), "text/plain".to_string())]);

    let body = client
        .post_raw(
            "/collections/books/documents/import",
            "{\"id\":\"1\"}\n{\"id\":\"2\"}",
            &query,
            &headers,
        )
        .await
        .unwrap();

    mock.assert();
    assert!(matches!(body, ResponseBody::Text(ref t) if t.lines().count() == 2));
}

#[tokio::test]
async fn put_and_patch_send_json() {
    let server = common::setup_server();
    let put = server.mock(|when, then| {
        when.method(PUT)
            .path("/aliases/books")
            .json_body(json!({"collection_name": "books_v2"}));
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"name":"books","collection_name":"books_v2"}"#);
    });
    let patch = server.mock(|when, then| {
        when.method(PATCH)
            .path("/collections/books/documents/1")
            .json_body(json!({"year": 1965}));
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"id":"1","year":1965}"#);
    });

    let client = common::client_for(&server);
    let alias: serde_json::Value = client
        .put(
            "/aliases/books",
            &json!({"collection_name": "books_v2"}),
            &QueryParams::new(),
        )
        .await
        .unwrap();
    let doc: serde_json::Value = client
        .patch(
            "/collections/books/documents/1",
            &json!({"year": 1965}),
            &QueryParams::new(),
        )
        .await
        .unwrap();

    put.assert();
    patch.assert();
    assert_eq!(alias["collection_name"], "books_v2");
    assert_eq!(doc["year"], 1965);
}
