use crate::common;
use httpmock::Method::GET;
use typesense_rs::{DebugInfo, TsError};

#[tokio::test]
async fn health_and_debug_decode() {
    let server = common::setup_server();
    let health = server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"ok":true}"#);
    });
    let debug = server.mock(|when, then| {
        when.method(GET).path("/debug");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"state":1,"version":"27.1"}"#);
    });

    let client = common::client_for(&server);
    assert!(client.health().await.unwrap().ok);
    assert_eq!(
        client.debug().await.unwrap(),
        DebugInfo {
            state: 1,
            version: "27.1".into()
        }
    );

    health.assert();
    debug.assert();
}

#[tokio::test]
async fn malformed_success_body_is_retried_then_reported() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200)
            .header("content-type", "application/json")
            .body("{not json");
    });

    let client = common::builder(vec![common::node_for(&server)])
        .num_retries(1)
        .build()
        .unwrap();
    let err = client.health().await.unwrap_err();

    mock.assert_calls(2);
    assert!(matches!(err, TsError::Data(_)));
}
