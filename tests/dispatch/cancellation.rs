use crate::common;
use httpmock::Method::GET;
use std::time::Duration;
use typesense_rs::{CancellationToken, QueryParams, TsError};

#[tokio::test]
async fn cancelled_signal_skips_the_network() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/collections");
        then.status(200)
            .header("content-type", "application/json")
            .body("[]");
    });

    let client = common::client_for(&server);
    let token = CancellationToken::new();
    token.cancel();

    let err = client
        .get::<serde_json::Value>("/collections", &QueryParams::new(), Some(&token))
        .await
        .unwrap_err();

    assert!(matches!(err, TsError::Cancelled));
    mock.assert_calls(0);
}

#[tokio::test]
async fn cancelling_mid_flight_stops_retries() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/collections");
        then.status(200)
            .header("content-type", "application/json")
            .delay(Duration::from_secs(2))
            .body("[]");
    });

    let client = common::builder(vec![common::node_for(&server)])
        .num_retries(5)
        .build()
        .unwrap();
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let err = client
        .get::<serde_json::Value>("/collections", &QueryParams::new(), Some(&token))
        .await
        .unwrap_err();

    assert!(matches!(err, TsError::Cancelled));
    assert!(mock.calls() <= 1);
    // cancellation says nothing about the node
    assert!(client.node_registry().nodes()[0].is_healthy());
}

#[tokio::test]
async fn signal_without_cancel_behaves_normally() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/collections");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"[{"name":"books"}]"#);
    });

    let client = common::client_for(&server);
    let token = CancellationToken::new();
    let got: Vec<serde_json::Value> = client
        .get("/collections", &QueryParams::new(), Some(&token))
        .await
        .unwrap();

    mock.assert();
    assert_eq!(got.len(), 1);
}
