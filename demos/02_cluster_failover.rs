use std::time::Duration;
use typesense_rs::{CancellationToken, NodeConfig, NodeIndex, QueryParams, TsClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing-subscriber")]
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("typesense_rs=debug"))
        .init();

    // Port 1 is almost certainly closed, so the first node fails and the request moves on.
    let client = TsClient::builder()
        .api_key("xyz")
        .nearest_node(NodeConfig::new("http", "127.0.0.1", 1))
        .node(NodeConfig::new("http", "localhost", 8108))
        .node(NodeConfig::new("http", "localhost", 7108))
        .connection_timeout(Duration::from_secs(2))
        .retry_interval(Duration::from_millis(50))
        .build()?;

    match client.health().await {
        Ok(h) => println!("cluster answered, ok={}", h.ok),
        Err(e) => println!("all attempts failed: {e}"),
    }

    println!("--- Node health after the call ---");
    let registry = client.node_registry();
    for node in registry.nearest().into_iter().chain(registry.nodes()) {
        let label = match node.index() {
            NodeIndex::Nearest => "nearest".to_string(),
            NodeIndex::Ordinal(i) => format!("node {i}"),
        };
        println!("{label}: healthy={}", node.is_healthy());
    }

    // A caller-supplied token replaces the per-attempt timeout and can stop the retry loop.
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        canceller.cancel();
    });
    let res = client
        .get::<serde_json::Value>("/collections", &QueryParams::new(), Some(&token))
        .await;
    println!("cancelled call: {res:?}");

    Ok(())
}
