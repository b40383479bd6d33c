use std::time::Duration;
use typesense_rs::{CacheMode, NodeConfig, QueryParams, TsClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. A client for a single local node, with a 60 second search cache.
    let client = TsClient::builder()
        .api_key(std::env::var("TYPESENSE_API_KEY").unwrap_or_else(|_| "xyz".into()))
        .node(NodeConfig::new("http", "localhost", 8108))
        .connection_timeout(Duration::from_secs(5))
        .cache_search_results_for(Duration::from_secs(60))
        .build()?;

    // 2. Cluster status.
    let health = client.health().await?;
    let debug = client.debug().await?;
    println!("--- Node status ---");
    println!("ok: {}, version: {}, state: {}", health.ok, debug.version, debug.state);
    println!();

    // 3. Any endpoint through the raw verbs.
    let collections: Vec<serde_json::Value> =
        client.get("/collections", &QueryParams::new(), None).await?;
    println!("--- {} collection(s) ---", collections.len());
    for c in &collections {
        println!("{}", c["name"].as_str().unwrap_or_default());
    }
    println!();

    let Some(first) = collections.first().and_then(|c| c["name"].as_str()) else {
        return Ok(());
    };

    // 4. A cached search; the second call is answered from memory.
    for round in 1..=2 {
        let res: serde_json::Value = client
            .search(first)
            .param("q", "*")
            .param("per_page", "3")
            .fetch()
            .await?;
        println!("round {round}: found {}", res["found"]);
    }

    // 5. Force a fresh read that still updates the cache.
    let res: serde_json::Value = client
        .search(first)
        .param("q", "*")
        .param("per_page", "3")
        .cache_mode(CacheMode::Refresh)
        .fetch()
        .await?;
    println!("refreshed: found {}", res["found"]);

    Ok(())
}
