//! typesense-rs: a resilient Typesense client.
//!
//! The heart of the crate is the request dispatcher, [`TsClient`]. Every call picks a node
//! (the nearest node first, then round-robin over the cluster), runs the HTTP exchange with a
//! per-attempt timeout, and retries server errors and transport failures on the next node after
//! a fixed pause. Client errors (4xx) surface immediately as typed [`TsError`] variants.
//! Read-style search calls can additionally be memoized for a short TTL.
//!
//! ```no_run
//! # use typesense_rs::{NodeConfig, QueryParams, TsClient};
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TsClient::builder()
//!     .api_key("xyz")
//!     .node(NodeConfig::new("http", "localhost", 8108))
//!     .node(NodeConfig::new("http", "localhost", 7108))
//!     .build()?;
//!
//! let health = client.health().await?;
//! let collections: serde_json::Value = client.get("/collections", &QueryParams::new(), None).await?;
//! println!("ok={} collections={collections}", health.ok);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod health;
pub mod search;

pub use crate::core::{
    CacheMode, CacheOptions, ClientConfig, ErrorKind, HeaderParams, NodeConfig, NodeIndex,
    QueryParams, ResponseBody, ResponseCache, RetryConfig, TsClient, TsClientBuilder, TsError,
};
pub use health::{DebugInfo, Health};
pub use search::{MultiSearchBuilder, SearchBuilder};

// Re-exported so callers can cancel in-flight requests without naming tokio-util themselves.
pub use tokio_util::sync::CancellationToken;
