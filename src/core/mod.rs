//! Core components of the `typesense-rs` client.
//!
//! This module contains the request-dispatch layer everything else is built on:
//! - The main [`TsClient`] and its builder.
//! - The primary [`TsError`] type and the status classifier.
//! - The node registry and selector that track cluster health.
//! - The response cache used for read-style calls.

/// The response cache (`ResponseCache`) and its options.
pub mod cache;
/// HTTP status classification.
pub mod classify;
/// The main client (`TsClient`), builder, and retry configuration.
pub mod client;
/// Node descriptors and client configuration.
pub mod config;
/// The primary error type (`TsError`) for the crate.
pub mod error;
/// Request and response bodies shared by all API modules.
pub mod models;
/// Node registry and selection.
pub mod node;

pub(crate) mod net;

// convenient re-exports so most code can just `use crate::core::TsClient`
pub use cache::{CacheMode, CacheOptions, ResponseCache};
pub use classify::{ErrorKind, classify};
pub use client::{RetryConfig, TsClient, TsClientBuilder};
pub use config::{ClientConfig, NodeConfig};
pub use error::TsError;
pub use models::{HeaderParams, QueryParams, RequestBody, ResponseBody};
pub use node::{Node, NodeIndex, NodeRegistry, NodeSelector};
