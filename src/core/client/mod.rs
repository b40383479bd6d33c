//! Public client surface + builder.
//! Internals are split into `execute` (one attempt), `retry` (the attempt loop) and `constants`.

mod constants;
mod execute;
mod retry;

pub use retry::RetryConfig;

use crate::core::cache::ResponseCache;
use crate::core::{
    ClientConfig, HeaderParams, NodeConfig, NodeRegistry, NodeSelector, QueryParams, RequestBody,
    ResponseBody, TsError,
};
use constants::{MAX_QUERY_PARAM_API_KEY_LEN, USER_AGENT};
use execute::RequestParts;
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// The request dispatcher.
///
/// Cloning is cheap and clones share node health, the round-robin cursor and the search cache,
/// so one client can serve many concurrent calls.
#[derive(Debug, Clone)]
pub struct TsClient {
    http: Client,
    config: Arc<ClientConfig>,
    selector: Arc<NodeSelector>,
    retry: RetryConfig,
    search_cache: Arc<ResponseCache<ResponseBody>>,
    request_counter: Arc<AtomicU64>,
}

impl TsClient {
    /// Create a new builder.
    pub fn builder() -> TsClientBuilder {
        TsClientBuilder::default()
    }

    /* -------- internal getters used by other modules -------- */

    pub(crate) fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn search_cache(&self) -> &ResponseCache<ResponseBody> {
        &self.search_cache
    }

    fn next_request_number(&self) -> u64 {
        self.request_counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// The nodes this client rotates over, with their current health.
    pub fn node_registry(&self) -> &NodeRegistry {
        self.selector.registry()
    }

    /// The retry policy in effect.
    pub const fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /* -------- verbs -------- */

    /// `GET` an endpoint and decode the response.
    ///
    /// When `signal` is given it replaces the per-attempt timeout, and cancelling it stops any
    /// further attempts.
    ///
    /// # Errors
    ///
    /// Returns the classified error of a 4xx response, [`TsError::Cancelled`], or the last
    /// retryable error once all attempts have failed.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, query, signal), err))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
        signal: Option<&CancellationToken>,
    ) -> Result<T, TsError> {
        self.get_raw(path, query, signal).await?.decode()
    }

    /// Like [`get`](Self::get) but returns the undecoded body.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub async fn get_raw(
        &self,
        path: &str,
        query: &QueryParams,
        signal: Option<&CancellationToken>,
    ) -> Result<ResponseBody, TsError> {
        let mut parts = RequestParts::new(query);
        parts.signal = signal;
        self.perform_request(Method::GET, path, parts).await
    }

    /// `POST` a body and decode the response.
    ///
    /// `headers` are layered over the defaults (for example a `text/plain` content type).
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get). [`TsError::Data`] if `body` cannot be serialized.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, body, query, headers), err))]
    pub async fn post<T, B>(
        &self,
        path: &str,
        body: &B,
        query: &QueryParams,
        headers: &HeaderParams,
    ) -> Result<T, TsError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.post_raw(path, body, query, headers).await?.decode()
    }

    /// Like [`post`](Self::post) but returns the undecoded body.
    ///
    /// # Errors
    ///
    /// See [`post`](Self::post).
    pub async fn post_raw<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        query: &QueryParams,
        headers: &HeaderParams,
    ) -> Result<ResponseBody, TsError> {
        let mut parts = RequestParts::new(query);
        parts.body = RequestBody::encode(body)?;
        parts.headers = Some(headers);
        self.perform_request(Method::POST, path, parts).await
    }

    /// `PUT` a body and decode the response.
    ///
    /// # Errors
    ///
    /// See [`post`](Self::post).
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, body, query), err))]
    pub async fn put<T, B>(&self, path: &str, body: &B, query: &QueryParams) -> Result<T, TsError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_body(Method::PUT, path, body, query).await?.decode()
    }

    /// `PATCH` a body and decode the response.
    ///
    /// # Errors
    ///
    /// See [`post`](Self::post).
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, body, query), err))]
    pub async fn patch<T, B>(
        &self,
        path: &str,
        body: &B,
        query: &QueryParams,
    ) -> Result<T, TsError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_body(Method::PATCH, path, body, query).await?.decode()
    }

    /// `DELETE` an endpoint and decode the response.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, query), err))]
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<T, TsError> {
        self.perform_request(Method::DELETE, path, RequestParts::new(query))
            .await?
            .decode()
    }

    async fn send_body<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        query: &QueryParams,
    ) -> Result<ResponseBody, TsError> {
        let mut parts = RequestParts::new(query);
        parts.body = RequestBody::encode(body)?;
        self.perform_request(method, path, parts).await
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct TsClientBuilder {
    config: ClientConfig,
    user_agent: Option<String>,
    search_only: bool,
}

impl TsClientBuilder {
    /// Start from a fully populated configuration.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// The API key sent with every request.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Append a node to the rotation.
    #[must_use]
    pub fn node(mut self, node: NodeConfig) -> Self {
        self.config.nodes.push(node);
        self
    }

    /// Replace the node list.
    #[must_use]
    pub fn nodes(mut self, nodes: impl IntoIterator<Item = NodeConfig>) -> Self {
        self.config.nodes = nodes.into_iter().collect();
        self
    }

    /// Set a preferred node that is tried before the rotation.
    #[must_use]
    pub fn nearest_node(mut self, node: NodeConfig) -> Self {
        self.config.nearest_node = Some(node);
        self
    }

    /// Per-attempt timeout. Default: 10s.
    #[must_use]
    pub const fn connection_timeout(mut self, dur: Duration) -> Self {
        self.config.connection_timeout = dur;
        self
    }

    /// How long an unhealthy node is skipped before being tried again. Default: 15s.
    #[must_use]
    pub const fn healthcheck_interval(mut self, dur: Duration) -> Self {
        self.config.healthcheck_interval = dur;
        self
    }

    /// Retries per request. Default: one per configured node.
    #[must_use]
    pub const fn num_retries(mut self, n: u32) -> Self {
        self.config.num_retries = Some(n);
        self
    }

    /// Fixed pause between retries. Default: 100ms.
    #[must_use]
    pub const fn retry_interval(mut self, dur: Duration) -> Self {
        self.config.retry_interval = dur;
        self
    }

    /// Send the API key as a query parameter instead of a header.
    #[must_use]
    pub const fn send_api_key_as_query_param(mut self, yes: bool) -> Self {
        self.config.send_api_key_as_query_param = yes;
        self
    }

    /// Enable the client-side search cache with a default TTL.
    /// If not set, caching is disabled.
    #[must_use]
    pub const fn cache_search_results_for(mut self, dur: Duration) -> Self {
        self.config.cache_search_results_for = dur;
        self
    }

    /// Ask the server to serve searches from its own cache.
    #[must_use]
    pub const fn use_server_side_search_cache(mut self, yes: bool) -> Self {
        self.config.use_server_side_search_cache = yes;
        self
    }

    /// Add a static header sent with every request.
    #[must_use]
    pub fn additional_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config
            .additional_headers
            .insert(name.into(), value.into());
        self
    }

    /// Override the User-Agent.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Configure for search-only use: short keys travel as a query parameter and multi-search
    /// bodies are sent as `text/plain`, which keeps browser-style callers out of CORS preflights.
    #[must_use]
    pub const fn search_only(mut self) -> Self {
        self.search_only = true;
        self
    }

    /// Validate the configuration and build the client.
    ///
    /// # Errors
    ///
    /// Returns [`TsError::MissingConfiguration`] for an incomplete configuration, or
    /// [`TsError::Transport`] if the HTTP client cannot be built.
    pub fn build(self) -> Result<TsClient, TsError> {
        let mut config = self.config;
        config.nodes = config
            .nodes
            .into_iter()
            .map(NodeConfig::with_defaults)
            .collect();
        config.nearest_node = config.nearest_node.map(NodeConfig::with_defaults);
        config.search_only |= self.search_only;
        if config.search_only
            && config
                .api_key
                .as_ref()
                .is_some_and(|k| k.len() < MAX_QUERY_PARAM_API_KEY_LEN)
        {
            config.send_api_key_as_query_param = true;
        }
        config.validate()?;

        let registry = NodeRegistry::new(&config.nodes, config.nearest_node.as_ref())?;
        let selector = NodeSelector::new(registry, config.healthcheck_interval);
        let retry = RetryConfig {
            num_retries: config.effective_num_retries(),
            interval: config.retry_interval,
        };

        let http = reqwest::Client::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT))
            .build()?;

        Ok(TsClient {
            http,
            config: Arc::new(config),
            selector: Arc::new(selector),
            retry,
            search_cache: Arc::new(ResponseCache::new()),
            request_counter: Arc::new(AtomicU64::new(0)),
        })
    }
}
