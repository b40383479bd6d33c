//! Cached search: single-collection search and multi-search.
//!
//! Both calls go through the client's response cache. The TTL defaults to the client's
//! `cache_search_results_for` setting, which is zero (no caching) unless configured.

mod api;

use crate::core::{CacheMode, HeaderParams, QueryParams, TsClient, TsError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A builder for `GET /collections/{collection}/documents/search`.
#[derive(Debug)]
pub struct SearchBuilder {
    client: TsClient,
    collection: String,
    params: QueryParams,
    cache_mode: CacheMode,
    cache_ttl: Option<Duration>,
    signal: Option<CancellationToken>,
}

impl SearchBuilder {
    /// Creates a new `SearchBuilder` for a collection.
    pub fn new(client: &TsClient, collection: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            collection: collection.into(),
            params: QueryParams::new(),
            cache_mode: CacheMode::Use,
            cache_ttl: None,
            signal: None,
        }
    }

    /// Sets a search parameter such as `q`, `query_by` or `filter_by`.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Sets the cache mode for this specific API call.
    #[must_use]
    pub const fn cache_mode(mut self, mode: CacheMode) -> Self {
        self.cache_mode = mode;
        self
    }

    /// Overrides the client's search cache TTL for this call. Zero disables caching.
    #[must_use]
    pub const fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Lets the caller abort the search. The token replaces the per-attempt timeout.
    #[must_use]
    pub fn signal(mut self, token: CancellationToken) -> Self {
        self.signal = Some(token);
        self
    }

    /// Executes the search.
    ///
    /// # Errors
    ///
    /// Returns any error from the dispatcher, or [`TsError::Data`] if the response does not
    /// match `T`.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<T, TsError> {
        if self.collection.is_empty() {
            return Err(TsError::MissingConfiguration(
                "the name of the collection to search must be specified".into(),
            ));
        }
        let path = format!(
            "/collections/{}/documents/search",
            encode_segment(&self.collection)
        );
        let mut params = self.params;
        api::apply_server_side_cache(&self.client, &mut params);
        let ttl = api::ttl_for(&self.client, self.cache_ttl);

        api::cached_get(
            &self.client,
            &path,
            &params,
            self.cache_mode,
            ttl,
            self.signal.as_ref(),
        )
        .await?
        .decode()
    }
}

/// A builder for `POST /multi_search`.
#[derive(Debug)]
pub struct MultiSearchBuilder {
    client: TsClient,
    searches: Vec<Value>,
    common_params: QueryParams,
    cache_mode: CacheMode,
    cache_ttl: Option<Duration>,
}

impl MultiSearchBuilder {
    /// Creates an empty multi-search.
    pub fn new(client: &TsClient) -> Self {
        Self {
            client: client.clone(),
            searches: Vec::new(),
            common_params: QueryParams::new(),
            cache_mode: CacheMode::Use,
            cache_ttl: None,
        }
    }

    /// Adds one search, e.g. `{"collection": "books", "q": "dune", "query_by": "title"}`.
    #[must_use]
    pub fn search(mut self, search: Value) -> Self {
        self.searches.push(search);
        self
    }

    /// Sets a parameter shared by every search.
    #[must_use]
    pub fn common_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.common_params.insert(key.into(), value.into());
        self
    }

    /// Sets the cache mode for this specific API call.
    #[must_use]
    pub const fn cache_mode(mut self, mode: CacheMode) -> Self {
        self.cache_mode = mode;
        self
    }

    /// Overrides the client's search cache TTL for this call. Zero disables caching.
    #[must_use]
    pub const fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Executes the multi-search.
    ///
    /// # Errors
    ///
    /// Returns any error from the dispatcher, or [`TsError::Data`] if the response does not
    /// match `T`.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<T, TsError> {
        let body = serde_json::json!({ "searches": self.searches });
        let mut params = self.common_params;
        api::apply_server_side_cache(&self.client, &mut params);

        let mut headers = HeaderParams::new();
        if self.client.config().search_only {
            headers.insert("content-type".into(), "text/plain".into());
        }
        let ttl = api::ttl_for(&self.client, self.cache_ttl);

        api::cached_multi_search(&self.client, &body, &params, &headers, self.cache_mode, ttl)
            .await?
            .decode()
    }
}

impl TsClient {
    /// Starts a search in `collection`.
    pub fn search(&self, collection: impl Into<String>) -> SearchBuilder {
        SearchBuilder::new(self, collection)
    }

    /// Starts a multi-search.
    pub fn multi_search(&self) -> MultiSearchBuilder {
        MultiSearchBuilder::new(self)
    }
}

fn encode_segment(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
