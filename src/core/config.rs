//! Node descriptors and dispatcher configuration.

use crate::core::TsError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

pub(crate) const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);
pub(crate) const DEFAULT_HEALTHCHECK_INTERVAL: Duration = Duration::from_secs(15);
pub(crate) const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(100);
pub(crate) const DEFAULT_NUM_RETRIES: u32 = 3;

/// One backend server endpoint.
///
/// Either `url` or the `protocol`/`host`/`port` triple must be present. When `url` is set it
/// takes precedence and endpoints are appended to it verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// `http` or `https`.
    pub protocol: Option<String>,
    /// Hostname or IP address.
    pub host: Option<String>,
    /// TCP port. Defaults to 443/80 for https/http when left unset.
    pub port: Option<u16>,
    /// Path prefix placed between the port and the endpoint. Defaults to empty.
    pub path: String,
    /// Full base URL, e.g. `https://xyz.a1.typesense.net`.
    pub url: Option<String>,
}

impl NodeConfig {
    /// A node addressed by protocol, host and port.
    pub fn new(protocol: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            protocol: Some(protocol.into()),
            host: Some(host.into()),
            port: Some(port),
            ..Self::default()
        }
    }

    /// A node addressed by a full base URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Sets the path prefix.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Fills in the default port for well-known protocols.
    #[must_use]
    pub(crate) fn with_defaults(mut self) -> Self {
        if self.port.is_none() {
            self.port = match self.protocol.as_deref() {
                Some("https") => Some(443),
                Some("http") => Some(80),
                _ => None,
            };
        }
        self
    }

    pub(crate) fn is_missing_parameters(&self) -> bool {
        self.url.is_none() && (self.protocol.is_none() || self.host.is_none() || self.port.is_none())
    }

    /// The prefix every endpoint of this node is appended to.
    pub(crate) fn base_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        format!(
            "{}://{}:{}{}",
            self.protocol.as_deref().unwrap_or_default(),
            self.host.as_deref().unwrap_or_default(),
            self.port.unwrap_or_default(),
            self.path
        )
    }
}

/// Everything the dispatcher needs to know about the cluster and its policies.
///
/// Usually assembled through [`TsClientBuilder`](crate::core::TsClientBuilder). It can also be
/// deserialized; missing fields take their defaults and durations use serde's
/// `{"secs": .., "nanos": ..}` form.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// The API key sent with every request.
    pub api_key: Option<String>,
    /// Ordered list of nodes used for round-robin rotation.
    pub nodes: Vec<NodeConfig>,
    /// Optional preferred node checked before the rotation.
    pub nearest_node: Option<NodeConfig>,
    /// Per-attempt timeout.
    pub connection_timeout: Duration,
    /// Time after which an unhealthy node is optimistically tried again.
    pub healthcheck_interval: Duration,
    /// Retries per request. `None` means one per configured node (nearest included), or 3.
    pub num_retries: Option<u32>,
    /// Fixed pause between retryable failures.
    pub retry_interval: Duration,
    /// Send the API key as the `x-typesense-api-key` query parameter instead of a header.
    pub send_api_key_as_query_param: bool,
    /// Default client-side TTL for search responses. Zero disables the search cache.
    pub cache_search_results_for: Duration,
    /// Ask the server to use its own search cache (`usecache=true`).
    pub use_server_side_search_cache: bool,
    /// Static headers added to every request.
    pub additional_headers: BTreeMap<String, String>,
    /// Search-only mode: multi-search bodies are sent as `text/plain`.
    pub search_only: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            nodes: Vec::new(),
            nearest_node: None,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            healthcheck_interval: DEFAULT_HEALTHCHECK_INTERVAL,
            num_retries: None,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            send_api_key_as_query_param: false,
            cache_search_results_for: Duration::ZERO,
            use_server_side_search_cache: false,
            additional_headers: BTreeMap::new(),
            search_only: false,
        }
    }
}

impl ClientConfig {
    /// Checks that the configuration is complete enough to send a request.
    ///
    /// # Errors
    ///
    /// Returns [`TsError::MissingConfiguration`] when no nodes are configured, a node lacks both
    /// `url` and the protocol/host/port triple, or the API key is unset.
    pub fn validate(&self) -> Result<(), TsError> {
        if self.nodes.is_empty() || self.nodes.iter().any(NodeConfig::is_missing_parameters) {
            return Err(TsError::MissingConfiguration(
                "Ensure that nodes[].protocol, nodes[].host and nodes[].port are set".into(),
            ));
        }
        if self
            .nearest_node
            .as_ref()
            .is_some_and(NodeConfig::is_missing_parameters)
        {
            return Err(TsError::MissingConfiguration(
                "Ensure that nearestNodes.protocol, nearestNodes.host and nearestNodes.port are set"
                    .into(),
            ));
        }
        if self.api_key.is_none() {
            return Err(TsError::MissingConfiguration("Ensure that apiKey is set".into()));
        }
        Ok(())
    }

    /// The retry count actually used by the dispatcher.
    #[must_use]
    pub fn effective_num_retries(&self) -> u32 {
        if let Some(n) = self.num_retries {
            return n;
        }
        let count = self.nodes.len() + usize::from(self.nearest_node.is_some());
        match u32::try_from(count) {
            Ok(0) | Err(_) => DEFAULT_NUM_RETRIES,
            Ok(n) => n,
        }
    }
}
