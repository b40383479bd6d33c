use crate::core::{NodeConfig, TsError};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Position of a node in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeIndex {
    /// The optional preferred node.
    Nearest,
    /// An ordinary node, by its position in the configured list.
    Ordinal(usize),
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => f.write_str("nearestNode"),
            Self::Ordinal(i) => write!(f, "{i}"),
        }
    }
}

/// A configured node plus its runtime health metadata.
///
/// Health and last-access time are independent atomics, so concurrent requests may flip them
/// without locking. Neither is a hard gate; see [`NodeSelector`](super::NodeSelector).
#[derive(Debug)]
pub struct Node {
    index: NodeIndex,
    config: NodeConfig,
    base_url: String,
    healthy: AtomicBool,
    // milliseconds since the registry epoch
    last_access_ms: AtomicU64,
}

impl Node {
    fn new(index: NodeIndex, config: NodeConfig) -> Self {
        let base_url = config.base_url();
        Self {
            index,
            config,
            base_url,
            healthy: AtomicBool::new(true),
            last_access_ms: AtomicU64::new(0),
        }
    }

    /// Where this node sits in the registry.
    pub const fn index(&self) -> NodeIndex {
        self.index
    }

    /// The node's configuration, as copied at construction time.
    pub const fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Whether the last request to this node looked successful.
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Acquire)
    }

    /// The prefix endpoints are appended to.
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// The fixed set of nodes a client talks to.
///
/// Nodes are copied in at construction and never added or removed afterwards. Every node starts
/// healthy with its last-access time set to the construction instant.
#[derive(Debug)]
pub struct NodeRegistry {
    nodes: Vec<Node>,
    nearest: Option<Node>,
    epoch: Instant,
}

impl NodeRegistry {
    /// Builds a registry from node configurations.
    ///
    /// # Errors
    ///
    /// Returns [`TsError::MissingConfiguration`] if `nodes` is empty.
    pub fn new(nodes: &[NodeConfig], nearest: Option<&NodeConfig>) -> Result<Self, TsError> {
        if nodes.is_empty() {
            return Err(TsError::MissingConfiguration(
                "Ensure that nodes[].protocol, nodes[].host and nodes[].port are set".into(),
            ));
        }
        Ok(Self {
            nodes: nodes
                .iter()
                .enumerate()
                .map(|(i, c)| Node::new(NodeIndex::Ordinal(i), c.clone()))
                .collect(),
            nearest: nearest.map(|c| Node::new(NodeIndex::Nearest, c.clone())),
            epoch: Instant::now(),
        })
    }

    /// The ordinary nodes, in configured order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The nearest node, if one is configured.
    pub const fn nearest(&self) -> Option<&Node> {
        self.nearest.as_ref()
    }

    /// Looks a node up by index.
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        match index {
            NodeIndex::Nearest => self.nearest.as_ref(),
            NodeIndex::Ordinal(i) => self.nodes.get(i),
        }
    }

    /// Records the outcome of a request: sets the health flag and stamps the access time.
    pub fn set_health(&self, index: NodeIndex, healthy: bool) {
        if let Some(node) = self.get(index) {
            node.healthy.store(healthy, Ordering::Release);
            node.last_access_ms.store(self.now_ms(), Ordering::Release);
        }
    }

    /// Time since the node was last accessed or marked.
    pub fn since_last_access(&self, node: &Node) -> Duration {
        let last = node.last_access_ms.load(Ordering::Acquire);
        Duration::from_millis(self.now_ms().saturating_sub(last))
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
