use super::{Node, NodeRegistry};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Picks the node that serves the next attempt.
///
/// The nearest node wins whenever it is healthy or due for a recheck. Otherwise the ordinary
/// nodes are probed round-robin from where the previous selection stopped; the cursor is shared
/// by all requests on the client. If nothing qualifies after a full lap the last probed node is
/// returned anyway, so selection never fails.
#[derive(Debug)]
pub struct NodeSelector {
    registry: NodeRegistry,
    // index of the next ordinary node to probe
    cursor: AtomicUsize,
    healthcheck_interval: Duration,
}

impl NodeSelector {
    /// Wraps a registry.
    pub const fn new(registry: NodeRegistry, healthcheck_interval: Duration) -> Self {
        Self {
            registry,
            cursor: AtomicUsize::new(0),
            healthcheck_interval,
        }
    }

    /// The underlying registry.
    pub const fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Selects the node for the next attempt.
    ///
    /// `request_number` only tags log output.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn select_node(&self, request_number: u64) -> &Node {
        if let Some(nearest) = self.registry.nearest() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                request = request_number,
                node = %nearest.index(),
                healthy = nearest.is_healthy(),
                "nearest node health"
            );
            if nearest.is_healthy() || self.is_due_for_healthcheck(nearest, request_number) {
                return nearest;
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(request = request_number, "falling back to individual nodes");
        }

        let nodes = self.registry.nodes();
        let mut candidate = &nodes[0];
        for _ in 0..=nodes.len() {
            let i = self.advance_cursor(nodes.len());
            candidate = &nodes[i];
            if candidate.is_healthy() || self.is_due_for_healthcheck(candidate, request_number) {
                #[cfg(feature = "tracing")]
                tracing::debug!(request = request_number, node = %candidate.index(), "selected node");
                return candidate;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            request = request_number,
            node = %candidate.index(),
            "no healthy nodes, returning next node"
        );
        candidate
    }

    /// True once more than the health-check interval has passed since the node was last touched.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn is_due_for_healthcheck(&self, node: &Node, request_number: u64) -> bool {
        let due = self.registry.since_last_access(node) > self.healthcheck_interval;
        #[cfg(feature = "tracing")]
        if due {
            tracing::debug!(
                request = request_number,
                node = %node.index(),
                "node exceeded health-check interval, adding it back into rotation"
            );
        }
        due
    }

    fn advance_cursor(&self, len: usize) -> usize {
        // fetch_update returns the previous value, which is the slot we probe
        self.cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| Some((c + 1) % len))
            .unwrap_or_else(|c| c)
            % len
    }
}
