use serde::{Deserialize, Serialize};

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Whether the node considers itself ready to serve.
    pub ok: bool,
}

/// Response of `GET /debug`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugInfo {
    /// Raft state of the node: 1 for leader, 4 for follower.
    pub state: i64,
    /// Server version string.
    pub version: String,
}
