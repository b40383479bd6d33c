//! Backend nodes: the fixed registry of node records and the selector that rotates over them.

mod registry;
mod selector;

pub use registry::{Node, NodeIndex, NodeRegistry};
pub use selector::NodeSelector;
