//! Node Store
//!
//! Id-keyed table of parsed tree nodes. Populated in one streaming pass by
//! the parser; read-only afterwards. Child references are not resolved on
//! insert — resolution happens lazily during traversal, which is what lets
//! a file reference nodes defined later in the stream without a second
//! pass or whole-file buffering.

use crate::model::{Node, NodeId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// In-memory node table keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    nodes: HashMap<NodeId, Node>,
}

impl NodeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Returns `false` if the identifier is already taken
    /// (the caller decides how to report the duplicate).
    pub fn insert(&mut self, id: NodeId, node: Node) -> bool {
        match self.nodes.entry(id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(node);
                true
            }
        }
    }

    /// Look up a node by identifier.
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Whether a node with this identifier exists.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes in the store.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter()
    }
}
