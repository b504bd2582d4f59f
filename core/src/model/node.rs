//! Tree nodes
//!
//! Exactly one of two shapes per node, never both:
//! - `Branch`: one atomic condition plus "yes" and "no" child references
//! - `Leaf`: an opaque terminal value, passed through verbatim
//!
//! Child references are stored as opaque identifiers. Whether they resolve
//! is only discovered at traversal (or validation) time, so a file may
//! reference nodes defined later in the stream.

use crate::model::Condition;
use serde::{Deserialize, Serialize};

/// Node identifier as written in the input file.
///
/// Integer identifiers are kept verbatim as strings.
pub type NodeId = String;

/// A node in the decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    /// Condition node: atomic test plus two child references.
    Branch {
        /// The atomic condition tested at this node
        condition: Condition,

        /// Child taken when the condition holds
        yes: NodeId,

        /// Child taken when the condition fails
        no: NodeId,
    },

    /// Terminal node carrying an outcome value.
    Leaf {
        /// Opaque outcome (string or number), emitted verbatim
        value: String,
    },
}

impl Node {
    /// Check if this is a condition node
    pub fn is_branch(&self) -> bool {
        matches!(self, Node::Branch { .. })
    }

    /// Check if this is a leaf node
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}
