//! Eager tree validation
//!
//! Optional whole-tree checks run before a traversal: unknown root,
//! dangling child references, cycles (the flattener assumes the tree is
//! finite and acyclic), and nodes unreachable from the root. All problems
//! are collected and reported together.
//!
//! This never runs as part of normal flattening — lazy resolution during
//! traversal stays the contract there — but batch tools that want a full
//! diagnosis up front call it first.

use crate::model::{Node, NodeId};
use crate::store::NodeStore;
use std::collections::HashSet;
use thiserror::Error;

/// Structural problems found in a parsed tree.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("root node '{0}' not found")]
    UnknownRoot(NodeId),

    #[error("node '{referenced_from}' references missing node '{missing}'")]
    DanglingReference {
        missing: NodeId,
        referenced_from: NodeId,
    },

    #[error("cycle through node '{0}'")]
    CycleDetected(NodeId),

    #[error("node '{0}' is unreachable from the root")]
    UnreachableNode(NodeId),
}

/// Validation result: `Ok(())` or every problem found.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Walk step for the iterative check.
enum Step {
    Enter { node: NodeId, via: Option<NodeId> },
    Exit(NodeId),
}

/// Validate the tree under `root`, collecting all errors.
///
/// Runs an iterative depth-first walk (no recursion, same reason as the
/// flattener), marking nodes on the current path to tell true cycles apart
/// from legitimate shared subtrees.
pub fn validate_tree(store: &NodeStore, root: &str) -> ValidationResult {
    if !store.contains(root) {
        return Err(vec![ValidationError::UnknownRoot(root.to_string())]);
    }

    let mut errors = Vec::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut on_path: HashSet<NodeId> = HashSet::new();
    let mut steps = vec![Step::Enter {
        node: root.to_string(),
        via: None,
    }];

    while let Some(step) = steps.pop() {
        match step {
            Step::Exit(id) => {
                on_path.remove(&id);
            }
            Step::Enter { node, via } => {
                let found = match store.get(&node) {
                    Some(found) => found,
                    None => {
                        if let Some(referenced_from) = via {
                            errors.push(ValidationError::DanglingReference {
                                missing: node,
                                referenced_from,
                            });
                        }
                        continue;
                    }
                };
                if on_path.contains(&node) {
                    errors.push(ValidationError::CycleDetected(node));
                    continue;
                }
                if !visited.insert(node.clone()) {
                    // shared subtree, already checked
                    continue;
                }
                if let Node::Branch { yes, no, .. } = found {
                    on_path.insert(node.clone());
                    steps.push(Step::Exit(node.clone()));
                    // yes is popped (and therefore reported) first
                    steps.push(Step::Enter {
                        node: no.clone(),
                        via: Some(node.clone()),
                    });
                    steps.push(Step::Enter {
                        node: yes.clone(),
                        via: Some(node),
                    });
                }
            }
        }
    }

    // nodes never reached from the root, in stable order
    let mut unreachable: Vec<NodeId> = store
        .iter()
        .map(|(id, _)| id.clone())
        .filter(|id| !visited.contains(id))
        .collect();
    unreachable.sort();
    errors.extend(unreachable.into_iter().map(ValidationError::UnreachableNode));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
