//! Flattener
//!
//! Iterative depth-first traversal of a parsed tree. Each reachable,
//! feasible leaf yields one [`Strategy`]; branches whose accumulated
//! constraints are contradictory are pruned without descending. The
//! traversal runs on an explicit frame stack, so depth is bounded by the
//! tree, not the host call stack, and memory stays at
//! O(depth x distinct variables).
//!
//! The "yes" branch of a condition node is fully explored before the "no"
//! branch; the "no" branch folds in the logical negation of the node's
//! condition. Output order is therefore deterministic preorder.
//!
//! Child identifiers are resolved against the Node Store only when their
//! frame is processed — never below a pruned branch. A reference that does
//! not resolve is a malformed tree and ends the traversal with an error;
//! it is deliberately distinct from a contradiction, which is expected and
//! silent.

use crate::constraint::{ConstraintError, ConstraintState, Intersection};
use crate::model::{Node, NodeId, Strategy};
use crate::store::NodeStore;
use thiserror::Error;

/// Fatal traversal errors.
///
/// Contradictions are not here: they are internal control flow and only
/// ever show up as "this branch yields zero strategies".
#[derive(Debug, Error, PartialEq)]
pub enum FlattenError {
    #[error("root node '{0}' not found")]
    UnreachableRoot(NodeId),

    #[error("node '{referenced_from}' references missing node '{missing}'")]
    DanglingReference {
        missing: NodeId,
        referenced_from: NodeId,
    },

    #[error(transparent)]
    Constraint(#[from] ConstraintError),
}

/// Counters accumulated while a [`StrategyIter`] runs.
///
/// Read them after (or during) iteration for a run summary; the core
/// itself never prints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenStats {
    /// Nodes whose frame was processed at least once
    pub nodes_visited: usize,

    /// Strategies handed to the consumer
    pub strategies_emitted: usize,

    /// Branches skipped because their constraints were contradictory
    pub branches_pruned: usize,
}

/// Traversal phase of one stack frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// About to descend the "yes" child
    Yes,

    /// "yes" subtree fully explored; about to descend the "no" child
    No,

    /// Both subtrees explored; frame can be discarded
    Done,
}

/// One frame of the explicit traversal stack.
///
/// `state` is the fork inherited from the parent branch — owned by this
/// frame alone and discarded with it.
#[derive(Debug)]
struct Frame {
    node: NodeId,
    /// Identifier of the node that referenced this one (None for the root);
    /// only used to report dangling references.
    via: Option<NodeId>,
    state: ConstraintState,
    phase: Phase,
}

/// Flattens a parsed tree into a lazy strategy stream.
pub struct Flattener<'a> {
    store: &'a NodeStore,
}

impl<'a> Flattener<'a> {
    /// Create a flattener over a populated store.
    pub fn new(store: &'a NodeStore) -> Self {
        Self { store }
    }

    /// Start a traversal at `root`.
    ///
    /// Fails immediately with [`FlattenError::UnreachableRoot`] if the root
    /// identifier does not exist. The returned iterator may be dropped at
    /// any point; it holds nothing but its own stack.
    ///
    /// # Example
    ///
    /// ```
    /// use tree_flattener_core::{parse, Flattener};
    ///
    /// let input = "0:[x>10] yes=1,no=2\n1:leaf=A\n2:leaf=B\n";
    /// let store = parse(input.as_bytes()).unwrap();
    /// let lines: Vec<String> = Flattener::new(&store)
    ///     .flatten("0")
    ///     .unwrap()
    ///     .map(|s| s.unwrap().to_string())
    ///     .collect();
    /// assert_eq!(lines, vec!["(x>10) -> A", "(x<=10) -> B"]);
    /// ```
    pub fn flatten(&self, root: &str) -> Result<StrategyIter<'a>, FlattenError> {
        if !self.store.contains(root) {
            return Err(FlattenError::UnreachableRoot(root.to_string()));
        }
        Ok(StrategyIter {
            store: self.store,
            stack: vec![Frame {
                node: root.to_string(),
                via: None,
                state: ConstraintState::new(),
                phase: Phase::Yes,
            }],
            stats: FlattenStats::default(),
            done: false,
        })
    }
}

/// Lazy strategy stream over one traversal.
///
/// Yields `Ok(Strategy)` per feasible leaf in deterministic preorder. On
/// the first fatal error it yields that `Err` once and then fuses — no
/// strategies after an error, per the no-partial-output policy.
#[derive(Debug)]
pub struct StrategyIter<'a> {
    store: &'a NodeStore,
    stack: Vec<Frame>,
    stats: FlattenStats,
    done: bool,
}

impl StrategyIter<'_> {
    /// Counters for the traversal so far.
    pub fn stats(&self) -> FlattenStats {
        self.stats
    }
}

impl Iterator for StrategyIter<'_> {
    type Item = Result<Strategy, FlattenError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let top = match self.stack.len().checked_sub(1) {
                Some(top) => top,
                None => {
                    self.done = true;
                    return None;
                }
            };

            match self.store.get(&self.stack[top].node) {
                None => {
                    // lazy resolution failed: malformed tree, not a pruneable
                    // branch
                    self.done = true;
                    let frame = self.stack.pop()?;
                    let referenced_from = frame.via.unwrap_or_else(|| frame.node.clone());
                    return Some(Err(FlattenError::DanglingReference {
                        missing: frame.node,
                        referenced_from,
                    }));
                }

                Some(Node::Leaf { value }) => {
                    // a leaf frame exists only if every intersect on the way
                    // down was feasible, so it always emits
                    let strategy = Strategy {
                        conditions: self.stack[top].state.render(),
                        outcome: value.clone(),
                    };
                    self.stats.nodes_visited += 1;
                    self.stats.strategies_emitted += 1;
                    self.stack.pop();
                    return Some(Ok(strategy));
                }

                Some(Node::Branch { condition, yes, no }) => {
                    let phase = self.stack[top].phase;
                    let (child, folded) = match phase {
                        Phase::Done => {
                            self.stack.pop();
                            continue;
                        }
                        Phase::Yes => {
                            self.stack[top].phase = Phase::No;
                            self.stats.nodes_visited += 1;
                            (yes, self.stack[top].state.intersect(condition))
                        }
                        Phase::No => {
                            self.stack[top].phase = Phase::Done;
                            (no, self.stack[top].state.intersect(&condition.negated()))
                        }
                    };
                    match folded {
                        Err(e) => {
                            self.done = true;
                            return Some(Err(e.into()));
                        }
                        Ok(Intersection::Contradiction) => {
                            // expected: zero strategies on this side, no
                            // lookups below it
                            self.stats.branches_pruned += 1;
                        }
                        Ok(Intersection::Feasible(state)) => {
                            let via = Some(self.stack[top].node.clone());
                            self.stack.push(Frame {
                                node: child.clone(),
                                via,
                                state,
                                phase: Phase::Yes,
                            });
                        }
                    }
                }
            }
        }
    }
}
