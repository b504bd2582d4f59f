//! Tree Flattener Core
//!
//! Converts a decision tree stored in a flat line-oriented text format into
//! an enumerable set of non-contradictory strategies: one per feasible
//! root-to-leaf path, each a conjunction of simplified conditions leading
//! to a terminal value. Built for offline batch tools (auditing,
//! rule-engine import, exhaustive testing) that want the decision logic as
//! flat rules instead of a graph to walk.
//!
//! # Architecture
//!
//! - **model**: domain types (Node, Condition, Strategy)
//! - **parser**: single-pass streaming parser for the flat node format
//! - **store**: id-keyed node table with lazy reference resolution
//! - **constraint**: per-path feasible regions, intersection, minimal
//!   rendering
//! - **flatten**: explicit-stack depth-first traversal producing a lazy
//!   strategy stream
//! - **validate**: optional eager whole-tree structure checks
//!
//! # Critical Invariants
//!
//! 1. Constraint state is forked at every branch point, never shared
//!    between sibling paths
//! 2. Contradictions arise only from a region intersecting to empty
//! 3. Strategies stream one at a time; traversal memory is
//!    O(depth x distinct variables), not O(tree size)
//!
//! # Example
//!
//! ```
//! use tree_flattener_core::{parse, Flattener};
//!
//! let input = "\
//! 0:[x>10] yes=1,no=2
//! 1:[x>5] yes=3,no=4
//! 3:leaf=A
//! 4:leaf=B
//! 2:leaf=C
//! ";
//! let store = parse(input.as_bytes()).unwrap();
//! let lines: Vec<String> = Flattener::new(&store)
//!     .flatten("0")
//!     .unwrap()
//!     .map(|s| s.unwrap().to_string())
//!     .collect();
//! // x>10 implies x>5, and the contradictory B path is pruned
//! assert_eq!(lines, vec!["(x>10) -> A", "(x<=10) -> C"]);
//! ```

// Module declarations
pub mod constraint;
pub mod flatten;
pub mod model;
pub mod parser;
pub mod store;
pub mod validate;

// Re-exports for convenience
pub use constraint::{
    CategoricalRegion, ConstraintError, ConstraintState, Intersection, NumericRegion, Region,
};
pub use flatten::{FlattenError, FlattenStats, Flattener, StrategyIter};
pub use model::{Condition, Node, NodeId, Operand, Operator, Strategy};
pub use parser::{parse, ParseError};
pub use store::NodeStore;
pub use validate::{validate_tree, ValidationError, ValidationResult};
