//! Domain types for the flattener.
//!
//! - **condition**: atomic comparisons (`Condition`, `Operator`, `Operand`)
//! - **node**: tree nodes as stored in the input file (`Node`, `NodeId`)
//! - **strategy**: the output record (`Strategy`)
//!
//! All types are read-only after construction: the parser creates nodes once,
//! and conditions never change after they are parsed.

pub mod condition;
pub mod node;
pub mod strategy;

pub use condition::{Condition, Operand, Operator};
pub use node::{Node, NodeId};
pub use strategy::Strategy;
