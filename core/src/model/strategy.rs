//! Strategy records
//!
//! One strategy per feasible root-to-leaf path: the minimal condition set
//! describing the path, paired with the leaf's outcome. Strategies are
//! handed to the consumer one at a time and never buffered as a collection.

use crate::model::Condition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A flat rule: conjunction of simplified conditions leading to an outcome.
///
/// `conditions` holds at most one simplified bound set per variable touched
/// on the path, in first-introduced path order. A variable the path never
/// really restricts does not appear at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    /// Minimal condition set for the path
    pub conditions: Vec<Condition>,

    /// The leaf's terminal value, verbatim
    pub outcome: String,
}

impl Strategy {
    /// True when the path imposed no restriction at all (the rule always
    /// applies).
    pub fn is_unconditional(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Text rendering: `(c1) and (c2) -> outcome`, or `true -> outcome` for an
/// unconditional strategy. A pure, order-preserving function of the fields.
impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conditions.is_empty() {
            f.write_str("true")?;
        } else {
            for (i, condition) in self.conditions.iter().enumerate() {
                if i > 0 {
                    f.write_str(" and ")?;
                }
                write!(f, "({})", condition)?;
            }
        }
        write!(f, " -> {}", self.outcome)
    }
}
