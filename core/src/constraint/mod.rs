//! Constraint Engine
//!
//! Maintains, per in-progress path, a mapping from variable name to its
//! feasible region, and exposes the two operations the traversal needs:
//! fold in one more condition (`intersect`), and render the minimal
//! condition set for output (`render`).
//!
//! Correctness invariant: `intersect` never mutates the receiving state.
//! Every branch point forks a fresh copy, so sibling paths can never
//! observe each other's constraints. Contradictions are detected in one
//! place only — a region intersecting to empty — never by comparing raw
//! condition pairs, so any operator combination works, including repeated
//! multi-step narrowing.

pub mod region;

pub use region::{CategoricalRegion, NumericRegion, Region};

use crate::model::{Condition, Operand, Operator};
use thiserror::Error;

/// Errors from direct misuse of the engine API.
///
/// File input can never reach these: the parser rejects ordered comparisons
/// on categorical operands and mixed operand kinds before any state exists.
#[derive(Debug, Error, PartialEq)]
pub enum ConstraintError {
    #[error("variable '{variable}' mixes numeric and categorical operands")]
    KindMismatch { variable: String },

    #[error("ordered comparison '{op}' on categorical variable '{variable}'")]
    OrderedCategorical { variable: String, op: Operator },
}

/// Outcome of folding one condition into a path's constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum Intersection {
    /// The narrowed state for the child path
    Feasible(ConstraintState),

    /// The combined constraints admit no value; the branch must be pruned
    Contradiction,
}

/// Accumulated feasible regions for the variables of one path.
///
/// Insertion-ordered, so rendering follows first-introduced order along
/// the path — deterministic output for free. Paths touch few variables,
/// which keeps the linear scans and the per-branch clone cheap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintState {
    vars: Vec<(String, Region)>,
}

impl ConstraintState {
    /// Empty state, as owned by the root of a traversal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of variables with a recorded region.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no variable has been restricted yet.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Fold `condition` into a copy of this state.
    ///
    /// The receiver is left untouched; on success the narrowed copy is
    /// returned, or `Contradiction` if the variable's region became empty.
    pub fn intersect(&self, condition: &Condition) -> Result<Intersection, ConstraintError> {
        let mut next = self.clone();
        let feasible = match &condition.operand {
            Operand::Number(v) => {
                let region = next.slot(
                    &condition.variable,
                    Region::Numeric(NumericRegion::universal()),
                );
                match region {
                    Region::Numeric(r) => r.narrow(condition.op, *v),
                    Region::Categorical(_) => {
                        return Err(ConstraintError::KindMismatch {
                            variable: condition.variable.clone(),
                        })
                    }
                }
            }
            Operand::Symbol(v) => {
                if condition.op.is_ordered() {
                    return Err(ConstraintError::OrderedCategorical {
                        variable: condition.variable.clone(),
                        op: condition.op,
                    });
                }
                let region = next.slot(
                    &condition.variable,
                    Region::Categorical(CategoricalRegion::universal()),
                );
                match region {
                    Region::Categorical(r) => r.narrow(condition.op == Operator::Eq, v),
                    Region::Numeric(_) => {
                        return Err(ConstraintError::KindMismatch {
                            variable: condition.variable.clone(),
                        })
                    }
                }
            }
        };
        if feasible {
            Ok(Intersection::Feasible(next))
        } else {
            Ok(Intersection::Contradiction)
        }
    }

    /// Minimal condition sequence for the whole state: variables in
    /// first-introduced order, each described by its region's tightest
    /// equivalent conditions, unrestricted variables omitted.
    pub fn render(&self) -> Vec<Condition> {
        let mut out = Vec::new();
        for (variable, region) in &self.vars {
            if !region.is_universal() {
                out.extend(region.render(variable));
            }
        }
        out
    }

    /// Region of `variable`, if the path has touched it.
    pub fn region(&self, variable: &str) -> Option<&Region> {
        self.vars
            .iter()
            .find(|(name, _)| name == variable)
            .map(|(_, region)| region)
    }

    /// Mutable region slot for `variable`, inserting `default` on first use.
    fn slot(&mut self, variable: &str, default: Region) -> &mut Region {
        let at = match self.vars.iter().position(|(name, _)| name == variable) {
            Some(at) => at,
            None => {
                self.vars.push((variable.to_string(), default));
                self.vars.len() - 1
            }
        };
        &mut self.vars[at].1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(variable: &str, op: Operator, operand: Operand) -> Condition {
        Condition::new(variable, op, operand)
    }

    fn feasible(result: Result<Intersection, ConstraintError>) -> ConstraintState {
        match result.unwrap() {
            Intersection::Feasible(state) => state,
            Intersection::Contradiction => panic!("unexpected contradiction"),
        }
    }

    #[test]
    fn test_intersect_leaves_original_untouched() {
        let base = ConstraintState::new();
        let narrowed = feasible(base.intersect(&cond("x", Operator::Gt, Operand::Number(5.0))));
        assert!(base.is_empty());
        assert_eq!(narrowed.len(), 1);
        // sibling fork from the same base sees nothing of the first fork
        let sibling = feasible(base.intersect(&cond("x", Operator::Le, Operand::Number(5.0))));
        assert_eq!(sibling.render()[0].to_string(), "x<=5");
        assert_eq!(narrowed.render()[0].to_string(), "x>5");
    }

    #[test]
    fn test_contradiction_via_region_emptiness() {
        let state = feasible(
            ConstraintState::new().intersect(&cond("x", Operator::Gt, Operand::Number(10.0))),
        );
        let result = state
            .intersect(&cond("x", Operator::Le, Operand::Number(10.0)))
            .unwrap();
        assert_eq!(result, Intersection::Contradiction);
        // the state that produced the contradiction is still usable
        assert_eq!(state.render()[0].to_string(), "x>10");
    }

    #[test]
    fn test_render_first_introduced_order() {
        let state = ConstraintState::new();
        let state = feasible(state.intersect(&cond("b", Operator::Gt, Operand::Number(1.0))));
        let state = feasible(state.intersect(&cond("a", Operator::Lt, Operand::Number(9.0))));
        let state = feasible(state.intersect(&cond("b", Operator::Le, Operand::Number(7.0))));
        let rendered: Vec<String> = state.render().iter().map(|c| c.to_string()).collect();
        assert_eq!(rendered, vec!["b>1", "b<=7", "a<9"]);
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let state = feasible(
            ConstraintState::new().intersect(&cond("x", Operator::Gt, Operand::Number(1.0))),
        );
        let err = state
            .intersect(&cond("x", Operator::Eq, Operand::Symbol("blue".to_string())))
            .unwrap_err();
        assert_eq!(
            err,
            ConstraintError::KindMismatch {
                variable: "x".to_string()
            }
        );
    }

    #[test]
    fn test_ordered_on_categorical_rejected() {
        let err = ConstraintState::new()
            .intersect(&cond("device", Operator::Lt, Operand::Symbol("pc".to_string())))
            .unwrap_err();
        assert_eq!(
            err,
            ConstraintError::OrderedCategorical {
                variable: "device".to_string(),
                op: Operator::Lt,
            }
        );
    }

    #[test]
    fn test_categorical_equality_and_exclusion() {
        let state = feasible(
            ConstraintState::new()
                .intersect(&cond("device", Operator::Ne, Operand::Symbol("tv".to_string()))),
        );
        let state = feasible(
            state.intersect(&cond("device", Operator::Eq, Operand::Symbol("pc".to_string()))),
        );
        assert_eq!(state.render()[0].to_string(), "device=pc");
        let result = state
            .intersect(&cond("device", Operator::Eq, Operand::Symbol("tv".to_string())))
            .unwrap();
        assert_eq!(result, Intersection::Contradiction);
    }
}
