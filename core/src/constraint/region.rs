//! Feasible regions
//!
//! A region is the set of values one variable may still take given every
//! condition seen so far on one path. Ordered (numeric) variables get an
//! interval with open/closed endpoints plus a finite exclusion set;
//! categorical variables get either a pinned value or an exclusion set.
//!
//! Narrowing always mutates a region the caller has already forked, and
//! reports whether the region is still non-empty. Emptiness here is the
//! single source of contradiction in the whole engine.

use crate::model::{Condition, Operand, Operator};

/// Feasible region of a single variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    /// Interval over the reals, possibly with point exclusions
    Numeric(NumericRegion),

    /// Finite-exclusion or pinned value set over categories
    Categorical(CategoricalRegion),
}

impl Region {
    /// Whether the region still allows every value (nothing to render).
    pub fn is_universal(&self) -> bool {
        match self {
            Region::Numeric(r) => r.is_universal(),
            Region::Categorical(r) => r.is_universal(),
        }
    }

    /// Minimal condition sequence exactly describing this region.
    pub fn render(&self, variable: &str) -> Vec<Condition> {
        match self {
            Region::Numeric(r) => r.render(variable),
            Region::Categorical(r) => r.render(variable),
        }
    }
}

// ============================================================================
// NUMERIC REGIONS
// ============================================================================

/// Interval `lo..hi` with independently open/closed endpoints and a sorted
/// set of excluded interior points.
///
/// Invariants kept by `narrow`:
/// - unbounded ends are `-inf`/`+inf` and always open
/// - excluded points lie strictly inside `(lo, hi)`; an exclusion landing
///   on a closed endpoint reopens that endpoint instead of being stored,
///   which keeps the rendered condition set minimal
#[derive(Debug, Clone, PartialEq)]
pub struct NumericRegion {
    lo: f64,
    hi: f64,
    lo_open: bool,
    hi_open: bool,
    excluded: Vec<f64>,
}

impl NumericRegion {
    /// The whole real line.
    pub fn universal() -> Self {
        Self {
            lo: f64::NEG_INFINITY,
            hi: f64::INFINITY,
            lo_open: true,
            hi_open: true,
            excluded: Vec::new(),
        }
    }

    pub fn is_universal(&self) -> bool {
        self.lo == f64::NEG_INFINITY && self.hi == f64::INFINITY && self.excluded.is_empty()
    }

    /// The single admitted value, if the interval has collapsed to a point.
    pub fn as_point(&self) -> Option<f64> {
        if self.lo == self.hi && !self.lo_open && !self.hi_open {
            Some(self.lo)
        } else {
            None
        }
    }

    /// Whether `v` lies in the region.
    pub fn contains(&self, v: f64) -> bool {
        let above = v > self.lo || (v == self.lo && !self.lo_open);
        let below = v < self.hi || (v == self.hi && !self.hi_open);
        above && below && !self.excluded.contains(&v)
    }

    fn is_empty(&self) -> bool {
        self.lo > self.hi || (self.lo == self.hi && (self.lo_open || self.hi_open))
    }

    /// Intersect with `OP v`. Returns `false` if the region became empty.
    ///
    /// Re-applying a condition that already holds changes nothing, so
    /// narrowing is idempotent by construction.
    pub fn narrow(&mut self, op: Operator, v: f64) -> bool {
        match op {
            Operator::Lt => {
                if v < self.hi || (v == self.hi && !self.hi_open) {
                    self.hi = v;
                    self.hi_open = true;
                }
            }
            Operator::Le => {
                if v < self.hi {
                    self.hi = v;
                    self.hi_open = false;
                }
            }
            Operator::Gt => {
                if v > self.lo || (v == self.lo && !self.lo_open) {
                    self.lo = v;
                    self.lo_open = true;
                }
            }
            Operator::Ge => {
                if v > self.lo {
                    self.lo = v;
                    self.lo_open = false;
                }
            }
            Operator::Eq => {
                let feasible = self.contains(v);
                self.lo = v;
                self.hi = v;
                self.lo_open = !feasible;
                self.hi_open = !feasible;
                self.excluded.clear();
            }
            Operator::Ne => {
                if self.contains(v) {
                    if v == self.lo && !self.lo_open {
                        self.lo_open = true;
                    } else if v == self.hi && !self.hi_open {
                        self.hi_open = true;
                    } else {
                        let at = self.excluded.partition_point(|&x| x < v);
                        self.excluded.insert(at, v);
                    }
                }
            }
        }
        self.prune_exclusions();
        !self.is_empty()
    }

    /// Restore the exclusion invariants after a bound moved: drop points the
    /// bounds already rule out, fold points sitting on a closed endpoint
    /// into the endpoint's openness.
    fn prune_exclusions(&mut self) {
        let mut i = 0;
        while i < self.excluded.len() {
            let v = self.excluded[i];
            if v == self.lo && !self.lo_open {
                self.lo_open = true;
                self.excluded.remove(i);
            } else if v == self.hi && !self.hi_open {
                self.hi_open = true;
                self.excluded.remove(i);
            } else if v <= self.lo || v >= self.hi {
                self.excluded.remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Minimal conditions for this region: a single equality for a point, a
    /// bound per finite side otherwise, then one `!=` per excluded point in
    /// ascending order. Universal regions render to nothing.
    pub fn render(&self, variable: &str) -> Vec<Condition> {
        let mut out = Vec::new();
        if let Some(v) = self.as_point() {
            out.push(Condition::new(variable, Operator::Eq, Operand::Number(v)));
            return out;
        }
        if self.lo.is_finite() {
            let op = if self.lo_open {
                Operator::Gt
            } else {
                Operator::Ge
            };
            out.push(Condition::new(variable, op, Operand::Number(self.lo)));
        }
        if self.hi.is_finite() {
            let op = if self.hi_open {
                Operator::Lt
            } else {
                Operator::Le
            };
            out.push(Condition::new(variable, op, Operand::Number(self.hi)));
        }
        for &v in &self.excluded {
            out.push(Condition::new(variable, Operator::Ne, Operand::Number(v)));
        }
        out
    }
}

// ============================================================================
// CATEGORICAL REGIONS
// ============================================================================

/// Value set of an unordered variable.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoricalRegion {
    /// Pinned to exactly one value by an equality on the path
    Exactly(String),

    /// Everything except a finite exclusion set (empty set = universal)
    Excluding(Vec<String>),
}

impl CategoricalRegion {
    /// All values allowed.
    pub fn universal() -> Self {
        CategoricalRegion::Excluding(Vec::new())
    }

    pub fn is_universal(&self) -> bool {
        matches!(self, CategoricalRegion::Excluding(set) if set.is_empty())
    }

    /// Intersect with `= v` (`equal`) or `!= v`. Returns `false` if the
    /// region became empty.
    pub fn narrow(&mut self, equal: bool, v: &str) -> bool {
        match self {
            CategoricalRegion::Exactly(pinned) => {
                if equal {
                    pinned == v
                } else {
                    pinned.as_str() != v
                }
            }
            CategoricalRegion::Excluding(set) => {
                if equal {
                    if set.iter().any(|x| x == v) {
                        return false;
                    }
                    *self = CategoricalRegion::Exactly(v.to_string());
                    true
                } else {
                    if let Err(at) = set.binary_search_by(|x| x.as_str().cmp(v)) {
                        set.insert(at, v.to_string());
                    }
                    true
                }
            }
        }
    }

    /// Minimal conditions: one equality when pinned, otherwise one `!=` per
    /// excluded value in ascending order.
    pub fn render(&self, variable: &str) -> Vec<Condition> {
        match self {
            CategoricalRegion::Exactly(v) => vec![Condition::new(
                variable,
                Operator::Eq,
                Operand::Symbol(v.clone()),
            )],
            CategoricalRegion::Excluding(set) => set
                .iter()
                .map(|v| Condition::new(variable, Operator::Ne, Operand::Symbol(v.clone())))
                .collect(),
        }
    }
}
