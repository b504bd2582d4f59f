//! Atomic conditions
//!
//! A condition is a single comparison `VAR OP VALUE` carried by a branch
//! node. Conditions are immutable once parsed. The operand is either a
//! finite number (ordered) or a bare symbol (categorical, unordered).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator of an atomic condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Strictly less than
    #[serde(rename = "<")]
    Lt,

    /// Less than or equal
    #[serde(rename = "<=")]
    Le,

    /// Equal
    #[serde(rename = "=")]
    Eq,

    /// Not equal
    #[serde(rename = "!=")]
    Ne,

    /// Strictly greater than
    #[serde(rename = ">")]
    Gt,

    /// Greater than or equal
    #[serde(rename = ">=")]
    Ge,
}

impl Operator {
    /// Parse an operator token. Returns `None` for anything outside the
    /// fixed six-operator set.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "<" => Some(Operator::Lt),
            "<=" => Some(Operator::Le),
            "=" => Some(Operator::Eq),
            "!=" => Some(Operator::Ne),
            ">" => Some(Operator::Gt),
            ">=" => Some(Operator::Ge),
            _ => None,
        }
    }

    /// Logical negation, used to descend the "no" branch of a condition
    /// node (`x > 10` fails exactly when `x <= 10` holds).
    pub fn negate(self) -> Self {
        match self {
            Operator::Lt => Operator::Ge,
            Operator::Le => Operator::Gt,
            Operator::Eq => Operator::Ne,
            Operator::Ne => Operator::Eq,
            Operator::Gt => Operator::Le,
            Operator::Ge => Operator::Lt,
        }
    }

    /// True for the four operators that only make sense on an ordered
    /// (numeric) operand.
    pub fn is_ordered(self) -> bool {
        matches!(
            self,
            Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge
        )
    }

    /// Textual form as it appears in the input format.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operand.
///
/// Numeric operands give the variable an ordered (interval) domain;
/// symbol operands give it a categorical (value-set) domain. A variable
/// must use one kind consistently; the parser enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    /// Finite numeric literal
    Number(f64),

    /// Bare identifier-like token (categorical value)
    Symbol(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Number(n) => write!(f, "{}", n),
            Operand::Symbol(s) => f.write_str(s),
        }
    }
}

/// One atomic condition: `variable OP operand`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Variable name
    pub variable: String,

    /// Comparison operator
    pub op: Operator,

    /// Comparison operand
    pub operand: Operand,
}

impl Condition {
    /// Create a condition.
    pub fn new(variable: impl Into<String>, op: Operator, operand: Operand) -> Self {
        Self {
            variable: variable.into(),
            op,
            operand,
        }
    }

    /// The condition that holds exactly when this one does not.
    pub fn negated(&self) -> Condition {
        Condition {
            variable: self.variable.clone(),
            op: self.op.negate(),
            operand: self.operand.clone(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.variable, self.op, self.operand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_parse_full_set() {
        assert_eq!(Operator::parse("<"), Some(Operator::Lt));
        assert_eq!(Operator::parse("<="), Some(Operator::Le));
        assert_eq!(Operator::parse("="), Some(Operator::Eq));
        assert_eq!(Operator::parse("!="), Some(Operator::Ne));
        assert_eq!(Operator::parse(">"), Some(Operator::Gt));
        assert_eq!(Operator::parse(">="), Some(Operator::Ge));
        assert_eq!(Operator::parse("=="), None);
        assert_eq!(Operator::parse("!"), None);
        assert_eq!(Operator::parse(""), None);
    }

    #[test]
    fn test_operator_negate_is_involution() {
        for op in [
            Operator::Lt,
            Operator::Le,
            Operator::Eq,
            Operator::Ne,
            Operator::Gt,
            Operator::Ge,
        ] {
            assert_eq!(op.negate().negate(), op);
        }
    }

    #[test]
    fn test_operator_negate_pairs() {
        assert_eq!(Operator::Lt.negate(), Operator::Ge);
        assert_eq!(Operator::Le.negate(), Operator::Gt);
        assert_eq!(Operator::Eq.negate(), Operator::Ne);
    }

    #[test]
    fn test_condition_display() {
        let c = Condition::new("x", Operator::Gt, Operand::Number(10.0));
        assert_eq!(c.to_string(), "x>10");

        let c = Condition::new("browser", Operator::Ne, Operand::Symbol("ie".to_string()));
        assert_eq!(c.to_string(), "browser!=ie");
    }

    #[test]
    fn test_condition_negated() {
        let c = Condition::new("x", Operator::Gt, Operand::Number(10.0));
        let n = c.negated();
        assert_eq!(n.variable, "x");
        assert_eq!(n.op, Operator::Le);
        assert_eq!(n.operand, Operand::Number(10.0));
        // original untouched
        assert_eq!(c.op, Operator::Gt);
    }
}
