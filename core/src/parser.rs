//! Streaming line parser
//!
//! Converts the flat node format into Node Store entries in a single
//! forward pass. Exactly two line shapes are accepted:
//!
//! ```text
//! ID:[VAR OP VALUE] yes=ID,no=ID
//! ID:leaf=VALUE
//! ```
//!
//! Lines are tokenized by their fixed punctuation (`:`, `[`, `]`, `=`, `,`)
//! rather than a general expression grammar — conditions are always atomic.
//! Anything else fails with an error carrying the 1-based line number and
//! the offending content. Child references are stored opaquely and resolved
//! lazily at traversal time, so forward references are free.
//!
//! The parser also keeps a per-variable operand-kind registry: a variable
//! compared against a number on one line and a symbol on another is a hard
//! error here rather than a coercion guess downstream. Ordered operators
//! (`<`, `<=`, `>`, `>=`) require a numeric operand for the same reason.

use crate::model::{Condition, Node, NodeId, Operand, Operator};
use crate::store::NodeStore;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::{self, BufRead};
use thiserror::Error;

/// Errors raised while parsing the input stream.
///
/// All variants are fatal: no partial tree is usable after a parse failure.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: malformed node line '{content}'")]
    MalformedLine { line: usize, content: String },

    #[error("line {line}: operator '{op}' is not one of < <= = != > >=")]
    UnknownOperator { line: usize, op: String },

    #[error("line {line}: duplicate node identifier '{id}'")]
    DuplicateIdentifier { line: usize, id: String },

    #[error("line {line}: numeric operand '{value}' is not finite")]
    NonFiniteNumber { line: usize, value: String },

    #[error("line {line}: ordered comparison on categorical value for variable '{variable}'")]
    OrderedCategorical { line: usize, variable: String },

    #[error("line {line}: variable '{variable}' mixes numeric and categorical operands")]
    MixedOperandKinds { line: usize, variable: String },

    #[error("failed to read input")]
    Io(#[from] io::Error),
}

/// Operand kind a variable has committed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperandKind {
    Numeric,
    Categorical,
}

/// Parse a line source into a populated [`NodeStore`].
///
/// Single forward pass; blank (or whitespace-only) lines are skipped.
/// Node order in the file is irrelevant — children may be defined after
/// their parents.
///
/// # Example
///
/// ```
/// use tree_flattener_core::parser::parse;
///
/// let input = "0:[x>10] yes=1,no=2\n1:leaf=A\n2:leaf=B\n";
/// let store = parse(input.as_bytes()).unwrap();
/// assert_eq!(store.len(), 3);
/// ```
pub fn parse<R: BufRead>(reader: R) -> Result<NodeStore, ParseError> {
    let mut store = NodeStore::new();
    let mut kinds: HashMap<String, OperandKind> = HashMap::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let line_no = index + 1;
        let (id, node) = parse_line(line_no, text, &mut kinds)?;
        if !store.insert(id.clone(), node) {
            return Err(ParseError::DuplicateIdentifier { line: line_no, id });
        }
    }

    Ok(store)
}

fn malformed(line: usize, content: &str) -> ParseError {
    ParseError::MalformedLine {
        line,
        content: content.to_string(),
    }
}

/// True for the bare tokens accepted as identifiers and categorical values.
fn is_bare_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-')
}

/// Parse one non-blank line into an id and its node.
fn parse_line(
    line_no: usize,
    text: &str,
    kinds: &mut HashMap<String, OperandKind>,
) -> Result<(NodeId, Node), ParseError> {
    let (id, rest) = text.split_once(':').ok_or_else(|| malformed(line_no, text))?;
    let id = id.trim();
    if !is_bare_token(id) {
        return Err(malformed(line_no, text));
    }

    // Leaf line: ID:leaf=VALUE
    if let Some(value) = rest.strip_prefix("leaf=") {
        let value = value.trim();
        if value.is_empty() {
            return Err(malformed(line_no, text));
        }
        return Ok((
            id.to_string(),
            Node::Leaf {
                value: value.to_string(),
            },
        ));
    }

    // Condition line: ID:[VAR OP VALUE] yes=ID,no=ID
    let rest = rest
        .trim_start()
        .strip_prefix('[')
        .ok_or_else(|| malformed(line_no, text))?;
    let (condition_text, tail) = rest
        .split_once(']')
        .ok_or_else(|| malformed(line_no, text))?;
    let condition = parse_condition(line_no, text, condition_text, kinds)?;

    let tail = tail
        .trim()
        .strip_prefix("yes=")
        .ok_or_else(|| malformed(line_no, text))?;
    let (yes, no) = tail
        .split_once(',')
        .ok_or_else(|| malformed(line_no, text))?;
    let no = no
        .trim()
        .strip_prefix("no=")
        .ok_or_else(|| malformed(line_no, text))?;
    let yes = yes.trim();
    let no = no.trim();
    if !is_bare_token(yes) || !is_bare_token(no) {
        return Err(malformed(line_no, text));
    }

    Ok((
        id.to_string(),
        Node::Branch {
            condition,
            yes: yes.to_string(),
            no: no.to_string(),
        },
    ))
}

/// Parse the `VAR OP VALUE` body of a condition line.
fn parse_condition(
    line_no: usize,
    full_line: &str,
    text: &str,
    kinds: &mut HashMap<String, OperandKind>,
) -> Result<Condition, ParseError> {
    let text = text.trim();
    let start = text
        .find(|c| matches!(c, '<' | '>' | '!' | '='))
        .ok_or_else(|| malformed(line_no, full_line))?;
    let op_len = if text[start + 1..].starts_with('=') { 2 } else { 1 };
    let op_token = &text[start..start + op_len];
    let op = Operator::parse(op_token).ok_or_else(|| ParseError::UnknownOperator {
        line: line_no,
        op: op_token.to_string(),
    })?;

    let variable = text[..start].trim();
    let value = text[start + op_len..].trim();
    if !is_bare_token(variable) || value.is_empty() {
        return Err(malformed(line_no, full_line));
    }

    let operand = match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Operand::Number(n),
        Ok(_) => {
            return Err(ParseError::NonFiniteNumber {
                line: line_no,
                value: value.to_string(),
            })
        }
        Err(_) => {
            if !is_bare_token(value) {
                return Err(malformed(line_no, full_line));
            }
            Operand::Symbol(value.to_string())
        }
    };

    let kind = match operand {
        Operand::Number(_) => OperandKind::Numeric,
        Operand::Symbol(_) => OperandKind::Categorical,
    };
    if op.is_ordered() && kind == OperandKind::Categorical {
        return Err(ParseError::OrderedCategorical {
            line: line_no,
            variable: variable.to_string(),
        });
    }
    match kinds.entry(variable.to_string()) {
        Entry::Occupied(seen) if *seen.get() != kind => {
            return Err(ParseError::MixedOperandKinds {
                line: line_no,
                variable: variable.to_string(),
            });
        }
        Entry::Occupied(_) => {}
        Entry::Vacant(slot) => {
            slot.insert(kind);
        }
    }

    Ok(Condition::new(variable, op, operand))
}
