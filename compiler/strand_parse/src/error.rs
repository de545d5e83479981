//! Parse failures.
//!
//! Two layers:
//! - [`Failure`]: internal, built on the hot path when a match fails and
//!   passed around by value. The rule stack grows innermost-first while the
//!   failure unwinds through rule references, so nothing is copied when a
//!   mismatch is created.
//! - [`ParseError`]: the public form returned from `parse`, rule stack
//!   ordered outermost-first.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use strand_ir::{ErrorKind, Expr, Name};
use thiserror::Error;

/// What the matcher wanted at the failure position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expected {
    /// Exact text.
    Literal(Arc<str>),
    /// Any character (input was exhausted).
    AnyChar,
    /// A character of the class held by this node.
    Class(Expr),
    /// Anything except a match of this expression.
    Not(Expr),
    /// The end of input (unconsumed trailing text).
    EndOfInput,
    /// An alternative of an empty choice: nothing can match.
    Nothing,
    /// Evaluation stayed within this depth.
    DepthLimit(usize),
}

impl Expected {
    /// Shorthand for [`Expected::Literal`].
    pub fn literal(text: &str) -> Self {
        Expected::Literal(Arc::from(text))
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Literal(text) => write!(f, "'{}'", text.escape_debug()),
            Expected::AnyChar => f.write_str("any character"),
            Expected::Class(class) => write!(f, "{class}"),
            Expected::Not(inner) => write!(f, "not {inner}"),
            Expected::EndOfInput => f.write_str("end of input"),
            Expected::Nothing => f.write_str("nothing (empty choice)"),
            Expected::DepthLimit(limit) => write!(f, "at most {limit} nested evaluations"),
        }
    }
}

/// Internal failure record.
#[derive(Clone, Debug)]
pub(crate) struct Failure {
    pub(crate) kind: ErrorKind,
    pub(crate) position: usize,
    pub(crate) expected: Expected,
    /// Innermost rule first.
    pub(crate) rules: SmallVec<[Name; 4]>,
}

impl Failure {
    #[cold]
    pub(crate) fn mismatch(position: usize, expected: Expected) -> Box<Self> {
        Box::new(Failure {
            kind: ErrorKind::Mismatch,
            position,
            expected,
            rules: SmallVec::new(),
        })
    }

    #[cold]
    pub(crate) fn depth_exceeded(position: usize, limit: usize) -> Box<Self> {
        Box::new(Failure {
            kind: ErrorKind::DepthExceeded,
            position,
            expected: Expected::DepthLimit(limit),
            rules: SmallVec::new(),
        })
    }

    #[cold]
    pub(crate) fn unresolved(position: usize) -> Box<Self> {
        Box::new(Failure {
            kind: ErrorKind::UnresolvedRule,
            position,
            expected: Expected::Nothing,
            rules: SmallVec::new(),
        })
    }

    /// Record that the failure unwound out of rule `name`.
    pub(crate) fn leave_rule(&mut self, name: &Name) {
        self.rules.push(name.clone());
    }

    pub(crate) fn into_error(self) -> ParseError {
        let mut rule_stack: Vec<Name> = self.rules.into_vec();
        rule_stack.reverse();
        ParseError {
            kind: self.kind,
            position: self.position,
            expected: self.expected,
            rule_stack,
        }
    }
}

/// A failed parse.
///
/// Always reports the furthest position reached and what was expected
/// there, e.g. `expected 'bob' at offset 4 (in greeting > name)`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{} at offset {position}{}", headline(.kind, .expected), RuleTrail(.rule_stack))]
pub struct ParseError {
    /// `Mismatch` or `DepthExceeded`.
    pub kind: ErrorKind,
    /// Byte offset of the failure.
    pub position: usize,
    pub expected: Expected,
    /// Rules active at the failure, outermost first.
    pub rule_stack: Vec<Name>,
}

impl ParseError {
    /// The taxonomy entry for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 1-based line and column (in characters) of the failure in `input`.
    pub fn line_col(&self, input: &str) -> (usize, usize) {
        let before = input.get(..self.position).unwrap_or(input);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let col = before[line_start..].chars().count() + 1;
        (line, col)
    }
}

fn headline(kind: &ErrorKind, expected: &Expected) -> String {
    match kind {
        ErrorKind::DepthExceeded => format!("depth limit exceeded, expected {expected}"),
        _ => format!("expected {expected}"),
    }
}

struct RuleTrail<'a>(&'a [Name]);

impl fmt::Display for RuleTrail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        f.write_str(" (in ")?;
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{name}")?;
        }
        f.write_str(")")
    }
}
