//! Error taxonomy and grammar build errors.

use std::fmt;

use thiserror::Error;

use crate::name::Name;

/// Every way a grammar build or a parse can fail.
///
/// Shared by [`GrammarError`] and the parser's failure type so callers can
/// match on one enum regardless of where the error was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // === Parse time ===
    /// Ordinary mismatch. Recoverable by backtracking; only reported when no
    /// alternative consumed it.
    Mismatch,
    /// The configured evaluation-depth limit was exceeded.
    DepthExceeded,

    // === Build time ===
    /// A rule reference names no rule of the grammar.
    UnresolvedRule,
    /// A repetition has `min > max`.
    InvalidRepeatBounds,
    /// A character class has a range with `lo > hi`.
    InvalidCharRange,
    /// Two rules share a name.
    DuplicateRule,
    /// The designated root rule does not exist.
    UnknownRoot,
    /// The grammar has no rules.
    EmptyGrammar,
    /// A rule can reach itself without consuming input.
    LeftRecursion,
}

impl ErrorKind {
    /// Whether this kind is detected while building a grammar.
    pub fn is_build_time(self) -> bool {
        !matches!(self, ErrorKind::Mismatch | ErrorKind::DepthExceeded)
    }
}

/// Rule cycle rendered as `a -> b -> a`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleCycle(pub Vec<Name>);

impl fmt::Display for RuleCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{name}")?;
        }
        Ok(())
    }
}

/// A grammar that cannot be built.
///
/// Reported once, by `Grammar::new`, before any parse can run.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("grammar has no rules")]
    EmptyGrammar,

    #[error("rule `{name}` is defined more than once")]
    DuplicateRule { name: Name },

    #[error("root rule `{name}` is not defined")]
    UnknownRoot { name: Name },

    #[error("rule `{referenced_from}` refers to undefined rule `{name}`")]
    UnresolvedRule { name: Name, referenced_from: Name },

    #[error("rule `{rule}` repeats at least {min} but at most {max} times")]
    InvalidRepeatBounds { rule: Name, min: usize, max: usize },

    #[error("rule `{rule}` has character range `{lo:?}-{hi:?}` with start after end")]
    InvalidCharRange { rule: Name, lo: char, hi: char },

    #[error("left-recursive rule cycle: {cycle}")]
    LeftRecursion { cycle: RuleCycle },
}

impl GrammarError {
    /// The taxonomy entry for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GrammarError::EmptyGrammar => ErrorKind::EmptyGrammar,
            GrammarError::DuplicateRule { .. } => ErrorKind::DuplicateRule,
            GrammarError::UnknownRoot { .. } => ErrorKind::UnknownRoot,
            GrammarError::UnresolvedRule { .. } => ErrorKind::UnresolvedRule,
            GrammarError::InvalidRepeatBounds { .. } => ErrorKind::InvalidRepeatBounds,
            GrammarError::InvalidCharRange { .. } => ErrorKind::InvalidCharRange,
            GrammarError::LeftRecursion { .. } => ErrorKind::LeftRecursion,
        }
    }
}
