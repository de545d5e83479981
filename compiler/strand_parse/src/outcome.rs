//! Three-way evaluation outcome.
//!
//! | Variant | Meaning | Choice / repeat |
//! |---------|---------|-----------------|
//! | `Matched` | succeeded, cursor now at `end` | done |
//! | `Mismatch` | soft failure | try the next alternative / stop repeating |
//! | `Aborted` | hard failure | propagate immediately |
//!
//! Mismatches are ordinary return values, so backtracking costs one
//! branch. Only resource limits abort: retrying an alternative after the
//! depth limit tripped would just trip it again.

use crate::error::Failure;
use crate::result::ResultNode;

#[derive(Clone, Debug)]
pub(crate) enum Outcome<'src> {
    Matched {
        node: ResultNode<'src>,
        end: usize,
    },
    Mismatch(Box<Failure>),
    Aborted(Box<Failure>),
}

impl<'src> Outcome<'src> {
    #[inline]
    pub(crate) fn matched(node: ResultNode<'src>, end: usize) -> Self {
        Outcome::Matched { node, end }
    }

    /// Transform the node of a match, leaving failures untouched.
    #[inline]
    pub(crate) fn map_node<F>(self, f: F) -> Self
    where
        F: FnOnce(ResultNode<'src>) -> ResultNode<'src>,
    {
        match self {
            Outcome::Matched { node, end } => Outcome::Matched { node: f(node), end },
            failure => failure,
        }
    }

    /// Apply `f` to the failure record of either failure variant.
    #[inline]
    pub(crate) fn with_failure<F: FnOnce(&mut Failure)>(mut self, f: F) -> Self {
        match &mut self {
            Outcome::Mismatch(failure) | Outcome::Aborted(failure) => f(failure),
            Outcome::Matched { .. } => {}
        }
        self
    }
}
