//! Strand IR - grammar expression trees
//!
//! This crate contains the grammar side of the strand parser engine:
//! - [`Expr`] / [`ExprKind`]: immutable, shareable expression nodes
//! - combinators: [`literal`], [`sequence`], [`choice`], [`repeat`],
//!   [`capture`], [`rule_ref`], plus [`any`] and [`class`]
//! - [`Grammar`]: validated rule table with a designated root
//! - [`GrammarError`] and the shared [`ErrorKind`] taxonomy
//!
//! Grammars are validated once, when built. Nothing here evaluates input;
//! matching lives in `strand_parse`.

mod analysis;
mod class;
mod error;
mod expr;
mod grammar;
mod name;

pub use class::CharClass;
pub use error::{ErrorKind, GrammarError, RuleCycle};
pub use expr::{
    any, capture, choice, class, literal, repeat, rule_ref, sequence, Expr, ExprKind,
    RepeatBounds,
};
pub use grammar::{grammar, rule, Grammar, Rule, RuleId};
pub use name::Name;

#[cfg(test)]
mod tests;
