//! Strand parser engine.
//!
//! Evaluates a [`Grammar`] against an in-memory string by recursive descent
//! with ordered choice and backtracking, and assembles captures into a
//! [`ResultNode`] tree borrowing from the input.
//!
//! ```text
//! use strand_parse::{literal, parse, Grammar};
//!
//! let g = Grammar::single(literal("a").capture("nigel").repeat(2, None))?;
//! let parsed = parse(&g, "aa")?;
//! assert_eq!(parsed.value.to_string(), r#"[{nigel: "a"@0}, {nigel: "a"@1}]"#);
//! ```
//!
//! A grammar is immutable once built and every call owns its own state, so
//! one grammar can serve any number of concurrent parses.
//!
//! # Debugging
//!
//! - `RUST_LOG=strand_parse=debug`: one span per parse, memo statistics
//! - `RUST_LOG=strand_parse=trace`: every rule entry and exit (very verbose)
//!
//! Call [`init_tracing`] to install a subscriber honouring `RUST_LOG`.

mod build;
mod error;
mod matcher;
mod memo;
mod options;
mod outcome;
mod result;

use std::sync::Once;

pub use error::{Expected, ParseError};
pub use options::ParseOptions;
pub use result::{Captures, Field, ResultNode, Slice};

// Grammar construction surface, so callers depend on one crate.
pub use strand_ir::{
    any, capture, choice, class, grammar, literal, repeat, rule, rule_ref, sequence, CharClass,
    ErrorKind, Expr, ExprKind, Grammar, GrammarError, Name, RepeatBounds, Rule, RuleId,
};

use error::Failure;
use matcher::Matcher;
use outcome::Outcome;

/// A successful parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parsed<'src> {
    /// The assembled result tree.
    pub value: ResultNode<'src>,
    /// Byte offset where the match ended. Equals the input length unless
    /// the parse was partial.
    pub end: usize,
}

/// Outcome of [`parse`] and [`parse_with`].
pub type ParseResult<'src> = Result<Parsed<'src>, ParseError>;

/// Parse all of `input` with `grammar`'s root rule.
pub fn parse<'src>(grammar: &Grammar, input: &'src str) -> ParseResult<'src> {
    parse_with(grammar, input, &ParseOptions::default())
}

/// Parse `input` with explicit options.
///
/// Unless `options.partial` is set, a match that stops before the end of
/// input fails at the match's end with [`Expected::EndOfInput`].
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(root = %grammar.root_rule().name, len = input.len())
)]
pub fn parse_with<'src>(
    grammar: &Grammar,
    input: &'src str,
    options: &ParseOptions,
) -> ParseResult<'src> {
    match Matcher::new(grammar, input, *options).run() {
        Outcome::Matched { end, .. } if end < input.len() && !options.partial => {
            tracing::debug!(end, "trailing input");
            Err(Failure::mismatch(end, Expected::EndOfInput).into_error())
        }
        Outcome::Matched { node, end } => Ok(Parsed { value: node, end }),
        Outcome::Mismatch(failure) | Outcome::Aborted(failure) => Err(failure.into_error()),
    }
}

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // Another subscriber may already be installed by the host.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
