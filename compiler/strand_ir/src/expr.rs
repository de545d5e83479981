//! Grammar expression tree.
//!
//! An [`Expr`] is an immutable, reference-counted node. Every combinator
//! returns a new node and leaves its operands untouched, so subtrees can be
//! shared freely between rules and between grammars.
//!
//! Two construction styles produce identical trees:
//!
//! ```text
//! // free functions
//! sequence([capture(literal("test"), "nigel"), capture(literal("bob"), "fred")])
//!
//! // fluent
//! literal("test").capture("nigel").then(literal("bob").capture("fred"))
//! ```

use std::fmt;
use std::sync::Arc;

use crate::class::CharClass;
use crate::name::Name;

/// Repetition bounds: `min` occurrences required, at most `max` attempted.
///
/// `max == None` is unbounded. `min > max` is representable here and
/// rejected at grammar build time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RepeatBounds {
    pub min: usize,
    pub max: Option<usize>,
}

impl RepeatBounds {
    /// Create bounds.
    pub const fn new(min: usize, max: Option<usize>) -> Self {
        RepeatBounds { min, max }
    }

    /// `min <= max`, or `max` unbounded.
    pub fn is_valid(self) -> bool {
        self.max.map_or(true, |max| self.min <= max)
    }

    /// Whether `count` matches may still be extended by another attempt.
    #[inline]
    pub fn allows_more(self, count: usize) -> bool {
        self.max.map_or(true, |max| count < max)
    }
}

impl fmt::Display for RepeatBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (0, None) => f.write_str("*"),
            (1, None) => f.write_str("+"),
            (0, Some(1)) => f.write_str("?"),
            (min, None) => write!(f, "{{{min},}}"),
            (min, Some(max)) if min == max => write!(f, "{{{min}}}"),
            (min, Some(max)) => write!(f, "{{{min},{max}}}"),
        }
    }
}

/// One expression kind per combinator.
///
/// The set is closed: the matcher handles every variant exhaustively.
#[derive(Debug, PartialEq, Eq)]
pub enum ExprKind {
    /// Exact text.
    Literal(Arc<str>),
    /// Any single character.
    Any,
    /// One character from a class.
    Class(CharClass),
    /// All children, consecutively.
    Sequence(Vec<Expr>),
    /// First alternative that matches.
    Choice(Vec<Expr>),
    /// Greedy repetition.
    Repeat { inner: Expr, bounds: RepeatBounds },
    /// Labels the inner match for the result tree.
    Capture { inner: Expr, label: Name },
    /// Zero-width predicate: `&inner` or, negated, `!inner`.
    Lookahead { inner: Expr, negated: bool },
    /// Reference to a named rule of the enclosing grammar.
    RuleRef(Name),
}

/// Node identity: equal for handles that share one allocation.
pub(crate) type NodeKey = *const ExprKind;

/// A node of the grammar expression tree.
#[derive(Clone, PartialEq, Eq)]
pub struct Expr(Arc<ExprKind>);

impl Expr {
    /// Wrap a kind in a new node.
    pub fn new(kind: ExprKind) -> Self {
        Expr(Arc::new(kind))
    }

    /// The node's kind.
    #[inline]
    pub fn kind(&self) -> &ExprKind {
        &self.0
    }

    /// Whether two handles share the same node.
    pub fn ptr_eq(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Identity of the shared node, for per-node caches during analysis.
    #[inline]
    pub(crate) fn node_key(&self) -> NodeKey {
        Arc::as_ptr(&self.0)
    }

    /// Sequence `self` then `next`.
    ///
    /// Appends to an existing sequence rather than nesting, so
    /// `a.then(b).then(c)` is one three-child sequence.
    #[must_use]
    pub fn then(&self, next: impl Into<Expr>) -> Expr {
        let next = next.into();
        let mut children = match self.kind() {
            ExprKind::Sequence(children) => children.clone(),
            _ => vec![self.clone()],
        };
        children.push(next);
        Expr::new(ExprKind::Sequence(children))
    }

    /// Ordered choice: `self`, or else `alternative`.
    ///
    /// Flattens like [`Expr::then`].
    #[must_use]
    pub fn or(&self, alternative: impl Into<Expr>) -> Expr {
        let alternative = alternative.into();
        let mut alternatives = match self.kind() {
            ExprKind::Choice(alternatives) => alternatives.clone(),
            _ => vec![self.clone()],
        };
        alternatives.push(alternative);
        Expr::new(ExprKind::Choice(alternatives))
    }

    /// Repeat between `min` and `max` times (`None` = unbounded).
    #[must_use]
    pub fn repeat(&self, min: usize, max: Option<usize>) -> Expr {
        repeat(self.clone(), min, max)
    }

    /// Zero or one occurrence.
    #[must_use]
    pub fn maybe(&self) -> Expr {
        self.repeat(0, Some(1))
    }

    /// Label the match.
    #[must_use]
    pub fn capture(&self, label: impl Into<Name>) -> Expr {
        capture(self.clone(), label)
    }

    /// Succeed without consuming if `self` matches here.
    #[must_use]
    pub fn present(&self) -> Expr {
        Expr::new(ExprKind::Lookahead {
            inner: self.clone(),
            negated: false,
        })
    }

    /// Succeed without consuming if `self` does not match here.
    #[must_use]
    pub fn absent(&self) -> Expr {
        Expr::new(ExprKind::Lookahead {
            inner: self.clone(),
            negated: true,
        })
    }
}

impl From<&str> for Expr {
    fn from(text: &str) -> Self {
        literal(text)
    }
}

impl From<&Expr> for Expr {
    fn from(expr: &Expr) -> Self {
        expr.clone()
    }
}

impl From<CharClass> for Expr {
    fn from(class: CharClass) -> Self {
        Expr::new(ExprKind::Class(class))
    }
}

// === Combinators ===

/// Match `text` exactly.
pub fn literal(text: &str) -> Expr {
    Expr::new(ExprKind::Literal(Arc::from(text)))
}

/// Match any one character.
pub fn any() -> Expr {
    Expr::new(ExprKind::Any)
}

/// Match one character of `class`.
pub fn class(class: CharClass) -> Expr {
    Expr::from(class)
}

/// Match every child in order.
pub fn sequence<I>(children: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Expr::new(ExprKind::Sequence(
        children.into_iter().map(Into::into).collect(),
    ))
}

/// Match the first alternative that succeeds.
pub fn choice<I>(alternatives: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    Expr::new(ExprKind::Choice(
        alternatives.into_iter().map(Into::into).collect(),
    ))
}

/// Match `inner` greedily between `min` and `max` times.
pub fn repeat(inner: impl Into<Expr>, min: usize, max: Option<usize>) -> Expr {
    Expr::new(ExprKind::Repeat {
        inner: inner.into(),
        bounds: RepeatBounds::new(min, max),
    })
}

/// Label the match of `inner`.
pub fn capture(inner: impl Into<Expr>, label: impl Into<Name>) -> Expr {
    Expr::new(ExprKind::Capture {
        inner: inner.into(),
        label: label.into(),
    })
}

/// Refer to the rule `name`, resolved through the enclosing grammar.
pub fn rule_ref(name: impl Into<Name>) -> Expr {
    Expr::new(ExprKind::RuleRef(name.into()))
}

// === Display ===

fn write_literal(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in text.chars() {
        match c {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            _ => write!(f, "{c}")?,
        }
    }
    f.write_str("'")
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Expr], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(")")
}

/// PEG-style rendering: `'a'`, `(x y)`, `(x / y)`, `x{2,}`, `name:x`, `!x`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ExprKind::Literal(text) => write_literal(f, text),
            ExprKind::Any => f.write_str("."),
            ExprKind::Class(class) => write!(f, "{class}"),
            ExprKind::Sequence(children) => write_joined(f, children, " "),
            ExprKind::Choice(alternatives) => write_joined(f, alternatives, " / "),
            ExprKind::Repeat { inner, bounds } => write!(f, "{inner}{bounds}"),
            ExprKind::Capture { inner, label } => write!(f, "{label}:{inner}"),
            ExprKind::Lookahead { inner, negated } => {
                write!(f, "{}{inner}", if *negated { "!" } else { "&" })
            }
            ExprKind::RuleRef(name) => write!(f, "{name}"),
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({self})")
    }
}
