//! Rule tables.
//!
//! A [`Grammar`] maps rule names to expression bodies and designates a root.
//! Building one validates the whole table eagerly:
//!
//! 1. at least one rule, no duplicate names, root exists
//! 2. per rule, in declaration order: every `RuleRef` resolves, every
//!    repetition has `min <= max`, every character range has `lo <= hi`
//! 3. no rule reaches itself without consuming input
//!
//! The first problem found is returned. A grammar that builds is immutable
//! and safe to share between threads.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use strand_stack::ensure_sufficient_stack;
use tracing::debug;

use crate::analysis;
use crate::error::GrammarError;
use crate::expr::{Expr, ExprKind, NodeKey};
use crate::name::Name;

/// Index of a rule within its grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(u32);

impl RuleId {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "rule tables never approach u32::MAX entries"
    )]
    pub(crate) fn from_index(index: usize) -> Self {
        RuleId(index as u32)
    }

    /// Position in the grammar's rule table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named rule body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub name: Name,
    pub body: Expr,
}

/// Define a rule.
pub fn rule(name: impl Into<Name>, body: impl Into<Expr>) -> Rule {
    Rule {
        name: name.into(),
        body: body.into(),
    }
}

/// Build a grammar from `rules`, rooted at `root`.
pub fn grammar(
    rules: impl IntoIterator<Item = Rule>,
    root: impl Into<Name>,
) -> Result<Grammar, GrammarError> {
    Grammar::new(rules, root)
}

/// A validated, immutable rule table.
#[derive(Clone)]
pub struct Grammar {
    rules: Vec<Rule>,
    index: FxHashMap<Name, RuleId>,
    root: RuleId,
}

impl Grammar {
    /// Name given to the only rule of [`Grammar::single`].
    pub const SINGLE_ROOT: &'static str = "root";

    /// Validate `rules` and build the grammar.
    pub fn new(
        rules: impl IntoIterator<Item = Rule>,
        root: impl Into<Name>,
    ) -> Result<Self, GrammarError> {
        let rules: Vec<Rule> = rules.into_iter().collect();
        let root = root.into();

        if rules.is_empty() {
            return Err(GrammarError::EmptyGrammar);
        }

        let mut index = FxHashMap::default();
        index.reserve(rules.len());
        for (i, rule) in rules.iter().enumerate() {
            if index.insert(rule.name.clone(), RuleId::from_index(i)).is_some() {
                return Err(GrammarError::DuplicateRule {
                    name: rule.name.clone(),
                });
            }
        }

        let Some(&root_id) = index.get(root.as_str()) else {
            return Err(GrammarError::UnknownRoot { name: root });
        };

        let grammar = Grammar {
            rules,
            index,
            root: root_id,
        };

        // Subtrees may be shared between and within rules; each node is
        // checked once, attributed to the first rule that reaches it.
        let mut checked = FxHashSet::default();
        for rule in &grammar.rules {
            grammar.check_expr(&rule.name, &rule.body, &mut checked)?;
        }
        analysis::check_left_recursion(&grammar)?;

        debug!(
            rules = grammar.rules.len(),
            root = %grammar.root_rule().name,
            "grammar built"
        );
        Ok(grammar)
    }

    /// A one-rule grammar whose root is `body`.
    pub fn single(body: impl Into<Expr>) -> Result<Self, GrammarError> {
        Grammar::new([rule(Self::SINGLE_ROOT, body)], Self::SINGLE_ROOT)
    }

    fn check_expr(
        &self,
        rule: &Name,
        expr: &Expr,
        checked: &mut FxHashSet<NodeKey>,
    ) -> Result<(), GrammarError> {
        if !checked.insert(expr.node_key()) {
            return Ok(());
        }
        ensure_sufficient_stack(|| match expr.kind() {
            ExprKind::Literal(_) | ExprKind::Any => Ok(()),
            ExprKind::Class(class) => match class.inverted_range() {
                Some((lo, hi)) => Err(GrammarError::InvalidCharRange {
                    rule: rule.clone(),
                    lo,
                    hi,
                }),
                None => Ok(()),
            },
            ExprKind::Sequence(children) | ExprKind::Choice(children) => children
                .iter()
                .try_for_each(|child| self.check_expr(rule, child, checked)),
            ExprKind::Repeat { inner, bounds } => {
                if let Some(max) = bounds.max {
                    if bounds.min > max {
                        return Err(GrammarError::InvalidRepeatBounds {
                            rule: rule.clone(),
                            min: bounds.min,
                            max,
                        });
                    }
                }
                self.check_expr(rule, inner, checked)
            }
            ExprKind::Capture { inner, .. } | ExprKind::Lookahead { inner, .. } => {
                self.check_expr(rule, inner, checked)
            }
            ExprKind::RuleRef(name) => {
                if self.index.contains_key(name.as_str()) {
                    Ok(())
                } else {
                    Err(GrammarError::UnresolvedRule {
                        name: name.clone(),
                        referenced_from: rule.clone(),
                    })
                }
            }
        })
    }

    // === Inspection ===

    /// The root rule's id.
    #[inline]
    pub fn root(&self) -> RuleId {
        self.root
    }

    /// The root rule.
    pub fn root_rule(&self) -> &Rule {
        self.rule(self.root)
    }

    /// The rule with id `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from a different grammar with more rules.
    #[inline]
    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    /// Look up a rule by name.
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<RuleId> {
        self.index.get(name).copied()
    }

    /// All rules, in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, rule)| (RuleId::from_index(i), rule))
    }

    /// Rule names, in declaration order.
    pub fn rule_names(&self) -> impl Iterator<Item = &Name> {
        self.rules.iter().map(|rule| &rule.name)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the grammar has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = &self.root_rule().name;
        f.debug_map()
            .entries(
                self.rules.iter().map(|rule| (&rule.name, &rule.body)),
            )
            .finish()?;
        write!(f, " root={root}")
    }
}

#[cfg(test)]
mod tests;
