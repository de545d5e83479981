//! Static grammar analysis: nullability and left recursion.
//!
//! A rule is left-recursive when it can reach a reference to itself without
//! consuming input. Plain backtracking descent never terminates on such a
//! rule, so the grammar is rejected at build time instead.
//!
//! Two passes:
//! - **nullable**: fixed point over rules, `true` if the rule can succeed
//!   while consuming nothing
//! - **left calls**: for each rule, the rules it may invoke at its own start
//!   offset; a cycle in this graph is left recursion

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use strand_stack::ensure_sufficient_stack;

use crate::error::{GrammarError, RuleCycle};
use crate::expr::{Expr, ExprKind, NodeKey};
use crate::grammar::{Grammar, RuleId};

/// Nullability of expressions against a fixed set of per-rule answers.
///
/// Answers are cached per node, so a subtree shared by many parents is
/// analysed once.
struct Nullable<'a> {
    grammar: &'a Grammar,
    rules: &'a [bool],
    cache: FxHashMap<NodeKey, bool>,
}

impl<'a> Nullable<'a> {
    fn new(grammar: &'a Grammar, rules: &'a [bool]) -> Self {
        Nullable {
            grammar,
            rules,
            cache: FxHashMap::default(),
        }
    }

    /// Whether `expr` can succeed without consuming input.
    fn expr(&mut self, expr: &Expr) -> bool {
        if let Some(&known) = self.cache.get(&expr.node_key()) {
            return known;
        }
        let nullable = ensure_sufficient_stack(|| match expr.kind() {
            ExprKind::Literal(text) => text.is_empty(),
            ExprKind::Any | ExprKind::Class(_) => false,
            ExprKind::Sequence(children) => children.iter().all(|c| self.expr(c)),
            ExprKind::Choice(alternatives) => alternatives.iter().any(|a| self.expr(a)),
            ExprKind::Repeat { inner, bounds } => bounds.min == 0 || self.expr(inner),
            ExprKind::Capture { inner, .. } => self.expr(inner),
            ExprKind::Lookahead { .. } => true,
            ExprKind::RuleRef(name) => self
                .grammar
                .lookup(name.as_str())
                .is_some_and(|id| self.rules[id.index()]),
        });
        self.cache.insert(expr.node_key(), nullable);
        nullable
    }
}

/// Per-rule nullability, computed to a fixed point.
///
/// Each pass reads the previous pass's answers, so node caches stay valid
/// for a whole pass.
fn nullable_rules(grammar: &Grammar) -> Vec<bool> {
    let mut rules = vec![false; grammar.len()];
    loop {
        let next: Vec<bool> = {
            let mut pass = Nullable::new(grammar, &rules);
            grammar
                .rules()
                .map(|(id, rule)| rules[id.index()] || pass.expr(&rule.body))
                .collect()
        };
        if next == rules {
            return rules;
        }
        rules = next;
    }
}

/// Collect rules `expr` may invoke before consuming input.
///
/// `seen` holds nodes already walked for the current rule; their calls are
/// in `out` already.
fn left_calls(
    grammar: &Grammar,
    expr: &Expr,
    nullable: &mut Nullable<'_>,
    seen: &mut FxHashSet<NodeKey>,
    out: &mut SmallVec<[RuleId; 4]>,
) {
    if !seen.insert(expr.node_key()) {
        return;
    }
    ensure_sufficient_stack(|| match expr.kind() {
        ExprKind::Literal(_) | ExprKind::Any | ExprKind::Class(_) => {}
        ExprKind::Sequence(children) => {
            for child in children {
                left_calls(grammar, child, nullable, seen, out);
                if !nullable.expr(child) {
                    break;
                }
            }
        }
        ExprKind::Choice(alternatives) => {
            for alternative in alternatives {
                left_calls(grammar, alternative, nullable, seen, out);
            }
        }
        ExprKind::Repeat { inner, bounds } => {
            if bounds.max != Some(0) {
                left_calls(grammar, inner, nullable, seen, out);
            }
        }
        ExprKind::Capture { inner, .. } | ExprKind::Lookahead { inner, .. } => {
            left_calls(grammar, inner, nullable, seen, out);
        }
        ExprKind::RuleRef(name) => {
            if let Some(id) = grammar.lookup(name.as_str()) {
                if !out.contains(&id) {
                    out.push(id);
                }
            }
        }
    });
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Reject the grammar if any rule is left-recursive.
///
/// Rules are visited in declaration order, so the reported cycle starts at
/// the earliest-declared rule that leads into it.
pub(crate) fn check_left_recursion(grammar: &Grammar) -> Result<(), GrammarError> {
    let rules = nullable_rules(grammar);
    let mut nullable = Nullable::new(grammar, &rules);
    let edges: Vec<SmallVec<[RuleId; 4]>> = grammar
        .rules()
        .map(|(_, rule)| {
            let mut seen = FxHashSet::default();
            let mut out = SmallVec::new();
            left_calls(grammar, &rule.body, &mut nullable, &mut seen, &mut out);
            out
        })
        .collect();

    let mut marks = vec![Mark::Unvisited; grammar.len()];
    let mut path = Vec::new();
    for (id, _) in grammar.rules() {
        if marks[id.index()] == Mark::Unvisited {
            if let Some(cycle) = visit(id, &edges, &mut marks, &mut path) {
                let names = cycle
                    .into_iter()
                    .map(|id| grammar.rule(id).name.clone())
                    .collect();
                return Err(GrammarError::LeftRecursion {
                    cycle: RuleCycle(names),
                });
            }
        }
    }
    Ok(())
}

fn visit(
    id: RuleId,
    edges: &[SmallVec<[RuleId; 4]>],
    marks: &mut [Mark],
    path: &mut Vec<RuleId>,
) -> Option<Vec<RuleId>> {
    ensure_sufficient_stack(|| {
        marks[id.index()] = Mark::OnPath;
        path.push(id);
        for &next in &edges[id.index()] {
            match marks[next.index()] {
                Mark::OnPath => {
                    // Cycle: from the first occurrence of `next` on the path.
                    let start = path.iter().position(|&p| p == next).unwrap_or(0);
                    let mut cycle = path[start..].to_vec();
                    cycle.push(next);
                    return Some(cycle);
                }
                Mark::Unvisited => {
                    if let Some(cycle) = visit(next, edges, marks, path) {
                        return Some(cycle);
                    }
                }
                Mark::Done => {}
            }
        }
        path.pop();
        marks[id.index()] = Mark::Done;
        None
    })
}
