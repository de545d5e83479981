//! Recursive-descent, backtracking evaluation of a grammar against input.
//!
//! The cursor is the `at` offset threaded through every call. A child that
//! fails never advances it: the caller still holds its own offset, so
//! backtracking is returning to the caller and nothing needs restoring.
//!
//! Per kind:
//! - **literal / any / class**: compare at `at`, fail at `at`
//! - **sequence**: thread the offset left to right, fail with the first failing child
//! - **choice**: every alternative from `at`; first match wins; if all fail,
//!   the failure that got furthest, earliest alternative on ties
//! - **repeat**: greedy; fewer than `min` matches fails with the last attempt's failure
//! - **capture**: label the inner node; failures pass through
//! - **lookahead**: evaluate, then discard the match
//! - **rule reference**: evaluate the body, adding the rule to the failure's stack

use std::sync::Arc;

use strand_ir::{CharClass, Expr, ExprKind, Grammar, Name, RepeatBounds, RuleId};
use strand_stack::ensure_sufficient_stack;
use tracing::{debug, trace};

use crate::build::{self, SequenceBuilder};
use crate::error::{Expected, Failure};
use crate::memo::MemoTable;
use crate::options::ParseOptions;
use crate::outcome::Outcome;
use crate::result::ResultNode;

/// State of one parse call. Never shared between calls.
pub(crate) struct Matcher<'g, 'src> {
    grammar: &'g Grammar,
    input: &'src str,
    options: ParseOptions,
    depth: usize,
    memo: Option<MemoTable<'src>>,
}

impl<'g, 'src> Matcher<'g, 'src> {
    pub(crate) fn new(grammar: &'g Grammar, input: &'src str, options: ParseOptions) -> Self {
        Matcher {
            grammar,
            input,
            options,
            depth: 0,
            memo: options.memoize.then(MemoTable::default),
        }
    }

    /// Evaluate the root rule from offset 0.
    pub(crate) fn run(mut self) -> Outcome<'src> {
        let outcome = self.call_rule(self.grammar.root(), 0);
        if let Some(memo) = &self.memo {
            debug!(entries = memo.len(), hits = memo.hits(), "memo table");
        }
        outcome
    }

    fn eval(&mut self, expr: &Expr, at: usize) -> Outcome<'src> {
        if let Some(limit) = self.options.max_depth {
            if self.depth >= limit {
                debug!(at, limit, "depth limit exceeded");
                return Outcome::Aborted(Failure::depth_exceeded(at, limit));
            }
        }
        self.depth += 1;
        let outcome = ensure_sufficient_stack(|| self.eval_kind(expr, at));
        self.depth -= 1;
        outcome
    }

    fn eval_kind(&mut self, expr: &Expr, at: usize) -> Outcome<'src> {
        match expr.kind() {
            ExprKind::Literal(text) => self.literal(text, at),
            ExprKind::Any => self.any_char(at),
            ExprKind::Class(class) => self.char_class(expr, class, at),
            ExprKind::Sequence(children) => self.sequence(children, at),
            ExprKind::Choice(alternatives) => self.choice(alternatives, at),
            ExprKind::Repeat { inner, bounds } => self.repeat(inner, *bounds, at),
            ExprKind::Capture { inner, label } => self
                .eval(inner, at)
                .map_node(|node| build::capture(label, node)),
            ExprKind::Lookahead { inner, negated } => self.lookahead(inner, *negated, at),
            ExprKind::RuleRef(name) => self.rule_ref(name, at),
        }
    }

    // === Terminals ===

    fn literal(&self, text: &Arc<str>, at: usize) -> Outcome<'src> {
        let rest = self.input.as_bytes().get(at..).unwrap_or_default();
        if rest.starts_with(text.as_bytes()) {
            let end = at + text.len();
            Outcome::matched(build::text(self.input, at, end), end)
        } else {
            Outcome::Mismatch(Failure::mismatch(at, Expected::Literal(text.clone())))
        }
    }

    #[inline]
    fn next_char(&self, at: usize) -> Option<char> {
        self.input.get(at..).and_then(|rest| rest.chars().next())
    }

    fn any_char(&self, at: usize) -> Outcome<'src> {
        match self.next_char(at) {
            Some(c) => {
                let end = at + c.len_utf8();
                Outcome::matched(build::text(self.input, at, end), end)
            }
            None => Outcome::Mismatch(Failure::mismatch(at, Expected::AnyChar)),
        }
    }

    fn char_class(&self, expr: &Expr, class: &CharClass, at: usize) -> Outcome<'src> {
        match self.next_char(at) {
            Some(c) if class.matches(c) => {
                let end = at + c.len_utf8();
                Outcome::matched(build::text(self.input, at, end), end)
            }
            _ => Outcome::Mismatch(Failure::mismatch(at, Expected::Class(expr.clone()))),
        }
    }

    // === Combinators ===

    fn sequence(&mut self, children: &[Expr], at: usize) -> Outcome<'src> {
        let mut builder = SequenceBuilder::new(self.input, at);
        let mut pos = at;
        for child in children {
            match self.eval(child, pos) {
                Outcome::Matched { node, end } => {
                    builder.push(node);
                    pos = end;
                }
                failure => return failure,
            }
        }
        Outcome::matched(builder.finish(), pos)
    }

    fn choice(&mut self, alternatives: &[Expr], at: usize) -> Outcome<'src> {
        let mut furthest: Option<Box<Failure>> = None;
        for alternative in alternatives {
            match self.eval(alternative, at) {
                Outcome::Mismatch(failure) => {
                    // Strictly further only: ties keep the earlier alternative.
                    if furthest
                        .as_ref()
                        .map_or(true, |best| failure.position > best.position)
                    {
                        furthest = Some(failure);
                    }
                }
                decided => return decided,
            }
        }
        Outcome::Mismatch(furthest.unwrap_or_else(|| Failure::mismatch(at, Expected::Nothing)))
    }

    fn repeat(&mut self, inner: &Expr, bounds: RepeatBounds, at: usize) -> Outcome<'src> {
        let mut items = Vec::new();
        let mut pos = at;
        let mut last_failure = None;
        while bounds.allows_more(items.len()) {
            match self.eval(inner, pos) {
                Outcome::Matched { node, end } => {
                    items.push(node);
                    if end == pos {
                        // Zero-width: every further iteration would match the same way.
                        break;
                    }
                    pos = end;
                }
                Outcome::Mismatch(failure) => {
                    last_failure = Some(failure);
                    break;
                }
                aborted @ Outcome::Aborted(_) => return aborted,
            }
        }
        match last_failure {
            Some(failure) if items.len() < bounds.min => Outcome::Mismatch(failure),
            _ => Outcome::matched(ResultNode::List(items), pos),
        }
    }

    fn lookahead(&mut self, inner: &Expr, negated: bool, at: usize) -> Outcome<'src> {
        match (self.eval(inner, at), negated) {
            (Outcome::Matched { .. }, false) | (Outcome::Mismatch(_), true) => {
                Outcome::matched(build::empty(at), at)
            }
            (Outcome::Matched { .. }, true) => {
                Outcome::Mismatch(Failure::mismatch(at, Expected::Not(inner.clone())))
            }
            (failure, _) => failure,
        }
    }

    // === Rules ===

    fn rule_ref(&mut self, name: &Name, at: usize) -> Outcome<'src> {
        match self.grammar.lookup(name.as_str()) {
            Some(id) => self.call_rule(id, at),
            // Grammar::new resolves every reference; only reachable with an
            // expression evaluated outside its grammar.
            None => Outcome::Aborted(Failure::unresolved(at)),
        }
    }

    /// Depth a memo entry is keyed on. Without a limit every depth behaves
    /// the same, so all calls share entries.
    fn memo_depth(&self) -> usize {
        if self.options.max_depth.is_some() {
            self.depth
        } else {
            0
        }
    }

    fn call_rule(&mut self, id: RuleId, at: usize) -> Outcome<'src> {
        let depth = self.memo_depth();
        if let Some(memo) = &mut self.memo {
            if let Some(hit) = memo.get(id, at, depth) {
                trace!(rule = id.index(), at, "memo hit");
                return hit;
            }
        }

        let grammar = self.grammar;
        let rule = grammar.rule(id);
        trace!(rule = %rule.name, at, "enter");
        let outcome = self
            .eval(&rule.body, at)
            .with_failure(|failure| failure.leave_rule(&rule.name));
        trace!(
            rule = %rule.name,
            at,
            matched = matches!(outcome, Outcome::Matched { .. }),
            "leave"
        );

        if let Some(memo) = &mut self.memo {
            memo.insert(id, at, depth, &outcome);
        }
        outcome
    }
}
