//! Packrat memo table.
//!
//! Rule evaluation is a pure function of (rule, offset), so a rule's outcome
//! can be replayed instead of re-evaluated. Cached failures carry the rule
//! stack from the rule inward; callers add their own frames while
//! unwinding, exactly as on a fresh evaluation.
//!
//! Under a depth limit the outcome also depends on how deep the call
//! started. Each entry records that depth and is replayed only for calls at
//! the same depth or shallower: with at least as much budget left, a fresh
//! evaluation takes the same path without aborting.

use rustc_hash::FxHashMap;
use strand_ir::RuleId;

use crate::outcome::Outcome;

struct Entry<'src> {
    outcome: Outcome<'src>,
    depth: usize,
}

#[derive(Default)]
pub(crate) struct MemoTable<'src> {
    entries: FxHashMap<(RuleId, usize), Entry<'src>>,
    hits: usize,
}

impl<'src> MemoTable<'src> {
    /// The outcome of `rule` at `at`, if one was recorded for a call at
    /// `depth` or deeper.
    pub(crate) fn get(
        &mut self,
        rule: RuleId,
        at: usize,
        depth: usize,
    ) -> Option<Outcome<'src>> {
        let hit = self
            .entries
            .get(&(rule, at))
            .filter(|entry| entry.depth >= depth)
            .map(|entry| entry.outcome.clone());
        if hit.is_some() {
            self.hits += 1;
        }
        hit
    }

    /// Remember `outcome` for a call at `depth`, keeping whichever entry
    /// serves more call sites. Aborts end the parse and are not cached.
    pub(crate) fn insert(
        &mut self,
        rule: RuleId,
        at: usize,
        depth: usize,
        outcome: &Outcome<'src>,
    ) {
        if matches!(outcome, Outcome::Aborted(_)) {
            return;
        }
        match self.entries.get(&(rule, at)) {
            Some(existing) if existing.depth >= depth => {}
            _ => {
                self.entries.insert(
                    (rule, at),
                    Entry {
                        outcome: outcome.clone(),
                        depth,
                    },
                );
            }
        }
    }

    pub(crate) fn hits(&self) -> usize {
        self.hits
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
