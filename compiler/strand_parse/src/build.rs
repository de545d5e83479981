//! Result assembly.
//!
//! Results are folded bottom-up on the success path of the matcher: each
//! combinator turns its children's nodes into its own node as soon as it
//! succeeds. A failed alternative simply drops whatever it built.
//!
//! | Combinator | Result |
//! |------------|--------|
//! | literal, any, class | `Text` |
//! | sequence | adjacent `Text` coalesced; one node kept as is; all `Labeled` merged; otherwise `List` |
//! | repeat | `List`, one entry per iteration |
//! | capture | `Labeled { label: node }` |
//! | choice, rule reference | the inner node |
//! | lookahead | empty `Text` |
//!
//! Text is never discarded, so the slices of a result always reassemble the
//! consumed input.

use smallvec::SmallVec;
use strand_ir::Name;

use crate::result::{Captures, ResultNode, Slice};

/// Text node for `input[start..end]`.
#[inline]
pub(crate) fn text<'src>(input: &'src str, start: usize, end: usize) -> ResultNode<'src> {
    ResultNode::Text(Slice::new(input.get(start..end).unwrap_or_default(), start))
}

/// Zero-width text node at `at`.
#[inline]
pub(crate) fn empty(at: usize) -> ResultNode<'static> {
    ResultNode::Text(Slice::new("", at))
}

/// Wrap `node` under `label`.
#[inline]
pub(crate) fn capture<'src>(label: &Name, node: ResultNode<'src>) -> ResultNode<'src> {
    ResultNode::Labeled(Captures::single(label.clone(), node))
}

/// Accumulates the children of one sequence match.
pub(crate) struct SequenceBuilder<'src> {
    input: &'src str,
    start: usize,
    parts: SmallVec<[ResultNode<'src>; 4]>,
}

impl<'src> SequenceBuilder<'src> {
    pub(crate) fn new(input: &'src str, start: usize) -> Self {
        SequenceBuilder {
            input,
            start,
            parts: SmallVec::new(),
        }
    }

    /// Add the next child's node. Text directly after text is coalesced;
    /// consecutive children are contiguous in the input.
    pub(crate) fn push(&mut self, node: ResultNode<'src>) {
        if let ResultNode::Text(next) = &node {
            if let Some(ResultNode::Text(prev)) = self.parts.last_mut() {
                debug_assert_eq!(prev.end(), next.offset(), "sequence children are contiguous");
                let start = prev.offset();
                *prev = Slice::new(self.input.get(start..next.end()).unwrap_or_default(), start);
                return;
            }
        }
        self.parts.push(node);
    }

    /// Fold the children into the sequence's node.
    pub(crate) fn finish(mut self) -> ResultNode<'src> {
        if self.parts.len() > 1 {
            self.parts
                .retain(|part| !matches!(part, ResultNode::Text(slice) if slice.is_empty()));
        }
        match self.parts.len() {
            0 => empty(self.start),
            1 => self.parts.pop().unwrap_or_else(|| empty(self.start)),
            _ if self
                .parts
                .iter()
                .all(|part| matches!(part, ResultNode::Labeled(_))) =>
            {
                let mut merged = Captures::new();
                for part in self.parts {
                    if let ResultNode::Labeled(captures) = part {
                        merged.merge(captures);
                    }
                }
                ResultNode::Labeled(merged)
            }
            _ => ResultNode::List(self.parts.into_vec()),
        }
    }
}

#[cfg(test)]
mod tests;
