//! Parse result trees.
//!
//! A [`ResultNode`] borrows its text from the input, so building one never
//! copies input bytes. Equality is structural: labeled nodes compare as
//! label sets, independent of the order in which captures were merged.

use std::fmt;
use std::ops::Range;

use strand_ir::Name;

/// A span of the input together with its text.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slice<'src> {
    text: &'src str,
    offset: usize,
}

impl<'src> Slice<'src> {
    /// `text` found at byte `offset`.
    pub const fn new(text: &'src str, offset: usize) -> Self {
        Slice { text, offset }
    }

    /// The matched text.
    #[inline]
    pub fn as_str(&self) -> &'src str {
        self.text
    }

    /// Byte offset of the first character.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte offset one past the last character.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The byte range covered.
    pub fn span(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

/// Renders as `"text"@offset`.
impl fmt::Display for Slice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}", self.text, self.offset)
    }
}

impl fmt::Debug for Slice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// The value stored under one label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Field<'src> {
    /// The label was captured once.
    Single(ResultNode<'src>),
    /// The label was captured more than once in the same structure, in
    /// match order.
    Repeated(Vec<ResultNode<'src>>),
}

impl<'src> Field<'src> {
    /// All values, in match order.
    pub fn values(&self) -> &[ResultNode<'src>] {
        match self {
            Field::Single(node) => std::slice::from_ref(node),
            Field::Repeated(nodes) => nodes,
        }
    }

    fn push(&mut self, node: ResultNode<'src>) {
        match self {
            Field::Single(first) => {
                let first = std::mem::replace(first, ResultNode::List(Vec::new()));
                *self = Field::Repeated(vec![first, node]);
            }
            Field::Repeated(nodes) => nodes.push(node),
        }
    }

    fn append(&mut self, other: Field<'src>) {
        match other {
            Field::Single(node) => self.push(node),
            Field::Repeated(nodes) => {
                for node in nodes {
                    self.push(node);
                }
            }
        }
    }
}

impl fmt::Display for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Single(node) => write!(f, "{node}"),
            Field::Repeated(nodes) => write_list(f, nodes),
        }
    }
}

/// Labeled captures, kept in first-capture order.
#[derive(Clone, Debug, Default)]
pub struct Captures<'src> {
    entries: Vec<(Name, Field<'src>)>,
}

impl<'src> Captures<'src> {
    /// No captures.
    pub fn new() -> Self {
        Self::default()
    }

    /// One capture.
    pub fn single(label: Name, node: ResultNode<'src>) -> Self {
        Captures {
            entries: vec![(label, Field::Single(node))],
        }
    }

    /// Add `node` under `label`, turning an existing entry into
    /// [`Field::Repeated`].
    pub fn insert(&mut self, label: Name, node: ResultNode<'src>) {
        self.insert_field(label, Field::Single(node));
    }

    fn insert_field(&mut self, label: Name, field: Field<'src>) {
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some((_, existing)) => existing.append(field),
            None => self.entries.push((label, field)),
        }
    }

    /// Merge every entry of `other` into `self`.
    pub fn merge(&mut self, other: Captures<'src>) {
        for (label, field) in other.entries {
            self.insert_field(label, field);
        }
    }

    /// The field for `label`.
    pub fn get(&self, label: &str) -> Option<&Field<'src>> {
        self.entries
            .iter()
            .find(|(l, _)| l.as_str() == label)
            .map(|(_, field)| field)
    }

    /// Labels and fields, in first-capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Field<'src>)> + '_ {
        self.entries.iter().map(|(l, f)| (l, f))
    }

    /// Labels, in first-capture order.
    pub fn labels(&self) -> impl Iterator<Item = &Name> + '_ {
        self.entries.iter().map(|(l, _)| l)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for Captures<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(label, field)| other.get(label.as_str()) == Some(field))
    }
}

impl Eq for Captures<'_> {}

impl<'src> FromIterator<(Name, ResultNode<'src>)> for Captures<'src> {
    fn from_iter<I: IntoIterator<Item = (Name, ResultNode<'src>)>>(iter: I) -> Self {
        let mut captures = Captures::new();
        for (label, node) in iter {
            captures.insert(label, node);
        }
        captures
    }
}

impl fmt::Display for Captures<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (label, field)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{label}: {field}")?;
        }
        f.write_str("}")
    }
}

/// Output tree of a successful parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultNode<'src> {
    /// Uncaptured text.
    Text(Slice<'src>),
    /// One entry per repetition, or the parts of a mixed sequence.
    List(Vec<ResultNode<'src>>),
    /// Captured substructure.
    Labeled(Captures<'src>),
}

impl<'src> ResultNode<'src> {
    /// A text node.
    pub fn text(text: &'src str, offset: usize) -> Self {
        ResultNode::Text(Slice::new(text, offset))
    }

    /// A labeled node from `(label, value)` pairs.
    pub fn labeled<L, I>(entries: I) -> Self
    where
        L: Into<Name>,
        I: IntoIterator<Item = (L, ResultNode<'src>)>,
    {
        ResultNode::Labeled(
            entries
                .into_iter()
                .map(|(label, node)| (label.into(), node))
                .collect(),
        )
    }

    /// The slice, if this is a text node.
    pub fn as_text(&self) -> Option<&Slice<'src>> {
        match self {
            ResultNode::Text(slice) => Some(slice),
            _ => None,
        }
    }

    /// The entries, if this is a list node.
    pub fn as_list(&self) -> Option<&[ResultNode<'src>]> {
        match self {
            ResultNode::List(items) => Some(items),
            _ => None,
        }
    }

    /// The captures, if this is a labeled node.
    pub fn as_labeled(&self) -> Option<&Captures<'src>> {
        match self {
            ResultNode::Labeled(captures) => Some(captures),
            _ => None,
        }
    }

    /// The single value captured under `label`.
    ///
    /// `None` if this is not a labeled node, the label is absent, or the
    /// label was captured more than once (see [`Captures::get`]).
    pub fn get(&self, label: &str) -> Option<&ResultNode<'src>> {
        match self.as_labeled()?.get(label)? {
            Field::Single(node) => Some(node),
            Field::Repeated(_) => None,
        }
    }

    /// Every text slice in the tree, in input order.
    pub fn slices(&self) -> Vec<Slice<'src>> {
        let mut out = Vec::new();
        self.collect_slices(&mut out);
        // Labeled entries are stored in first-capture order, which can differ
        // from input order once a label repeats.
        out.sort_by_key(Slice::offset);
        out
    }

    fn collect_slices(&self, out: &mut Vec<Slice<'src>>) {
        match self {
            ResultNode::Text(slice) => out.push(*slice),
            ResultNode::List(items) => {
                for item in items {
                    item.collect_slices(out);
                }
            }
            ResultNode::Labeled(captures) => {
                for (_, field) in captures.iter() {
                    for node in field.values() {
                        node.collect_slices(out);
                    }
                }
            }
        }
    }

    /// Concatenated text of every slice, in input order.
    ///
    /// Equals the consumed input of the parse that produced the tree.
    pub fn flatten(&self) -> String {
        self.slices().iter().map(Slice::as_str).collect()
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[ResultNode<'_>]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("]")
}

/// Inspect-style rendering: `[{nigel: "a"@0}, {nigel: "a"@1}]`.
impl fmt::Display for ResultNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultNode::Text(slice) => write!(f, "{slice}"),
            ResultNode::List(items) => write_list(f, items),
            ResultNode::Labeled(captures) => write!(f, "{captures}"),
        }
    }
}
