//! Character classes.

use std::fmt;

use smallvec::SmallVec;

/// A set of characters described by inclusive ranges.
///
/// Built incrementally and never validated on construction; an inverted
/// range (`lo > hi`) is rejected when the grammar containing it is built.
///
/// ```text
/// CharClass::new().range('a', 'z').chars("_")   // [a-z_]
/// CharClass::new().range('0', '9').negate()     // [^0-9]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharClass {
    ranges: SmallVec<[(char, char); 4]>,
    negated: bool,
}

impl CharClass {
    /// An empty class. Matches nothing until ranges are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an inclusive range.
    #[must_use]
    pub fn range(mut self, lo: char, hi: char) -> Self {
        self.ranges.push((lo, hi));
        self
    }

    /// Add a single character.
    #[must_use]
    pub fn char(self, c: char) -> Self {
        self.range(c, c)
    }

    /// Add every character of `chars`.
    #[must_use]
    pub fn chars(mut self, chars: &str) -> Self {
        self.ranges.extend(chars.chars().map(|c| (c, c)));
        self
    }

    /// Invert the class: match any character *not* in the ranges.
    #[must_use]
    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// Whether `c` is matched by this class.
    pub fn matches(&self, c: char) -> bool {
        let inside = self.ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi);
        inside != self.negated
    }

    /// The ranges, in insertion order.
    pub fn ranges(&self) -> &[(char, char)] {
        &self.ranges
    }

    /// Whether the class is inverted.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// The first range whose bounds are inverted, if any.
    pub fn inverted_range(&self) -> Option<(char, char)> {
        self.ranges.iter().copied().find(|&(lo, hi)| lo > hi)
    }
}

fn write_class_char(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    match c {
        ']' | '\\' | '^' | '-' => write!(f, "\\{c}"),
        '\n' => f.write_str("\\n"),
        '\t' => f.write_str("\\t"),
        '\r' => f.write_str("\\r"),
        _ => write!(f, "{c}"),
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if self.negated {
            f.write_str("^")?;
        }
        for &(lo, hi) in &self.ranges {
            write_class_char(f, lo)?;
            if lo != hi {
                f.write_str("-")?;
                write_class_char(f, hi)?;
            }
        }
        f.write_str("]")
    }
}
