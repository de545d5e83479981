//! Per-call parse configuration.

/// Options for a single parse.
///
/// ```text
/// let options = ParseOptions::default().with_max_depth(256).partial();
/// parse_with(&grammar, input, &options)
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum evaluation depth. Exceeding it fails the parse with
    /// `ErrorKind::DepthExceeded`. `None` means unlimited; the stack grows
    /// on demand instead.
    pub max_depth: Option<usize>,
    /// Accept a match of the root rule that stops before the end of input.
    pub partial: bool,
    /// Cache rule results per (rule, offset).
    pub memoize: bool,
}

impl ParseOptions {
    /// Limit evaluation depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Accept prefix matches.
    #[must_use]
    pub fn partial(mut self) -> Self {
        self.partial = true;
        self
    }

    /// Enable packrat memoisation.
    #[must_use]
    pub fn memoized(mut self) -> Self {
        self.memoize = true;
        self
    }
}
