//! Stack growth for recursive grammar evaluation.
//!
//! The matcher walks a grammar by plain recursion: every sequence, choice,
//! repetition and rule reference is one more native frame. A recursive
//! grammar over a long input (nested parentheses, long lists built from
//! right-recursive rules) can go deeper than the thread's default stack.
//!
//! [`ensure_sufficient_stack`] wraps a recursive step and allocates a fresh
//! stack segment when the remaining space drops below [`RED_ZONE`].
//!
//! - **Native targets**: `stacker::maybe_grow`.
//! - **WASM targets**: direct call.
//!
//! This is about not crashing. Bounding the work a parse may do is a
//! separate concern, handled by the matcher's optional depth limit.

/// Remaining stack below which a new segment is allocated (128KB).
pub const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
pub const STACK_SEGMENT: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if less than [`RED_ZONE`] remains.
///
/// ```text
/// fn eval(&mut self, expr: &Expr, at: usize) -> Outcome<'src> {
///     ensure_sufficient_stack(|| self.eval_kind(expr, at))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
