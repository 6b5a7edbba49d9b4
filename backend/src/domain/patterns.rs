//! Lazily compiled regular expressions shared by the domain newtypes.

use std::sync::OnceLock;

use regex::Regex;

/// Compile `pattern` into `cell` on first use and return the cached regex.
///
/// # Panics
/// If `pattern` is not a valid regex. Callers pass crate-owned literals.
pub(crate) fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("pattern {pattern:?} failed to compile: {error}"))
    })
}
