//! Shared utility functions.

/// Truncate a string to at most `max_chars` characters (Unicode scalar values).
///
/// Returns `None` when the string already fits, so callers can tell whether
/// anything was cut off.
pub fn truncate_chars(s: &str, max_chars: usize) -> Option<&str> {
    s.char_indices().nth(max_chars).map(|(end, _)| &s[..end])
}
