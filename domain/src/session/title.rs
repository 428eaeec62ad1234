//! Session title derivation.

use crate::util::truncate_chars;

/// Title of a session whose first user message has not been seen yet.
pub const DEFAULT_SESSION_TITLE: &str = "New conversation";

/// Maximum number of characters kept from the first user message.
pub const MAX_TITLE_CHARS: usize = 20;

/// Marker appended to titles that were cut off.
pub const TITLE_ELLIPSIS: &str = "...";

/// Derive a session title from message content.
///
/// Trims the content, turns newlines into spaces, and keeps at most
/// [`MAX_TITLE_CHARS`] characters followed by [`TITLE_ELLIPSIS`].
pub fn title_from_message(content: &str) -> String {
    let flattened = content.trim().replace("\r\n", " ").replace('\n', " ");
    match truncate_chars(&flattened, MAX_TITLE_CHARS) {
        Some(prefix) => format!("{prefix}{TITLE_ELLIPSIS}"),
        None => flattened,
    }
}
