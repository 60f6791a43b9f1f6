//! Plain-text rendering of news items.

use std::fmt::Write as _;

use crate::NewsItem;

/// The text returned for an empty item list.
pub const NO_ITEMS_TEXT: &str = "No news items available.";

/// Formats items as a numbered plain-text list.
///
/// Each entry carries the title, link and summary on separate lines, and
/// entries are separated by a blank line:
///
/// ```text
/// 1. Title
///    Link: https://example.com/1
///    Summary: Something happened.
/// ```
///
/// An empty list yields [`NO_ITEMS_TEXT`].
pub fn format_items_as_text(items: &[NewsItem]) -> String {
    if items.is_empty() {
        return NO_ITEMS_TEXT.to_owned();
    }

    let mut text = String::new();
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            text.push('\n');
        }
        // Writing into a `String` never fails.
        let _ = writeln!(text, "{}. {}", idx + 1, item.title());
        let _ = writeln!(text, "   Link: {}", item.link());
        let _ = writeln!(text, "   Summary: {}", item.summary());
    }
    text
}
