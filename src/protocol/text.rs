//! # Text Layout Helpers
//!
//! Alignment values for `ESC a n`, plus the fixed-width column helpers the
//! receipt renderer uses. Thermal receipts are laid out as monospaced text,
//! so padding is counted in characters, not dots.
//!
//! ```text
//! Left aligned (default)    |LEFT TEXT
//! Center aligned            |  CENTER TEXT
//! Right aligned             |      RIGHT TEXT
//! ```

/// Characters per line on an 80mm printer using Font A.
pub const LINE_WIDTH: usize = 42;

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

/// Hard-wrap `text` into chunks of at most `width` characters.
///
/// No word breaking: long item names are cut mid-word, which matches how
/// cashiers expect truncated names to read on a 42-column roll.
///
/// ```
/// use nextpos::protocol::text::wrap;
///
/// assert_eq!(wrap("abcdef", 4), vec!["abcd", "ef"]);
/// assert!(wrap("", 4).is_empty());
/// ```
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Pad `left` so that `right` ends exactly at column `width`.
///
/// If the two don't fit they are printed back to back and the line runs
/// over; the printer wraps it on its own.
pub fn justify(left: &str, right: &str, width: usize) -> String {
    let used = left.chars().count() + right.chars().count();
    let pad = width.saturating_sub(used);
    format!("{}{}{}", left, " ".repeat(pad), right)
}

/// Center `text` within `width` columns, extra space going to the right.
pub fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let total = width - len;
    let left = total / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(total - left))
}

/// Truncate to at most `max` characters.
pub fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
