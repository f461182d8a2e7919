#![forbid(unsafe_code)]

//! Display-width helpers for terminal text.
//!
//! Widths are measured in terminal columns via `unicode-width`, iterating
//! grapheme clusters so combining sequences count once.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width of a string in terminal columns.
pub fn display_width(text: &str) -> usize {
    text.graphemes(true).map(UnicodeWidthStr::width).sum()
}

/// Truncate to at most `max_width` columns, appending `…` when truncation
/// happens (the ellipsis is included in the budget).
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let w = UnicodeWidthStr::width(grapheme);
        if used + w > budget {
            break;
        }
        out.push_str(grapheme);
        used += w;
    }
    out.push('…');
    out
}

/// Pad with trailing spaces to exactly `width` columns, truncating with an
/// ellipsis when the text is too wide.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let mut out = truncate_with_ellipsis(text, width);
    let current = display_width(&out);
    for _ in current..width {
        out.push(' ');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_width() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn wide_chars_count_double() {
        assert_eq!(display_width("日本"), 4);
    }

    #[test]
    fn truncate_noop_when_fits() {
        assert_eq!(truncate_with_ellipsis("abc", 3), "abc");
        assert_eq!(truncate_with_ellipsis("abc", 10), "abc");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate_with_ellipsis("abcdef", 4), "abc…");
    }

    #[test]
    fn truncate_zero_width_is_empty() {
        assert_eq!(truncate_with_ellipsis("abc", 0), "");
    }

    #[test]
    fn truncate_respects_wide_boundary() {
        // Second ideograph does not fit in the 3-column budget (2 used + ellipsis).
        assert_eq!(truncate_with_ellipsis("日本語", 4), "日…");
    }

    #[test]
    fn pad_fills_to_width() {
        assert_eq!(pad_to_width("ab", 5), "ab   ");
        assert_eq!(pad_to_width("abcdef", 4), "abc…");
    }
}
