//! Display-width aware column helpers.

use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A unit letter directly followed by the next token's number, as in the `h2` of `1h2m`.
static GLUED_TOKENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([[:alpha:]µ])(\d)").expect("invalid duration regex"));

pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// First `max_cells` terminal cells of `s`, never splitting a grapheme. No ellipsis.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    let mut width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let gw = UnicodeWidthStr::width(grapheme);
        if width + gw > max_cells {
            break;
        }
        width += gw;
        result.push_str(grapheme);
    }
    result
}

pub fn pad_right(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(s));
    format!("{}{}", s, " ".repeat(fill))
}

pub fn pad_left(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(s));
    format!("{}{}", " ".repeat(fill), s)
}

/// Separate adjacent duration tokens by exactly one space: "1h2m" and "1h  2m" both
/// become "1h 2m". All other text is kept; whitespace runs collapse and the ends are trimmed.
pub fn space_duration(duration: &str) -> String {
    single_line(&GLUED_TOKENS.replace_all(duration, "$1 $2"))
}

/// Collapse whitespace runs (including newlines) into single spaces.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_to_width("Fix login", 30), "Fix login");
        assert_eq!(truncate_to_width("", 30), "");
    }

    #[test]
    fn truncate_cuts_at_width() {
        let long = "a".repeat(45);
        assert_eq!(truncate_to_width(&long, 30), "a".repeat(30));
    }

    #[test]
    fn truncate_does_not_split_wide_chars() {
        // each CJK char is 2 cells wide
        let s = "漢字漢字";
        assert_eq!(truncate_to_width(s, 5), "漢字");
        assert_eq!(display_width(&truncate_to_width(s, 5)), 4);
    }

    #[test]
    fn padding_uses_display_width() {
        assert_eq!(pad_right("ab", 4), "ab  ");
        assert_eq!(pad_right("漢", 4), "漢  ");
        assert_eq!(pad_left("5m", 6), "    5m");
        assert_eq!(pad_right("toolong", 3), "toolong");
    }

    #[test]
    fn duration_tokens_get_single_spaces() {
        assert_eq!(space_duration("1h 2m"), "1h 2m");
        assert_eq!(space_duration("1h2m"), "1h 2m");
        assert_eq!(space_duration("1h  2m 3s"), "1h 2m 3s");
        assert_eq!(space_duration("45s"), "45s");
        assert_eq!(space_duration("2h 10m 5s 120ms"), "2h 10m 5s 120ms");
    }

    #[test]
    fn duration_without_tokens_is_trimmed() {
        assert_eq!(space_duration("  0 "), "0");
        assert_eq!(space_duration(""), "");
    }

    #[test]
    fn duration_keeps_surrounding_text() {
        assert_eq!(space_duration("1h 2m (over budget)"), "1h 2m (over budget)");
        assert_eq!(space_duration("1h2m (over budget)"), "1h 2m (over budget)");
        assert_eq!(space_duration("-5m"), "-5m");
        assert_eq!(space_duration("~1.5h"), "~1.5h");
    }

    #[test]
    fn duration_word_units_stay_readable() {
        assert_eq!(space_duration("2 hours 3 minutes"), "2 hours 3 minutes");
        assert_eq!(space_duration("2 hours\n 3  minutes"), "2 hours 3 minutes");
        assert_eq!(space_duration("5 m"), "5 m");
        assert_eq!(space_duration("2hours3minutes"), "2hours 3minutes");
    }

    #[test]
    fn single_line_collapses_newlines() {
        assert_eq!(single_line("a\nb  c\t"), "a b c");
    }
}
