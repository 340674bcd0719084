//! Text normalization for extracted PDF content

use std::sync::LazyLock;

use regex::Regex;

/// Returned whenever there is nothing readable left after normalization.
///
/// Already in normalized form, so normalizing it again is a no-op.
pub const EMPTY_DOCUMENT_PLACEHOLDER: &str =
    "No readable text content found. The document appears to be empty or contains only images.";

// Any whitespace except the line feed; carriage returns are gone by the time this runs.
static HORIZONTAL_WS_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]{2,}").expect("valid horizontal whitespace regex"));

static EXCESS_LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid line break regex"));

/// Clean raw extracted text.
///
/// Line endings become `\n`, runs of horizontal whitespace collapse to one
/// space, every line is trimmed, three or more line breaks collapse to a
/// single blank line and the result is trimmed. Missing or blank input
/// yields [`EMPTY_DOCUMENT_PLACEHOLDER`], so the output is never empty.
pub fn normalize_text(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return EMPTY_DOCUMENT_PLACEHOLDER.to_string();
    };

    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let collapsed = HORIZONTAL_WS_RUN.replace_all(&unified, " ");

    let trimmed_lines = collapsed
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");

    let text = EXCESS_LINE_BREAKS.replace_all(&trimmed_lines, "\n\n");
    let text = text.trim();

    if text.is_empty() {
        EMPTY_DOCUMENT_PLACEHOLDER.to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "\n\n\n",
        "\r\n\r\n\r\n\r\n",
        "Hello\nWorld",
        "Hello\r\nWorld\rAgain",
        "a  b\t\tc \t d",
        "line one   \n   line two",
        "para one\n\n\n\n\npara two",
        "para one\n \n\t\n \npara two",
        "  leading and trailing  ",
        "\u{a0}\u{a0}non breaking\u{a0}\u{a0}spaces",
        "tab\tsingle",
        "page one\u{c}\u{c}page two",
        "x\r\r\ry",
        EMPTY_DOCUMENT_PLACEHOLDER,
    ];

    fn assert_invariants(output: &str) {
        assert!(!output.is_empty());
        assert!(!output.contains('\r'), "carriage return in {:?}", output);
        assert!(!output.contains("\n\n\n"), "triple break in {:?}", output);
        let mut previous_horizontal = false;
        for c in output.chars() {
            let horizontal = c.is_whitespace() && c != '\n';
            assert!(
                !(horizontal && previous_horizontal),
                "whitespace run in {:?}",
                output
            );
            previous_horizontal = horizontal;
        }
    }

    #[test]
    fn test_invariants_hold_for_samples() {
        for sample in SAMPLES {
            assert_invariants(&normalize_text(Some(sample)));
        }
    }

    #[test]
    fn test_idempotent() {
        for sample in SAMPLES {
            let once = normalize_text(Some(sample));
            let twice = normalize_text(Some(&once));
            assert_eq!(once, twice, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_line_endings_unified() {
        assert_eq!(
            normalize_text(Some("Hello\r\nWorld\rAgain")),
            "Hello\nWorld\nAgain"
        );
    }

    #[test]
    fn test_blank_lines_collapsed() {
        assert_eq!(
            normalize_text(Some("para one\n\n\n\n\npara two")),
            "para one\n\npara two"
        );
        // whitespace-only lines count as blank
        assert_eq!(
            normalize_text(Some("para one\n \n\t\n \npara two")),
            "para one\n\npara two"
        );
    }

    #[test]
    fn test_single_blank_line_preserved() {
        assert_eq!(normalize_text(Some("a\n\nb")), "a\n\nb");
    }

    #[test]
    fn test_horizontal_whitespace_collapsed() {
        assert_eq!(normalize_text(Some("a  b\t\tc \t d")), "a b c d");
    }

    #[test]
    fn test_lines_trimmed() {
        assert_eq!(
            normalize_text(Some("  line one   \n   line two  ")),
            "line one\nline two"
        );
    }

    #[test]
    fn test_empty_input_yields_placeholder() {
        assert_eq!(normalize_text(None), EMPTY_DOCUMENT_PLACEHOLDER);
        assert_eq!(normalize_text(Some("")), EMPTY_DOCUMENT_PLACEHOLDER);
        assert_eq!(normalize_text(Some(" \n\t\r\n ")), EMPTY_DOCUMENT_PLACEHOLDER);
    }
}
