//! Compiled regex patterns used during conversion.
//!
//! All patterns are compiled once at startup using `LazyLock` for efficiency.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Any run of whitespace, including newlines. Collapsed to a single space in
/// flowing text.
pub static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN regex"));

/// A line break together with the horizontal whitespace around it.
pub static NEWLINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*(?:\r?\n[ \t]*)+").expect("NEWLINE_RUN regex"));

/// Code language hint in a `class` attribute (`language-rust`, `lang-js`).
pub static LANGUAGE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:language|lang)-([A-Za-z0-9_+#.-]+)").expect("LANGUAGE_CLASS regex")
});

/// `text-align` declaration inside an inline `style` attribute.
pub static TEXT_ALIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)text-align\s*:\s*(left|right|center)").expect("TEXT_ALIGN regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_class() {
        let caps = LANGUAGE_CLASS.captures("highlight language-rust").map(|c| c[1].to_string());
        assert_eq!(caps.as_deref(), Some("rust"));
        assert!(LANGUAGE_CLASS.captures("nolanguage-x").is_none());
    }

    #[test]
    fn test_newline_run_swallows_indentation() {
        assert_eq!(NEWLINE_RUN.replace_all("a  \n   \n  b", "|"), "a|b");
    }

    #[test]
    fn test_text_align_is_case_insensitive() {
        let caps = TEXT_ALIGN.captures("color: red; Text-Align: Center").map(|c| c[1].to_lowercase());
        assert_eq!(caps.as_deref(), Some("center"));
    }
}
