//! Tag name catalogs.
//!
//! Provides both arrays (for iteration) and `HashSets` (for O(1) lookup) of
//! the HTML tag names the node model cares about.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Heading tags, index + 1 is the heading level.
pub static HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Generic block containers rendered by the fallback rule.
pub static DIVISION_TAGS: [&str; 6] = ["div", "section", "article", "main", "header", "footer"];

/// Inline code-like tags.
pub static CODE_TAGS: [&str; 4] = ["code", "kbd", "samp", "tt"];

/// Emphasis tags: em, i, cite, dfn, var
pub static EMPHASIS_TAGS: [&str; 5] = ["em", "i", "cite", "dfn", "var"];

/// Strong tags: strong, b
pub static STRONG_TAGS: [&str; 2] = ["strong", "b"];

/// Strikethrough tags: s, del, strike
pub static STRIKE_TAGS: [&str; 3] = ["s", "del", "strike"];

/// Elements that never contribute body text. Dropped by the HTML adapter
/// together with their children.
pub static DROPPED_TAGS: [&str; 8] = [
    "script", "style", "noscript", "template", "head", "iframe", "object", "embed",
];

/// Void elements (no closing tag when serialized).
pub static VOID_TAGS: [&str; 8] = ["br", "hr", "img", "col", "input", "meta", "link", "wbr"];

/// `DIVISION_TAGS` as a `HashSet`
pub static DIVISION_TAG_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| DIVISION_TAGS.into_iter().collect());

/// `CODE_TAGS` as a `HashSet`
pub static CODE_TAG_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| CODE_TAGS.into_iter().collect());

/// `EMPHASIS_TAGS` as a `HashSet`
pub static EMPHASIS_TAG_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| EMPHASIS_TAGS.into_iter().collect());

/// `STRONG_TAGS` as a `HashSet`
pub static STRONG_TAG_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STRONG_TAGS.into_iter().collect());

/// `STRIKE_TAGS` as a `HashSet`
pub static STRIKE_TAG_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STRIKE_TAGS.into_iter().collect());

/// `DROPPED_TAGS` as a `HashSet`
pub static DROPPED_TAG_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| DROPPED_TAGS.into_iter().collect());

/// `VOID_TAGS` as a `HashSet`
pub static VOID_TAG_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| VOID_TAGS.into_iter().collect());

/// Heading level for a tag name (`h1` → 1), if it is a heading.
#[must_use]
pub fn heading_level(tag: &str) -> Option<u8> {
    HEADING_TAGS
        .iter()
        .position(|h| *h == tag)
        .and_then(|i| u8::try_from(i + 1).ok())
}
