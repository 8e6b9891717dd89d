//! Markdown text utilities.
//!
//! Escaping, inline code spans, code fences, list/quote line prefixes, table
//! cell flattening and the final blank line normalization of a converted body.

use crate::node::Node;
use crate::patterns::{NEWLINE_RUN, TEXT_ALIGN};

/// Characters that have special meaning in Markdown and need escaping.
const MARKDOWN_SPECIAL_CHARS: &[char] = &['\\', '*', '_', '[', ']', '<', '>', '`'];

/// Escape Markdown special characters in text content.
///
/// # Arguments
///
/// * `text` - The text content to escape
/// * `verbatim` - If true, return the text unchanged
///
/// # Examples
///
/// ```
/// use pagemark::markdown::escape_markdown;
///
/// assert_eq!(escape_markdown("*not italic*", false), r"\*not italic\*");
/// assert_eq!(escape_markdown("my_variable_name", false), r"my\_variable\_name");
/// assert_eq!(escape_markdown("*text*", true), "*text*");
/// ```
#[must_use]
pub fn escape_markdown(text: &str, verbatim: bool) -> String {
    if verbatim || text.is_empty() {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len() + text.len() / 4);

    for ch in text.chars() {
        if MARKDOWN_SPECIAL_CHARS.contains(&ch) {
            result.push('\\');
        }
        result.push(ch);
    }

    result
}

/// Escape every `|` that is not already escaped.
///
/// A pipe counts as escaped when it follows an odd number of backslashes.
///
/// ```
/// use pagemark::markdown::escape_pipes;
///
/// assert_eq!(escape_pipes("a|b"), r"a\|b");
/// assert_eq!(escape_pipes(r"a\|b"), r"a\|b");
/// assert_eq!(escape_pipes(r"a\\|b"), r"a\\\|b");
/// ```
#[must_use]
pub fn escape_pipes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut backslashes = 0usize;
    for ch in text.chars() {
        if ch == '|' && backslashes % 2 == 0 {
            result.push('\\');
        }
        if ch == '\\' {
            backslashes += 1;
        } else {
            backslashes = 0;
        }
        result.push(ch);
    }
    result
}

/// Turn converted cell content into a single table cell line.
///
/// Newlines become `marker`, empty segments between markers are dropped (so
/// leading, trailing and doubled markers disappear) and pipes are escaped.
///
/// ```
/// use pagemark::markdown::flatten_cell;
///
/// assert_eq!(flatten_cell("<br/>a\n b<br/><br/>c|d<br/>", "<br/>"), r"a<br/>b<br/>c\|d");
/// assert_eq!(flatten_cell(" // a //  // b //", " // "), "a // b");
/// ```
#[must_use]
pub fn flatten_cell(text: &str, marker: &str) -> String {
    let single_line = NEWLINE_RUN.replace_all(text, marker);
    let joined = single_line
        .split(marker)
        .map(|segment| trim_markers(segment, marker))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(marker);
    escape_pipes(&joined)
}

/// Strip markers and whitespace from both ends of `text`.
///
/// Whitespace around the marker is not significant: `" // "` also strips a
/// bare `//` left at an end after trimming.
///
/// ```
/// use pagemark::markdown::trim_markers;
///
/// assert_eq!(trim_markers("<br/> a<br/>b <br/><br/>", "<br/>"), "a<br/>b");
/// assert_eq!(trim_markers(" // a // b //", " // "), "a // b");
/// assert_eq!(trim_markers("<br/>", "<br/>"), "");
/// ```
#[must_use]
pub fn trim_markers<'t>(text: &'t str, marker: &str) -> &'t str {
    let marker = marker.trim();
    let mut text = text.trim();
    if marker.is_empty() {
        return text;
    }
    loop {
        let stripped = text
            .strip_prefix(marker)
            .or_else(|| text.strip_suffix(marker))
            .unwrap_or(text)
            .trim();
        if stripped.len() == text.len() {
            return stripped;
        }
        text = stripped;
    }
}

/// Split leading and trailing whitespace off `text`.
///
/// Returns `(prefix, inner, suffix)` so inline markers can be placed around
/// `inner` while the whitespace stays outside them.
#[must_use]
pub fn chomp(text: &str) -> (&str, &str, &str) {
    let start = text.len() - text.trim_start().len();
    let end = text.trim_end().len().max(start);
    (&text[..start], &text[start..end], &text[end..])
}

/// Wrap `text` in an inline code span, widening the backtick fence when the
/// text itself contains backticks.
///
/// ```
/// use pagemark::markdown::code_span;
///
/// assert_eq!(code_span("x"), "`x`");
/// assert_eq!(code_span("a`b"), "``a`b``");
/// assert_eq!(code_span("`x`"), "`` `x` ``");
/// ```
#[must_use]
pub fn code_span(text: &str) -> String {
    let fence = "`".repeat(longest_run(text, '`') + 1);
    if text.starts_with('`') || text.ends_with('`') {
        format!("{fence} {text} {fence}")
    } else {
        format!("{fence}{text}{fence}")
    }
}

/// Fenced code block for `code` with an optional info string.
#[must_use]
pub fn code_fence(code: &str, language: Option<&str>) -> String {
    let fence = "`".repeat(longest_run(code, '`').max(2) + 1);
    format!("{fence}{}\n{code}\n{fence}", language.unwrap_or_default())
}

fn longest_run(text: &str, needle: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in text.chars() {
        if ch == needle {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Prefix the first line of `content` with `marker` and indent the
/// continuation lines to line up under the content.
#[must_use]
pub fn list_item(marker: &str, content: &str) -> String {
    if content.is_empty() {
        return marker.to_string();
    }
    let indent = " ".repeat(marker.chars().count() + 1);
    let mut out = String::with_capacity(content.len() + marker.len() + 1);
    for (i, line) in content.lines().enumerate() {
        if i == 0 {
            out.push_str(marker);
            out.push(' ');
            out.push_str(line);
        } else {
            out.push('\n');
            if !line.trim().is_empty() {
                out.push_str(&indent);
                out.push_str(line);
            }
        }
    }
    out
}

/// Prefix every line with `> `; blank lines get a bare `>`.
#[must_use]
pub fn quote_lines(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse blank line runs in a converted body.
///
/// This walks the Markdown line by line and tracks fenced code blocks
/// (``` and ~~~). Outside fences:
/// - whitespace-only lines count as blank
/// - consecutive blank lines collapse into one
/// - leading and trailing blank lines are removed
///
/// Lines inside fences are kept exactly.
#[must_use]
pub fn normalize_blank_lines(markdown: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut fence: Option<String> = None;
    let mut pending_blank = false;

    for line in markdown.lines() {
        let trimmed = line.trim_start();

        if let Some(open) = &fence {
            lines.push(line);
            if trimmed.starts_with(open.as_str()) && trimmed.trim_end().chars().all(|c| c == '`' || c == '~') {
                fence = None;
            }
            continue;
        }

        if trimmed.is_empty() {
            pending_blank = !lines.is_empty();
            continue;
        }

        if pending_blank {
            lines.push("");
            pending_blank = false;
        }

        if let Some(marker) = fence_marker(trimmed) {
            fence = Some(marker);
        }
        lines.push(line);
    }

    lines.join("\n")
}

fn fence_marker(line: &str) -> Option<String> {
    let ch = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let run = line.chars().take_while(|c| *c == ch).count();
    (run >= 3).then(|| ch.to_string().repeat(run))
}

/// Column alignment of a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "left" => Self::Left,
            "center" => Self::Center,
            "right" => Self::Right,
            _ => Self::None,
        }
    }

    /// Alignment declared on a cell via `align=` or `style="text-align: …"`.
    #[must_use]
    pub fn of(cell: &Node) -> Self {
        if let Some(align) = cell.attr("align") {
            return Self::from_str(align);
        }
        cell.attr("style")
            .and_then(|style| TEXT_ALIGN.captures(style))
            .map_or(Self::None, |caps| Self::from_str(&caps[1]))
    }
}

/// Separator row segment for one column.
#[must_use]
pub fn format_separator(width: usize, align: Alignment) -> String {
    let dashes = width.max(3);
    match align {
        Alignment::Left => format!(":{}", "-".repeat(dashes - 1)),
        Alignment::Center => format!(":{}:", "-".repeat(dashes - 2)),
        Alignment::Right => format!("{}:", "-".repeat(dashes - 1)),
        Alignment::None => "-".repeat(dashes),
    }
}

/// Pad cell text to `width` characters according to its alignment.
#[must_use]
pub fn pad_cell(text: &str, width: usize, align: Alignment) -> String {
    let text_len = text.chars().count();
    if text_len >= width {
        return text.to_string();
    }

    let padding = width - text_len;
    match align {
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
        Alignment::Center => {
            let left = padding / 2;
            let right = padding - left;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
        }
        _ => format!("{}{}", text, " ".repeat(padding)),
    }
}
