//! Generic conversion rules.
//!
//! Block rules wrap their output in blank lines (`\n\n…\n\n`); the body
//! normalizer later collapses the surplus. In inline mode they return bare
//! content instead.

use crate::markdown::{
    chomp, code_fence, code_span, escape_markdown, list_item, normalize_blank_lines, quote_lines,
};
use crate::node::TagKind;
use crate::patterns::{LANGUAGE_CLASS, WHITESPACE_RUN};

use super::{Rule, Scope};

/// Generic rule for `kind`. Total: every kind has one.
pub(crate) fn rule_for(kind: TagKind) -> Rule {
    match kind {
        TagKind::Text => text,
        TagKind::Paragraph => paragraph,
        TagKind::Heading(_) => heading,
        TagKind::OrderedList | TagKind::UnorderedList => list,
        TagKind::ListItem => list_item_rule,
        TagKind::BlockQuote => block_quote,
        TagKind::Preformatted => preformatted,
        TagKind::Code => code,
        TagKind::Emphasis | TagKind::Strong | TagKind::Strikethrough => emphasis,
        TagKind::Link => link,
        TagKind::Image => image,
        TagKind::LineBreak => line_break,
        TagKind::HorizontalRule => horizontal_rule,
        // Table structure only lands here when it is malformed or when a
        // table rule delegates; render it as a plain block.
        TagKind::Table
        | TagKind::TableHead
        | TagKind::TableBody
        | TagKind::TableFoot
        | TagKind::TableRow
        | TagKind::TableHeaderCell
        | TagKind::TableDataCell
        | TagKind::Caption => block_fallback,
        TagKind::Division | TagKind::Other => fallback,
    }
}

/// Concatenation of the converted children, nothing added.
pub(crate) fn fallback(scope: &Scope<'_>) -> String {
    scope.children()
}

/// Children as a block of their own.
pub(crate) fn block_fallback(scope: &Scope<'_>) -> String {
    let content = scope.children();
    let content = content.trim();
    if content.is_empty() {
        String::new()
    } else if scope.is_inline() {
        content.to_string()
    } else {
        format!("\n\n{content}\n\n")
    }
}

fn text(scope: &Scope<'_>) -> String {
    let raw = scope.node().text_value().unwrap_or_default();
    let ctx = scope.context();
    if ctx.in_preformatted() {
        return raw.to_string();
    }
    let collapsed = WHITESPACE_RUN.replace_all(raw, " ");
    escape_markdown(&collapsed, ctx.in_code() || !scope.settings().escape_special_chars)
}

fn paragraph(scope: &Scope<'_>) -> String {
    let content = scope.children();
    let content = content
        .trim()
        .lines()
        .map(str::trim_start)
        .collect::<Vec<_>>()
        .join("\n");
    if content.is_empty() {
        String::new()
    } else if scope.is_inline() {
        format!(" {content} ")
    } else {
        format!("\n\n{content}\n\n")
    }
}

fn heading(scope: &Scope<'_>) -> String {
    let TagKind::Heading(level) = scope.node().kind() else {
        return block_fallback(scope);
    };
    let content = scope.children();
    let content = WHITESPACE_RUN.replace_all(content.trim(), " ");
    if content.is_empty() {
        String::new()
    } else if scope.is_inline() {
        content.into_owned()
    } else {
        format!("\n\n{} {content}\n\n", "#".repeat(usize::from(level)))
    }
}

fn list(scope: &Scope<'_>) -> String {
    let node = scope.node();
    let ordered = node.kind() == TagKind::OrderedList;
    let mut number = node
        .attr("start")
        .and_then(|s| s.trim().parse::<usize>().ok())
        .unwrap_or(1);
    let bullet = scope.settings().bullet.to_string();

    let mut items = Vec::new();
    for child in node.children().iter().filter(|c| !c.is_blank()) {
        let content = scope.descend(child, |item| item.render());
        let content = content.trim();
        if child.kind() != TagKind::ListItem {
            // Stray content between items stays in place, unmarked.
            if !content.is_empty() {
                items.push(content.to_string());
            }
            continue;
        }
        if scope.is_inline() {
            items.push(content.to_string());
        } else if ordered {
            items.push(list_item(&format!("{number}."), content));
        } else {
            items.push(list_item(&bullet, content));
        }
        number = number.saturating_add(1);
    }

    if items.is_empty() {
        return String::new();
    }
    if scope.is_inline() {
        return format!(" {} ", items.join(" "));
    }
    let body = items.join("\n");
    if scope.context().parent() == Some(TagKind::ListItem) {
        format!("\n{body}\n")
    } else {
        format!("\n\n{body}\n\n")
    }
}

/// Item content; the enclosing list adds the marker. An item outside any
/// list gets a bullet of its own.
fn list_item_rule(scope: &Scope<'_>) -> String {
    let content = scope.children();
    let content = content.trim();
    if scope.context().parent().is_some_and(TagKind::is_list) || scope.is_inline() {
        return content.to_string();
    }
    if content.is_empty() {
        return String::new();
    }
    let bullet = scope.settings().bullet.to_string();
    format!("\n\n{}\n\n", list_item(&bullet, content))
}

fn block_quote(scope: &Scope<'_>) -> String {
    let content = scope.children();
    let content = content.trim();
    if content.is_empty() {
        String::new()
    } else if scope.is_inline() {
        content.to_string()
    } else {
        format!("\n\n{}\n\n", quote_lines(&normalize_blank_lines(content)))
    }
}

fn preformatted(scope: &Scope<'_>) -> String {
    let node = scope.node();
    let raw = node.text_content();
    let code = raw.strip_prefix('\n').unwrap_or(raw.as_str()).trim_end_matches(['\n', '\r']);
    if code.trim().is_empty() {
        return String::new();
    }
    if scope.is_inline() {
        return code_span(&WHITESPACE_RUN.replace_all(code, " "));
    }

    // Language hint may sit on <pre> or on its <code> child.
    let language = std::iter::once(node)
        .chain(node.children().iter().filter(|c| c.kind() == TagKind::Code))
        .filter_map(|n| n.attr("class"))
        .find_map(|class| LANGUAGE_CLASS.captures(class).map(|caps| caps[1].to_string()));

    format!("\n\n{}\n\n", code_fence(code, language.as_deref()))
}

fn code(scope: &Scope<'_>) -> String {
    let raw = scope.node().text_content();
    if scope.context().in_code() {
        return raw;
    }
    let content = WHITESPACE_RUN.replace_all(&raw, " ");
    if content.trim().is_empty() {
        return content.into_owned();
    }
    code_span(&content)
}

fn emphasis(scope: &Scope<'_>) -> String {
    let content = scope.children();
    if scope.context().in_code() {
        return content;
    }
    let marker = match scope.node().kind() {
        TagKind::Strong => "**",
        TagKind::Strikethrough => "~~",
        _ => "*",
    };
    let (prefix, inner, suffix) = chomp(&content);
    if inner.is_empty() {
        return content;
    }
    format!("{prefix}{marker}{inner}{marker}{suffix}")
}

fn link(scope: &Scope<'_>) -> String {
    let node = scope.node();
    let content = scope.children();
    let href = node.attr("href").map(str::trim).unwrap_or_default();
    if href.is_empty() || scope.context().in_code() {
        return content;
    }

    let (prefix, inner, suffix) = chomp(&content);
    let label = if inner.is_empty() {
        escape_markdown(href, !scope.settings().escape_special_chars)
    } else {
        inner.to_string()
    };
    format!("{prefix}[{label}]({}){suffix}", link_target(href, node.attr("title")))
}

fn image(scope: &Scope<'_>) -> String {
    let node = scope.node();
    let alt = node.attr("alt").map(str::trim).unwrap_or_default();
    let alt = escape_markdown(alt, !scope.settings().escape_special_chars);
    let Some(src) = node.attr("src").map(str::trim).filter(|s| !s.is_empty()) else {
        return alt;
    };
    format!("![{alt}]({})", link_target(src, node.attr("title")))
}

fn link_target(url: &str, title: Option<&str>) -> String {
    let url = if url.contains([' ', '(', ')']) {
        format!("<{url}>")
    } else {
        url.to_string()
    };
    match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => format!("{url} \"{}\"", title.replace('"', "\\\"")),
        None => url,
    }
}

fn line_break(scope: &Scope<'_>) -> String {
    if scope.context().in_heading() {
        " ".to_string()
    } else {
        scope.settings().newline_style.hard_break().to_string()
    }
}

fn horizontal_rule(scope: &Scope<'_>) -> String {
    if scope.is_inline() {
        String::new()
    } else {
        "\n\n---\n\n".to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Converter, Node, Settings};

    fn md(node: &Node) -> String {
        Converter::new(&Settings::default()).convert_body(node)
    }

    #[test]
    fn test_paragraphs_are_separated_by_a_blank_line() {
        let body = Node::element("body")
            .with_child(Node::element("p").with_text("First"))
            .with_text("\n   ")
            .with_child(Node::element("p").with_text("Second"));
        assert_eq!(md(&body), "First\n\nSecond");
    }

    #[test]
    fn test_line_break_in_paragraph() {
        let p = Node::element("p")
            .with_text("one")
            .with_child(Node::element("br"))
            .with_text("\n two");
        assert_eq!(md(&p), "one  \ntwo");
    }

    #[test]
    fn test_headings() {
        let h = Node::element("h3").with_text(" Title ").with_child(Node::element("br")).with_text("more");
        assert_eq!(md(&h), "### Title more");
    }

    #[test]
    fn test_nested_lists() {
        let list = Node::element("ul")
            .with_child(
                Node::element("li").with_text("a").with_child(
                    Node::element("ol")
                        .with_attr("start", "3")
                        .with_child(Node::element("li").with_text("x"))
                        .with_child(Node::element("li").with_text("y")),
                ),
            )
            .with_text("\n")
            .with_child(Node::element("li").with_text("b"));
        assert_eq!(md(&list), "- a\n  3. x\n  4. y\n- b");
    }

    #[test]
    fn test_ordered_list_start_at_usize_max() {
        let list = Node::element("ol")
            .with_attr("start", &usize::MAX.to_string())
            .with_child(Node::element("li").with_text("a"))
            .with_child(Node::element("li").with_text("b"));
        let max = usize::MAX;
        assert_eq!(md(&list), format!("{max}. a\n{max}. b"));
    }

    #[test]
    fn test_inline_formatting_keeps_whitespace_outside_markers() {
        let p = Node::element("p")
            .with_text("a")
            .with_child(Node::element("strong").with_text(" bold "))
            .with_text("and")
            .with_child(Node::element("em").with_text("it"))
            .with_child(Node::element("del").with_text("gone"));
        assert_eq!(md(&p), "a **bold** and*it*~~gone~~");
    }

    #[test]
    fn test_links_and_images() {
        let p = Node::element("p")
            .with_child(
                Node::element("a")
                    .with_attr("href", "https://example.com/x")
                    .with_attr("title", "X")
                    .with_text("site"),
            )
            .with_text(" ")
            .with_child(Node::element("img").with_attr("src", "a b.png").with_attr("alt", "pic"))
            .with_text(" ")
            .with_child(Node::element("a").with_text("no href"));
        assert_eq!(
            md(&p),
            "[site](https://example.com/x \"X\") ![pic](<a b.png>) no href"
        );
    }

    #[test]
    fn test_code_block_with_language() {
        let pre = Node::element("pre").with_child(
            Node::element("code")
                .with_attr("class", "language-rust")
                .with_text("\nfn main() {\n\n    let a_b = 1;\n}\n"),
        );
        assert_eq!(md(&pre), "```rust\nfn main() {\n\n    let a_b = 1;\n}\n```");
    }

    #[test]
    fn test_inline_code_is_not_escaped() {
        let p = Node::element("p")
            .with_text("use ")
            .with_child(Node::element("code").with_text("a_b*c"));
        assert_eq!(md(&p), "use `a_b*c`");
    }

    #[test]
    fn test_block_quote() {
        let quote = Node::element("blockquote")
            .with_child(Node::element("p").with_text("one"))
            .with_child(Node::element("p").with_text("two"));
        assert_eq!(md(&quote), "> one\n>\n> two");
    }

    #[test]
    fn test_horizontal_rule() {
        let body = Node::element("body")
            .with_child(Node::element("p").with_text("a"))
            .with_child(Node::element("hr"))
            .with_child(Node::element("p").with_text("b"));
        assert_eq!(md(&body), "a\n\n---\n\nb");
    }

    #[test]
    fn test_division_is_plain_concatenation() {
        let div = Node::element("div")
            .with_child(Node::element("span").with_text("x"))
            .with_text("y");
        assert_eq!(md(&div), "xy");
    }

    #[test]
    fn test_orphan_list_item_gets_a_bullet() {
        let li = Node::element("li").with_text("alone");
        assert_eq!(md(&li), "- alone");
    }
}
