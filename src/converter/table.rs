//! Table-region rules.
//!
//! These rules emit GFM table grammar for table structure and keep every
//! block inside a cell on one line: wherever the generic rule would emit a
//! line break, the cell rules emit `Settings::cell_line_break` instead.
//!
//! Each in-cell rule re-checks the ancestor chain and hands the node back to
//! its generic rule when it is not inside a cell. Structural rules do the same
//! when the structure is malformed (a cell outside a row, a row outside a
//! table), so a broken table degrades to plain blocks and keeps its text.

use log::debug;

use crate::markdown::{
    code_span, flatten_cell, format_separator, pad_cell, trim_markers, Alignment,
};
use crate::node::{Node, TagKind};
use crate::patterns::WHITESPACE_RUN;
use crate::settings::{NestedTablePolicy, Settings};

use super::{Rule, Scope};

/// Table-region override for `kind`, if there is one.
pub(crate) fn rule_for(kind: TagKind) -> Option<Rule> {
    let rule: Rule = match kind {
        TagKind::Table => table,
        TagKind::TableHead | TagKind::TableBody | TagKind::TableFoot => section,
        TagKind::TableRow => row,
        TagKind::TableHeaderCell | TagKind::TableDataCell => cell,
        TagKind::Caption => caption,
        TagKind::Paragraph | TagKind::Heading(_) => paragraph,
        TagKind::OrderedList | TagKind::UnorderedList => list,
        TagKind::ListItem => list_item,
        TagKind::LineBreak | TagKind::HorizontalRule => line_break,
        TagKind::Preformatted => preformatted,
        TagKind::BlockQuote => block_quote,
        _ => return None,
    };
    Some(rule)
}

struct Cell {
    text: String,
    span: usize,
    align: Alignment,
    header: bool,
}

struct Row {
    cells: Vec<Cell>,
    header: bool,
}

impl Row {
    /// Cell texts and alignments with colspans expanded to empty cells.
    fn expanded(&self) -> (Vec<String>, Vec<Alignment>) {
        let mut texts = Vec::new();
        let mut aligns = Vec::new();
        for cell in &self.cells {
            texts.push(cell.text.clone());
            aligns.push(cell.align);
            for _ in 1..cell.span {
                texts.push(String::new());
                aligns.push(Alignment::None);
            }
        }
        (texts, aligns)
    }
}

#[derive(Default)]
struct Layout {
    caption: Option<String>,
    rows: Vec<Row>,
    stray: Vec<String>,
}

fn marker(scope: &Scope<'_>) -> String {
    scope.settings().cell_line_break.clone()
}

fn table(scope: &Scope<'_>) -> String {
    if scope.context().in_table_cell() {
        return nested_table(scope);
    }

    let layout = collect_layout(scope);
    let lines = grid_lines(&layout.rows, scope.settings());
    if lines.is_empty() {
        debug!("table without rows contributes no grid");
    }

    let mut blocks = Vec::new();
    blocks.extend(layout.caption);
    if !lines.is_empty() {
        blocks.push(lines.join("\n"));
    }
    blocks.extend(layout.stray);

    if blocks.is_empty() {
        String::new()
    } else {
        format!("\n\n{}\n\n", blocks.join("\n\n"))
    }
}

fn nested_table(scope: &Scope<'_>) -> String {
    let marker = marker(scope);
    match scope.settings().nested_tables {
        NestedTablePolicy::InlineHtml => format!("{marker}{}{marker}", scope.node().to_html()),
        NestedTablePolicy::Flatten => {
            let layout = collect_layout(scope);
            let mut lines: Vec<String> = layout.caption.into_iter().collect();
            for row in &layout.rows {
                let text = row
                    .cells
                    .iter()
                    .map(|c| c.text.as_str())
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                if !text.is_empty() {
                    lines.push(text);
                }
            }
            lines.extend(layout.stray.iter().map(|s| flatten_cell(s, &marker)));
            if lines.is_empty() {
                String::new()
            } else {
                format!("{marker}{}{marker}", lines.join(marker.as_str()))
            }
        }
    }
}

fn collect_layout(scope: &Scope<'_>) -> Layout {
    let mut layout = Layout::default();
    for child in scope.node().children().iter().filter(|c| !c.is_blank()) {
        match child.kind() {
            TagKind::Caption => {
                let caption = scope.descend(child, |c| c.render());
                if !caption.is_empty() {
                    layout.caption = Some(caption);
                }
            }
            TagKind::TableRow => {
                let row = scope.descend(child, |r| collect_row(r, false));
                if !row.cells.is_empty() {
                    layout.rows.push(row);
                }
            }
            kind if kind.is_table_section() => {
                let in_head = kind == TagKind::TableHead;
                scope.descend(child, |section| {
                    for grand in section.node().children().iter().filter(|c| !c.is_blank()) {
                        if grand.kind() == TagKind::TableRow {
                            let row = section.descend(grand, |r| collect_row(r, in_head));
                            if !row.cells.is_empty() {
                                layout.rows.push(row);
                            }
                        } else {
                            push_stray(&mut layout.stray, section.descend(grand, |n| n.render()));
                        }
                    }
                });
            }
            _ => push_stray(&mut layout.stray, scope.descend(child, |n| n.render())),
        }
    }
    layout
}

fn push_stray(stray: &mut Vec<String>, text: String) {
    let text = text.trim();
    if !text.is_empty() {
        stray.push(text.to_string());
    }
}

fn collect_row(scope: &Scope<'_>, in_head: bool) -> Row {
    let marker = marker(scope);
    let mut cells = Vec::new();
    for child in scope.node().children().iter().filter(|c| !c.is_blank()) {
        let text = scope.descend(child, |c| c.render());
        if child.kind().is_table_cell() {
            cells.push(Cell {
                text,
                span: colspan(child),
                align: Alignment::of(child),
                header: child.kind() == TagKind::TableHeaderCell,
            });
        } else {
            let text = flatten_cell(&text, &marker);
            if !text.is_empty() {
                cells.push(Cell {
                    text,
                    span: 1,
                    align: Alignment::None,
                    header: false,
                });
            }
        }
    }
    let header = in_head || (!cells.is_empty() && cells.iter().all(|c| c.header));
    Row { cells, header }
}

fn colspan(cell: &Node) -> usize {
    cell.attr("colspan")
        .and_then(|s| s.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, 1000)
}

/// Header line, separator line and one line per body row.
fn grid_lines(rows: &[Row], settings: &Settings) -> Vec<String> {
    let grid: Vec<(Vec<String>, Vec<Alignment>)> = rows.iter().map(Row::expanded).collect();
    let columns = grid.iter().map(|(texts, _)| texts.len()).max().unwrap_or(0);
    let Some((first_texts, first_aligns)) = grid.first() else {
        return Vec::new();
    };
    if columns == 0 {
        return Vec::new();
    }

    let (header, body) = if rows[0].header {
        (first_texts.clone(), &grid[1..])
    } else {
        (vec![String::new(); columns], &grid[..])
    };

    let mut aligns = first_aligns.clone();
    aligns.resize(columns, Alignment::None);

    let mut widths = vec![3usize; columns];
    if settings.normalize_table_widths {
        for texts in std::iter::once(&header).chain(body.iter().map(|(texts, _)| texts)) {
            for (width, text) in widths.iter_mut().zip(texts) {
                *width = (*width).max(text.chars().count());
            }
        }
    }

    let format_row = |texts: &[String]| -> String {
        let mut line = String::from("|");
        for col in 0..columns {
            let text = texts.get(col).map_or("", String::as_str);
            line.push(' ');
            if settings.normalize_table_widths {
                line.push_str(&pad_cell(text, widths[col], aligns[col]));
            } else {
                line.push_str(text);
            }
            line.push_str(" |");
        }
        line
    };

    let mut separator = String::from("|");
    for col in 0..columns {
        separator.push(' ');
        separator.push_str(&format_separator(widths[col], aligns[col]));
        separator.push_str(" |");
    }

    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(format_row(&header));
    lines.push(separator);
    lines.extend(body.iter().map(|(texts, _)| format_row(texts)));
    lines
}

fn row_line(row: &Row) -> String {
    let (texts, _) = row.expanded();
    let mut line = String::from("|");
    for text in texts {
        line.push(' ');
        line.push_str(&text);
        line.push_str(" |");
    }
    line
}

/// A section converted on its own: one line per row, no header.
fn section(scope: &Scope<'_>) -> String {
    if scope.context().parent() != Some(TagKind::Table) {
        debug!("<{}> outside a table; rendering as a block", scope.node().tag());
        return scope.base();
    }
    let in_head = scope.node().kind() == TagKind::TableHead;
    let lines: Vec<String> = scope
        .node()
        .children()
        .iter()
        .filter(|c| c.kind() == TagKind::TableRow)
        .map(|r| scope.descend(r, |row| row_line(&collect_row(row, in_head))))
        .collect();
    lines.join("\n")
}

fn row(scope: &Scope<'_>) -> String {
    let parent_ok = scope
        .context()
        .parent()
        .is_some_and(|p| p == TagKind::Table || p.is_table_section());
    if !parent_ok {
        debug!("<tr> outside a table; rendering as a block");
        return scope.base();
    }
    row_line(&collect_row(scope, false))
}

fn cell(scope: &Scope<'_>) -> String {
    if scope.context().parent() != Some(TagKind::TableRow) {
        debug!("<{}> outside a table row; rendering as a block", scope.node().tag());
        return scope.base();
    }
    flatten_cell(&scope.children(), &marker(scope))
}

fn caption(scope: &Scope<'_>) -> String {
    if scope.context().parent() != Some(TagKind::Table) {
        return scope.base();
    }
    WHITESPACE_RUN.replace_all(scope.children().trim(), " ").into_owned()
}

/// Paragraphs and headings: content followed by a marker instead of a blank
/// line.
fn paragraph(scope: &Scope<'_>) -> String {
    if !scope.context().in_table_cell() {
        return scope.base();
    }
    let content = scope.children();
    let content = content.trim();
    if content.is_empty() {
        String::new()
    } else {
        format!("{content}{}", marker(scope))
    }
}

fn list(scope: &Scope<'_>) -> String {
    if !scope.context().in_table_cell() {
        return scope.base();
    }
    let marker = marker(scope);
    let node = scope.node();
    let ordered = node.kind() == TagKind::OrderedList;
    let mut number = node
        .attr("start")
        .and_then(|s| s.trim().parse::<usize>().ok())
        .unwrap_or(1);
    let bullet = scope.settings().bullet;

    let mut items = Vec::new();
    for child in node.children().iter().filter(|c| !c.is_blank()) {
        let rendered = scope.descend(child, |item| item.render());
        let content = trim_markers(&rendered, &marker);
        if child.kind() == TagKind::ListItem {
            if !content.is_empty() {
                if ordered {
                    items.push(format!("{number}. {content}"));
                } else {
                    items.push(format!("{bullet} {content}"));
                }
            }
            number = number.saturating_add(1);
        } else if !content.is_empty() {
            items.push(content.to_string());
        }
    }

    if items.is_empty() {
        String::new()
    } else {
        format!("{marker}{}{marker}", items.join(marker.as_str()))
    }
}

fn list_item(scope: &Scope<'_>) -> String {
    if !scope.context().in_table_cell() {
        return scope.base();
    }
    let marker = marker(scope);
    let rendered = scope.children();
    let content = trim_markers(&rendered, &marker);
    if scope.context().parent().is_some_and(TagKind::is_list) || content.is_empty() {
        content.to_string()
    } else {
        format!("{} {content}{marker}", scope.settings().bullet)
    }
}

fn line_break(scope: &Scope<'_>) -> String {
    if !scope.context().in_table_cell() {
        return scope.base();
    }
    marker(scope)
}

/// Code blocks become one code span per non-blank line.
fn preformatted(scope: &Scope<'_>) -> String {
    if !scope.context().in_table_cell() {
        return scope.base();
    }
    let marker = marker(scope);
    let raw = scope.node().text_content();
    let spans: Vec<String> = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(code_span)
        .collect();
    if spans.is_empty() {
        String::new()
    } else {
        format!("{marker}{}{marker}", spans.join(marker.as_str()))
    }
}

fn block_quote(scope: &Scope<'_>) -> String {
    if !scope.context().in_table_cell() {
        return scope.base();
    }
    let marker = marker(scope);
    let rendered = scope.children();
    let content = trim_markers(&rendered, &marker);
    if content.is_empty() {
        String::new()
    } else {
        format!("{marker}{content}{marker}")
    }
}
