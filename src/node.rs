//! Node model.
//!
//! An immutable, owned view of a parsed HTML tree. Every element owns its
//! children; there are no parent pointers. Upward questions ("is this node
//! inside a table cell?") are answered by the [`Context`](crate::Context)
//! threaded through conversion, which carries the ancestor chain.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::tags::{
    heading_level, CODE_TAG_SET, DIVISION_TAG_SET, EMPHASIS_TAG_SET, STRIKE_TAG_SET,
    STRONG_TAG_SET, VOID_TAG_SET,
};

/// Closed set of node kinds the converter dispatches on.
///
/// Tags without a dedicated kind map to [`TagKind::Other`] and are rendered by
/// the fallback rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// Text node.
    Text,
    /// `<p>`
    Paragraph,
    /// `<h1>`..`<h6>` with level 1-6.
    Heading(u8),
    /// `<table>`
    Table,
    /// `<thead>`
    TableHead,
    /// `<tbody>`
    TableBody,
    /// `<tfoot>`
    TableFoot,
    /// `<tr>`
    TableRow,
    /// `<th>`
    TableHeaderCell,
    /// `<td>`
    TableDataCell,
    /// `<caption>`
    Caption,
    /// `<ol>`
    OrderedList,
    /// `<ul>`
    UnorderedList,
    /// `<li>`
    ListItem,
    /// `<div>` and other generic containers.
    Division,
    /// `<blockquote>`
    BlockQuote,
    /// `<pre>`
    Preformatted,
    /// `<code>`, `<kbd>`, `<samp>`, `<tt>`
    Code,
    /// `<em>`, `<i>`
    Emphasis,
    /// `<strong>`, `<b>`
    Strong,
    /// `<s>`, `<del>`, `<strike>`
    Strikethrough,
    /// `<a>`
    Link,
    /// `<img>`
    Image,
    /// `<br>`
    LineBreak,
    /// `<hr>`
    HorizontalRule,
    /// Any tag without a dedicated rule.
    Other,
}

impl TagKind {
    /// Map a (case-insensitive) tag name to its kind.
    #[must_use]
    pub fn from_tag_name(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        let name = name.as_str();
        if let Some(level) = heading_level(name) {
            return Self::Heading(level);
        }
        match name {
            "p" => Self::Paragraph,
            "table" => Self::Table,
            "thead" => Self::TableHead,
            "tbody" => Self::TableBody,
            "tfoot" => Self::TableFoot,
            "tr" => Self::TableRow,
            "th" => Self::TableHeaderCell,
            "td" => Self::TableDataCell,
            "caption" => Self::Caption,
            "ol" => Self::OrderedList,
            "ul" => Self::UnorderedList,
            "li" => Self::ListItem,
            "blockquote" => Self::BlockQuote,
            "pre" => Self::Preformatted,
            "a" => Self::Link,
            "img" => Self::Image,
            "br" => Self::LineBreak,
            "hr" => Self::HorizontalRule,
            _ if DIVISION_TAG_SET.contains(name) => Self::Division,
            _ if CODE_TAG_SET.contains(name) => Self::Code,
            _ if EMPHASIS_TAG_SET.contains(name) => Self::Emphasis,
            _ if STRONG_TAG_SET.contains(name) => Self::Strong,
            _ if STRIKE_TAG_SET.contains(name) => Self::Strikethrough,
            _ => Self::Other,
        }
    }

    /// Table grammar kinds: table, sections, rows, cells and caption.
    #[must_use]
    pub fn is_table_structure(self) -> bool {
        matches!(
            self,
            Self::Table
                | Self::TableHead
                | Self::TableBody
                | Self::TableFoot
                | Self::TableRow
                | Self::TableHeaderCell
                | Self::TableDataCell
                | Self::Caption
        )
    }

    /// `<thead>`, `<tbody>` or `<tfoot>`.
    #[must_use]
    pub fn is_table_section(self) -> bool {
        matches!(self, Self::TableHead | Self::TableBody | Self::TableFoot)
    }

    /// `<th>` or `<td>`.
    #[must_use]
    pub fn is_table_cell(self) -> bool {
        matches!(self, Self::TableHeaderCell | Self::TableDataCell)
    }

    /// `<ol>` or `<ul>`.
    #[must_use]
    pub fn is_list(self) -> bool {
        matches!(self, Self::OrderedList | Self::UnorderedList)
    }

    /// Whether the children of this kind are rendered in inline mode, i.e.
    /// may not produce block-level output of their own.
    #[must_use]
    pub fn forces_inline(self) -> bool {
        matches!(
            self,
            Self::Paragraph
                | Self::Heading(_)
                | Self::TableHeaderCell
                | Self::TableDataCell
                | Self::Caption
                | Self::Code
                | Self::Emphasis
                | Self::Strong
                | Self::Strikethrough
                | Self::Link
                | Self::Image
        )
    }
}

/// One node of the parsed input tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: TagKind,
    tag: String,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    children: Vec<Node>,
}

impl Node {
    /// Create an element node. The kind is derived from the tag name.
    #[must_use]
    pub fn element(tag: &str) -> Self {
        Self {
            kind: TagKind::from_tag_name(tag),
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Create a text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: TagKind::Text,
            tag: "#text".to_string(),
            attributes: BTreeMap::new(),
            text: Some(text.into()),
            children: Vec::new(),
        }
    }

    /// Parse an HTML string and return its `<body>` as a node tree.
    ///
    /// ```rust
    /// use pagemark::{Node, TagKind};
    ///
    /// let body = Node::from_html("<p>Hello</p>");
    /// assert_eq!(body.children()[0].kind(), TagKind::Paragraph);
    /// ```
    #[must_use]
    pub fn from_html(html: &str) -> Self {
        crate::dom::parse_body(html)
    }

    /// Builder: set an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Builder: append one child.
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Builder: append several children.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Builder: append a text child.
    #[must_use]
    pub fn with_text(self, text: &str) -> Self {
        self.with_child(Node::text(text))
    }

    pub(crate) fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    #[must_use]
    pub fn kind(&self) -> TagKind {
        self.kind
    }

    /// Lowercase tag name, `#text` for text nodes.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Text of a text node; `None` for elements.
    #[must_use]
    pub fn text_value(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        self.kind == TagKind::Text
    }

    /// A text node containing only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.as_deref().is_some_and(|t| t.trim().is_empty())
    }

    /// Concatenated text of this node and all descendants. `<br>` contributes
    /// a newline.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(text) = &node.text {
                out.push_str(text);
            } else if node.kind == TagKind::LineBreak {
                out.push('\n');
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Serialize the subtree as compact HTML on a single line.
    ///
    /// Whitespace runs in text collapse to one space, so the result never
    /// contains a newline.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        if let Some(text) = &self.text {
            let collapsed = crate::patterns::WHITESPACE_RUN.replace_all(text, " ");
            out.push_str(&escape_html(&collapsed));
            return;
        }
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {name}=\"{}\"", escape_html(value).replace('"', "&quot;"));
        }
        out.push('>');
        if VOID_TAG_SET.contains(self.tag.as_str()) {
            return;
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
