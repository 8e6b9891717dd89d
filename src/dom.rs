//! HTML adapter.
//!
//! Builds the owned [`Node`] tree from a string that has already been fetched,
//! using the `dom_query` crate for parsing. The parser fixes up malformed
//! markup (unclosed paragraphs, rows outside `<tbody>`, …) the way browsers
//! do. Comments, doctypes and non-content elements such as `<script>` are
//! dropped.

pub use dom_query::{Document, NodeRef};

// Text handed out by dom_query
pub use tendril::StrTendril;

use log::warn;

use crate::node::Node;
use crate::tags::DROPPED_TAG_SET;

/// Nesting depth below `<body>` kept as structure. Deeper subtrees are
/// collapsed into a single text node.
pub const MAX_TREE_DEPTH: usize = 256;

/// Parse `html` and return its `<body>` element as a node tree.
///
/// A fragment without `<html>`/`<body>` is wrapped by the parser, so the
/// result is always a `body` element.
#[must_use]
pub fn parse_body(html: &str) -> Node {
    let document = Document::from(html);
    let body = document.select("body");
    body.nodes()
        .first()
        .and_then(build)
        .unwrap_or_else(|| Node::element("body"))
}

/// Convert one dom_query node (and its subtree) into a [`Node`].
///
/// Returns `None` for nodes that carry no content.
#[must_use]
pub fn build(node: &NodeRef) -> Option<Node> {
    build_at(node, 0)
}

fn build_at(node: &NodeRef, depth: usize) -> Option<Node> {
    if node.is_text() {
        let text: StrTendril = node.text();
        return Some(Node::text(text.to_string()));
    }
    if !node.is_element() {
        return None;
    }

    let name = node.node_name()?.to_ascii_lowercase();
    if DROPPED_TAG_SET.contains(name.as_str()) {
        return None;
    }
    if depth >= MAX_TREE_DEPTH {
        warn!("<{name}> nested deeper than {MAX_TREE_DEPTH} levels; keeping its text only");
        return Some(Node::text(flat_text(node)));
    }

    let mut element = Node::element(&name);
    for attr in node.attrs().iter() {
        element = element.with_attr(&attr.name.local, &attr.value);
    }
    for child in node.children() {
        if let Some(converted) = build_at(&child, depth + 1) {
            element.push_child(converted);
        }
    }
    Some(element)
}

/// Text of a subtree, walked with an explicit stack. `<br>` becomes a
/// newline.
fn flat_text(node: &NodeRef) -> String {
    let mut out = String::new();
    let mut stack = vec![node.clone()];
    while let Some(current) = stack.pop() {
        if current.is_text() {
            out.push_str(&current.text());
            continue;
        }
        if !current.is_element() {
            continue;
        }
        let name = current
            .node_name()
            .map(|n| n.to_ascii_lowercase())
            .unwrap_or_default();
        if DROPPED_TAG_SET.contains(name.as_str()) {
            continue;
        }
        if name == "br" {
            out.push('\n');
        }
        stack.extend(current.children().into_iter().rev());
    }
    out
}
