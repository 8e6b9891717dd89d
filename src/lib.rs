//! # pagemark
//!
//! Converts wiki page bodies into Markdown documents, with table-aware
//! rendering.
//!
//! Pages arrive as HTML (or as an already built [`Node`] tree). Each node is
//! converted by a rule chosen from its kind and its context; inside a table
//! cell, block content is flattened so that every row stays on one line.
//! [`assemble`] wraps the converted body with front matter and an optional
//! breadcrumb trail.
//!
//! ## Quick Start
//!
//! ```rust
//! use pagemark::{convert_html, Settings};
//!
//! let html = "<table><tr><th>Step</th></tr>\
//!             <tr><td><p>Open</p><p>Save</p></td></tr></table>";
//! let markdown = convert_html(html, &Settings::default());
//! assert_eq!(markdown, "| Step |\n| --- |\n| Open<br/>Save |");
//! ```
//!
//! ## Features
//!
//! - **Tables**: header detection, alignment, colspan, pipe escaping
//! - **Cells**: paragraphs, lists, code and line breaks joined with a marker
//! - **Nested tables**: flattened to text or kept as inline HTML
//! - **Documents**: front matter and breadcrumbs from page metadata

mod context;
mod converter;
mod document;
mod error;
mod node;
mod patterns;
mod settings;
mod tags;

/// HTML parsing into [`Node`] trees.
pub mod dom;

/// Markdown text helpers (escaping, code spans, table cells).
pub mod markdown;

// Public API - re-exports
pub use context::Context;
pub use converter::{Converter, Region, Scope};
pub use document::{assemble, Document, PageInfo};
pub use error::{Error, Result, SettingsError};
pub use node::{Node, TagKind};
pub use settings::{FrontMatterField, NestedTablePolicy, NewlineStyle, Settings};

/// Converts a node tree to Markdown using default settings.
///
/// # Example
///
/// ```rust
/// use pagemark::{convert, Node};
///
/// let body = Node::element("body")
///     .with_child(Node::element("h1").with_text("Title"))
///     .with_child(Node::element("p").with_text("Body text"));
/// assert_eq!(convert(&body), "# Title\n\nBody text");
/// ```
#[must_use]
pub fn convert(node: &Node) -> String {
    convert_with_settings(node, &Settings::default())
}

/// Converts a node tree to Markdown with custom settings.
///
/// The settings are used as given; [`Settings::validate`] is only enforced
/// by [`assemble`].
///
/// # Example
///
/// ```rust
/// use pagemark::{convert_with_settings, Node, Settings};
///
/// let settings = Settings {
///     bullet: '*',
///     ..Settings::default()
/// };
/// let list = Node::element("ul").with_child(Node::element("li").with_text("one"));
/// assert_eq!(convert_with_settings(&list, &settings), "* one");
/// ```
#[must_use]
pub fn convert_with_settings(node: &Node, settings: &Settings) -> String {
    Converter::new(settings).convert_body(node)
}

/// Parses an HTML string and converts its body to Markdown.
#[must_use]
pub fn convert_html(html: &str, settings: &Settings) -> String {
    convert_with_settings(&Node::from_html(html), settings)
}
