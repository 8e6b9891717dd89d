//! Tree-to-Markdown conversion engine.
//!
//! # Module Structure
//!
//! - `base`: generic rules, one per [`TagKind`]
//! - `table`: table-region rules overriding the generic ones for table
//!   structure and for block kinds inside table cells
//!
//! # Dispatch
//!
//! Every rule has the same shape, [`Rule`]: it receives a [`Scope`] (node,
//! context, settings, and the means to convert children) and returns text.
//! [`Region::select`] picks the rule set for a node from its kind and its
//! context alone, so entering a table switches rules only for that subtree.
//! The table region only lists the kinds it overrides; everything else
//! resolves to the base rule, which exists for every kind.

pub(crate) mod base;
pub(crate) mod table;

use log::warn;

use crate::context::Context;
use crate::markdown::{escape_markdown, flatten_cell, normalize_blank_lines};
use crate::node::{Node, TagKind};
use crate::patterns::WHITESPACE_RUN;
use crate::settings::Settings;

/// Uniform signature of every conversion rule.
pub(crate) type Rule = fn(&Scope<'_>) -> String;

/// Rule set a node is converted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Generic rules.
    Base,
    /// Table rules first, generic rules for everything they do not override.
    Table,
}

impl Region {
    /// Rule set for a node of `kind` converted in `ctx`.
    ///
    /// Table structure always uses the table region; any other node does so
    /// only while some ancestor is a table cell.
    #[must_use]
    pub fn select(kind: TagKind, ctx: &Context) -> Self {
        if kind.is_table_structure() || ctx.in_table_cell() {
            Self::Table
        } else {
            Self::Base
        }
    }

    fn rule_for(self, kind: TagKind) -> Rule {
        match self {
            Self::Base => base::rule_for(kind),
            Self::Table => table::rule_for(kind).unwrap_or_else(|| base::rule_for(kind)),
        }
    }
}

/// Converts node trees to Markdown under a fixed set of settings.
///
/// A converter holds no state besides the settings reference, so one value
/// can convert any number of trees, from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct Converter<'s> {
    settings: &'s Settings,
}

impl<'s> Converter<'s> {
    #[must_use]
    pub fn new(settings: &'s Settings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &'s Settings {
        self.settings
    }

    /// Convert `node`, whose ancestors are described by `ctx`.
    ///
    /// Nodes deeper than `Settings::max_depth` are emitted as plain text.
    #[must_use]
    pub fn convert(&self, node: &Node, ctx: &Context) -> String {
        if ctx.depth() > self.settings.max_depth {
            warn!(
                "<{}> at depth {} exceeds max_depth {}; emitting plain text",
                node.tag(),
                ctx.depth(),
                self.settings.max_depth
            );
            return self.plain_text(node, ctx);
        }

        let scope = Scope {
            converter: self,
            node,
            ctx,
        };
        let rule = Region::select(node.kind(), ctx).rule_for(node.kind());
        rule(&scope)
    }

    /// Convert a whole body and normalize its blank lines.
    #[must_use]
    pub fn convert_body(&self, root: &Node) -> String {
        normalize_blank_lines(&self.convert(root, &Context::root()))
    }

    /// Depth fallback. Text bound for a table cell still goes through
    /// `flatten_cell` so it cannot add a column.
    fn plain_text(&self, node: &Node, ctx: &Context) -> String {
        let text = node.text_content();
        let collapsed = WHITESPACE_RUN.replace_all(&text, " ");
        let escaped = escape_markdown(&collapsed, ctx.in_code() || !self.settings.escape_special_chars);
        if node.kind().is_table_cell() || ctx.in_table_cell() {
            flatten_cell(&escaped, &self.settings.cell_line_break)
        } else {
            escaped
        }
    }
}

/// Everything a rule may look at for one node.
pub struct Scope<'a> {
    converter: &'a Converter<'a>,
    node: &'a Node,
    ctx: &'a Context,
}

impl<'a> Scope<'a> {
    #[must_use]
    pub fn node(&self) -> &'a Node {
        self.node
    }

    /// Context of this node (its ancestors, not including itself).
    #[must_use]
    pub fn context(&self) -> &'a Context {
        self.ctx
    }

    #[must_use]
    pub fn settings(&self) -> &'a Settings {
        self.converter.settings
    }

    /// Whether block-level output is forbidden for this node.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.ctx.is_inline()
    }

    /// Converted children, concatenated in order.
    #[must_use]
    pub fn children(&self) -> String {
        let child_ctx = self.ctx.enter(self.node.kind());
        self.node
            .children()
            .iter()
            .map(|child| self.converter.convert(child, &child_ctx))
            .collect()
    }

    /// Run `f` with the scope of `child`, a child of this node.
    pub fn descend<R>(&self, child: &Node, f: impl FnOnce(&Scope<'_>) -> R) -> R {
        let child_ctx = self.ctx.enter(self.node.kind());
        let scope = Scope {
            converter: self.converter,
            node: child,
            ctx: &child_ctx,
        };
        f(&scope)
    }

    /// Convert this node through normal dispatch.
    #[must_use]
    pub fn render(&self) -> String {
        self.converter.convert(self.node, self.ctx)
    }

    /// Convert this node with its generic rule, bypassing any region
    /// override.
    #[must_use]
    pub fn base(&self) -> String {
        base::rule_for(self.node.kind())(self)
    }
}
