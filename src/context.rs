//! Conversion context.
//!
//! The context is passed explicitly to every conversion call. A node's
//! children always receive `ctx.enter(node.kind())`, a fresh value; a context
//! is never modified after construction, so sibling calls cannot observe each
//! other's state.

use crate::node::TagKind;

/// Ancestor chain and inline/block flag for one conversion call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    ancestors: Vec<TagKind>,
    inline: bool,
}

impl Context {
    /// Context of the document root: no ancestors, block mode.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Context for the children of a node of `kind`.
    #[must_use]
    pub fn enter(&self, kind: TagKind) -> Self {
        let mut ancestors = Vec::with_capacity(self.ancestors.len() + 1);
        ancestors.extend_from_slice(&self.ancestors);
        ancestors.push(kind);
        Self {
            ancestors,
            inline: self.inline || kind.forces_inline(),
        }
    }

    /// Ancestor kinds, root first.
    #[must_use]
    pub fn ancestors(&self) -> &[TagKind] {
        &self.ancestors
    }

    /// Kind of the immediate parent.
    #[must_use]
    pub fn parent(&self) -> Option<TagKind> {
        self.ancestors.last().copied()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// True when block-level output is not allowed here.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.inline
    }

    #[must_use]
    pub fn has_ancestor(&self, kind: TagKind) -> bool {
        self.ancestors.contains(&kind)
    }

    /// True when some ancestor is a `<th>` or `<td>`.
    #[must_use]
    pub fn in_table_cell(&self) -> bool {
        self.ancestors.iter().any(|k| k.is_table_cell())
    }

    #[must_use]
    pub fn in_heading(&self) -> bool {
        self.ancestors.iter().any(|k| matches!(k, TagKind::Heading(_)))
    }

    /// Inside `<pre>`: whitespace is significant.
    #[must_use]
    pub fn in_preformatted(&self) -> bool {
        self.has_ancestor(TagKind::Preformatted)
    }

    /// Inside `<pre>` or inline code: text is taken literally.
    #[must_use]
    pub fn in_code(&self) -> bool {
        self.ancestors
            .iter()
            .any(|k| matches!(k, TagKind::Code | TagKind::Preformatted))
    }
}
