//! Error types for pagemark.
//!
//! Only document-level failures are errors. Per-node problems (malformed
//! tables, overly deep trees) degrade to fallback rendering and never surface
//! here.

/// Error type for document assembly.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The settings record violates one of its invariants.
    #[error("invalid settings for page {page_id}: {source}")]
    InvalidSettings {
        /// Identifier of the page being assembled.
        page_id: String,
        /// The violated invariant.
        #[source]
        source: SettingsError,
    },

    /// A configured front matter field could not be read from the page.
    #[error("page {page_id}: front matter field `{field}` is missing")]
    MissingField {
        /// Identifier of the page being assembled.
        page_id: String,
        /// Front matter key that has no value.
        field: &'static str,
    },

    /// The page source reference is not an absolute URL.
    #[error("page {page_id}: invalid source reference `{value}`: {source}")]
    InvalidSource {
        /// Identifier of the page being assembled.
        page_id: String,
        /// The rejected source reference.
        value: String,
        /// Underlying URL parse failure.
        #[source]
        source: url::ParseError,
    },
}

impl Error {
    /// Identifier of the page the failure belongs to.
    #[must_use]
    pub fn page_id(&self) -> &str {
        match self {
            Self::InvalidSettings { page_id, .. }
            | Self::MissingField { page_id, .. }
            | Self::InvalidSource { page_id, .. } => page_id,
        }
    }
}

/// A settings invariant violated, as reported by
/// [`Settings::validate`](crate::Settings::validate).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("cell_line_break must not be blank")]
    BlankCellLineBreak,

    #[error("cell_line_break {0:?} must not contain a newline or a pipe")]
    InvalidCellLineBreak(String),

    #[error("breadcrumb_separator {0:?} must be a non-empty single line")]
    InvalidBreadcrumbSeparator(String),

    #[error("bullet {0:?} must be one of '-', '*', '+'")]
    InvalidBullet(char),

    #[error("max_depth must be at least 1")]
    ZeroMaxDepth,

    #[error("front matter field `{0}` listed twice")]
    DuplicateFrontMatterField(&'static str),
}

/// Result type alias for assembly operations.
pub type Result<T> = std::result::Result<T, Error>;
