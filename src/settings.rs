//! Configuration for page conversion.
//!
//! The `Settings` struct controls front matter, breadcrumbs and Markdown
//! presentation. It is plain data: an external persistence layer can load it
//! from JSON (missing keys take their defaults) and hand it to
//! [`assemble`](crate::assemble).

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Page metadata fields that can appear in the front matter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontMatterField {
    /// Page title. Required when configured.
    Title,
    /// Page identifier. Required when configured.
    Id,
    /// Space (or section) key.
    Space,
    /// Absolute URL of the source page.
    Source,
    /// Last author.
    Author,
    /// Last modification time, RFC 3339.
    Updated,
    /// Page labels, as a list.
    Labels,
}

impl FrontMatterField {
    /// Key written in the front matter block.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Id => "id",
            Self::Space => "space",
            Self::Source => "source",
            Self::Author => "author",
            Self::Updated => "updated",
            Self::Labels => "labels",
        }
    }
}

/// How a table nested inside another table's cell is rendered.
///
/// GFM has no nested table syntax, so the inner table is either flattened to
/// cell text or kept as inline HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestedTablePolicy {
    /// Cells of a row joined by a space, rows joined by the cell line break.
    #[default]
    Flatten,
    /// The inner table serialized as single-line HTML.
    InlineHtml,
}

/// Hard line break syntax outside tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewlineStyle {
    /// Two trailing spaces.
    #[default]
    Spaces,
    /// Trailing backslash.
    Backslash,
}

impl NewlineStyle {
    #[must_use]
    pub fn hard_break(self) -> &'static str {
        match self {
            Self::Spaces => "  \n",
            Self::Backslash => "\\\n",
        }
    }
}

/// Configuration options for page conversion.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use pagemark::{FrontMatterField, Settings};
///
/// let settings = Settings {
///     include_breadcrumbs: true,
///     front_matter: vec![FrontMatterField::Title, FrontMatterField::Source],
///     ..Settings::default()
/// };
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Settings {
    /// Emit the ancestor page titles as a breadcrumb line after the front
    /// matter.
    ///
    /// Default: `false`
    pub include_breadcrumbs: bool,

    /// Delimiter between breadcrumb titles.
    ///
    /// Default: `" > "`
    pub breadcrumb_separator: String,

    /// Front matter fields, in output order. Empty disables the block.
    ///
    /// Default: `[Title, Id]`
    pub front_matter: Vec<FrontMatterField>,

    /// Start the body with the page title as a level 1 heading.
    ///
    /// Default: `false`
    pub include_title_heading: bool,

    /// Pad table cells so columns line up. Purely cosmetic.
    ///
    /// Default: `false`
    pub normalize_table_widths: bool,

    /// Rendering of tables nested in table cells.
    ///
    /// Default: `Flatten`
    pub nested_tables: NestedTablePolicy,

    /// Marker replacing line breaks inside table cells.
    ///
    /// Default: `"<br/>"`
    pub cell_line_break: String,

    /// Hard line break syntax outside tables.
    ///
    /// Default: `Spaces`
    pub newline_style: NewlineStyle,

    /// Unordered list marker.
    ///
    /// Default: `'-'`
    pub bullet: char,

    /// Escape Markdown special characters in text.
    ///
    /// Default: `true`
    pub escape_special_chars: bool,

    /// Maximum tree depth rendered with formatting. Deeper subtrees are
    /// emitted as plain text.
    ///
    /// Default: `256`
    pub max_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            include_breadcrumbs: false,
            breadcrumb_separator: " > ".to_string(),
            front_matter: vec![FrontMatterField::Title, FrontMatterField::Id],
            include_title_heading: false,
            normalize_table_widths: false,
            nested_tables: NestedTablePolicy::Flatten,
            cell_line_break: "<br/>".to_string(),
            newline_style: NewlineStyle::Spaces,
            bullet: '-',
            escape_special_chars: true,
            max_depth: 256,
        }
    }
}

impl Settings {
    /// Check the invariants the converter relies on.
    ///
    /// Reports the first violated invariant.
    pub fn validate(&self) -> std::result::Result<(), SettingsError> {
        if self.cell_line_break.trim().is_empty() {
            return Err(SettingsError::BlankCellLineBreak);
        }
        if self.cell_line_break.contains(['\n', '\r', '|']) {
            return Err(SettingsError::InvalidCellLineBreak(self.cell_line_break.clone()));
        }
        if self.breadcrumb_separator.is_empty() || self.breadcrumb_separator.contains(['\n', '\r']) {
            return Err(SettingsError::InvalidBreadcrumbSeparator(
                self.breadcrumb_separator.clone(),
            ));
        }
        if !matches!(self.bullet, '-' | '*' | '+') {
            return Err(SettingsError::InvalidBullet(self.bullet));
        }
        if self.max_depth == 0 {
            return Err(SettingsError::ZeroMaxDepth);
        }
        for (i, field) in self.front_matter.iter().enumerate() {
            if self.front_matter[..i].contains(field) {
                return Err(SettingsError::DuplicateFrontMatterField(field.key()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert!(!settings.include_breadcrumbs);
        assert_eq!(settings.breadcrumb_separator, " > ");
        assert_eq!(
            settings.front_matter,
            vec![FrontMatterField::Title, FrontMatterField::Id]
        );
        assert!(!settings.include_title_heading);
        assert!(!settings.normalize_table_widths);
        assert_eq!(settings.nested_tables, NestedTablePolicy::Flatten);
        assert_eq!(settings.cell_line_break, "<br/>");
        assert_eq!(settings.newline_style, NewlineStyle::Spaces);
        assert_eq!(settings.bullet, '-');
        assert!(settings.escape_special_chars);
        assert_eq!(settings.max_depth, 256);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_marker_with_newline_is_rejected() {
        let settings = Settings {
            cell_line_break: "\n".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::BlankCellLineBreak));

        let settings = Settings {
            cell_line_break: "a|b".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::InvalidCellLineBreak("a|b".to_string()))
        );
    }

    #[test]
    fn test_duplicate_front_matter_field_is_rejected() {
        let settings = Settings {
            front_matter: vec![FrontMatterField::Title, FrontMatterField::Title],
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::DuplicateFrontMatterField("title"))
        );
    }

    #[test]
    fn test_bad_bullet_and_depth_are_rejected() {
        let settings = Settings {
            bullet: '#',
            ..Settings::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            max_depth: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_hard_break_styles() {
        assert_eq!(NewlineStyle::Spaces.hard_break(), "  \n");
        assert_eq!(NewlineStyle::Backslash.hard_break(), "\\\n");
    }
}
