//! Document assembly.
//!
//! [`assemble`] turns a page body and its metadata into a [`Document`]: front
//! matter, an optional breadcrumb trail and the converted Markdown body.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::converter::Converter;
use crate::error::{Error, Result};
use crate::markdown::escape_markdown;
use crate::node::Node;
use crate::patterns::WHITESPACE_RUN;
use crate::settings::{FrontMatterField, Settings};

/// Metadata of the page being exported, resolved by the caller.
///
/// `ancestors` holds the titles of the ancestor pages, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageInfo {
    pub id: String,
    pub title: String,
    pub space: Option<String>,
    /// Absolute URL of the page at its source.
    pub source: Option<String>,
    pub author: Option<String>,
    pub updated: Option<DateTime<Utc>>,
    pub labels: Vec<String>,
    pub ancestors: Vec<String>,
}

/// An assembled page.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Front matter entries in output order.
    pub front_matter: Vec<(String, Value)>,
    /// Ancestor titles, present only when breadcrumbs are enabled.
    pub breadcrumbs: Option<Vec<String>>,
    /// Converted Markdown body.
    pub body: String,
    breadcrumb_separator: String,
}

impl Document {
    /// The breadcrumb line, if there is one to show.
    ///
    /// Whitespace runs inside a title collapse to one space, so the trail
    /// always fits on a single line.
    #[must_use]
    pub fn breadcrumb_line(&self) -> Option<String> {
        self.breadcrumbs
            .as_ref()
            .filter(|titles| !titles.is_empty())
            .map(|titles| {
                titles
                    .iter()
                    .map(|title| WHITESPACE_RUN.replace_all(title.trim(), " "))
                    .collect::<Vec<_>>()
                    .join(self.breadcrumb_separator.as_str())
            })
    }

    /// Serialize the document.
    ///
    /// Front matter block, breadcrumb line and body, each separated by one
    /// line break; empty parts are left out.
    #[must_use]
    pub fn render(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if !self.front_matter.is_empty() {
            let mut block = String::from("---\n");
            for (key, value) in &self.front_matter {
                block.push_str(key);
                block.push_str(": ");
                block.push_str(&value.to_string());
                block.push('\n');
            }
            block.push_str("---");
            parts.push(block);
        }
        if let Some(line) = self.breadcrumb_line() {
            parts.push(line);
        }
        if !self.body.is_empty() {
            parts.push(self.body.clone());
        }

        let mut out = parts.join("\n");
        out.push('\n');
        out
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Assemble one page.
///
/// Converts `root` with the table-aware converter, then builds the front
/// matter and breadcrumbs from `page` as configured in `settings`.
///
/// # Errors
///
/// Fails, with the page id attached, when the settings are invalid, when a
/// configured `title` or `id` is empty, or when the source reference is not
/// an absolute URL. Problems inside the body never fail assembly.
///
/// # Example
///
/// ```rust
/// use pagemark::{assemble, Node, PageInfo, Settings};
///
/// let body = Node::from_html("<p>Hello</p>");
/// let page = PageInfo {
///     id: "1".to_string(),
///     title: "Home".to_string(),
///     ..PageInfo::default()
/// };
/// let doc = assemble(&body, &page, &Settings::default())?;
/// assert_eq!(doc.render(), "---\ntitle: \"Home\"\nid: \"1\"\n---\nHello\n");
/// # Ok::<(), pagemark::Error>(())
/// ```
pub fn assemble(root: &Node, page: &PageInfo, settings: &Settings) -> Result<Document> {
    settings.validate().map_err(|source| Error::InvalidSettings {
        page_id: page.id.clone(),
        source,
    })?;

    let front_matter = front_matter(page, settings)?;

    let breadcrumbs = settings
        .include_breadcrumbs
        .then(|| page.ancestors.clone());

    let mut body = Converter::new(settings).convert_body(root);
    let title = page.title.trim();
    if settings.include_title_heading && !title.is_empty() {
        let heading = format!("# {}", escape_markdown(title, !settings.escape_special_chars));
        body = if body.is_empty() {
            heading
        } else {
            format!("{heading}\n\n{body}")
        };
    }

    debug!(
        "assembled page {}: {} front matter fields, {} body bytes",
        page.id,
        front_matter.len(),
        body.len()
    );

    Ok(Document {
        front_matter,
        breadcrumbs,
        body,
        breadcrumb_separator: settings.breadcrumb_separator.clone(),
    })
}

fn front_matter(page: &PageInfo, settings: &Settings) -> Result<Vec<(String, Value)>> {
    let mut entries = Vec::with_capacity(settings.front_matter.len());
    for &field in &settings.front_matter {
        let value = match field {
            FrontMatterField::Title => Some(required(page, field, &page.title)?),
            FrontMatterField::Id => Some(required(page, field, &page.id)?),
            FrontMatterField::Space => page.space.clone().map(Value::String),
            FrontMatterField::Source => match page.source.as_deref() {
                Some(source) => Some(Value::String(validated_source(page, source)?)),
                None => None,
            },
            FrontMatterField::Author => page.author.clone().map(Value::String),
            FrontMatterField::Updated => page
                .updated
                .map(|ts| Value::String(ts.to_rfc3339_opts(SecondsFormat::Secs, true))),
            FrontMatterField::Labels => (!page.labels.is_empty())
                .then(|| Value::Array(page.labels.iter().cloned().map(Value::String).collect())),
        };
        if let Some(value) = value {
            entries.push((field.key().to_string(), value));
        }
    }
    Ok(entries)
}

fn required(page: &PageInfo, field: FrontMatterField, value: &str) -> Result<Value> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::MissingField {
            page_id: page.id.clone(),
            field: field.key(),
        });
    }
    Ok(Value::String(value.to_string()))
}

fn validated_source(page: &PageInfo, source: &str) -> Result<String> {
    url::Url::parse(source.trim())
        .map(String::from)
        .map_err(|source_err| Error::InvalidSource {
            page_id: page.id.clone(),
            value: source.to_string(),
            source: source_err,
        })
}
