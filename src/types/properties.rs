//! Leaf payloads carried inside Notion property values.
//!
//! Every field the renderer does not strictly need is optional or defaulted:
//! the upstream shape is an external contract this crate does not control.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rich text item; only the pieces the renderer displays are kept.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RichTextItem {
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub href: Option<String>,
}

impl RichTextItem {
    /// Create a plain text item.
    pub fn plain_text(text: &str) -> Self {
        Self {
            plain_text: text.to_string(),
            href: None,
        }
    }
}

/// Select, multi-select, and status option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    /// Raw Notion color name; resolved leniently at render time.
    #[serde(default)]
    pub color: Option<String>,
}

/// Date value with optional end date.
///
/// Bounds stay as the strings Notion sent (`2024-01-05` or a full RFC 3339
/// timestamp) and are interpreted when rendered.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DateValue {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// User representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) if !name.is_empty() => write!(f, "{}", name),
            _ => write!(f, "{}", self.id),
        }
    }
}

/// Entry of a `files` property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotionFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub external: Option<FileLocation>,
    #[serde(default)]
    pub file: Option<FileLocation>,
}

impl NotionFile {
    /// URL of an externally hosted file, if this is one.
    pub fn external_url(&self) -> Option<&str> {
        if self.kind.as_deref() != Some("external") {
            return None;
        }
        self.external
            .as_ref()
            .map(|loc| loc.url.as_str())
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileLocation {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub expiry_time: Option<String>,
}

/// Reference to a related page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRef {
    pub id: String,
}

/// Unique ID data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueIdData {
    pub number: Option<i64>,
    #[serde(default)]
    pub prefix: Option<String>,
}

impl fmt::Display for UniqueIdData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.prefix, self.number) {
            (Some(prefix), Some(n)) if !prefix.is_empty() => write!(f, "{}-{}", prefix, n),
            (_, Some(n)) => write!(f, "{}", n),
            _ => Ok(()),
        }
    }
}
