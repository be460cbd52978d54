// src/formatting/properties/types.rs
//! Domain types for formatted properties.
//!
//! A [`FormattedProperty`] keeps the semantic shape of a cell (badge, link,
//! list of lines) so the same value can be rendered as HTML or plain text.

/// Represents a formatted property value with its semantic type preserved.
#[derive(Debug, Clone, PartialEq)]
pub enum FormattedProperty {
    Text(String),
    Number(NumberValue),
    /// Checkbox state.
    Boolean(bool),
    Date(DateRange),
    Badge(Badge),
    Badges(Vec<Badge>),
    /// External hyperlink.
    Url(String),
    Email(String),
    Phone(String),
    Files(Vec<FileEntry>),
    /// Count of related pages.
    Relation(usize),
    /// One rendered value per line, used by rollup arrays.
    Lines(Vec<FormattedProperty>),
    /// Muted stand-in text such as `No files` or `Rollup (number)`.
    Placeholder(String),
    /// Visible marker for a property type nothing knows how to show.
    Unsupported(String),
    Empty,
}

/// Represents a numeric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberValue {
    pub value: f64,
}

impl NumberValue {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

/// Represents a date or date range, already formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub start: String,
    pub end: Option<String>,
}

/// A small label; outline badges carry no color of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    pub label: String,
    pub style: BadgeStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BadgeStyle {
    Outline,
    Secondary,
    Colored {
        background: &'static str,
        text: &'static str,
    },
}

impl Badge {
    pub fn outline(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            style: BadgeStyle::Outline,
        }
    }

    pub fn secondary(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            style: BadgeStyle::Secondary,
        }
    }
}

/// A file cell line; only external files are linked.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub label: String,
    pub url: Option<String>,
}

// --- Trait Definitions ---

/// Trait for types that can be rendered to different formats.
pub trait Renderable {
    /// Renders to plain text.
    fn render_text(&self) -> String;

    /// Renders to HTML. All user text is escaped.
    fn render_html(&self) -> String {
        handlebars::html_escape(&self.render_text())
    }
}
