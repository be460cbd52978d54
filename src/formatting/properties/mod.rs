// src/formatting/properties/mod.rs
//! Type-safe property formatting for Notion database values.
//!
//! This module separates the concerns of data extraction
//! ([`format_property_value`]) and presentation ([`Renderable`]).
//! Formatting is pure: the same input always renders the same output.

mod formatters;
mod render;
mod types;

// Re-export the public interface
pub use formatters::format_property_value;
pub use render::{format_number_grouped, DATE_RANGE_SEPARATOR};
pub use types::{Badge, BadgeStyle, DateRange, FileEntry, FormattedProperty, NumberValue, Renderable};

use crate::model::PropertyValue;

// --- Public API ---

/// Formats a possibly absent property. Absent renders as empty.
pub fn render_property(value: Option<&PropertyValue>) -> FormattedProperty {
    match value {
        None => FormattedProperty::Empty,
        Some(pv) => format_property_value(pv),
    }
}

/// Renders a property straight to escaped HTML for a table cell.
pub fn render_property_html(value: Option<&PropertyValue>) -> String {
    render_property(value).render_html()
}

impl FormattedProperty {
    /// Checks if the property is empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, FormattedProperty::Empty)
    }
}
