// src/formatting/mod.rs
//! Renders Notion query results for display.

pub mod properties;
pub mod table;

pub use properties::{render_property, render_property_html, FormattedProperty, Renderable};
pub use table::{Table, TableBuilder};

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Fetch time as shown on the table view, e.g. `Mar 1, 2024, 2:05:09 PM UTC`.
pub fn format_fetched_at(fetched_at: &DateTime<Utc>) -> String {
    fetched_at.format("%b %-d, %Y, %-I:%M:%S %p UTC").to_string()
}

/// Pretty-prints JSON with two-space indentation.
pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
