// src/formatting/properties/formatters.rs
//! Type-specific formatting implementations for Notion properties.
//!
//! This module converts property values into [`FormattedProperty`] values,
//! organized by property type. Every branch is total.

use super::types::*;
use crate::model::{FormulaResult, PropertyValue, RollupResult};
use crate::types::{
    text_color_for_background, Color, DateValue, NotionFile, RelationRef, RichTextItem,
    SelectOption, UniqueIdData, User,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

// --- Main Formatting Entry Point ---

/// Formats a property value into a structured representation.
pub fn format_property_value(value: &PropertyValue) -> FormattedProperty {
    use PropertyValue::*;

    log::trace!("Formatting property of type: {}", value.type_name());

    match value {
        Title(title) => format_title(title),
        RichText(rich_text) => format_rich_text(rich_text),
        Number(number) => format_number(*number),
        Select(select) => format_select(select.as_ref()),
        MultiSelect(options) => format_multi_select(options),
        Status(status) => format_status(status.as_ref()),
        Date(date) => format_date(date.as_ref()),
        Checkbox(checked) => FormattedProperty::Boolean(*checked),
        Url(url) => link(url.as_deref(), FormattedProperty::Url),
        Email(email) => link(email.as_deref(), FormattedProperty::Email),
        PhoneNumber(phone) => link(phone.as_deref(), FormattedProperty::Phone),
        Files(files) => format_files(files.as_deref()),
        CreatedTime(ts) | LastEditedTime(ts) => format_timestamp(ts.as_deref()),
        CreatedBy(user) | LastEditedBy(user) => format_user_id(user.as_ref()),
        Relation(relation) => format_relation(relation),
        Rollup(rollup) => format_rollup(rollup.as_ref()),
        Formula(formula) => format_formula(formula.as_ref()),
        People(people) => format_people(people),
        UniqueId(unique_id) => format_unique_id(unique_id.as_ref()),
        Other { type_name, value } => format_other(type_name, value.as_ref()),
    }
}

// --- Text Formatters ---

fn non_empty_text(text: String) -> FormattedProperty {
    if text.is_empty() {
        FormattedProperty::Empty
    } else {
        FormattedProperty::Text(text)
    }
}

/// Titles show their first segment only.
fn format_title(title: &[RichTextItem]) -> FormattedProperty {
    non_empty_text(
        title
            .first()
            .map(|item| item.plain_text.clone())
            .unwrap_or_default(),
    )
}

fn format_rich_text(rich_text: &[RichTextItem]) -> FormattedProperty {
    non_empty_text(
        rich_text
            .iter()
            .map(|item| item.plain_text.as_str())
            .collect(),
    )
}

// --- Number Formatter ---

fn format_number(number: Option<f64>) -> FormattedProperty {
    match number {
        Some(n) => FormattedProperty::Number(NumberValue::new(n)),
        None => FormattedProperty::Empty,
    }
}

// --- Select Formatters ---

fn format_select(select: Option<&SelectOption>) -> FormattedProperty {
    match select {
        Some(opt) => FormattedProperty::Badge(Badge::outline(opt.name.clone())),
        None => FormattedProperty::Empty,
    }
}

fn format_multi_select(options: &[SelectOption]) -> FormattedProperty {
    if options.is_empty() {
        FormattedProperty::Empty
    } else {
        FormattedProperty::Badges(
            options
                .iter()
                .map(|opt| Badge::outline(opt.name.clone()))
                .collect(),
        )
    }
}

/// Status badges are painted in the status color with contrasting text.
fn format_status(status: Option<&SelectOption>) -> FormattedProperty {
    match status {
        Some(opt) => {
            let color = Color::from_name_lossy(opt.color.as_deref().unwrap_or("default"));
            let background = color.hex();
            FormattedProperty::Badge(Badge {
                label: opt.name.clone(),
                style: BadgeStyle::Colored {
                    background,
                    text: text_color_for_background(background),
                },
            })
        }
        None => FormattedProperty::Empty,
    }
}

// --- Date Formatters ---

fn format_date(date: Option<&DateValue>) -> FormattedProperty {
    let Some(date) = date else {
        return FormattedProperty::Empty;
    };
    match date.start.as_deref().filter(|s| !s.is_empty()) {
        Some(start) => FormattedProperty::Date(DateRange {
            start: display_date(start),
            end: date
                .end
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(display_date),
        }),
        None => FormattedProperty::Empty,
    }
}

/// Calendar date of a Notion date bound, in the bound's own offset.
///
/// Unparseable input is shown as sent.
fn display_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn format_timestamp(timestamp: Option<&str>) -> FormattedProperty {
    match timestamp.filter(|s| !s.is_empty()) {
        Some(raw) => FormattedProperty::Text(match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => dt
                .with_timezone(&Utc)
                .format("%Y-%m-%d %H:%M UTC")
                .to_string(),
            Err(_) => raw.to_string(),
        }),
        None => FormattedProperty::Empty,
    }
}

// --- Link Formatters ---

fn link(value: Option<&str>, wrap: fn(String) -> FormattedProperty) -> FormattedProperty {
    match value.filter(|s| !s.is_empty()) {
        Some(v) => wrap(v.to_string()),
        None => FormattedProperty::Empty,
    }
}

// --- Files Formatter ---

fn format_files(files: Option<&[NotionFile]>) -> FormattedProperty {
    let Some(files) = files else {
        return FormattedProperty::Placeholder("No files".to_string());
    };
    if files.is_empty() {
        return FormattedProperty::Empty;
    }

    let entries = files
        .iter()
        .map(|file| {
            let name = file.name.clone().filter(|n| !n.is_empty());
            match file.external_url() {
                Some(url) => FileEntry {
                    label: name.unwrap_or_else(|| url.to_string()),
                    url: Some(url.to_string()),
                },
                None => FileEntry {
                    label: name.unwrap_or_else(|| "File".to_string()),
                    url: None,
                },
            }
        })
        .collect();
    FormattedProperty::Files(entries)
}

// --- People Formatters ---

fn format_user_id(user: Option<&User>) -> FormattedProperty {
    match user {
        Some(u) => non_empty_text(u.id.clone()),
        None => FormattedProperty::Empty,
    }
}

fn format_people(people: &[User]) -> FormattedProperty {
    if people.is_empty() {
        FormattedProperty::Empty
    } else {
        FormattedProperty::Badges(
            people
                .iter()
                .map(|p| Badge::secondary(p.to_string()))
                .collect(),
        )
    }
}

// --- Relation Formatter ---

fn format_relation(relation: &[RelationRef]) -> FormattedProperty {
    if relation.is_empty() {
        FormattedProperty::Placeholder("No relations".to_string())
    } else {
        FormattedProperty::Relation(relation.len())
    }
}

// --- Rollup Formatter ---

fn format_rollup(rollup: Option<&RollupResult>) -> FormattedProperty {
    let Some(rollup) = rollup else {
        return FormattedProperty::Empty;
    };
    let placeholder = || FormattedProperty::Placeholder(format!("Rollup ({})", rollup.type_name()));

    match rollup {
        RollupResult::Number(Some(n)) => FormattedProperty::Number(NumberValue::new(*n)),
        RollupResult::Date(Some(date)) => format_date(Some(date)),
        RollupResult::Array(items) => {
            if items.is_empty() {
                FormattedProperty::Empty
            } else {
                FormattedProperty::Lines(items.iter().map(format_property_value).collect())
            }
        }
        RollupResult::Other { value, .. } => scalar(value).unwrap_or_else(placeholder),
        RollupResult::Number(None) | RollupResult::Date(None) => placeholder(),
    }
}

// --- Formula Formatter ---

fn format_formula(formula: Option<&FormulaResult>) -> FormattedProperty {
    let Some(formula) = formula else {
        return FormattedProperty::Empty;
    };
    let placeholder =
        || FormattedProperty::Placeholder(format!("Formula ({})", formula.type_name()));

    match formula {
        FormulaResult::String(Some(s)) => FormattedProperty::Text(s.clone()),
        FormulaResult::Number(Some(n)) => FormattedProperty::Number(NumberValue::new(*n)),
        FormulaResult::Boolean(Some(b)) => FormattedProperty::Text(b.to_string()),
        FormulaResult::Date(Some(date)) => format_date(Some(date)),
        FormulaResult::Other { value, .. } => scalar(value).unwrap_or_else(placeholder),
        FormulaResult::String(None)
        | FormulaResult::Number(None)
        | FormulaResult::Boolean(None)
        | FormulaResult::Date(None) => placeholder(),
    }
}

// --- ID Formatters ---

fn format_unique_id(unique_id: Option<&UniqueIdData>) -> FormattedProperty {
    match unique_id {
        Some(id) => non_empty_text(id.to_string()),
        None => FormattedProperty::Empty,
    }
}

// --- Fallback ---

/// Unknown types show a primitive payload as is, anything else as unsupported.
fn format_other(type_name: &str, value: Option<&Value>) -> FormattedProperty {
    value
        .and_then(scalar)
        .unwrap_or_else(|| FormattedProperty::Unsupported(type_name.to_string()))
}

fn scalar(value: &Value) -> Option<FormattedProperty> {
    match value {
        Value::String(s) => Some(FormattedProperty::Text(s.clone())),
        Value::Number(n) => Some(FormattedProperty::Text(n.to_string())),
        Value::Bool(b) => Some(FormattedProperty::Text(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
