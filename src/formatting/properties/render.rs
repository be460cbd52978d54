// src/formatting/properties/render.rs
//! Rendering implementations for formatted properties.
//!
//! This module implements the rendering logic for property types,
//! keeping rendering separate from data representation.

use super::types::*;
use handlebars::html_escape;
use url::Url;

const YES: &str = "✔️ Yes";
const NO: &str = "❌ No";

/// Separator between the bounds of a date range.
pub const DATE_RANGE_SEPARATOR: &str = " – ";

impl Renderable for FormattedProperty {
    fn render_text(&self) -> String {
        match self {
            FormattedProperty::Text(s) => s.clone(),
            FormattedProperty::Number(n) => n.render_text(),
            FormattedProperty::Boolean(b) => if *b { YES } else { NO }.to_string(),
            FormattedProperty::Date(d) => d.render_text(),
            FormattedProperty::Badge(badge) => badge.label.clone(),
            FormattedProperty::Badges(badges) => badges
                .iter()
                .map(|b| b.label.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            FormattedProperty::Url(url) => url.clone(),
            FormattedProperty::Email(e) => e.clone(),
            FormattedProperty::Phone(p) => p.clone(),
            FormattedProperty::Files(files) => files
                .iter()
                .map(|f| f.label.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            FormattedProperty::Relation(count) => relation_label(*count),
            FormattedProperty::Lines(lines) => lines
                .iter()
                .map(|line| line.render_text())
                .collect::<Vec<_>>()
                .join("\n"),
            FormattedProperty::Placeholder(text) => text.clone(),
            FormattedProperty::Unsupported(type_name) => format!("Unsupported: {}", type_name),
            FormattedProperty::Empty => String::new(),
        }
    }

    fn render_html(&self) -> String {
        match self {
            FormattedProperty::Badge(badge) => badge.render_html(),
            FormattedProperty::Badges(badges) => badges
                .iter()
                .map(|b| b.render_html())
                .collect::<Vec<_>>()
                .join(" "),
            FormattedProperty::Url(url) => match web_href(url) {
                Some(href) => anchor(href, url, true),
                None => html_escape(url),
            },
            FormattedProperty::Email(email) => anchor(&format!("mailto:{}", email), email, false),
            FormattedProperty::Phone(phone) => anchor(&format!("tel:{}", phone), phone, false),
            FormattedProperty::Files(files) => files
                .iter()
                .map(|f| format!("<div>{}</div>", f.render_html()))
                .collect(),
            FormattedProperty::Relation(count) => {
                Badge::secondary(relation_label(*count)).render_html()
            }
            FormattedProperty::Lines(lines) => lines
                .iter()
                .map(|line| format!("<div>{}</div>", line.render_html()))
                .collect(),
            FormattedProperty::Placeholder(text) => {
                format!("<span class=\"muted\">{}</span>", html_escape(text))
            }
            FormattedProperty::Unsupported(_) => format!(
                "<span class=\"unsupported\">{}</span>",
                html_escape(&self.render_text())
            ),
            _ => html_escape(&self.render_text()),
        }
    }
}

impl Renderable for NumberValue {
    fn render_text(&self) -> String {
        format_number_grouped(self.value)
    }
}

impl Renderable for DateRange {
    fn render_text(&self) -> String {
        match &self.end {
            Some(end) => format!("{}{}{}", self.start, DATE_RANGE_SEPARATOR, end),
            None => self.start.clone(),
        }
    }
}

impl Renderable for Badge {
    fn render_text(&self) -> String {
        self.label.clone()
    }

    fn render_html(&self) -> String {
        let label = html_escape(&self.label);
        match self.style {
            BadgeStyle::Outline => format!("<span class=\"badge badge-outline\">{}</span>", label),
            BadgeStyle::Secondary => {
                format!("<span class=\"badge badge-secondary\">{}</span>", label)
            }
            BadgeStyle::Colored { background, text } => format!(
                "<span class=\"badge\" style=\"background-color: {}; color: {};\">{}</span>",
                background, text, label
            ),
        }
    }
}

impl Renderable for FileEntry {
    fn render_text(&self) -> String {
        self.label.clone()
    }

    fn render_html(&self) -> String {
        match &self.url {
            Some(url) => match web_href(url) {
                Some(href) => anchor(href, &self.label, true),
                None => html_escape(&self.label),
            },
            None => html_escape(&self.label),
        }
    }
}

// --- Helper Functions ---

fn relation_label(count: usize) -> String {
    if count == 0 {
        "No relations".to_string()
    } else {
        format!("{} relation(s)", count)
    }
}

/// Values from the database are linked only when they are http(s) URLs.
fn web_href(raw: &str) -> Option<&str> {
    let parsed = Url::parse(raw.trim()).ok()?;
    matches!(parsed.scheme(), "http" | "https").then_some(raw)
}

fn anchor(href: &str, text: &str, external: bool) -> String {
    let target = if external {
        " target=\"_blank\" rel=\"noopener noreferrer\""
    } else {
        ""
    };
    format!(
        "<a href=\"{}\"{}>{}</a>",
        html_escape(href),
        target,
        html_escape(text)
    )
}

/// Formats a number with thousands separators and at most three fraction
/// digits, e.g. `1234.5` as `1,234.5`.
pub fn format_number_grouped(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }

    let fixed = format!("{:.3}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let sign = if n.is_sign_negative() && !is_zero { "-" } else { "" };

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}
