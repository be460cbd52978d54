// src/formatting/table.rs
//! Table building for database query results.
//!
//! Columns are the union of every row's property names in first-seen
//! order; each cell is rendered through the property renderer.

use super::properties::{render_property, Renderable};
use crate::model::{NotionPage, PropertyValue};
use indexmap::IndexMap;
use serde::Serialize;

// --- Table Structure ---

/// Represents a table's structure and content, ready for a template.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub alignment: ColumnAlignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnAlignment {
    Left,
    Center,
    Right,
}

impl ColumnAlignment {
    /// Alignment for a column, from the property type it was first seen with.
    pub fn for_property(value: &PropertyValue) -> Self {
        match value {
            PropertyValue::Number(_) => ColumnAlignment::Right,
            PropertyValue::Date(_)
            | PropertyValue::CreatedTime(_)
            | PropertyValue::LastEditedTime(_)
            | PropertyValue::Checkbox(_) => ColumnAlignment::Center,
            _ => ColumnAlignment::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCell {
    /// Escaped HTML, safe to emit unescaped in a template.
    pub html: String,
    pub alignment: ColumnAlignment,
}

// --- Table Builder ---

/// Builder for constructing tables from query result rows.
pub struct TableBuilder<'a> {
    pages: &'a [NotionPage],
}

impl<'a> TableBuilder<'a> {
    pub fn new(pages: &'a [NotionPage]) -> Self {
        Self { pages }
    }

    /// Builds the table.
    pub fn build(self) -> Table {
        let columns = self.build_columns();
        let rows = self
            .pages
            .iter()
            .map(|page| build_row(page, &columns))
            .collect();

        Table { columns, rows }
    }

    fn build_columns(&self) -> Vec<Column> {
        let mut seen: IndexMap<&str, ColumnAlignment> = IndexMap::new();
        for page in self.pages {
            for (name, value) in &page.properties {
                seen.entry(name.as_str())
                    .or_insert_with(|| ColumnAlignment::for_property(value));
            }
        }

        log::debug!(
            "build_columns: {} column(s) from {} row(s): {:?}",
            seen.len(),
            self.pages.len(),
            seen.keys().collect::<Vec<_>>()
        );

        seen.into_iter()
            .map(|(name, alignment)| Column {
                name: name.to_string(),
                alignment,
            })
            .collect()
    }
}

/// Builds a single row; a column the page lacks gets an empty cell.
fn build_row(page: &NotionPage, columns: &[Column]) -> TableRow {
    let cells = columns
        .iter()
        .map(|column| TableCell {
            html: render_property(page.properties.get(&column.name)).render_html(),
            alignment: column.alignment,
        })
        .collect();

    TableRow {
        id: page.id.as_str().to_string(),
        cells,
    }
}
