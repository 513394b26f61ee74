use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Display text plus the URL recovered from it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    pub text: String,
    pub url: Option<String>,
}

impl Hyperlink {
    pub fn new(text: impl Into<String>, url: Option<String>) -> Self {
        Self {
            text: text.into(),
            url,
        }
    }
}

/// One parsed field. Serializes as a bare string or as `{ "text", "url" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    PlainText(String),
    Hyperlink(Hyperlink),
}

impl Cell {
    /// The human-readable content of the cell.
    pub fn text(&self) -> &str {
        match self {
            Cell::PlainText(s) => s,
            Cell::Hyperlink(link) => &link.text,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text().trim().is_empty()
    }
}

/// A data row keyed by column name, in header order.
///
/// Inserting a column name that is already present replaces the value but
/// keeps the column where it was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    cells: IndexMap<String, Cell>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, cell: Cell) {
        self.cells.insert(column.into(), cell);
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True when every cell trims to nothing.
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(Cell::is_blank)
    }
}
