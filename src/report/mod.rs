//! Configurable tabular reports.
//!
//! A report is a [`ColumnRegistry`] projected over a filtered slice of
//! [`Record`]s. The same filtered rows feed three outputs: the on-screen
//! table ([`view`]), the print layout ([`print`]) and the spreadsheet
//! ([`export`]). They differ only in layout, never in row selection.

pub mod catalog;
pub mod columns;
pub mod export;
pub mod filter;
pub mod print;
mod records;
pub mod view;

use std::fmt;

pub use catalog::{ReportHeader, ReportKind};
pub use columns::{ColumnDef, ColumnField, ColumnRegistry};
pub use filter::{FilterState, Viewer};

use crate::fmt::{money, quantity};

/// Data key of the row-number column. Its value is the row's position
/// within the rendered slice, never a stored identifier.
pub const INDEX_KEY: &str = "index";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Number(f64),
    /// USD amount, shown with two decimals.
    Money(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Number(n) => f.write_str(&quantity(*n)),
            Value::Money(n) => f.write_str(&money(*n)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// A row the report engine can project. Only `key` and `field` are
/// required; the remaining hooks opt a record type into filtering.
pub trait Record {
    /// Stable identity of the row.
    fn key(&self) -> String;

    /// Display value for a column's data key. `None` (or an empty text)
    /// renders as the renderer's placeholder.
    fn field(&self, data_key: &str) -> Option<Value>;

    /// Whose row this is, for resident-scoped visibility.
    fn owner(&self) -> Option<&str> {
        None
    }

    /// Text fields matched by the free-text search.
    fn search_fields(&self) -> Vec<&str> {
        Vec::new()
    }

    fn status(&self) -> Option<&str> {
        None
    }

    /// Billing or reporting period label, e.g. "January 2026".
    fn period(&self) -> Option<&str> {
        None
    }
}

/// Cell text for `column` on the row at `position` (1-based) of the
/// rendered slice. Missing or blank values become `placeholder`.
pub fn cell_text<T: Record>(row: &T, column: &ColumnDef, position: usize, placeholder: &str) -> String {
    if column.data_key == INDEX_KEY {
        return position.to_string();
    }
    match row.field(&column.data_key) {
        Some(Value::Text(s)) if s.is_empty() => placeholder.to_string(),
        Some(value) => value.to_string(),
        None => placeholder.to_string(),
    }
}
