//! Row and raw-result shapes shared by the builder and the driver boundary.

use crate::value::{Scalar, Value};
use serde::Serialize;
use serde::ser::SerializeMap;

/// An insertion-ordered column/value map.
///
/// Used both for VALUES clauses (where column order determines the rendered
/// column list) and for rows coming back from a driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Serialize for Row {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in &self.columns {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, replacing in place if the column already exists.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let column = column.into();
        let value = value.into();
        if let Some(entry) = self.columns.iter_mut().find(|(c, _)| *c == column) {
            entry.1 = value;
        } else {
            self.columns.push((column, value));
        }
        self
    }

    /// Get a column value.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    /// Get a column as a scalar, if it holds one.
    pub fn get_scalar(&self, column: &str) -> Option<&Scalar> {
        match self.get(column) {
            Some(Value::Scalar(s)) => Some(s),
            _ => None,
        }
    }

    /// Iterate column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(c, _)| c.as_str())
    }

    /// Iterate `(column, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

impl<C: Into<String>, V: Into<Value>> FromIterator<(C, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (c, v) in iter {
            row.set(c, v);
        }
        row
    }
}

/// The uniform payload a [`crate::client::Driver`] returns.
///
/// Each backend fills the fields it can: row drivers populate `rows`,
/// mutation counts land in `affected_rows`, and MySQL-style drivers report
/// `inserted_id` directly.
#[derive(Debug, Clone, Default)]
pub struct RawResult {
    /// Returned rows, empty for plain mutations.
    pub rows: Vec<Row>,
    /// Number of rows a mutation touched, if the driver reports one.
    pub affected_rows: Option<u64>,
    /// Generated key of an insert, if the driver reports one.
    pub inserted_id: Option<Scalar>,
}

impl RawResult {
    /// A result carrying only rows.
    pub fn rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// A result carrying only an affected-row count.
    pub fn affected(count: u64) -> Self {
        Self {
            affected_rows: Some(count),
            ..Self::default()
        }
    }
}
