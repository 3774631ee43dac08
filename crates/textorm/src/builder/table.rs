//! Per-table configuration.

use crate::row::Row;

/// Immutable configuration a [`crate::builder::QueryBuilder`] is constructed
/// with.
///
/// Everything a table's statements need beyond the spec itself lives here:
/// the table name, the primary key, the default projection, the rich-text
/// column allow-list, and per-operation default values. The configuration is
/// fixed for the builder's lifetime.
///
/// # Example
/// ```
/// use textorm::{Row, TableConfig, Value};
///
/// let users = TableConfig::new("users")
///     .primary_key("user_id")
///     .selectable(["id", "username", "email"])
///     .allow_html(["bio"])
///     .insert_defaults(Row::from_iter([("status", Value::from("active"))]));
/// ```
#[derive(Debug, Clone)]
pub struct TableConfig {
    pub(crate) table: String,
    pub(crate) primary_key: String,
    pub(crate) selectable: Vec<String>,
    pub(crate) allow_html: Vec<String>,
    pub(crate) insert_defaults: Row,
    pub(crate) update_defaults: Row,
}

impl TableConfig {
    /// Configuration for `table` with the default primary key `id`, no
    /// default projection, no rich-text columns and no default values.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            primary_key: "id".to_string(),
            selectable: Vec::new(),
            allow_html: Vec::new(),
            insert_defaults: Row::new(),
            update_defaults: Row::new(),
        }
    }

    /// Override the primary key column name.
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    /// Columns projected when a select does not name any.
    pub fn selectable<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selectable = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Columns whose string values keep their markup (trusted rich text).
    pub fn allow_html<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_html = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Default values merged into every inserted row.
    pub fn insert_defaults(mut self, defaults: Row) -> Self {
        self.insert_defaults = defaults;
        self
    }

    /// Default values merged into every update.
    pub fn update_defaults(mut self, defaults: Row) -> Self {
        self.update_defaults = defaults;
        self
    }

    /// The configured table name.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// The configured primary key column.
    pub fn primary_key_name(&self) -> &str {
        &self.primary_key
    }
}
