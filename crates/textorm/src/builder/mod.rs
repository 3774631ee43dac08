//! Statement assembly.
//!
//! [`QueryBuilder`] accumulates a mutable query spec through chainable calls
//! and renders it into one of the four statement kinds. A spec is single-use:
//! every successful [`QueryBuilder::render`] consumes it and leaves the
//! builder indistinguishable from a freshly constructed one.
//!
//! ```
//! use textorm::{Condition, QueryBuilder, StatementKind};
//!
//! let mut qb = QueryBuilder::new("users");
//! qb.select(["id", "username"])
//!     .filter(Condition::gt("age", 18));
//! assert_eq!(
//!     qb.render(StatementKind::Select).unwrap(),
//!     "SELECT id, username FROM users WHERE (age > 18)"
//! );
//! ```

mod delete;
mod insert;
mod select;
mod table;
mod update;


pub use table::TableConfig;

use crate::condition::Condition;
use crate::error::{OrmError, OrmResult};
use crate::row::Row;
use crate::sanitize::sanitize_value;
use crate::value::{RawSql, Scalar, Value};

/// The four statement kinds a spec can render into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    /// Whether statements of this kind alter stored data.
    pub fn is_mutating(self) -> bool {
        !matches!(self, StatementKind::Select)
    }
}

/// One entry of a projection list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectExpr {
    /// A plain column name.
    Column(String),
    /// `DISTINCT ON (column)`, pulled to the front of the projection.
    /// At most one per statement.
    Distinct(String),
    /// A raw fragment, inlined verbatim.
    Raw(RawSql),
}

impl From<&str> for SelectExpr {
    fn from(column: &str) -> Self {
        SelectExpr::Column(column.to_string())
    }
}

impl From<String> for SelectExpr {
    fn from(column: String) -> Self {
        SelectExpr::Column(column)
    }
}

impl From<RawSql> for SelectExpr {
    fn from(fragment: RawSql) -> Self {
        SelectExpr::Raw(fragment)
    }
}

/// Sort direction of one ORDER BY entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    fn keyword(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// One ORDER BY entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub dir: SortDir,
}

impl OrderBy {
    pub(crate) fn render(&self) -> String {
        format!("{} {}", self.column, self.dir.keyword())
    }
}

impl<S: Into<String>> From<(S, SortDir)> for OrderBy {
    fn from((column, dir): (S, SortDir)) -> Self {
        OrderBy {
            column: column.into(),
            dir,
        }
    }
}

/// Join kind of the optional join clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Join {
    pub(crate) kind: JoinKind,
    pub(crate) table: String,
    pub(crate) left_col: String,
    pub(crate) right_col: String,
}

/// VALUES payload: one row, or several for a bulk insert.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Values {
    One(Row),
    Many(Vec<Row>),
}

/// The mutable intent record a builder accumulates before rendering.
#[derive(Debug, Clone, Default)]
pub(crate) struct QuerySpec {
    pub(crate) table: String,
    pub(crate) select: Vec<SelectExpr>,
    pub(crate) filter: Option<Condition>,
    pub(crate) group_by: Vec<String>,
    pub(crate) order_by: Vec<OrderBy>,
    pub(crate) join: Option<Join>,
    pub(crate) values: Option<Values>,
    /// First builder-call error, surfaced at render.
    pub(crate) build_error: Option<OrmError>,
}

impl QuerySpec {
    fn fresh(table: &str) -> Self {
        QuerySpec {
            table: table.to_string(),
            ..QuerySpec::default()
        }
    }
}

/// Builder that assembles one statement at a time.
///
/// All spec-mutating calls return `&mut Self` for chaining; validation errors
/// they detect are recorded and surfaced by [`QueryBuilder::render`], never
/// later.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    config: TableConfig,
    spec: QuerySpec,
}

impl QueryBuilder {
    /// Create a builder for `table` with default configuration.
    pub fn new(table: impl Into<String>) -> Self {
        Self::with_config(TableConfig::new(table))
    }

    /// Create a builder from an explicit table configuration.
    pub fn with_config(config: TableConfig) -> Self {
        let spec = QuerySpec::fresh(&config.table);
        Self { config, spec }
    }

    /// The table this builder renders statements for.
    pub fn table_name(&self) -> &str {
        &self.spec.table
    }

    /// The configuration this builder was constructed with.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    fn record_error(&mut self, err: OrmError) {
        if self.spec.build_error.is_none() {
            self.spec.build_error = Some(err);
        }
    }

    /// Set the projection list.
    ///
    /// Requires a non-empty list with at most one [`SelectExpr::Distinct`]
    /// entry; the distinct entry is pulled to the front at render.
    pub fn select<I, E>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = E>,
        E: Into<SelectExpr>,
    {
        let columns: Vec<SelectExpr> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            self.record_error(OrmError::InvalidSelectArgument(
                "projection list is empty".to_string(),
            ));
            return self;
        }
        let distinct_count = columns
            .iter()
            .filter(|c| matches!(c, SelectExpr::Distinct(_)))
            .count();
        if distinct_count > 1 {
            self.record_error(OrmError::InvalidSelectArgument(format!(
                "at most one DISTINCT entry is allowed, got {distinct_count}"
            )));
            return self;
        }
        self.spec.select = columns;
        self
    }

    /// Store the filter tree. Compilation is deferred to render so the same
    /// filter path serves select, update and delete.
    pub fn filter(&mut self, condition: Condition) -> &mut Self {
        self.spec.filter = Some(condition);
        self
    }

    /// Set the GROUP BY column list.
    pub fn group_by<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.group_by = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the ORDER BY list.
    pub fn order_by<I, O>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = O>,
        O: Into<OrderBy>,
    {
        self.spec.order_by = entries.into_iter().map(Into::into).collect();
        self
    }

    fn join(&mut self, kind: JoinKind, other: &QueryBuilder, left: &str, right: &str) {
        let table = other.table_name();
        if table.is_empty() {
            self.record_error(OrmError::InvalidJoinTarget(
                "joined builder has no table name".to_string(),
            ));
            return;
        }
        self.spec.join = Some(Join {
            kind,
            table: table.to_string(),
            left_col: left.to_string(),
            right_col: right.to_string(),
        });
    }

    /// Add an INNER JOIN against another builder's table.
    pub fn inner_join(&mut self, other: &QueryBuilder, left: &str, right: &str) -> &mut Self {
        self.join(JoinKind::Inner, other, left, right);
        self
    }

    /// Add a LEFT JOIN against another builder's table.
    pub fn left_join(&mut self, other: &QueryBuilder, left: &str, right: &str) -> &mut Self {
        self.join(JoinKind::Left, other, left, right);
        self
    }

    /// Add a RIGHT JOIN against another builder's table.
    pub fn right_join(&mut self, other: &QueryBuilder, left: &str, right: &str) -> &mut Self {
        self.join(JoinKind::Right, other, left, right);
        self
    }

    /// Set the VALUES row for an insert or update.
    ///
    /// Every value is sanitized before it is stored. A column carrying the
    /// unset sentinel is rejected.
    pub fn set(&mut self, row: Row) -> &mut Self {
        match self.sanitize_row(row) {
            Ok(row) => self.spec.values = Some(Values::One(row)),
            Err(err) => self.record_error(err),
        }
        self
    }

    /// Set multiple VALUES rows for a bulk insert.
    pub fn set_many(&mut self, rows: Vec<Row>) -> &mut Self {
        let mut sanitized = Vec::with_capacity(rows.len());
        for row in rows {
            match self.sanitize_row(row) {
                Ok(row) => sanitized.push(row),
                Err(err) => {
                    self.record_error(err);
                    return self;
                }
            }
        }
        self.spec.values = Some(Values::Many(sanitized));
        self
    }

    fn sanitize_row(&self, row: Row) -> OrmResult<Row> {
        let mut out = Row::new();
        for (column, value) in row {
            if matches!(value, Value::Unset) {
                return Err(OrmError::UndefinedColumnValue(column));
            }
            let value = sanitize_value(value, &column, &self.config.allow_html);
            out.set(column, value);
        }
        Ok(out)
    }

    /// Render the accumulated spec as a statement of the given kind.
    ///
    /// On success the spec is reset; the builder is ready for the next
    /// statement.
    pub fn render(&mut self, kind: StatementKind) -> OrmResult<String> {
        if let Some(err) = self.spec.build_error.take() {
            self.reset();
            return Err(err);
        }

        let result = match kind {
            StatementKind::Select => select::render(&self.spec, &self.config),
            StatementKind::Insert => insert::render(&self.spec, &self.config),
            StatementKind::Update => update::render(&self.spec, &self.config),
            StatementKind::Delete => delete::render(&self.spec, &self.config),
        };

        if result.is_ok() {
            self.reset();
        }
        result
    }

    /// Drop the stored filter, keeping the rest of the spec.
    pub(crate) fn clear_filter(&mut self) {
        self.spec.filter = None;
    }

    pub(crate) fn has_filter(&self) -> bool {
        self.spec.filter.is_some()
    }

    pub(crate) fn has_group_or_order(&self) -> bool {
        !self.spec.group_by.is_empty() || !self.spec.order_by.is_empty()
    }

    pub(crate) fn has_values(&self) -> bool {
        self.spec.values.is_some()
    }

    pub(crate) fn snapshot(&self) -> QuerySpec {
        self.spec.clone()
    }

    pub(crate) fn restore(&mut self, spec: QuerySpec) {
        self.spec = spec;
    }

    fn reset(&mut self) {
        self.spec = QuerySpec::fresh(&self.config.table);
    }
}

/// Render one VALUES/SET cell. Strings were sanitized when stored, so only
/// quoting happens here.
pub(crate) fn render_cell(column: &str, value: &Value) -> OrmResult<String> {
    match value {
        Value::Scalar(Scalar::Text(s)) => Ok(format!("'{s}'")),
        Value::Scalar(scalar) => Ok(scalar.to_string()),
        Value::Raw(fragment) => Ok(fragment.as_str().to_string()),
        Value::List(_) => Err(OrmError::UnsupportedValueType(format!(
            "column '{column}' cannot hold a list value"
        ))),
        Value::Unset => Err(OrmError::UndefinedColumnValue(column.to_string())),
    }
}

pub(crate) fn require_table(spec: &QuerySpec) -> OrmResult<&str> {
    if spec.table.is_empty() {
        return Err(OrmError::MissingTable);
    }
    Ok(&spec.table)
}
