//! Table-level execution façade.
//!
//! [`Model`] pairs a [`QueryBuilder`] with the execution pipeline: render the
//! spec, let the backend adapter prepare the text, hand it to the driver,
//! fold the reply into the uniform shape and normalize it. Spec-building
//! calls chain; every operation consumes the spec.
//!
//! ```ignore
//! use textorm::{Condition, Model, TableConfig};
//!
//! let mut users = Model::new(TableConfig::new("users"));
//! let rows = users
//!     .select(["id", "username"])
//!     .filter(Condition::eq("status", "active"))
//!     .list(&driver)
//!     .await?
//!     .into_rows();
//! ```

use crate::backend::{Operation, Outcome, normalize_result};
use crate::builder::{OrderBy, QueryBuilder, SelectExpr, StatementKind, TableConfig};
use crate::client::Driver;
use crate::condition::Condition;
use crate::error::{OrmError, OrmResult};
use crate::row::Row;
use crate::util::raw;
use crate::value::Scalar;

/// A table handle: builder plus execution.
#[derive(Debug, Clone)]
pub struct Model {
    builder: QueryBuilder,
}

impl Model {
    /// Create a model from an explicit table configuration.
    pub fn new(config: TableConfig) -> Self {
        Self {
            builder: QueryBuilder::with_config(config),
        }
    }

    /// Create a model for `table` with default configuration.
    pub fn table(table: impl Into<String>) -> Self {
        Self::new(TableConfig::new(table))
    }

    /// The underlying builder, e.g. to use this model as a join target.
    pub fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    // ==================== Spec building ====================

    /// Set the projection list. See [`QueryBuilder::select`].
    pub fn select<I, E>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = E>,
        E: Into<SelectExpr>,
    {
        self.builder.select(columns);
        self
    }

    /// Store the filter tree. See [`QueryBuilder::filter`].
    pub fn filter(&mut self, condition: Condition) -> &mut Self {
        self.builder.filter(condition);
        self
    }

    /// Set the GROUP BY column list.
    pub fn group_by<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.builder.group_by(columns);
        self
    }

    /// Set the ORDER BY list.
    pub fn order_by<I, O>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = O>,
        O: Into<OrderBy>,
    {
        self.builder.order_by(entries);
        self
    }

    /// Add an INNER JOIN against another builder's table.
    pub fn inner_join(&mut self, other: &QueryBuilder, left: &str, right: &str) -> &mut Self {
        self.builder.inner_join(other, left, right);
        self
    }

    /// Add a LEFT JOIN against another builder's table.
    pub fn left_join(&mut self, other: &QueryBuilder, left: &str, right: &str) -> &mut Self {
        self.builder.left_join(other, left, right);
        self
    }

    /// Add a RIGHT JOIN against another builder's table.
    pub fn right_join(&mut self, other: &QueryBuilder, left: &str, right: &str) -> &mut Self {
        self.builder.right_join(other, left, right);
        self
    }

    /// Set the VALUES row for an insert or update.
    pub fn set(&mut self, row: Row) -> &mut Self {
        self.builder.set(row);
        self
    }

    /// Set multiple VALUES rows for a bulk insert.
    pub fn set_many(&mut self, rows: Vec<Row>) -> &mut Self {
        self.builder.set_many(rows);
        self
    }

    // ==================== Select operations ====================

    /// Fetch the whole table.
    ///
    /// Refuses a spec that carries conditions, group or order; use
    /// [`Model::list`] for those.
    pub async fn all(&mut self, conn: &impl Driver) -> OrmResult<Outcome> {
        if self.builder.has_filter() || self.builder.has_group_or_order() {
            return Err(OrmError::conflict(
                "cannot pass conditions, group, or order to all(); use list()",
            ));
        }
        self.dispatch(conn, StatementKind::Select, None).await
    }

    /// Fetch rows matching whatever spec was built.
    pub async fn list(&mut self, conn: &impl Driver) -> OrmResult<Outcome> {
        self.dispatch(conn, StatementKind::Select, None).await
    }

    /// Count rows matching the current filter.
    pub async fn count(&mut self, conn: &impl Driver) -> OrmResult<i64> {
        if self.builder.has_group_or_order() {
            return Err(OrmError::conflict(
                "cannot pass group or order to count(); use list()",
            ));
        }
        self.builder.select([raw("count(*) AS count")]);
        let outcome = self.dispatch(conn, StatementKind::Select, None).await?;
        Ok(outcome
            .rows()
            .and_then(|rows| rows.first())
            .and_then(|row| row.get_scalar("count"))
            .and_then(Scalar::as_int)
            .unwrap_or(0))
    }

    /// Project a single column of the result.
    pub async fn col(&mut self, conn: &impl Driver, column: &str) -> OrmResult<Vec<Scalar>> {
        let outcome = self.dispatch(conn, StatementKind::Select, None).await?;
        Ok(outcome
            .into_rows()
            .into_iter()
            .map(|row| row.get_scalar(column).cloned().unwrap_or(Scalar::Null))
            .collect())
    }

    /// Look up one row by primary key.
    pub async fn find(
        &mut self,
        conn: &impl Driver,
        id: impl Into<Scalar>,
    ) -> OrmResult<Option<Row>> {
        if self.builder.has_filter() || self.builder.has_group_or_order() || self.builder.has_values()
        {
            return Err(OrmError::conflict(
                "cannot pass conditions, values, group, or order to find()",
            ));
        }
        let pk = self.builder.config().primary_key_name().to_string();
        self.builder.filter(Condition::eq(pk, id.into()));
        let outcome = self.dispatch(conn, StatementKind::Select, None).await?;
        Ok(outcome.into_rows().into_iter().next())
    }

    /// Fetch the first matching row.
    pub async fn first_one(&mut self, conn: &impl Driver) -> OrmResult<Option<Row>> {
        let outcome = self
            .dispatch(conn, StatementKind::Select, Some(" LIMIT 1".to_string()))
            .await?;
        Ok(outcome.into_rows().into_iter().next())
    }

    /// Skip `skip` rows and fetch the next `count`.
    pub async fn slice(
        &mut self,
        conn: &impl Driver,
        skip: u64,
        count: u64,
    ) -> OrmResult<Outcome> {
        let suffix = format!(" LIMIT {count} OFFSET {skip}");
        self.dispatch(conn, StatementKind::Select, Some(suffix)).await
    }

    /// Fetch the first `count` matching rows.
    pub async fn first(&mut self, conn: &impl Driver, count: u64) -> OrmResult<Outcome> {
        self.slice(conn, 0, count).await
    }

    /// Skip `offset` rows and fetch the rest.
    pub async fn list_after(&mut self, conn: &impl Driver, offset: u64) -> OrmResult<Outcome> {
        let suffix = format!(" OFFSET {offset}");
        self.dispatch(conn, StatementKind::Select, Some(suffix)).await
    }

    /// Fetch one page of results. `page` is 1-based.
    pub async fn paginate(
        &mut self,
        conn: &impl Driver,
        per_page: u64,
        page: u64,
    ) -> OrmResult<Outcome> {
        let page = page.max(1);
        self.slice(conn, per_page * (page - 1), per_page).await
    }

    /// Fetch matching rows and feed them to `callback` in chunks of `size`.
    pub async fn chunk(
        &mut self,
        conn: &impl Driver,
        size: usize,
        mut callback: impl FnMut(&[Row]),
    ) -> OrmResult<()> {
        let rows = self.list(conn).await?.into_rows();
        for slice in rows.chunks(size.max(1)) {
            callback(slice);
        }
        Ok(())
    }

    // ==================== Mutations ====================

    /// Insert the stored values.
    pub async fn insert(&mut self, conn: &impl Driver) -> OrmResult<Outcome> {
        self.dispatch(conn, StatementKind::Insert, None).await
    }

    /// Update rows matching the current filter with the stored values.
    pub async fn update(&mut self, conn: &impl Driver) -> OrmResult<Outcome> {
        self.dispatch(conn, StatementKind::Update, None).await
    }

    /// Delete rows matching the current filter.
    pub async fn delete(&mut self, conn: &impl Driver) -> OrmResult<Outcome> {
        self.dispatch(conn, StatementKind::Delete, None).await
    }

    /// Try an update; when nothing was touched, insert the values instead
    /// (without the filter).
    pub async fn update_or_insert(&mut self, conn: &impl Driver) -> OrmResult<Outcome> {
        let saved = self.builder.snapshot();
        let updated = self.update(conn).await?;
        match updated {
            Outcome::Affected(0) | Outcome::None => {}
            other => return Ok(other),
        }
        self.builder.restore(saved);
        self.builder.clear_filter();
        self.insert(conn).await
    }

    // ==================== Execution ====================

    async fn dispatch(
        &mut self,
        conn: &impl Driver,
        kind: StatementKind,
        suffix: Option<String>,
    ) -> OrmResult<Outcome> {
        let op = Operation::new(kind, self.builder.config().primary_key_name());
        let mut statement = self.builder.render(kind)?;
        if let Some(suffix) = suffix {
            statement.push_str(&suffix);
        }

        let backend = conn.kind().backend();
        let statement = backend.prepare(statement, &op);
        tracing::debug!(statement = %statement, "executing statement");

        let raw = conn.execute(&statement).await?;
        Ok(normalize_result(backend.adapt(raw, &op), &op))
    }
}
