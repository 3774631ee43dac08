//! Backend adapters and response normalization.
//!
//! Statement text is backend-agnostic except for two seams: how an insert
//! learns its generated key, and how the driver reports what happened. Each
//! [`Backend`] folds its driver's conventions into the uniform [`RawResult`]
//! shape; [`normalize_result`] then applies one shared reduction to an
//! [`Outcome`], identical for every backend.

use crate::builder::StatementKind;
use crate::row::{RawResult, Row};
use crate::value::Scalar;
use serde::Serialize;

/// Render-time summary of a statement, handed to the execution boundary.
#[derive(Debug, Clone)]
pub struct Operation {
    pub kind: StatementKind,
    pub is_mutating: bool,
    pub primary_key: String,
}

impl Operation {
    /// Derive the descriptor for a statement kind and primary key.
    pub fn new(kind: StatementKind, primary_key: impl Into<String>) -> Self {
        Self {
            kind,
            is_mutating: kind.is_mutating(),
            primary_key: primary_key.into(),
        }
    }
}

/// The uniform shape a caller receives after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The statement produced rows.
    Rows(Vec<Row>),
    /// A single-row insert produced this generated key.
    InsertedId(Scalar),
    /// A mutation touched this many rows.
    Affected(u64),
    /// No rows found / nothing reported. Not an error.
    None,
}

impl Outcome {
    /// Returned rows, if any.
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            Outcome::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    /// Consume into rows; anything else becomes an empty list.
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Outcome::Rows(rows) => rows,
            _ => Vec::new(),
        }
    }

    /// Affected-row count, if that is what came back.
    pub fn affected(&self) -> Option<u64> {
        match self {
            Outcome::Affected(n) => Some(*n),
            _ => None,
        }
    }

    /// Generated key, if that is what came back.
    pub fn inserted_id(&self) -> Option<&Scalar> {
        match self {
            Outcome::InsertedId(id) => Some(id),
            _ => None,
        }
    }

    /// Whether this is the no-data sentinel.
    pub fn is_none(&self) -> bool {
        matches!(self, Outcome::None)
    }
}

impl Serialize for Outcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Outcome::Rows(rows) => rows.serialize(serializer),
            Outcome::InsertedId(id) => id.serialize(serializer),
            Outcome::Affected(n) => n.serialize(serializer),
            Outcome::None => serializer.serialize_bool(false),
        }
    }
}

/// Reduce a uniform raw result to the caller-facing outcome.
///
/// Non-empty rows always win, regardless of kind. Otherwise a mutating
/// statement yields the generated key (single-row insert), the affected-row
/// count when the driver reports one, or the no-data sentinel; a
/// non-mutating statement with no rows yields the sentinel.
pub fn normalize_result(raw: RawResult, op: &Operation) -> Outcome {
    if !raw.rows.is_empty() {
        return Outcome::Rows(raw.rows);
    }

    if op.is_mutating {
        if op.kind == StatementKind::Insert && raw.affected_rows == Some(1) {
            if let Some(id) = raw.inserted_id {
                return Outcome::InsertedId(id);
            }
        }
        return match raw.affected_rows {
            Some(n) => Outcome::Affected(n),
            None => Outcome::None,
        };
    }

    Outcome::None
}

/// Which backend a driver speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    Postgres,
    Mysql,
}

impl DriverKind {
    /// The adapter for this backend, selected once per driver.
    pub fn backend(self) -> &'static dyn Backend {
        match self {
            DriverKind::Postgres => &PostgresBackend,
            DriverKind::Mysql => &MysqlBackend,
        }
    }
}

/// Backend-specific statement preparation and result adaptation.
pub trait Backend: Send + Sync {
    /// Adjust a rendered statement for this backend before execution.
    fn prepare(&self, statement: String, op: &Operation) -> String;

    /// Fold this backend's result conventions into the uniform shape
    /// [`normalize_result`] expects.
    fn adapt(&self, raw: RawResult, op: &Operation) -> RawResult;
}

/// Postgres: inserts learn their key through `RETURNING`; the returned row
/// is consumed into `inserted_id` so mutations normalize like any other.
pub struct PostgresBackend;

impl Backend for PostgresBackend {
    fn prepare(&self, statement: String, op: &Operation) -> String {
        if op.is_mutating && op.kind == StatementKind::Insert {
            return format!("{} RETURNING {}", statement, op.primary_key);
        }
        statement
    }

    fn adapt(&self, mut raw: RawResult, op: &Operation) -> RawResult {
        if !op.is_mutating {
            return raw;
        }

        if raw.affected_rows.is_none() {
            raw.affected_rows = Some(raw.rows.len() as u64);
        }

        // RETURNING rows of a mutation are bookkeeping, not a result set.
        let rows = std::mem::take(&mut raw.rows);
        if op.kind == StatementKind::Insert && raw.affected_rows == Some(1) {
            raw.inserted_id = rows
                .first()
                .and_then(|row| row.get_scalar(&op.primary_key))
                .cloned();
        }
        raw
    }
}

/// MySQL: the driver reports `inserted_id` and `affected_rows` directly, so
/// the raw result is already in the uniform shape.
pub struct MysqlBackend;

impl Backend for MysqlBackend {
    fn prepare(&self, statement: String, _op: &Operation) -> String {
        statement
    }

    fn adapt(&self, raw: RawResult, _op: &Operation) -> RawResult {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn row(pairs: &[(&str, i64)]) -> Row {
        pairs
            .iter()
            .map(|(c, v)| (c.to_string(), Value::from(*v)))
            .collect()
    }

    fn select_op() -> Operation {
        Operation::new(StatementKind::Select, "id")
    }

    fn insert_op() -> Operation {
        Operation::new(StatementKind::Insert, "id")
    }

    #[test]
    fn rows_win_regardless_of_kind() {
        let raw = RawResult::rows(vec![row(&[("id", 1)])]);
        let out = normalize_result(raw, &select_op());
        assert_eq!(out.rows().map(|r| r.len()), Some(1));

        let raw = RawResult {
            rows: vec![row(&[("id", 1)])],
            affected_rows: Some(1),
            inserted_id: Some(Scalar::Int(9)),
        };
        let out = normalize_result(raw, &insert_op());
        assert!(out.rows().is_some());
    }

    #[test]
    fn empty_select_is_the_sentinel() {
        let out = normalize_result(RawResult::default(), &select_op());
        assert!(out.is_none());
    }

    #[test]
    fn single_row_insert_yields_generated_id() {
        let raw = RawResult {
            affected_rows: Some(1),
            inserted_id: Some(Scalar::Int(42)),
            ..RawResult::default()
        };
        let out = normalize_result(raw, &insert_op());
        assert_eq!(out, Outcome::InsertedId(Scalar::Int(42)));
    }

    #[test]
    fn mutation_yields_affected_count() {
        let op = Operation::new(StatementKind::Update, "id");
        let out = normalize_result(RawResult::affected(3), &op);
        assert_eq!(out, Outcome::Affected(3));
    }

    #[test]
    fn mutation_without_count_is_the_sentinel() {
        let op = Operation::new(StatementKind::Delete, "id");
        let out = normalize_result(RawResult::default(), &op);
        assert!(out.is_none());
    }

    #[test]
    fn postgres_appends_returning_to_inserts() {
        let backend = DriverKind::Postgres.backend();
        let sql = backend.prepare("INSERT INTO t (a) VALUES (1)".into(), &insert_op());
        assert_eq!(sql, "INSERT INTO t (a) VALUES (1) RETURNING id");

        let sql = backend.prepare("SELECT * FROM t".into(), &select_op());
        assert_eq!(sql, "SELECT * FROM t");
    }

    #[test]
    fn postgres_consumes_returning_row_into_id() {
        let backend = DriverKind::Postgres.backend();
        let raw = RawResult::rows(vec![row(&[("id", 7)])]);
        let adapted = backend.adapt(raw, &insert_op());
        assert!(adapted.rows.is_empty());
        assert_eq!(adapted.inserted_id, Some(Scalar::Int(7)));
        assert_eq!(adapted.affected_rows, Some(1));

        let out = normalize_result(adapted, &insert_op());
        assert_eq!(out, Outcome::InsertedId(Scalar::Int(7)));
    }

    #[test]
    fn postgres_leaves_select_rows_alone() {
        let backend = DriverKind::Postgres.backend();
        let raw = RawResult::rows(vec![row(&[("id", 1)]), row(&[("id", 2)])]);
        let adapted = backend.adapt(raw, &select_op());
        assert_eq!(adapted.rows.len(), 2);
    }

    #[test]
    fn mysql_passes_through() {
        let backend = DriverKind::Mysql.backend();
        let raw = RawResult {
            affected_rows: Some(1),
            inserted_id: Some(Scalar::Int(5)),
            ..RawResult::default()
        };
        let adapted = backend.adapt(raw, &insert_op());
        assert_eq!(adapted.inserted_id, Some(Scalar::Int(5)));
    }
}
