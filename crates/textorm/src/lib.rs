//! # textorm
//!
//! A text-first, driver-agnostic statement-building ORM core for Postgres
//! and MySQL.
//!
//! ## Features
//!
//! - **Structured statements**: describe a tabular operation as data, render
//!   it as text (use [`QueryBuilder`] directly or the [`Model`] façade)
//! - **Nested filters**: arbitrarily deep AND/OR [`Condition`] trees compile
//!   to one correctly parenthesized WHERE clause
//! - **Sanitized values**: quote escaping and markup stripping with a
//!   per-column rich-text allow-list
//! - **Uniform outcomes**: heterogeneous driver replies normalize to one
//!   [`Outcome`] shape, identical across backends
//! - **Opaque drivers**: the execution boundary is a single async
//!   [`Driver`] trait; connections, pools and transports stay outside
//!
//! ## Example
//!
//! ```ignore
//! use textorm::{Condition, Model, Relation, Row, TableConfig, Value};
//!
//! let mut users = Model::new(
//!     TableConfig::new("users").selectable(["id", "username", "email"]),
//! );
//!
//! // SELECT
//! let active = users
//!     .filter(Condition::all(vec![
//!         Condition::eq("status", "active"),
//!         Condition::gt("age", 18),
//!     ]))
//!     .order_by([("created_at", textorm::SortDir::Desc)])
//!     .list(&driver)
//!     .await?
//!     .into_rows();
//!
//! // INSERT
//! let id = users
//!     .set(Row::from_iter([("username", Value::from("alice"))]))
//!     .insert(&driver)
//!     .await?;
//! ```

pub mod backend;
pub mod builder;
pub mod client;
pub mod condition;
pub mod error;
pub mod model;
pub mod prelude;
pub mod row;
pub mod sanitize;
pub mod util;
pub mod value;

pub use backend::{
    Backend, DriverKind, MysqlBackend, Operation, Outcome, PostgresBackend, normalize_result,
};
pub use builder::{
    JoinKind, OrderBy, QueryBuilder, SelectExpr, SortDir, StatementKind, TableConfig,
};
pub use client::Driver;
pub use condition::{Condition, Op, Relation};
pub use error::{OrmError, OrmResult};
pub use model::Model;
pub use row::{RawResult, Row};
pub use util::{distinct, raw, timestamp, timestamp_now};
pub use value::{RawSql, Scalar, Value};
