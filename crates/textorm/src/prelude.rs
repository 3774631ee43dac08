//! Convenient imports for typical `textorm` usage.
//!
//! This module is intentionally small and focused on the most common APIs so
//! examples can start with:
//!
//! ```ignore
//! use textorm::prelude::*;
//! ```

pub use crate::{Condition, Driver, Model, Op, OrmError, OrmResult, QueryBuilder, Relation};
pub use crate::{DriverKind, Outcome, RawResult, Row, Scalar, TableConfig, Value};
pub use crate::{SortDir, StatementKind, distinct, raw};
