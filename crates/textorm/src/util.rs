//! Small helpers for statement fragments.

use crate::builder::SelectExpr;
use crate::value::RawSql;
use chrono::{DateTime, Local, TimeZone};

/// Mark a string as pre-formed statement text.
///
/// The fragment is inlined verbatim wherever it is used, with no escaping or
/// quoting. Typical use is a subquery on the value side of a condition:
///
/// ```
/// use textorm::{Condition, util::raw};
///
/// let cond = Condition::eq("id", raw("(SELECT max(id) FROM logs)"));
/// ```
///
/// # Safety
/// Be careful with SQL injection when inlining raw fragments.
pub fn raw(fragment: impl Into<String>) -> RawSql {
    RawSql(fragment.into())
}

/// Build a `DISTINCT ON (column)` projection entry.
///
/// At most one such entry may appear in a projection list; it is pulled to
/// the front of the rendered column list.
pub fn distinct(column: impl Into<String>) -> SelectExpr {
    SelectExpr::Distinct(column.into())
}

/// Format a point in time as a `YYYY-MM-DD HH:MM:SS` timestamp literal,
/// valid in both supported backends.
pub fn timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// [`timestamp`] for the current local time.
pub fn timestamp_now() -> String {
    timestamp(&Local::now())
}
