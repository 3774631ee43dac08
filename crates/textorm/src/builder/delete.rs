//! DELETE rendering.

use super::table::TableConfig;
use super::{QuerySpec, require_table};
use crate::error::{OrmError, OrmResult};

pub(crate) fn render(spec: &QuerySpec, config: &TableConfig) -> OrmResult<String> {
    let table = require_table(spec)?;

    if spec.values.is_some() {
        return Err(OrmError::conflict(
            "values cannot be set on a delete statement",
        ));
    }

    let mut sql = format!("DELETE FROM {table}");

    if let Some(filter) = &spec.filter {
        sql.push_str(" WHERE ");
        sql.push_str(&filter.compile(&config.allow_html)?);
    }

    Ok(sql)
}
