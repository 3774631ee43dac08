//! UPDATE rendering.

use super::table::TableConfig;
use super::{QuerySpec, Values, render_cell, require_table};
use crate::error::{OrmError, OrmResult};
use crate::row::Row;
use crate::sanitize::{merge_defaults, sanitize_value};

pub(crate) fn render(spec: &QuerySpec, config: &TableConfig) -> OrmResult<String> {
    let table = require_table(spec)?;

    if !spec.group_by.is_empty() || !spec.order_by.is_empty() {
        return Err(OrmError::conflict("update cannot carry group or order"));
    }

    let row = match &spec.values {
        Some(Values::One(row)) => row,
        Some(Values::Many(_)) => {
            return Err(OrmError::conflict("bulk values are only valid for insert"));
        }
        None => return Err(OrmError::MissingValues("no values set for update".into())),
    };

    let defaults: Row = config
        .update_defaults
        .iter()
        .map(|(column, value)| {
            (
                column.to_string(),
                sanitize_value(value.clone(), column, &config.allow_html),
            )
        })
        .collect();
    let merged = merge_defaults(row.clone(), &defaults);

    if merged.is_empty() {
        return Err(OrmError::MissingValues("no values set for update".into()));
    }

    let mut assignments = Vec::with_capacity(merged.len());
    for (column, value) in merged.iter() {
        assignments.push(format!("{} = {}", column, render_cell(column, value)?));
    }

    let mut sql = format!("UPDATE {} SET {}", table, assignments.join(", "));

    if let Some(filter) = &spec.filter {
        sql.push_str(" WHERE ");
        sql.push_str(&filter.compile(&config.allow_html)?);
    }

    Ok(sql)
}
