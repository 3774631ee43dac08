//! INSERT rendering.

use super::table::TableConfig;
use super::{QuerySpec, Values, render_cell, require_table};
use crate::error::{OrmError, OrmResult};
use crate::row::Row;
use crate::sanitize::{merge_defaults, sanitize_value};

pub(crate) fn render(spec: &QuerySpec, config: &TableConfig) -> OrmResult<String> {
    let table = require_table(spec)?;

    if spec.filter.is_some() {
        return Err(OrmError::conflict("insert cannot carry conditions"));
    }
    if !spec.group_by.is_empty() || !spec.order_by.is_empty() {
        return Err(OrmError::conflict("insert cannot carry group or order"));
    }

    let rows: Vec<&Row> = match &spec.values {
        Some(Values::One(row)) => vec![row],
        Some(Values::Many(rows)) if !rows.is_empty() => rows.iter().collect(),
        _ => return Err(OrmError::MissingValues("no values set for insert".into())),
    };

    let defaults = sanitized_defaults(config);
    let merged: Vec<Row> = rows
        .into_iter()
        .map(|row| merge_defaults(row.clone(), &defaults))
        .collect();

    // Column order comes from the first row; every other row must agree.
    let columns: Vec<String> = merged[0].columns().map(str::to_string).collect();
    if columns.is_empty() {
        return Err(OrmError::MissingValues("no values set for insert".into()));
    }
    for (index, row) in merged.iter().enumerate().skip(1) {
        let row_columns: Vec<&str> = row.columns().collect();
        if row_columns != columns.iter().map(String::as_str).collect::<Vec<_>>() {
            let offender = columns
                .iter()
                .find(|c| row.get(c).is_none())
                .cloned()
                .unwrap_or_else(|| format!("row {index}"));
            return Err(OrmError::UndefinedColumnValue(offender));
        }
    }

    let mut tuples = Vec::with_capacity(merged.len());
    for row in &merged {
        let mut cells = Vec::with_capacity(row.len());
        for (column, value) in row.iter() {
            cells.push(render_cell(column, value)?);
        }
        tuples.push(format!("({})", cells.join(", ")));
    }

    Ok(format!(
        "INSERT INTO {} ({}) VALUES {}",
        table,
        columns.join(", "),
        tuples.join(", ")
    ))
}

/// Insert-time defaults run through the same sanitization as explicit values.
fn sanitized_defaults(config: &TableConfig) -> Row {
    config
        .insert_defaults
        .iter()
        .map(|(column, value)| {
            (
                column.to_string(),
                sanitize_value(value.clone(), column, &config.allow_html),
            )
        })
        .collect()
}
