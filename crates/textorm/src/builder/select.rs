//! SELECT rendering.

use super::table::TableConfig;
use super::{QuerySpec, SelectExpr, require_table};
use crate::error::OrmResult;

pub(crate) fn render(spec: &QuerySpec, config: &TableConfig) -> OrmResult<String> {
    let table = require_table(spec)?;

    if spec.values.is_some() {
        // Documented leniency: values make no sense on a select and are
        // dropped with a warning instead of failing.
        tracing::warn!(table, "values set on a select statement are ignored");
    }

    let mut sql = String::from("SELECT ");
    sql.push_str(&render_projection(spec, config));
    sql.push_str(" FROM ");
    sql.push_str(table);

    if let Some(join) = &spec.join {
        sql.push_str(&format!(
            " {} JOIN {} ON {}.{} = {}.{}",
            join.kind.keyword(),
            join.table,
            table,
            join.left_col,
            join.table,
            join.right_col
        ));
    }

    if let Some(filter) = &spec.filter {
        sql.push_str(" WHERE ");
        sql.push_str(&filter.compile(&config.allow_html)?);
    }

    if !spec.group_by.is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(&spec.group_by.join(", "));
    }

    if !spec.order_by.is_empty() {
        sql.push_str(" ORDER BY ");
        let entries: Vec<String> = spec.order_by.iter().map(|o| o.render()).collect();
        sql.push_str(&entries.join(", "));
    }

    Ok(sql)
}

fn render_projection(spec: &QuerySpec, config: &TableConfig) -> String {
    if spec.select.is_empty() {
        if config.selectable.is_empty() {
            return "*".to_string();
        }
        return config.selectable.join(", ");
    }

    let mut distinct = None;
    let mut columns = Vec::with_capacity(spec.select.len());
    for entry in &spec.select {
        match entry {
            SelectExpr::Distinct(col) => distinct = Some(format!("DISTINCT ON ({col})")),
            SelectExpr::Column(col) => columns.push(col.clone()),
            SelectExpr::Raw(fragment) => columns.push(fragment.as_str().to_string()),
        }
    }

    match distinct {
        Some(prefix) if columns.is_empty() => prefix,
        Some(prefix) => format!("{prefix} {}", columns.join(", ")),
        None => columns.join(", "),
    }
}
