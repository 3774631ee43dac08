//! Value sanitization for text-rendered statements.
//!
//! Statements here are rendered as text, so every string that reaches a
//! VALUES clause or a condition leaf passes through this module first:
//! single quotes are doubled, and tag-like markup is stripped unless the
//! column is on the table's rich-text allow-list.

use crate::row::Row;
use crate::value::{Scalar, Value};
use std::sync::OnceLock;

/// One pattern covering comment blocks, `<script>`/`<style>` elements with
/// their bodies, and any other opening/closing tag.
fn tag_or_comment() -> &'static regex::Regex {
    static TAG_RE: OnceLock<regex::Regex> = OnceLock::new();
    TAG_RE.get_or_init(|| {
        let tag_body = r#"(?:[^"'>]|"[^"]*"|'[^']*')*"#;
        let pattern = format!(
            "(?is)<(?:!--(?:(?:-*[^->])*--+|-?)\
             |script\\b{tag_body}>.*?</script\\s*\
             |style\\b{tag_body}>.*?</style\\s*\
             |/?[a-z]{tag_body})>"
        );
        regex::Regex::new(&pattern).expect("invalid built-in markup regex")
    })
}

/// Strip tag-like markup from `input` and escape what remains.
///
/// Stripping repeats until a fixed point is reached, so nested or malformed
/// tags reassembled by an earlier pass are caught by a later one. Any `<`
/// left afterwards is escaped as `&lt;`.
pub fn escape_markup(input: &str) -> String {
    let mut text = input.to_string();
    loop {
        let stripped = tag_or_comment().replace_all(&text, "").into_owned();
        if stripped == text {
            break;
        }
        text = stripped;
    }
    text.replace('<', "&lt;")
}

/// Sanitize a single value before it is embedded in statement text.
///
/// Non-string values pass through unchanged. Strings get embedded single
/// quotes doubled; markup is stripped unless `column` is in `allow_html`.
/// List elements are sanitized individually. Raw fragments and the unset
/// sentinel are left untouched. Quoting is the renderer's responsibility.
pub fn sanitize_value(value: Value, column: &str, allow_html: &[String]) -> Value {
    match value {
        Value::Scalar(s) => Value::Scalar(sanitize_scalar(s, column, allow_html)),
        Value::List(items) => Value::List(
            items
                .into_iter()
                .map(|s| sanitize_scalar(s, column, allow_html))
                .collect(),
        ),
        other => other,
    }
}

fn sanitize_scalar(scalar: Scalar, column: &str, allow_html: &[String]) -> Scalar {
    match scalar {
        Scalar::Text(s) => {
            let escaped = s.replace('\'', "''");
            if allow_html.iter().any(|c| c == column) {
                Scalar::Text(escaped)
            } else {
                Scalar::Text(escape_markup(&escaped))
            }
        }
        other => other,
    }
}

/// Merge per-operation default values into a row.
///
/// Defaults come first, explicit values override them in place, insertion
/// order is otherwise preserved.
pub fn merge_defaults(row: Row, defaults: &Row) -> Row {
    if defaults.is_empty() {
        return row;
    }
    let mut merged = defaults.clone();
    for (column, value) in row {
        merged.set(column, value);
    }
    merged
}
