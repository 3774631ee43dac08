//! Condition trees for dynamic WHERE clauses.
//!
//! This module provides [`Op`], [`Relation`] and [`Condition`] primitives for
//! building arbitrarily nested boolean filters, and the compiler that flattens
//! a tree into one correctly parenthesized expression string.
//!
//! # Example
//! ```
//! use textorm::{Condition, Relation};
//!
//! let cond = Condition::group(
//!     Relation::And,
//!     vec![
//!         Condition::gt("age", 18),
//!         Condition::group(
//!             Relation::Or,
//!             vec![Condition::eq("name", "Al"), Condition::eq("name", "Bo")],
//!         ),
//!     ],
//! );
//! assert_eq!(
//!     cond.compile(&[]).unwrap(),
//!     "(age > 18 AND (name = 'Al' OR name = 'Bo'))"
//! );
//! ```

use crate::error::{OrmError, OrmResult};
use crate::sanitize::sanitize_value;
use crate::value::{Scalar, Value};

/// Relation joining the children of a condition group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    And,
    Or,
}

impl Relation {
    fn keyword(self) -> &'static str {
        match self {
            Relation::And => "AND",
            Relation::Or => "OR",
        }
    }
}

/// Comparison operator of a condition leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Equal: column = value
    Eq,
    /// Not equal: column != value
    Ne,
    /// Less than: column < value
    Lt,
    /// Less than or equal: column <= value
    Lte,
    /// Greater than: column > value
    Gt,
    /// Greater than or equal: column >= value
    Gte,
    /// LIKE pattern match
    Like,
    /// NOT LIKE pattern match
    NotLike,
    /// IN (list)
    In,
    /// NOT IN (list)
    NotIn,
}

impl Op {
    /// Parse an operator string, case-insensitively.
    pub fn parse(input: &str) -> OrmResult<Self> {
        match input.trim().to_lowercase().as_str() {
            "=" => Ok(Op::Eq),
            "!=" | "<>" => Ok(Op::Ne),
            "<" => Ok(Op::Lt),
            "<=" => Ok(Op::Lte),
            ">" => Ok(Op::Gt),
            ">=" => Ok(Op::Gte),
            "like" => Ok(Op::Like),
            "not like" => Ok(Op::NotLike),
            "in" => Ok(Op::In),
            "not in" => Ok(Op::NotIn),
            other => Err(OrmError::malformed(format!("unknown operator '{other}'"))),
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Like => "LIKE",
            Op::NotLike => "NOT LIKE",
            Op::In => "IN",
            Op::NotIn => "NOT IN",
        }
    }

    fn takes_list(self) -> bool {
        matches!(self, Op::In | Op::NotIn)
    }
}

/// One node of a filter tree: a single comparison, or a group of nodes
/// joined by a relation.
///
/// A tree is built fresh for each statement and is immutable once handed to
/// the compiler.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A single comparison.
    Leaf {
        column: String,
        op: Op,
        value: Value,
    },
    /// A group of nodes joined by `relation`. Must have at least one child.
    Branch {
        relation: Relation,
        children: Vec<Condition>,
    },
}

impl Condition {
    /// Create a leaf from a column, an operator string and a value.
    ///
    /// The operator is case-normalized; an unknown operator or an empty
    /// column name is a malformed condition.
    pub fn cmp(
        column: impl Into<String>,
        op: &str,
        value: impl Into<Value>,
    ) -> OrmResult<Self> {
        let column = column.into();
        if column.is_empty() {
            return Err(OrmError::malformed("empty column name"));
        }
        Ok(Condition::Leaf {
            column,
            op: Op::parse(op)?,
            value: value.into(),
        })
    }

    /// Create a group joined by `relation`.
    pub fn group(relation: Relation, children: Vec<Condition>) -> Self {
        Condition::Branch { relation, children }
    }

    /// Create an AND group.
    pub fn all(children: Vec<Condition>) -> Self {
        Condition::group(Relation::And, children)
    }

    /// Create an OR group.
    pub fn any(children: Vec<Condition>) -> Self {
        Condition::group(Relation::Or, children)
    }

    /// Create an equality condition: column = value
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(column, Op::Eq, value)
    }

    /// Create an inequality condition: column != value
    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(column, Op::Ne, value)
    }

    /// Create a less-than condition: column < value
    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(column, Op::Lt, value)
    }

    /// Create a less-than-or-equal condition: column <= value
    pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(column, Op::Lte, value)
    }

    /// Create a greater-than condition: column > value
    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(column, Op::Gt, value)
    }

    /// Create a greater-than-or-equal condition: column >= value
    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::leaf(column, Op::Gte, value)
    }

    /// Create a LIKE condition: column LIKE pattern
    pub fn like(column: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Self::leaf(column, Op::Like, pattern)
    }

    /// Create a NOT LIKE condition: column NOT LIKE pattern
    pub fn not_like(column: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Self::leaf(column, Op::NotLike, pattern)
    }

    /// Create an IN condition: column IN (values...)
    pub fn in_list<T: Into<Scalar>>(column: impl Into<String>, values: Vec<T>) -> Self {
        Self::leaf(column, Op::In, Value::from(values))
    }

    /// Create a NOT IN condition: column NOT IN (values...)
    pub fn not_in<T: Into<Scalar>>(column: impl Into<String>, values: Vec<T>) -> Self {
        Self::leaf(column, Op::NotIn, Value::from(values))
    }

    fn leaf(column: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        Condition::Leaf {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// Compile this tree into one parenthesized boolean expression.
    ///
    /// Each group becomes one parenthesized unit joined by its own relation
    /// keyword; leaves render as `column operator value` with string values
    /// sanitized against `allow_html` and quoted. The result is wrapped in a
    /// single outer paren group, so a bare leaf compiles to `(age > 18)`.
    pub fn compile(&self, allow_html: &[String]) -> OrmResult<String> {
        Ok(format!("({})", self.render(allow_html)?))
    }

    fn render(&self, allow_html: &[String]) -> OrmResult<String> {
        match self {
            Condition::Leaf { column, op, value } => {
                render_leaf(column, *op, value, allow_html)
            }
            Condition::Branch { relation, children } => {
                if children.is_empty() {
                    return Err(OrmError::EmptyConditionGroup);
                }
                let mut parts = Vec::with_capacity(children.len());
                for child in children {
                    // Nested groups keep their own parens; leaves join inline.
                    let rendered = match child {
                        Condition::Leaf { .. } => child.render(allow_html)?,
                        Condition::Branch { .. } => format!("({})", child.render(allow_html)?),
                    };
                    parts.push(rendered);
                }
                Ok(parts.join(&format!(" {} ", relation.keyword())))
            }
        }
    }
}

fn render_leaf(column: &str, op: Op, value: &Value, allow_html: &[String]) -> OrmResult<String> {
    if column.is_empty() {
        return Err(OrmError::malformed("empty column name"));
    }

    match value {
        Value::Unset => Err(OrmError::UnsupportedValueType(format!(
            "condition on '{column}' carries the unset sentinel"
        ))),
        Value::List(items) => {
            if !op.takes_list() {
                return Err(OrmError::mismatch(format!(
                    "list value requires IN or NOT IN, got '{}'",
                    op.keyword()
                )));
            }
            let rendered: Vec<String> = items
                .iter()
                .map(|item| render_scalar(item, column, allow_html))
                .collect();
            if rendered.is_empty() {
                // An empty list can never match; render a constant instead of
                // the invalid `IN ()`.
                return Ok(match op {
                    Op::In => "1=0".to_string(),
                    _ => "1=1".to_string(),
                });
            }
            Ok(format!(
                "{} {} ({})",
                column,
                op.keyword(),
                rendered.join(", ")
            ))
        }
        Value::Raw(fragment) => {
            if op.takes_list() {
                return Err(OrmError::mismatch(format!(
                    "'{}' requires a list value",
                    op.keyword()
                )));
            }
            Ok(format!("{} {} {}", column, op.keyword(), fragment.as_str()))
        }
        Value::Scalar(scalar) => {
            if op.takes_list() {
                return Err(OrmError::mismatch(format!(
                    "'{}' requires a list value",
                    op.keyword()
                )));
            }
            Ok(format!(
                "{} {} {}",
                column,
                op.keyword(),
                render_scalar(scalar, column, allow_html)
            ))
        }
    }
}

fn render_scalar(scalar: &Scalar, column: &str, allow_html: &[String]) -> String {
    match scalar {
        // Explicit escape hatch: the literal string "null" passes through
        // unquoted as SQL NULL.
        Scalar::Text(s) if s == "null" => s.clone(),
        Scalar::Text(_) => {
            let sanitized = sanitize_value(Value::Scalar(scalar.clone()), column, allow_html);
            match sanitized {
                Value::Scalar(Scalar::Text(s)) => format!("'{s}'"),
                _ => unreachable!("text sanitizes to text"),
            }
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::raw;

    #[test]
    fn single_leaf_renders_one_group() {
        let cond = Condition::gt("age", 18);
        assert_eq!(cond.compile(&[]).unwrap(), "(age > 18)");
    }

    #[test]
    fn group_with_single_leaf_has_no_relation_keyword() {
        let cond = Condition::all(vec![Condition::gt("age", 18)]);
        assert_eq!(cond.compile(&[]).unwrap(), "(age > 18)");
    }

    #[test]
    fn two_level_tree_nests_parens() {
        let cond = Condition::all(vec![
            Condition::gt("age", 18),
            Condition::any(vec![
                Condition::eq("name", "Al"),
                Condition::eq("name", "Bo"),
            ]),
        ]);
        assert_eq!(
            cond.compile(&[]).unwrap(),
            "(age > 18 AND (name = 'Al' OR name = 'Bo'))"
        );
    }

    #[test]
    fn three_level_tree() {
        let cond = Condition::all(vec![
            Condition::eq("a", 1),
            Condition::any(vec![
                Condition::eq("b", 2),
                Condition::all(vec![Condition::eq("c", 3), Condition::eq("d", 4)]),
            ]),
        ]);
        assert_eq!(
            cond.compile(&[]).unwrap(),
            "(a = 1 AND (b = 2 OR (c = 3 AND d = 4)))"
        );
    }

    #[test]
    fn sibling_groups_keep_their_own_parens() {
        let cond = Condition::any(vec![
            Condition::all(vec![Condition::eq("a", 1), Condition::eq("b", 2)]),
            Condition::all(vec![Condition::eq("c", 3), Condition::eq("d", 4)]),
        ]);
        assert_eq!(
            cond.compile(&[]).unwrap(),
            "((a = 1 AND b = 2) OR (c = 3 AND d = 4))"
        );
    }

    #[test]
    fn compiling_twice_is_deterministic() {
        let cond = Condition::all(vec![
            Condition::gt("age", 18),
            Condition::like("name", "%a%"),
        ]);
        assert_eq!(cond.compile(&[]).unwrap(), cond.compile(&[]).unwrap());
    }

    #[test]
    fn different_relations_differ_in_text() {
        let leaves = || vec![Condition::eq("a", 1), Condition::eq("b", 2)];
        let and = Condition::all(leaves()).compile(&[]).unwrap();
        let or = Condition::any(leaves()).compile(&[]).unwrap();
        assert_ne!(and, or);
    }

    #[test]
    fn in_renders_quoted_list() {
        let cond = Condition::in_list("name", vec!["Al", "Bo"]);
        assert_eq!(cond.compile(&[]).unwrap(), "(name IN ('Al', 'Bo'))");

        let cond = Condition::not_in("id", vec![1, 2, 3]);
        assert_eq!(cond.compile(&[]).unwrap(), "(id NOT IN (1, 2, 3))");
    }

    #[test]
    fn empty_in_list_renders_constant() {
        let cond = Condition::in_list("id", Vec::<i64>::new());
        assert_eq!(cond.compile(&[]).unwrap(), "(1=0)");

        let cond = Condition::not_in("id", Vec::<i64>::new());
        assert_eq!(cond.compile(&[]).unwrap(), "(1=1)");
    }

    #[test]
    fn in_without_list_is_a_mismatch() {
        let cond = Condition::leaf("id", Op::In, 7);
        assert!(matches!(
            cond.compile(&[]),
            Err(OrmError::OperatorValueMismatch(_))
        ));
    }

    #[test]
    fn list_without_in_is_a_mismatch() {
        let cond = Condition::leaf("id", Op::Eq, Value::from(vec![1, 2]));
        assert!(matches!(
            cond.compile(&[]),
            Err(OrmError::OperatorValueMismatch(_))
        ));
    }

    #[test]
    fn unset_value_is_unsupported() {
        let cond = Condition::leaf("id", Op::Eq, Value::Unset);
        assert!(matches!(
            cond.compile(&[]),
            Err(OrmError::UnsupportedValueType(_))
        ));
    }

    #[test]
    fn empty_group_fails() {
        let cond = Condition::all(vec![]);
        assert!(matches!(
            cond.compile(&[]),
            Err(OrmError::EmptyConditionGroup)
        ));
    }

    #[test]
    fn operator_parse_is_case_insensitive() {
        assert_eq!(Op::parse(" NOT In ").unwrap(), Op::NotIn);
        assert_eq!(Op::parse("LIKE").unwrap(), Op::Like);
        assert!(Op::parse("~~").is_err());
    }

    #[test]
    fn cmp_rejects_empty_column() {
        assert!(matches!(
            Condition::cmp("", "=", 1),
            Err(OrmError::MalformedCondition(_))
        ));
    }

    #[test]
    fn string_values_are_escaped_and_quoted() {
        let cond = Condition::eq("name", "O'Brien");
        assert_eq!(cond.compile(&[]).unwrap(), "(name = 'O''Brien')");
    }

    #[test]
    fn literal_null_string_passes_through_unquoted() {
        let cond = Condition::eq("deleted_at", "null");
        assert_eq!(cond.compile(&[]).unwrap(), "(deleted_at = null)");
    }

    #[test]
    fn null_scalar_renders_null() {
        let cond = Condition::eq("deleted_at", Scalar::Null);
        assert_eq!(cond.compile(&[]).unwrap(), "(deleted_at = NULL)");
    }

    #[test]
    fn raw_fragment_inlined_verbatim() {
        let cond = Condition::leaf("id", Op::Eq, raw("(SELECT max(id) FROM logs)"));
        assert_eq!(
            cond.compile(&[]).unwrap(),
            "(id = (SELECT max(id) FROM logs))"
        );
    }

    #[test]
    fn bool_renders_bare() {
        let cond = Condition::eq("active", true);
        assert_eq!(cond.compile(&[]).unwrap(), "(active = true)");
    }
}
