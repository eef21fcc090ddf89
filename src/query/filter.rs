//! Translation of the JSON `filter` parameter into a Sea-ORM [`Condition`].
//!
//! Only columns a resource declares as filterable participate. Unknown keys
//! and unsupported value shapes are skipped rather than rejected, so a stale
//! client filter degrades to a broader result set instead of an error.

use sea_orm::{
    ColumnTrait, Condition,
    sea_query::{Expr, ExprTrait, Func, IntoColumnRef, LikeExpr, SimpleExpr},
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::resource::CrudResource;

// Basic safety limits
const MAX_FIELD_VALUE_LENGTH: usize = 10_000;

/// Comparison operators recognized as field name suffixes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareOp {
    Gte,
    Lte,
    Gt,
    Lt,
    Neq,
}

const COMPARISON_SUFFIXES: [(&str, CompareOp); 5] = [
    ("_gte", CompareOp::Gte),
    ("_lte", CompareOp::Lte),
    ("_gt", CompareOp::Gt),
    ("_lt", CompareOp::Lt),
    ("_neq", CompareOp::Neq),
];

/// Basic field name validation
fn is_valid_field_name(field_name: &str) -> bool {
    !field_name.is_empty()
        && field_name.len() <= 100
        && !field_name.starts_with('_')
        && !field_name.contains("..")
}

/// Escape LIKE wildcards so user input cannot widen a pattern.
/// Escapes backslash first, then % and _.
fn escape_like_wildcards(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Split a `views_gte` style key into its base field and operator
fn parse_comparison_suffix(field_name: &str) -> Option<(&str, CompareOp)> {
    COMPARISON_SUFFIXES
        .iter()
        .find_map(|&(suffix, op)| field_name.strip_suffix(suffix).map(|base| (base, op)))
}

fn parse_filter_json(filter_str: Option<&str>) -> HashMap<String, serde_json::Value> {
    filter_str.map_or_else(HashMap::new, |filter| {
        match serde_json::from_str(filter) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::debug!(error = %err, "invalid JSON in filter parameter, ignoring");
                HashMap::new()
            }
        }
    })
}

fn lookup_column<C: ColumnTrait + Copy>(columns: &[(&str, C)], name: &str) -> Option<C> {
    columns
        .iter()
        .find(|(col_name, _)| *col_name == name)
        .map(|&(_, col)| col)
}

/// Case-insensitive containment: `UPPER(column) LIKE UPPER('%value%') ESCAPE '\'`
#[must_use]
pub fn like_contains(column: impl IntoColumnRef, value: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like_wildcards(value).to_uppercase());
    Func::upper(Expr::col(column)).like(LikeExpr::new(pattern).escape('\\'))
}

fn apply_comparison<C, V>(column: C, op: CompareOp, value: V) -> SimpleExpr
where
    C: ColumnTrait,
    V: Into<sea_orm::Value>,
{
    match op {
        CompareOp::Gte => column.gte(value),
        CompareOp::Lte => column.lte(value),
        CompareOp::Gt => column.gt(value),
        CompareOp::Lt => column.lt(value),
        CompareOp::Neq => column.ne(value),
    }
}

fn numeric_comparison<C: ColumnTrait>(
    column: C,
    op: CompareOp,
    number: &serde_json::Number,
) -> Option<SimpleExpr> {
    if let Some(value) = number.as_i64() {
        Some(apply_comparison(column, op, value))
    } else {
        number
            .as_f64()
            .map(|value| apply_comparison(column, op, value))
    }
}

/// Free text search: OR of case-insensitive containment over the resource's
/// searchable columns. Returns `None` when the resource declares none or the
/// query is empty or oversized.
fn search_condition<R: CrudResource>(query: &str) -> Option<Condition> {
    let searchable = R::searchable_columns();
    if searchable.is_empty() {
        return None;
    }
    let trimmed = query.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_FIELD_VALUE_LENGTH {
        return None;
    }
    let mut any = Condition::any();
    for (_, column) in searchable {
        any = any.add(like_contains(column, trimmed));
    }
    Some(any)
}

fn string_filter<R: CrudResource>(
    key: &str,
    value: &str,
    column: R::Column,
) -> Option<SimpleExpr> {
    if value.len() > MAX_FIELD_VALUE_LENGTH {
        return None;
    }
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if R::like_filterable_columns().contains(&key) {
        return Some(like_contains(column, trimmed));
    }

    // UUID values compare directly, everything else case-insensitively
    if let Ok(uuid_value) = Uuid::parse_str(trimmed) {
        return Some(Expr::col(column).eq(uuid_value));
    }

    Some(SimpleExpr::FunctionCall(Func::upper(Expr::col(column))).eq(trimmed.to_uppercase()))
}

fn number_filter<C: ColumnTrait>(column: C, number: &serde_json::Number) -> Option<SimpleExpr> {
    if let Some(int_value) = number.as_i64() {
        Some(Expr::col(column).eq(int_value))
    } else {
        number
            .as_f64()
            .map(|float_value| Expr::col(column).eq(float_value))
    }
}

fn array_filter<C: ColumnTrait>(
    column: C,
    array_values: &[serde_json::Value],
) -> Option<SimpleExpr> {
    let mut values: Vec<sea_orm::Value> = Vec::new();
    for array_value in array_values {
        match array_value {
            serde_json::Value::String(s) => {
                if let Ok(uuid_value) = Uuid::parse_str(s.trim()) {
                    values.push(uuid_value.into());
                } else {
                    values.push(s.clone().into());
                }
            }
            serde_json::Value::Number(n) => {
                if let Some(int_value) = n.as_i64() {
                    values.push(int_value.into());
                } else if let Some(float_value) = n.as_f64() {
                    values.push(float_value.into());
                }
            }
            serde_json::Value::Bool(b) => values.push((*b).into()),
            _ => {}
        }
    }

    if values.is_empty() {
        None
    } else {
        Some(column.is_in(values))
    }
}

/// Build the combined filter condition for a resource from the raw `filter`
/// query parameter.
pub fn build_condition<R: CrudResource>(filter_str: Option<&str>) -> Condition {
    let filters = parse_filter_json(filter_str);
    let filterable = R::filterable_columns();
    let mut condition = Condition::all();

    if let Some(q_value) = filters.get("q")
        && let Some(q_str) = q_value.as_str()
        && let Some(search) = search_condition::<R>(q_str)
    {
        condition = condition.add(search);
    }

    for (key, value) in &filters {
        if key == "q" {
            continue;
        }
        if !is_valid_field_name(key) {
            continue;
        }

        // Comparison suffixes resolve against the base field name
        if let Some((base_field, op)) = parse_comparison_suffix(key)
            && let serde_json::Value::Number(number) = value
            && let Some(column) = lookup_column(&filterable, base_field)
        {
            if let Some(expr) = numeric_comparison(column, op, number) {
                condition = condition.add(expr);
            }
            continue;
        }

        let Some(column) = lookup_column(&filterable, key) else {
            continue;
        };

        let filter_expr = match value {
            serde_json::Value::String(string_value) => {
                string_filter::<R>(key, string_value, column)
            }
            serde_json::Value::Number(number) => number_filter(column, number),
            serde_json::Value::Bool(bool_value) => Some(Expr::col(column).eq(*bool_value)),
            serde_json::Value::Array(array_values) => array_filter(column, array_values),
            serde_json::Value::Null => Some(Expr::col(column).is_null()),
            serde_json::Value::Object(_) => None,
        };

        if let Some(expr) = filter_expr {
            condition = condition.add(expr);
        }
    }

    condition
}
