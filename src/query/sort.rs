//! Ordering resolution for both supported sort dialects.

use sea_orm::{ColumnTrait, sea_query::Order};

use crate::params::ListParams;

// Shared default values
const DEFAULT_SORT_COLUMN: &str = "id";
const DEFAULT_SORT_ORDER: &str = "ASC";

/// Parse sort column and order from the JSON array format
fn parse_json_sort(json: &str) -> (String, String) {
    let sort_vec: Vec<String> = serde_json::from_str(json).unwrap_or(vec![
        DEFAULT_SORT_COLUMN.to_string(),
        DEFAULT_SORT_ORDER.to_string(),
    ]);
    (
        sort_vec
            .first()
            .cloned()
            .unwrap_or(DEFAULT_SORT_COLUMN.to_string()),
        sort_vec
            .get(1)
            .cloned()
            .unwrap_or(DEFAULT_SORT_ORDER.to_string()),
    )
}

/// Convert a sort order string to the Order enum
fn order_from_str(sort_order: &str) -> Order {
    if sort_order.eq_ignore_ascii_case("ASC") {
        Order::Asc
    } else {
        Order::Desc
    }
}

/// Find a sortable column by name or fall back to the default
fn resolve_column<C>(column_name: &str, columns: &[(&str, C)], default: C) -> C
where
    C: ColumnTrait + Copy,
{
    columns
        .iter()
        .find(|&&(col_name, _)| col_name == column_name)
        .map_or(default, |&(_, col)| col)
}

/// Resolve the order column and direction from the request parameters.
///
/// Three shapes are accepted, in priority order:
/// - `sort_by=title&order=DESC`
/// - `sort=["title","DESC"]`
/// - `sort=title&order=DESC`
///
/// Unknown column names fall back to the default rather than erroring, so
/// clients sorting on a column that no longer exists still get results.
pub fn parse_sort<C>(params: &ListParams, sortable: &[(&str, C)], default_column: C) -> (C, Order)
where
    C: ColumnTrait + Copy,
{
    let (sort_column, sort_order) = if let Some(sort_by) = &params.sort_by {
        (
            sort_by.clone(),
            params
                .order
                .as_deref()
                .unwrap_or(DEFAULT_SORT_ORDER)
                .to_string(),
        )
    } else if let Some(sort) = &params.sort {
        if sort.starts_with('[') {
            parse_json_sort(sort)
        } else {
            (
                sort.clone(),
                params
                    .order
                    .as_deref()
                    .unwrap_or(DEFAULT_SORT_ORDER)
                    .to_string(),
            )
        }
    } else {
        (
            DEFAULT_SORT_COLUMN.to_string(),
            DEFAULT_SORT_ORDER.to_string(),
        )
    };

    let order_direction = order_from_str(&sort_order);
    let order_column = resolve_column(&sort_column, sortable, default_column);

    (order_column, order_direction)
}
