//! # Query parameter translation
//!
//! Everything a list or item request may ask for in its query string gets
//! resolved here into typed Sea-ORM inputs before any SQL runs:
//!
//! - `filter` becomes a [`Condition`] ([`filter`])
//! - `sort` / `sort_by` + `order` become a column and [`Order`] ([`sort`])
//! - `range` / `page` + `per_page` become offset and limit ([`page`])
//! - `fields` becomes a column projection ([`select`])
//! - `include` becomes a validated list of relation names
//!
//! Lenient where a stale client should still get data (unknown filter keys
//! are skipped, unknown sort columns fall back to the default), strict where
//! the response shape would change (unknown `fields` or `include` names are
//! rejected with 400).

pub mod filter;
pub mod page;
pub mod select;
pub mod sort;

use sea_orm::{ColumnTrait, Condition, sea_query::Order};

use crate::errors::ApiError;
use crate::params::{ItemParams, ListParams};
use crate::resource::CrudResource;

/// Fully resolved query inputs for a list operation
#[derive(Clone, Debug)]
pub struct QueryOptions<C> {
    pub condition: Condition,
    pub order_column: C,
    pub order_direction: Order,
    pub offset: u64,
    pub limit: u64,
    /// Projection from the `fields` parameter, `None` for full models
    pub columns: Option<Vec<C>>,
    /// Validated relation names from the `include` parameter
    pub includes: Vec<String>,
}

impl<C: ColumnTrait> QueryOptions<C> {
    /// Translate list query parameters for resource `R`.
    ///
    /// # Errors
    /// Returns 400 for unknown `fields` or `include` names, or when both are
    /// present in the same request.
    pub fn from_params<R>(params: &ListParams) -> Result<Self, ApiError>
    where
        R: CrudResource<Column = C>,
    {
        let condition = filter::build_condition::<R>(params.filter.as_deref());
        let (order_column, order_direction) =
            sort::parse_sort(params, &R::sortable_columns(), R::default_order_column());
        let (offset, limit) = page::parse_pagination(params);
        let columns = select::parse_fields::<R>(params.fields.as_deref())?;
        let includes = parse_includes::<R>(params.include.as_deref())?;
        reject_fields_with_includes(columns.is_some(), &includes)?;

        Ok(Self {
            condition,
            order_column,
            order_direction,
            offset,
            limit,
            columns,
            includes,
        })
    }
}

/// Resolved query inputs for a single-item operation
#[derive(Clone, Debug)]
pub struct ItemOptions<C> {
    pub columns: Option<Vec<C>>,
    pub includes: Vec<String>,
}

impl<C: ColumnTrait> ItemOptions<C> {
    /// Translate item query parameters for resource `R`.
    ///
    /// # Errors
    /// Same rules as [`QueryOptions::from_params`].
    pub fn from_params<R>(params: &ItemParams) -> Result<Self, ApiError>
    where
        R: CrudResource<Column = C>,
    {
        let columns = select::parse_fields::<R>(params.fields.as_deref())?;
        let includes = parse_includes::<R>(params.include.as_deref())?;
        reject_fields_with_includes(columns.is_some(), &includes)?;

        Ok(Self { columns, includes })
    }
}

// A projected row has no place to carry loaded relations
fn reject_fields_with_includes(has_fields: bool, includes: &[String]) -> Result<(), ApiError> {
    if has_fields && !includes.is_empty() {
        return Err(ApiError::bad_request(
            "fields and include cannot be combined",
        ));
    }
    Ok(())
}

/// Validate the comma-separated `include` parameter against the resource's
/// declared relation names.
pub fn parse_includes<R: CrudResource>(include: Option<&str>) -> Result<Vec<String>, ApiError> {
    let Some(include) = include else {
        return Ok(Vec::new());
    };

    let related = R::related_names();
    let mut includes: Vec<String> = Vec::new();

    for name in include.split(',') {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        if !related.contains(&name) {
            return Err(ApiError::bad_request(format!("unknown include '{name}'")));
        }
        if !includes.iter().any(|existing| existing.as_str() == name) {
            includes.push(name.to_string());
        }
    }

    Ok(includes)
}
