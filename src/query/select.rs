//! Attribute selection via the `fields` parameter.

use crate::errors::ApiError;
use crate::resource::CrudResource;

/// Resolve the comma-separated `fields` parameter against the resource's
/// selectable columns.
///
/// Unlike filters, an unknown name here is a hard 400: a projected response
/// silently missing an attribute is worse than no response.
pub fn parse_fields<R: CrudResource>(
    fields: Option<&str>,
) -> Result<Option<Vec<R::Column>>, ApiError> {
    let Some(fields) = fields else {
        return Ok(None);
    };

    let selectable = R::selectable_columns();
    let mut seen: Vec<&str> = Vec::new();
    let mut columns = Vec::new();

    for name in fields.split(',') {
        let name = name.trim();
        if name.is_empty() || seen.contains(&name) {
            continue;
        }
        match selectable.iter().find(|(col_name, _)| *col_name == name) {
            Some(&(_, column)) => {
                seen.push(name);
                columns.push(column);
            }
            None => {
                return Err(ApiError::bad_request(format!("unknown field '{name}'")));
            }
        }
    }

    if columns.is_empty() {
        return Err(ApiError::bad_request("fields must name at least one attribute"));
    }

    Ok(Some(columns))
}
