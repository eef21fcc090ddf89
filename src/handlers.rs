//! Generic Axum handlers, one per CRUD operation.
//!
//! Each handler is instantiated per resource (`find::<Article>`) by
//! [`router`](crate::router::router). Status mapping lives here: the trait
//! methods speak `DbErr`, the handlers translate outcomes into HTTP.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hyper::HeaderMap;
use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::params::{ItemParams, ListParams};
use crate::query::{ItemOptions, QueryOptions, page::content_range};
use crate::resource::{CreateOutcome, CrudResource};

/// List resources.
///
/// Responds with the matching page and a `Content-Range` header carrying the
/// total count for the filter. With `fields` the rows are SQL-level
/// projections; with `include` the named relations are loaded onto each item.
///
/// # Errors
/// 400 for invalid `fields`/`include`, 500 for database failures.
pub async fn find<R>(
    Query(params): Query<ListParams>,
    State(db): State<DatabaseConnection>,
) -> Result<Response, ApiError>
where
    R: CrudResource,
{
    let options = QueryOptions::from_params::<R>(&params)?;
    let total_count = R::count(&db, &options.condition).await?;
    let headers: HeaderMap = content_range(
        options.offset,
        options.limit,
        total_count,
        R::RESOURCE_NAME_PLURAL,
    );

    if options.columns.is_some() {
        let rows = R::find_partial(&db, &options).await?;
        return Ok((headers, Json(rows)).into_response());
    }

    let mut items = R::find(&db, &options).await?;
    if !options.includes.is_empty() {
        R::load_related(&db, &mut items, &options.includes).await?;
    }
    Ok((headers, Json(items)).into_response())
}

/// Fetch a single resource by id.
///
/// # Errors
/// 404 when no row has the id, 400 for invalid `fields`/`include`.
pub async fn find_by_id<R>(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
    Query(params): Query<ItemParams>,
) -> Result<Response, ApiError>
where
    R: CrudResource,
{
    let options = ItemOptions::from_params::<R>(&params)?;

    if let Some(columns) = &options.columns {
        let row = R::find_by_id_partial(&db, id, columns).await?;
        return Ok(Json(row).into_response());
    }

    let mut item = R::find_by_id(&db, id).await?;
    if !options.includes.is_empty() {
        R::load_related(&db, std::slice::from_mut(&mut item), &options.includes).await?;
    }
    Ok(Json(item).into_response())
}

/// Create a resource.
///
/// 201 with the new row on success. A unique-constraint violation consults
/// the resource's duplicate lookup: a hit answers 200 with the existing row,
/// a miss answers 409.
///
/// # Errors
/// 409 for unresolved duplicates, 500 for other database failures.
pub async fn create<R>(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<R::Create>,
) -> Result<Response, ApiError>
where
    R: CrudResource,
{
    match R::create(&db, payload).await {
        Ok(CreateOutcome::Created(item)) => Ok((StatusCode::CREATED, Json(item)).into_response()),
        Ok(CreateOutcome::Existing(item)) => Ok((StatusCode::OK, Json(item)).into_response()),
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(ApiError::conflict(format!(
                "{} already exists",
                R::RESOURCE_NAME
            ))),
            _ => Err(err.into()),
        },
    }
}

/// Apply a partial update to a resource.
///
/// # Errors
/// 404 when the id is unknown, 422 when the patch violates merge rules,
/// 409 when the patch collides with a unique constraint.
pub async fn update<R>(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
    Json(payload): Json<R::Update>,
) -> Result<Json<R>, ApiError>
where
    R: CrudResource,
{
    match R::update(&db, id, payload).await {
        Ok(item) => Ok(Json(item)),
        Err(DbErr::RecordNotFound(_)) => {
            Err(ApiError::not_found(R::RESOURCE_NAME, Some(id.to_string())))
        }
        Err(DbErr::Custom(message)) => Err(ApiError::unprocessable(message)),
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(ApiError::conflict(format!(
                "{} already exists",
                R::RESOURCE_NAME
            ))),
            _ => Err(err.into()),
        },
    }
}

/// Delete a resource by id.
///
/// 204 when a row was deleted. 202 when nothing matched: the outcome the
/// client asked for already holds, so the request is acknowledged rather
/// than failed.
///
/// # Errors
/// 500 for database failures.
pub async fn remove<R>(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
    R: CrudResource,
{
    let rows_affected = R::remove(&db, id).await?;
    if rows_affected == 0 {
        Ok(StatusCode::ACCEPTED)
    } else {
        Ok(StatusCode::NO_CONTENT)
    }
}

/// Delete a batch of resources named by id, answering with the ids.
///
/// # Errors
/// 400 when the batch exceeds [`CrudResource::MAX_BATCH_LEN`].
pub async fn remove_many<R>(
    State(db): State<DatabaseConnection>,
    Json(ids): Json<Vec<Uuid>>,
) -> Result<Json<Vec<Uuid>>, ApiError>
where
    R: CrudResource,
{
    if ids.len() > R::MAX_BATCH_LEN {
        return Err(ApiError::bad_request(format!(
            "batch delete limited to {} ids",
            R::MAX_BATCH_LEN
        )));
    }
    let deleted_ids = R::remove_many(&db, ids).await?;
    Ok(Json(deleted_ids))
}
