use axum::{
    Router,
    routing::{delete, get},
};
use sea_orm::DatabaseConnection;

use crate::handlers;
use crate::resource::CrudResource;

/// Build the route table for one resource, ready to nest under its path:
///
/// ```rust,ignore
/// let app = Router::new()
///     .nest("/api/v1/articles", crudbase::router::<Article>(&db));
/// ```
///
/// Routes: `GET /` and `POST /` for the collection, `DELETE /batch` for
/// batch deletes, `GET`/`PUT`/`DELETE /{id}` for single items.
pub fn router<R>(db: &DatabaseConnection) -> Router
where
    R: CrudResource + 'static,
{
    Router::new()
        .route("/", get(handlers::find::<R>).post(handlers::create::<R>))
        .route("/batch", delete(handlers::remove_many::<R>))
        .route(
            "/{id}",
            get(handlers::find_by_id::<R>)
                .put(handlers::update::<R>)
                .delete(handlers::remove::<R>),
        )
        .with_state(db.clone())
}
