use async_trait::async_trait;
use sea_orm::{
    Condition, DatabaseConnection, EntityTrait, IntoActiveModel, JsonValue, PaginatorTrait,
    QueryOrder, QuerySelect, SqlErr, entity::prelude::*,
};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::query::QueryOptions;

/// Merge a partial update payload into an existing active model.
///
/// Tri-state fields (`Option<Option<T>>` with `serde_with::rust::double_option`)
/// distinguish "absent, keep the stored value" from "present and null".
pub trait MergePatch<ActiveModel> {
    /// # Errors
    ///
    /// Returns `DbErr::Custom` when the payload sets a value the column
    /// cannot take, e.g. null for a non-nullable attribute. The update
    /// handler reports that as 422.
    fn merge(self, existing: ActiveModel) -> Result<ActiveModel, DbErr>;
}

/// Outcome of a create: either a fresh row, or the existing row a
/// unique-constraint fallback lookup resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome<T> {
    Created(T),
    Existing(T),
}

impl<T> CreateOutcome<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Created(item) | Self::Existing(item) => item,
        }
    }

    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// A CRUD-managed HTTP resource backed by a Sea-ORM entity.
///
/// Implementors provide the entity wiring and column metadata; every
/// operation has a default built on that wiring, so a minimal impl is the
/// associated types, the two name constants and `ID_COLUMN`.
#[async_trait]
pub trait CrudResource: Sized + Send + Sync + Serialize
where
    Self::Entity: EntityTrait + Sync,
    Self::ActiveModel: ActiveModelTrait + ActiveModelBehavior + Clone + Send + Sync,
    <Self::Entity as EntityTrait>::Model: Sync + IntoActiveModel<Self::ActiveModel>,
    <<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
    <<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType: Into<Uuid>,
    Self: From<<Self::Entity as EntityTrait>::Model>,
{
    type Entity: EntityTrait + Sync;
    type Column: ColumnTrait + std::fmt::Debug;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity>;
    type Create: Into<Self::ActiveModel> + DeserializeOwned + Send;
    type Update: MergePatch<Self::ActiveModel> + DeserializeOwned + Send + Sync;

    const ID_COLUMN: Self::Column;
    const RESOURCE_NAME: &str;
    const RESOURCE_NAME_PLURAL: &str;

    /// Most IDs a single batch delete may name
    const MAX_BATCH_LEN: usize = 100;

    async fn find(
        db: &DatabaseConnection,
        options: &QueryOptions<Self::Column>,
    ) -> Result<Vec<Self>, DbErr> {
        let models = Self::Entity::find()
            .filter(options.condition.clone())
            .order_by(options.order_column, options.order_direction.clone())
            .offset(options.offset)
            .limit(options.limit)
            .all(db)
            .await?;
        Ok(models.into_iter().map(Self::from).collect())
    }

    /// Same query as [`find`](Self::find) but with the projection pushed into
    /// SQL. Rows come back as JSON objects holding only the selected columns.
    async fn find_partial(
        db: &DatabaseConnection,
        options: &QueryOptions<Self::Column>,
    ) -> Result<Vec<JsonValue>, DbErr> {
        let columns = options.columns.clone().unwrap_or_default();
        Self::Entity::find()
            .select_only()
            .columns(columns)
            .filter(options.condition.clone())
            .order_by(options.order_column, options.order_direction.clone())
            .offset(options.offset)
            .limit(options.limit)
            .into_json()
            .all(db)
            .await
    }

    async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Self, DbErr> {
        let model =
            Self::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or(DbErr::RecordNotFound(format!(
                    "{} not found",
                    Self::RESOURCE_NAME
                )))?;
        Ok(Self::from(model))
    }

    async fn find_by_id_partial(
        db: &DatabaseConnection,
        id: Uuid,
        columns: &[Self::Column],
    ) -> Result<JsonValue, DbErr> {
        Self::Entity::find_by_id(id)
            .select_only()
            .columns(columns.iter().copied())
            .into_json()
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound(format!(
                "{} not found",
                Self::RESOURCE_NAME
            )))
    }

    /// Insert a new row. On a unique-constraint violation the attempted
    /// values are offered to [`find_duplicate`](Self::find_duplicate); a hit
    /// resolves to [`CreateOutcome::Existing`], a miss re-raises the error.
    async fn create(
        db: &DatabaseConnection,
        data: Self::Create,
    ) -> Result<CreateOutcome<Self>, DbErr> {
        let active_model: Self::ActiveModel = data.into();
        match active_model.clone().insert(db).await {
            Ok(model) => Ok(CreateOutcome::Created(Self::from(model))),
            Err(err) => {
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
                    && let Some(existing) = Self::find_duplicate(db, &active_model).await?
                {
                    return Ok(CreateOutcome::Existing(existing));
                }
                Err(err)
            }
        }
    }

    /// Look up the row a failed insert collided with. The default finds
    /// nothing, which turns unique-constraint violations into 409s.
    async fn find_duplicate(
        _db: &DatabaseConnection,
        _attempted: &Self::ActiveModel,
    ) -> Result<Option<Self>, DbErr> {
        Ok(None)
    }

    async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        patch: Self::Update,
    ) -> Result<Self, DbErr> {
        let model =
            Self::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or(DbErr::RecordNotFound(format!(
                    "{} not found",
                    Self::RESOURCE_NAME
                )))?;
        let existing: Self::ActiveModel = model.into_active_model();
        let merged = patch.merge(existing)?;
        let updated = merged.update(db).await?;
        Ok(Self::from(updated))
    }

    /// Delete by id, returning the number of rows affected. Zero is not an
    /// error here; the handler layer distinguishes 204 from 202 on it.
    async fn remove(db: &DatabaseConnection, id: Uuid) -> Result<u64, DbErr> {
        let res = Self::Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected)
    }

    /// Delete every row named in the batch, answering with the same ids.
    /// Batches longer than [`MAX_BATCH_LEN`](Self::MAX_BATCH_LEN) are refused
    /// with `DbErr::Custom` before the delete; the batch route reports that
    /// as 400.
    async fn remove_many(db: &DatabaseConnection, ids: Vec<Uuid>) -> Result<Vec<Uuid>, DbErr> {
        if ids.len() > Self::MAX_BATCH_LEN {
            return Err(DbErr::Custom(format!(
                "batch delete limited to {} ids, got {}",
                Self::MAX_BATCH_LEN,
                ids.len()
            )));
        }
        Self::Entity::delete_many()
            .filter(Self::ID_COLUMN.is_in(ids.clone()))
            .exec(db)
            .await?;
        Ok(ids)
    }

    async fn count(db: &DatabaseConnection, condition: &Condition) -> Result<u64, DbErr> {
        let query = Self::Entity::find().filter(condition.clone());
        PaginatorTrait::count(query, db).await
    }

    /// Attach related entities named by the validated `include` list. The
    /// default loads nothing; resources with relations override this and
    /// fill their [`Included`](crate::includes::Included) fields.
    async fn load_related(
        _db: &DatabaseConnection,
        _items: &mut [Self],
        _includes: &[String],
    ) -> Result<(), DbErr> {
        Ok(())
    }

    #[must_use]
    fn default_order_column() -> Self::Column {
        Self::ID_COLUMN
    }

    #[must_use]
    fn sortable_columns() -> Vec<(&'static str, Self::Column)> {
        vec![("id", Self::ID_COLUMN)]
    }

    #[must_use]
    fn filterable_columns() -> Vec<(&'static str, Self::Column)> {
        vec![("id", Self::ID_COLUMN)]
    }

    /// Columns the `fields` parameter may project
    #[must_use]
    fn selectable_columns() -> Vec<(&'static str, Self::Column)> {
        vec![("id", Self::ID_COLUMN)]
    }

    /// Columns searched by the free-text `q` filter key.
    /// Default is empty, no column participates.
    #[must_use]
    fn searchable_columns() -> Vec<(&'static str, Self::Column)> {
        vec![]
    }

    /// Field names that match by substring instead of equality.
    /// Default is empty, string filters compare exactly.
    #[must_use]
    fn like_filterable_columns() -> Vec<&'static str> {
        vec![]
    }

    /// Relation names the `include` parameter accepts.
    /// Default is empty, every include is rejected.
    #[must_use]
    fn related_names() -> Vec<&'static str> {
        vec![]
    }
}
