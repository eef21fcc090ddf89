use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crudbase::{CrudResource, MergePatch};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub article_id: Uuid,
    pub author: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::article::Entity",
        from = "Column::ArticleId",
        to = "super::article::Column::Id"
    )]
    Article,
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Article.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub id: Uuid,
    pub article_id: Uuid,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<Model> for Comment {
    fn from(model: Model) -> Self {
        Comment {
            id: model.id,
            article_id: model.article_id,
            author: model.author,
            body: model.body,
            created_at: model.created_at,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Clone, Debug)]
pub struct CommentCreate {
    /// Client-supplied id, generated when absent
    #[serde(default)]
    pub id: Option<Uuid>,
    pub article_id: Uuid,
    pub author: String,
    pub body: String,
}

impl From<CommentCreate> for ActiveModel {
    fn from(create: CommentCreate) -> Self {
        ActiveModel {
            id: ActiveValue::Set(create.id.unwrap_or_else(Uuid::new_v4)),
            article_id: ActiveValue::Set(create.article_id),
            author: ActiveValue::Set(create.author),
            body: ActiveValue::Set(create.body),
            created_at: ActiveValue::Set(Utc::now()),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, Default)]
pub struct CommentUpdate {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crudbase::serde_with::rust::double_option"
    )]
    pub author: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crudbase::serde_with::rust::double_option"
    )]
    pub body: Option<Option<String>>,
}

impl MergePatch<ActiveModel> for CommentUpdate {
    fn merge(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        if let Some(value) = self.author {
            match value {
                Some(author) => existing.author = ActiveValue::Set(author),
                None => return Err(DbErr::Custom("author cannot be set to null".to_string())),
            }
        }
        if let Some(value) = self.body {
            match value {
                Some(body) => existing.body = ActiveValue::Set(body),
                None => return Err(DbErr::Custom("body cannot be set to null".to_string())),
            }
        }
        Ok(existing)
    }
}

#[async_trait]
impl CrudResource for Comment {
    type Entity = Entity;
    type Column = Column;
    type ActiveModel = ActiveModel;
    type Create = CommentCreate;
    type Update = CommentUpdate;

    const ID_COLUMN: Self::Column = Column::Id;
    const RESOURCE_NAME: &'static str = "comment";
    const RESOURCE_NAME_PLURAL: &'static str = "comments";

    fn sortable_columns() -> Vec<(&'static str, Self::Column)> {
        vec![("author", Column::Author), ("created_at", Column::CreatedAt)]
    }

    fn filterable_columns() -> Vec<(&'static str, Self::Column)> {
        vec![
            ("id", Column::Id),
            ("article_id", Column::ArticleId),
            ("author", Column::Author),
        ]
    }

    fn selectable_columns() -> Vec<(&'static str, Self::Column)> {
        vec![
            ("id", Column::Id),
            ("article_id", Column::ArticleId),
            ("author", Column::Author),
        ]
    }

    fn searchable_columns() -> Vec<(&'static str, Self::Column)> {
        vec![("body", Column::Body)]
    }
}
