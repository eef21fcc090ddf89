use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crudbase::{CrudResource, Included, MergePatch};
use sea_orm::{ActiveValue, DatabaseConnection, QueryFilter, QueryOrder, entity::prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use super::comment::{self, Comment};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub published: bool,
    pub views: i32,
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Article {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub published: bool,
    pub views: i32,
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    #[schema(value_type = Option<Vec<Comment>>)]
    pub comments: Included<Vec<Comment>>,
}

impl From<Model> for Article {
    fn from(model: Model) -> Self {
        Article {
            id: model.id,
            slug: model.slug,
            title: model.title,
            body: model.body,
            published: model.published,
            views: model.views,
            rating: model.rating,
            created_at: model.created_at,
            updated_at: model.updated_at,
            comments: Included::NotLoaded,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Clone, Debug)]
pub struct ArticleCreate {
    pub slug: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub views: i32,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl From<ArticleCreate> for ActiveModel {
    fn from(create: ArticleCreate) -> Self {
        let now = Utc::now();
        ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            slug: ActiveValue::Set(create.slug),
            title: ActiveValue::Set(create.title),
            body: ActiveValue::Set(create.body),
            published: ActiveValue::Set(create.published),
            views: ActiveValue::Set(create.views),
            rating: ActiveValue::Set(create.rating),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, Default)]
pub struct ArticleUpdate {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crudbase::serde_with::rust::double_option"
    )]
    pub slug: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crudbase::serde_with::rust::double_option"
    )]
    pub title: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crudbase::serde_with::rust::double_option"
    )]
    pub body: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crudbase::serde_with::rust::double_option"
    )]
    pub published: Option<Option<bool>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crudbase::serde_with::rust::double_option"
    )]
    pub views: Option<Option<i32>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crudbase::serde_with::rust::double_option"
    )]
    pub rating: Option<Option<f64>>,
}

impl MergePatch<ActiveModel> for ArticleUpdate {
    fn merge(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        if let Some(value) = self.slug {
            match value {
                Some(slug) => existing.slug = ActiveValue::Set(slug),
                None => return Err(DbErr::Custom("slug cannot be set to null".to_string())),
            }
        }
        if let Some(value) = self.title {
            match value {
                Some(title) => existing.title = ActiveValue::Set(title),
                None => return Err(DbErr::Custom("title cannot be set to null".to_string())),
            }
        }
        if let Some(value) = self.body {
            match value {
                Some(body) => existing.body = ActiveValue::Set(body),
                None => return Err(DbErr::Custom("body cannot be set to null".to_string())),
            }
        }
        if let Some(value) = self.published {
            match value {
                Some(published) => existing.published = ActiveValue::Set(published),
                None => {
                    return Err(DbErr::Custom("published cannot be set to null".to_string()));
                }
            }
        }
        if let Some(value) = self.views {
            match value {
                Some(views) => existing.views = ActiveValue::Set(views),
                None => return Err(DbErr::Custom("views cannot be set to null".to_string())),
            }
        }
        if let Some(value) = self.rating {
            // Nullable column, null clears it
            existing.rating = ActiveValue::Set(value);
        }
        existing.updated_at = ActiveValue::Set(Utc::now());
        Ok(existing)
    }
}

#[async_trait]
impl CrudResource for Article {
    type Entity = Entity;
    type Column = Column;
    type ActiveModel = ActiveModel;
    type Create = ArticleCreate;
    type Update = ArticleUpdate;

    const ID_COLUMN: Self::Column = Column::Id;
    const RESOURCE_NAME: &'static str = "article";
    const RESOURCE_NAME_PLURAL: &'static str = "articles";

    fn default_order_column() -> Self::Column {
        Column::CreatedAt
    }

    fn sortable_columns() -> Vec<(&'static str, Self::Column)> {
        vec![
            ("slug", Column::Slug),
            ("title", Column::Title),
            ("views", Column::Views),
            ("rating", Column::Rating),
            ("created_at", Column::CreatedAt),
        ]
    }

    fn filterable_columns() -> Vec<(&'static str, Self::Column)> {
        vec![
            ("id", Column::Id),
            ("slug", Column::Slug),
            ("title", Column::Title),
            ("published", Column::Published),
            ("views", Column::Views),
            ("rating", Column::Rating),
        ]
    }

    fn selectable_columns() -> Vec<(&'static str, Self::Column)> {
        vec![
            ("id", Column::Id),
            ("slug", Column::Slug),
            ("title", Column::Title),
            ("published", Column::Published),
            ("views", Column::Views),
        ]
    }

    fn searchable_columns() -> Vec<(&'static str, Self::Column)> {
        vec![("title", Column::Title), ("body", Column::Body)]
    }

    fn like_filterable_columns() -> Vec<&'static str> {
        vec!["title"]
    }

    fn related_names() -> Vec<&'static str> {
        vec!["comments"]
    }

    async fn find_duplicate(
        db: &DatabaseConnection,
        attempted: &Self::ActiveModel,
    ) -> Result<Option<Self>, DbErr> {
        let ActiveValue::Set(slug) = &attempted.slug else {
            return Ok(None);
        };
        let existing = Entity::find()
            .filter(Column::Slug.eq(slug.clone()))
            .one(db)
            .await?;
        Ok(existing.map(Article::from))
    }

    async fn load_related(
        db: &DatabaseConnection,
        items: &mut [Self],
        includes: &[String],
    ) -> Result<(), DbErr> {
        if !includes.iter().any(|name| name.as_str() == "comments") {
            return Ok(());
        }

        let ids: Vec<Uuid> = items.iter().map(|article| article.id).collect();
        let rows = comment::Entity::find()
            .filter(comment::Column::ArticleId.is_in(ids))
            .order_by_asc(comment::Column::CreatedAt)
            .all(db)
            .await?;

        let mut by_article: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for row in rows {
            by_article
                .entry(row.article_id)
                .or_default()
                .push(Comment::from(row));
        }

        for article in items.iter_mut() {
            article.comments =
                Included::Loaded(by_article.remove(&article.id).unwrap_or_default());
        }
        Ok(())
    }
}
