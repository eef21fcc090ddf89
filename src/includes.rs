//! Wrapper for related entities that are only loaded on request.
//!
//! A field typed `Included<Vec<Comment>>` serializes as the loaded vector
//! when the request asked for it via `include`, and as `null` otherwise, so
//! the response shape stays stable either way.

use serde::{Deserialize, Serialize};
use utoipa::{PartialSchema, ToSchema};

/// A related entity (or collection) that may or may not have been loaded.
///
/// Inside a `#[derive(ToSchema)]` struct the field needs a
/// `#[schema(value_type = ...)]` override naming the loaded shape, e.g.
/// `Option<Vec<Comment>>`; the derive does not resolve generic field types
/// through this wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Included<T> {
    Loaded(T),
    #[default]
    NotLoaded,
}

impl<T> PartialEq for Included<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Included::Loaded(a), Included::Loaded(b)) => a == b,
            (Included::NotLoaded, Included::NotLoaded) => true,
            _ => false,
        }
    }
}

impl<T> Included<T> {
    pub fn loaded(data: T) -> Self {
        Included::Loaded(data)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Included::Loaded(_))
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Included::Loaded(data) => Some(data),
            Included::NotLoaded => None,
        }
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Included::Loaded(data) => Some(data),
            Included::NotLoaded => None,
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Included::Loaded(data) => Some(data),
            Included::NotLoaded => None,
        }
    }

    pub fn set(&mut self, data: T) {
        *self = Included::Loaded(data);
    }

    pub fn map<U, F>(self, f: F) -> Included<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Included::Loaded(data) => Included::Loaded(f(data)),
            Included::NotLoaded => Included::NotLoaded,
        }
    }
}

impl<T> From<T> for Included<T> {
    fn from(data: T) -> Self {
        Included::Loaded(data)
    }
}

impl<T> FromIterator<T> for Included<Vec<T>> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Included::Loaded(iter.into_iter().collect())
    }
}

// Schema support without requiring T: ToSchema, since the wrapper is often
// used with entity types that carry no OpenAPI derive.
impl<T> ToSchema for Included<T> {
    fn name() -> std::borrow::Cow<'static, str> {
        let type_name = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        format!("IncludedOf{type_name}").into()
    }
}

impl<T> PartialSchema for Included<T> {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        use utoipa::openapi::schema::{ArrayBuilder, ObjectBuilder, Schema};

        if std::any::type_name::<T>().contains("Vec") {
            utoipa::openapi::RefOr::T(Schema::Array(
                ArrayBuilder::new()
                    .items(utoipa::openapi::RefOr::T(Schema::Object(
                        ObjectBuilder::new().into(),
                    )))
                    .into(),
            ))
        } else {
            utoipa::openapi::RefOr::T(Schema::Object(ObjectBuilder::new().into()))
        }
    }
}
