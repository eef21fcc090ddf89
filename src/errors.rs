//! # Error handling
//!
//! Controller errors map onto HTTP status codes and carry two messages: a
//! sanitized one for the client and an internal one that is logged via the
//! `tracing` crate but never serialized into a response.
//!
//! Database errors, connection strings and constraint names stay server-side.
//! Clients see `{"error": "..."}` with a generic message and the right status.
//!
//! ```rust,ignore
//! use crudbase::ApiError;
//!
//! async fn my_handler() -> Result<Json<MyData>, ApiError> {
//!     let data = MyEntity::find_by_id(id)
//!         .one(db)
//!         .await
//!         .map_err(ApiError::database)?
//!         .ok_or_else(|| ApiError::not_found("user", Some(id.to_string())))?;
//!     Ok(Json(data))
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

/// Error type returned by every controller operation.
///
/// `DbErr` converts into this via `From`, so trait methods that speak
/// `Result<_, DbErr>` can be awaited with `?` inside handlers.
#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found
    NotFound {
        /// Resource name (e.g. "article")
        resource: String,
        /// Identifier that was looked up, when known
        id: Option<String>,
    },

    /// 400 Bad Request, malformed or unacceptable query/body input
    BadRequest {
        /// User-facing error message
        message: String,
    },

    /// 409 Conflict, e.g. a unique constraint violation with no fallback row
    Conflict {
        /// User-facing error message
        message: String,
    },

    /// 422 Unprocessable Entity, a well-formed body that fails merge rules
    Unprocessable {
        /// User-facing error message
        message: String,
    },

    /// 500 Internal Server Error backed by a database error
    Database {
        /// User-facing generic message
        message: String,
        /// Logged, never sent to the client
        internal: DbErr,
    },

    /// 500 Internal Server Error for everything else
    Internal {
        /// User-facing generic message
        message: String,
        /// Logged, never sent to the client
        internal: Option<String>,
    },
}

impl ApiError {
    /// Create a 404 Not Found error
    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a 422 Unprocessable Entity error
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::Unprocessable {
            message: message.into(),
        }
    }

    /// Wrap a database error. The `DbErr` is logged, the client sees a
    /// generic message.
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    /// Create a 500 Internal Server Error with optional logged details
    pub fn internal(message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Internal {
            message: message.into(),
            internal,
        }
    }

    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The sanitized message sent to the client
    fn user_message(&self) -> String {
        match self {
            Self::NotFound { resource, id } => {
                if let Some(id) = id {
                    format!("{resource} with ID '{id}' not found")
                } else {
                    format!("{resource} not found")
                }
            }
            Self::BadRequest { message }
            | Self::Conflict { message }
            | Self::Unprocessable { message }
            | Self::Database { message, .. }
            | Self::Internal { message, .. } => message.clone(),
        }
    }

    /// Log internal details. Only errors that carry server-side context log
    /// at error level, the rest log at debug.
    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(error = ?internal, "database error");
            }
            Self::Internal {
                internal: Some(details),
                ..
            } => {
                tracing::error!(details = %details, "internal error");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Body shape for every error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

/// Conversion rules:
/// - `DbErr::RecordNotFound` becomes 404 Not Found
/// - everything else becomes 500 with the `DbErr` kept for logging
///
/// Resource-aware 404 messages come from the trait methods, which embed the
/// resource name as the first word of the `RecordNotFound` message.
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::RecordNotFound(msg) => {
                let resource = msg.split_whitespace().next().unwrap_or("resource");
                Self::NotFound {
                    resource: resource.to_string(),
                    id: None,
                }
            }
            _ => Self::Database {
                message: "A database error occurred".to_string(),
                internal: err,
            },
        }
    }
}
