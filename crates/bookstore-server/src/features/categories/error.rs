use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ApiError, ApplicationError};
use crate::features::shared::FieldError;
use crate::filter::FilterSyntaxError;

#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error("Category '{0}' not found")]
    NotFound(Uuid),

    #[error("Category named '{0}' already exists")]
    AlreadyExists(String),

    #[error("{0}")]
    Validation(#[from] FieldError),

    #[error("At least one field must be provided")]
    NoFieldsToUpdate,

    #[error(transparent)]
    Filter(#[from] FilterSyntaxError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApplicationError for CategoryError {
    fn name(&self) -> &'static str {
        match self {
            CategoryError::NotFound(_) => "CategoryNotFoundError",
            CategoryError::AlreadyExists(_) => "CategoryAlreadyExistsError",
            CategoryError::Validation(_) | CategoryError::NoFieldsToUpdate => "ValidationError",
            CategoryError::Filter(e) => e.name(),
            CategoryError::Database(_) => "InternalError",
        }
    }

    fn context(&self) -> Value {
        match self {
            CategoryError::NotFound(id) => json!({ "id": id }),
            CategoryError::AlreadyExists(name) => json!({ "name": name }),
            CategoryError::Validation(e) => json!({ "field": e.field() }),
            CategoryError::Filter(e) => e.context(),
            CategoryError::NoFieldsToUpdate | CategoryError::Database(_) => json!({}),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            CategoryError::NotFound(_) => StatusCode::NOT_FOUND,
            CategoryError::AlreadyExists(_) => StatusCode::CONFLICT,
            CategoryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<CategoryError> for ApiError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::Database(e) => ApiError::internal(e),
            CategoryError::Filter(e) => ApiError::application(e),
            other => ApiError::application(other),
        }
    }
}
