use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ApiError, ApplicationError};
use crate::features::shared::FieldError;
use crate::filter::FilterSyntaxError;

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("Review '{0}' not found")]
    NotFound(Uuid),

    #[error("Book '{0}' not found")]
    BookNotFound(Uuid),

    #[error("{0}")]
    Validation(#[from] FieldError),

    #[error(transparent)]
    Filter(#[from] FilterSyntaxError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApplicationError for ReviewError {
    fn name(&self) -> &'static str {
        match self {
            ReviewError::NotFound(_) => "ReviewNotFoundError",
            ReviewError::BookNotFound(_) => "BookNotFoundError",
            ReviewError::Validation(_) => "ValidationError",
            ReviewError::Filter(e) => e.name(),
            ReviewError::Database(_) => "InternalError",
        }
    }

    fn context(&self) -> Value {
        match self {
            ReviewError::NotFound(id) => json!({ "id": id }),
            ReviewError::BookNotFound(id) => json!({ "book_id": id }),
            ReviewError::Validation(e) => json!({ "field": e.field() }),
            ReviewError::Filter(e) => e.context(),
            ReviewError::Database(_) => json!({}),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ReviewError::NotFound(_) | ReviewError::BookNotFound(_) => StatusCode::NOT_FOUND,
            ReviewError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::Database(e) => ApiError::internal(e),
            ReviewError::Filter(e) => ApiError::application(e),
            other => ApiError::application(other),
        }
    }
}
