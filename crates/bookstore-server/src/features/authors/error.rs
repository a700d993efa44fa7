use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ApiError, ApplicationError};
use crate::features::shared::FieldError;
use crate::filter::FilterSyntaxError;

#[derive(Debug, thiserror::Error)]
pub enum AuthorError {
    #[error("Author '{0}' not found")]
    NotFound(Uuid),

    #[error("Book '{0}' not found")]
    BookNotFound(Uuid),

    #[error("Author '{0}' is credited on existing books and cannot be deleted")]
    HasBooks(Uuid),

    #[error("{0}")]
    Validation(#[from] FieldError),

    #[error("At least one field must be provided")]
    NoFieldsToUpdate,

    #[error(transparent)]
    Filter(#[from] FilterSyntaxError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApplicationError for AuthorError {
    fn name(&self) -> &'static str {
        match self {
            AuthorError::NotFound(_) => "AuthorNotFoundError",
            AuthorError::BookNotFound(_) => "BookNotFoundError",
            AuthorError::HasBooks(_) => "AuthorHasBooksError",
            AuthorError::Validation(_) | AuthorError::NoFieldsToUpdate => "ValidationError",
            AuthorError::Filter(e) => e.name(),
            AuthorError::Database(_) => "InternalError",
        }
    }

    fn context(&self) -> Value {
        match self {
            AuthorError::NotFound(id) | AuthorError::HasBooks(id) => json!({ "id": id }),
            AuthorError::BookNotFound(id) => json!({ "book_id": id }),
            AuthorError::Validation(e) => json!({ "field": e.field() }),
            AuthorError::Filter(e) => e.context(),
            AuthorError::NoFieldsToUpdate | AuthorError::Database(_) => json!({}),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AuthorError::NotFound(_) | AuthorError::BookNotFound(_) => StatusCode::NOT_FOUND,
            AuthorError::HasBooks(_) => StatusCode::CONFLICT,
            AuthorError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<AuthorError> for ApiError {
    fn from(err: AuthorError) -> Self {
        match err {
            AuthorError::Database(e) => ApiError::internal(e),
            AuthorError::Filter(e) => ApiError::application(e),
            other => ApiError::application(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let id = Uuid::new_v4();
        assert_eq!(AuthorError::NotFound(id).status(), StatusCode::NOT_FOUND);
        assert_eq!(AuthorError::BookNotFound(id).status(), StatusCode::NOT_FOUND);
        assert_eq!(AuthorError::HasBooks(id).status(), StatusCode::CONFLICT);
        assert_eq!(AuthorError::HasBooks(id).context()["id"], json!(id));
    }

    #[test]
    fn test_validation_context_names_field() {
        let err = AuthorError::Validation(FieldError::Required { field: "name" });
        assert_eq!(err.name(), "ValidationError");
        assert_eq!(err.context()["field"], "name");
    }
}
