use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ApiError, ApplicationError};
use crate::features::shared::{
    error_helpers::{check_constraint_violation, ConstraintViolation},
    FieldError,
};
use crate::filter::FilterSyntaxError;

const AUTHOR_LINK_CONSTRAINT: &str = "book_authors_author_id_fkey";

#[derive(Debug, thiserror::Error)]
pub enum BookError {
    #[error("Book '{0}' not found")]
    NotFound(Uuid),

    #[error("A book with ISBN '{0}' already exists")]
    AlreadyExists(String),

    #[error("{field} refers to a record that does not exist")]
    InvalidReference { field: &'static str },

    #[error("{0}")]
    Validation(#[from] FieldError),

    #[error("At least one field must be provided")]
    NoFieldsToUpdate,

    #[error(transparent)]
    Filter(#[from] FilterSyntaxError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl BookError {
    /// Classify a failed book write
    ///
    /// The only unique key on `books` is the ISBN; foreign keys are told
    /// apart by constraint name.
    pub fn from_write(error: sqlx::Error, isbn: Option<&str>) -> Self {
        match check_constraint_violation(error) {
            ConstraintViolation::Unique { .. } => {
                BookError::AlreadyExists(isbn.unwrap_or_default().to_string())
            },
            ConstraintViolation::ForeignKey { constraint } => {
                let field = match constraint.as_deref() {
                    Some(AUTHOR_LINK_CONSTRAINT) => "author_ids",
                    _ => "category_id",
                };
                BookError::InvalidReference { field }
            },
            ConstraintViolation::Other(e) => BookError::Database(e),
        }
    }
}

impl ApplicationError for BookError {
    fn name(&self) -> &'static str {
        match self {
            BookError::NotFound(_) => "BookNotFoundError",
            BookError::AlreadyExists(_) => "BookAlreadyExistsError",
            BookError::InvalidReference { .. } => "InvalidReferenceError",
            BookError::Validation(_) | BookError::NoFieldsToUpdate => "ValidationError",
            BookError::Filter(e) => e.name(),
            BookError::Database(_) => "InternalError",
        }
    }

    fn context(&self) -> Value {
        match self {
            BookError::NotFound(id) => json!({ "id": id }),
            BookError::AlreadyExists(isbn) => json!({ "isbn": isbn }),
            BookError::InvalidReference { field } => json!({ "field": field }),
            BookError::Validation(e) => json!({ "field": e.field() }),
            BookError::Filter(e) => e.context(),
            BookError::NoFieldsToUpdate | BookError::Database(_) => json!({}),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            BookError::NotFound(_) => StatusCode::NOT_FOUND,
            BookError::AlreadyExists(_) => StatusCode::CONFLICT,
            BookError::InvalidReference { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            BookError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<BookError> for ApiError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::Database(e) => ApiError::internal(e),
            BookError::Filter(e) => ApiError::application(e),
            other => ApiError::application(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(BookError::NotFound(Uuid::nil()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            BookError::AlreadyExists("0441013597".to_string()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            BookError::InvalidReference { field: "category_id" }.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            BookError::InvalidReference { field: "author_ids" }.name(),
            "InvalidReferenceError"
        );
    }

    #[test]
    fn test_from_write_passes_other_errors_through() {
        assert!(matches!(
            BookError::from_write(sqlx::Error::PoolTimedOut, Some("0441013597")),
            BookError::Database(sqlx::Error::PoolTimedOut)
        ));
    }
}
