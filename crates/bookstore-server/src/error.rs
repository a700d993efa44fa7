//! Error taxonomy shared by the request pipeline and the feature slices
//!
//! Three classes reach the HTTP boundary:
//!
//! - [`ValidationError`]: a request (or filter string) did not match its
//!   declared shape. Always a 400.
//! - [`ApplicationError`] implementors: domain failures such as "book not
//!   found". They carry a stable name and structured context and choose their
//!   own status, 400 unless they say otherwise.
//! - Everything else ([`ApiError::Internal`]): store failures, contract
//!   violations, bugs. Logged with full detail, answered with an empty 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// A domain or application failure that is safe to show to the client.
pub trait ApplicationError: std::error::Error + Send + Sync + 'static {
    /// Stable error name exposed as `error.name`
    fn name(&self) -> &'static str;

    /// Offending identifiers, exposed as `error.context`
    fn context(&self) -> Value {
        json!({})
    }

    fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

/// Which part of the exchange failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLocation {
    Body,
    Query,
    Params,
    Response,
}

impl std::fmt::Display for ValidationLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationLocation::Body => write!(f, "body"),
            ValidationLocation::Query => write!(f, "query"),
            ValidationLocation::Params => write!(f, "params"),
            ValidationLocation::Response => write!(f, "response"),
        }
    }
}

/// A value did not match its schema
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid {location} field '{field}': {reason}")]
pub struct ValidationError {
    pub location: ValidationLocation,
    /// Dotted path to the offending value, empty for the whole document
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(
        location: ValidationLocation,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            location,
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl ApplicationError for ValidationError {
    fn name(&self) -> &'static str {
        "ValidationError"
    }

    fn context(&self) -> Value {
        json!({
            "location": self.location,
            "field": self.field,
            "reason": self.reason,
        })
    }
}

/// Error type returned by route handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Application(Box<dyn ApplicationError>),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn application<E: ApplicationError>(error: E) -> Self {
        Self::Application(Box::new(error))
    }

    pub fn internal(error: impl Into<anyhow::Error>) -> Self {
        Self::Internal(error.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(e) => e.status(),
            ApiError::Application(e) => e.status(),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Emit the single log record for this failure
    pub fn log(&self) {
        match self {
            ApiError::Validation(e) => {
                tracing::warn!(
                    error.name = e.name(),
                    error.message = %e,
                    error.context = %e.context(),
                    "Request rejected by validation"
                );
            },
            ApiError::Application(e) => {
                tracing::warn!(
                    error.name = e.name(),
                    error.message = %e,
                    error.status = e.status().as_u16(),
                    error.cause = ?source_chain(e.source()),
                    error.context = %e.context(),
                    "Request failed with application error"
                );
            },
            ApiError::Internal(e) => {
                let causes: Vec<String> = e.chain().skip(1).map(ToString::to_string).collect();
                tracing::error!(
                    error.name = "InternalError",
                    error.message = %e,
                    error.cause = ?causes,
                    error.stack = %e.backtrace(),
                    "Unhandled error while processing request"
                );
            },
        }
    }
}

fn source_chain(first: Option<&(dyn std::error::Error + 'static)>) -> Vec<String> {
    let mut causes = Vec::new();
    let mut current = first;
    while let Some(cause) = current {
        causes.push(cause.to_string());
        current = cause.source();
    }
    causes
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

/// Body of a mapped (non-500) error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub name: String,
    pub message: String,
    pub context: Value,
}

impl ErrorBody {
    fn from_application(error: &dyn ApplicationError) -> Self {
        Self {
            error: ErrorDetail {
                name: error.name().to_string(),
                message: error.to_string(),
                context: error.context(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(e) => {
                (status, Json(ErrorBody::from_application(&e))).into_response()
            },
            ApiError::Application(e) => {
                (status, Json(ErrorBody::from_application(e.as_ref()))).into_response()
            },
            ApiError::Internal(_) => status.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("Shelf '{0}' is full")]
    struct ShelfFull(String);

    impl ApplicationError for ShelfFull {
        fn name(&self) -> &'static str {
            "ShelfFullError"
        }

        fn context(&self) -> Value {
            json!({ "shelf": self.0 })
        }

        fn status(&self) -> StatusCode {
            StatusCode::CONFLICT
        }
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new(ValidationLocation::Query, "limit", "expected an integer");
        assert_eq!(err.to_string(), "Invalid query field 'limit': expected an integer");
        assert_eq!(err.context()["location"], "query");
    }

    #[test]
    fn test_status_mapping() {
        let validation: ApiError =
            ValidationError::new(ValidationLocation::Body, "title", "required").into();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let application = ApiError::application(ShelfFull("fiction".to_string()));
        assert_eq!(application.status(), StatusCode::CONFLICT);

        let internal = ApiError::internal(anyhow::anyhow!("pool closed"));
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody::from_application(&ShelfFull("fiction".to_string()));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"]["name"], "ShelfFullError");
        assert_eq!(json["error"]["message"], "Shelf 'fiction' is full");
        assert_eq!(json["error"]["context"]["shelf"], "fiction");
    }

    #[test]
    fn test_sqlx_errors_are_internal() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
