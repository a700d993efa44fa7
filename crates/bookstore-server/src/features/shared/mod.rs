//! Shared utilities and types for feature modules
//!
//! - **pagination**: limit/offset windows, list query schema, paginated responses
//! - **validation**: field-level checks used by command `validate()` methods
//! - **error_helpers**: database constraint classification

pub mod error_helpers;
pub mod pagination;
pub mod validation;

pub use pagination::{
    list_query_schema, paginated_schema, ListParams, PageWindow, Paginated, PaginationLimits,
    PaginationMetadata, PaginationParams,
};
pub use validation::{validate_name, FieldError};
