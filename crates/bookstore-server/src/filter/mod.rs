//! Filter expression parsing
//!
//! List endpoints accept repeated `filter` query parameters written as
//! `field||operation||value`, for example:
//!
//! - `title||eq||dune,emma` (any of the listed strings)
//! - `price||lt||10`
//! - `published_year||between||1990,2000` (inclusive)
//! - `title||like||ring` (case-insensitive substring)
//!
//! Each resource declares which operations each field accepts in a
//! [`SupportedFilters`] registry. Filters outside the registry are dropped
//! without error; malformed filters on allowed fields are rejected.
//!
//! # Examples
//!
//! ```rust
//! use bookstore_server::filter::{parse_filters, FilterKind, FilterOperation, SupportedFilters};
//!
//! let supported = SupportedFilters::new().field("price", &[FilterKind::Lt]);
//! let filters = parse_filters(&["price||lt||10".to_string()], &supported).unwrap();
//!
//! assert_eq!(filters[0].field_name, "price");
//! assert_eq!(filters[0].operation, FilterOperation::LessThan(10));
//! ```

use std::collections::{HashMap, HashSet};

use axum::http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

use crate::error::{ApiError, ApplicationError};

/// Separates field, operation and value
pub const TOKEN_SEPARATOR: &str = "||";

/// Separates multiple values inside the value segment
pub const VALUE_SEPARATOR: char = ',';

/// Operation named in a filter string, without its operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    Between,
    Like,
}

impl FilterKind {
    pub const ALL: [FilterKind; 7] = [
        FilterKind::Eq,
        FilterKind::Lt,
        FilterKind::Lte,
        FilterKind::Gt,
        FilterKind::Gte,
        FilterKind::Between,
        FilterKind::Like,
    ];

    /// Everything that makes sense on an integer column
    pub const NUMERIC: &'static [FilterKind] = &[
        FilterKind::Eq,
        FilterKind::Lt,
        FilterKind::Lte,
        FilterKind::Gt,
        FilterKind::Gte,
        FilterKind::Between,
    ];

    /// Everything that makes sense on a text column
    pub const TEXT: &'static [FilterKind] = &[FilterKind::Eq, FilterKind::Like];

    /// Wire name used in filter strings
    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::Eq => "eq",
            FilterKind::Lt => "lt",
            FilterKind::Lte => "lte",
            FilterKind::Gt => "gt",
            FilterKind::Gte => "gte",
            FilterKind::Between => "between",
            FilterKind::Like => "like",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A comparison together with its operands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOperation {
    /// Matches any of the listed values; never empty
    Equal(Vec<String>),
    LessThan(i64),
    LessThanOrEqual(i64),
    GreaterThan(i64),
    GreaterThanOrEqual(i64),
    /// Inclusive range
    Between(i64, i64),
    /// Substring match
    Like(String),
}

impl FilterOperation {
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterOperation::Equal(_) => FilterKind::Eq,
            FilterOperation::LessThan(_) => FilterKind::Lt,
            FilterOperation::LessThanOrEqual(_) => FilterKind::Lte,
            FilterOperation::GreaterThan(_) => FilterKind::Gt,
            FilterOperation::GreaterThanOrEqual(_) => FilterKind::Gte,
            FilterOperation::Between(_, _) => FilterKind::Between,
            FilterOperation::Like(_) => FilterKind::Like,
        }
    }
}

/// One operation applied to one named field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field_name: String,
    pub operation: FilterOperation,
}

impl Filter {
    pub fn new(field_name: impl Into<String>, operation: FilterOperation) -> Self {
        Self {
            field_name: field_name.into(),
            operation,
        }
    }
}

/// Per-resource allowlist of field -> permitted operations
#[derive(Debug, Clone, Default)]
pub struct SupportedFilters {
    fields: HashMap<&'static str, HashSet<FilterKind>>,
}

impl SupportedFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Permit `kinds` on `name`; repeated calls for one field accumulate
    pub fn field(mut self, name: &'static str, kinds: &[FilterKind]) -> Self {
        self.fields
            .entry(name)
            .or_default()
            .extend(kinds.iter().copied());
        self
    }

    pub fn allows(&self, field: &str, kind: FilterKind) -> bool {
        self.fields
            .get(field)
            .is_some_and(|kinds| kinds.contains(&kind))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A filter string on an allowed field could not be understood
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterSyntaxError {
    #[error("Filter '{filter}' must have the form field||operation||value")]
    Arity { filter: String },

    #[error("Filter '{filter}' expects an integer value, got '{value}'")]
    InvalidNumber { filter: String, value: String },

    #[error("Filter '{filter}' expects exactly two comma-separated values")]
    BetweenArity { filter: String },
}

impl FilterSyntaxError {
    pub fn filter(&self) -> &str {
        match self {
            FilterSyntaxError::Arity { filter }
            | FilterSyntaxError::InvalidNumber { filter, .. }
            | FilterSyntaxError::BetweenArity { filter } => filter,
        }
    }
}

impl ApplicationError for FilterSyntaxError {
    fn name(&self) -> &'static str {
        "InvalidFilterSyntaxError"
    }

    fn context(&self) -> Value {
        json!({ "filter": self.filter() })
    }

    fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl From<FilterSyntaxError> for ApiError {
    fn from(err: FilterSyntaxError) -> Self {
        ApiError::application(err)
    }
}

/// Parse raw filter strings against a registry
///
/// Output preserves input order. Strings naming an unknown operation, an
/// unknown field, or an operation the field does not permit are skipped and
/// logged at debug level.
///
/// # Errors
///
/// - [`FilterSyntaxError::Arity`] when a string does not split into exactly
///   three `||`-separated segments
/// - [`FilterSyntaxError::InvalidNumber`] when a numeric operation's value is
///   not an integer
/// - [`FilterSyntaxError::BetweenArity`] when `between` does not carry
///   exactly two values
pub fn parse_filters(
    raw_filters: &[String],
    supported: &SupportedFilters,
) -> Result<Vec<Filter>, FilterSyntaxError> {
    let mut filters = Vec::with_capacity(raw_filters.len());

    for raw in raw_filters {
        let segments: Vec<&str> = raw.split(TOKEN_SEPARATOR).collect();
        let [field, operation, value] = segments.as_slice() else {
            return Err(FilterSyntaxError::Arity {
                filter: raw.clone(),
            });
        };

        let Some(kind) = FilterKind::from_name(operation) else {
            tracing::debug!(filter = %raw, operation = %operation, "Skipping filter with unknown operation");
            continue;
        };

        if !supported.allows(field, kind) {
            tracing::debug!(filter = %raw, field = %field, operation = %kind, "Skipping unsupported filter");
            continue;
        }

        let operation = parse_operation(raw, kind, value)?;
        filters.push(Filter::new(*field, operation));
    }

    Ok(filters)
}

fn parse_operation(
    raw: &str,
    kind: FilterKind,
    value: &str,
) -> Result<FilterOperation, FilterSyntaxError> {
    let operation = match kind {
        FilterKind::Eq => FilterOperation::Equal(
            value
                .split(VALUE_SEPARATOR)
                .map(str::to_string)
                .collect(),
        ),
        FilterKind::Lt => FilterOperation::LessThan(parse_integer(raw, value)?),
        FilterKind::Lte => FilterOperation::LessThanOrEqual(parse_integer(raw, value)?),
        FilterKind::Gt => FilterOperation::GreaterThan(parse_integer(raw, value)?),
        FilterKind::Gte => FilterOperation::GreaterThanOrEqual(parse_integer(raw, value)?),
        FilterKind::Between => {
            let bounds: Vec<&str> = value.split(VALUE_SEPARATOR).collect();
            let [low, high] = bounds.as_slice() else {
                return Err(FilterSyntaxError::BetweenArity {
                    filter: raw.to_string(),
                });
            };
            FilterOperation::Between(parse_integer(raw, low)?, parse_integer(raw, high)?)
        },
        FilterKind::Like => FilterOperation::Like(value.to_string()),
    };

    Ok(operation)
}

/// Zero is a valid value; only a failed parse is an error.
fn parse_integer(raw: &str, value: &str) -> Result<i64, FilterSyntaxError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| FilterSyntaxError::InvalidNumber {
            filter: raw.to_string(),
            value: value.to_string(),
        })
}
