//! Shared pagination utilities
//!
//! `limit` + `offset` is the canonical window. `page` is accepted as a
//! convenience and only used when `offset` is absent.
//!
//! # Examples
//!
//! ```rust
//! use bookstore_server::features::shared::pagination::{
//!     PaginationLimits, PaginationMetadata, PaginationParams,
//! };
//!
//! let limits = PaginationLimits::default();
//! let window = PaginationParams::new(Some(10), None, Some(3)).window(&limits);
//! assert_eq!((window.limit, window.offset), (10, 20));
//!
//! let meta = PaginationMetadata::new(window, 45);
//! assert_eq!(meta.page, 3);
//! assert!(meta.has_next);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ApiConfig, DEFAULT_API_DEFAULT_LIMIT, DEFAULT_API_MAX_LIMIT};
use crate::http::{FieldKind, Schema};

/// Page-size bounds applied to every list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationLimits {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Default for PaginationLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_API_DEFAULT_LIMIT,
            max_limit: DEFAULT_API_MAX_LIMIT,
        }
    }
}

impl From<&ApiConfig> for PaginationLimits {
    fn from(config: &ApiConfig) -> Self {
        Self {
            default_limit: config.default_limit,
            max_limit: config.max_limit,
        }
    }
}

/// Raw pagination request parameters
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaginationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,

    /// 1-indexed; ignored when `offset` is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
}

impl PaginationParams {
    pub fn new(limit: Option<i64>, offset: Option<i64>, page: Option<i64>) -> Self {
        Self {
            limit,
            offset,
            page,
        }
    }

    /// Resolve to a concrete window, clamping every value into range
    pub fn window(&self, limits: &PaginationLimits) -> PageWindow {
        let limit = self
            .limit
            .unwrap_or(limits.default_limit)
            .clamp(1, limits.max_limit.max(1));

        let offset = match (self.offset, self.page) {
            (Some(offset), _) => offset.max(0),
            (None, Some(page)) => (page.max(1) - 1).saturating_mul(limit),
            (None, None) => 0,
        };

        PageWindow { limit, offset }
    }
}

/// Concrete `LIMIT`/`OFFSET` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
}

impl PageWindow {
    pub fn page(&self) -> i64 {
        self.offset / self.limit.max(1) + 1
    }
}

/// Pagination metadata for list responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMetadata {
    pub limit: i64,
    pub offset: i64,
    /// Page containing `offset` (1-indexed)
    pub page: i64,
    pub total: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMetadata {
    pub fn new(window: PageWindow, total: i64) -> Self {
        let limit = window.limit.max(1);
        let pages = if total <= 0 {
            0
        } else {
            (total + limit - 1) / limit
        };

        Self {
            limit: window.limit,
            offset: window.offset,
            page: window.page(),
            total,
            pages,
            has_next: window.offset + window.limit < total,
            has_prev: window.offset > 0,
        }
    }
}

/// Wrapper for paginated list responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMetadata,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, window: PageWindow, total: i64) -> Self {
        Self {
            items,
            pagination: PaginationMetadata::new(window, total),
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Query parameters shared by every list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub page: Option<i64>,
    /// Raw `field||operation||value` strings
    #[serde(default)]
    pub filter: Vec<String>,
}

impl ListParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.limit, self.offset, self.page)
    }
}

/// Query schema for list endpoints: the window plus repeated `filter`
pub fn list_query_schema() -> Schema {
    Schema::new()
        .optional("limit", FieldKind::integer())
        .optional("offset", FieldKind::integer())
        .optional("page", FieldKind::integer())
        .optional("filter", FieldKind::array(FieldKind::string()))
}

/// Response schema for list endpoints
pub fn paginated_schema(item: Schema) -> Schema {
    Schema::new()
        .required("items", FieldKind::array(FieldKind::Object(item)))
        .required(
            "pagination",
            FieldKind::Object(
                Schema::new()
                    .required("limit", FieldKind::integer())
                    .required("offset", FieldKind::integer())
                    .required("page", FieldKind::integer())
                    .required("total", FieldKind::integer())
                    .required("pages", FieldKind::integer())
                    .required("has_next", FieldKind::Boolean)
                    .required("has_prev", FieldKind::Boolean),
            ),
        )
}
