use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::features::shared::validation::{MAX_YEAR, MIN_YEAR};
use crate::filter::{FilterKind, SupportedFilters};
use crate::http::{FieldKind, Schema};
use crate::query::EntityQuery;

pub const TITLE_MAX_LENGTH: usize = 256;
pub const DESCRIPTION_MAX_LENGTH: usize = 10_000;

/// Longest accepted ISBN input, hyphenated ISBN-13 included
pub const ISBN_INPUT_MAX_LENGTH: usize = 17;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    /// Compact ISBN-10 or ISBN-13, no separators
    pub isbn: String,
    pub description: Option<String>,
    pub price: f64,
    pub published_year: Option<i32>,
    pub page_count: Option<i32>,
    pub category_id: Option<Uuid>,
    /// Credited authors, sorted by id
    pub author_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub static SUPPORTED_FILTERS: LazyLock<SupportedFilters> = LazyLock::new(|| {
    SupportedFilters::new()
        .field("title", FilterKind::TEXT)
        .field("isbn", &[FilterKind::Eq])
        .field(
            "price",
            &[
                FilterKind::Lt,
                FilterKind::Lte,
                FilterKind::Gt,
                FilterKind::Gte,
                FilterKind::Between,
            ],
        )
        .field("published_year", FilterKind::NUMERIC)
        .field("category_id", &[FilterKind::Eq])
});

/// Base query projecting a [`Book`] row, author ids included
pub fn book_query() -> EntityQuery {
    EntityQuery::new("books", "b").select([
        "b.*",
        "COALESCE((SELECT array_agg(ba.author_id ORDER BY ba.author_id) \
         FROM book_authors ba WHERE ba.book_id = b.id), '{}') AS author_ids",
    ])
}

pub fn published_year_kind() -> FieldKind {
    FieldKind::integer_range(MIN_YEAR, MAX_YEAR)
}

pub fn page_count_kind() -> FieldKind {
    FieldKind::integer_range(1, i64::from(i32::MAX))
}

pub fn book_schema() -> Schema {
    Schema::new()
        .required("id", FieldKind::Uuid)
        .required("title", FieldKind::string())
        .required("isbn", FieldKind::string())
        .optional("description", FieldKind::string())
        .required("price", FieldKind::Number)
        .optional("published_year", FieldKind::integer())
        .optional("page_count", FieldKind::integer())
        .optional("category_id", FieldKind::Uuid)
        .required("author_ids", FieldKind::array(FieldKind::Uuid))
        .required("created_at", FieldKind::string())
        .required("updated_at", FieldKind::string())
}
