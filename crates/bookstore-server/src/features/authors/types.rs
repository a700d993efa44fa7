use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::features::shared::validation::{MAX_YEAR, MIN_YEAR};
use crate::filter::{FilterKind, SupportedFilters};
use crate::http::{FieldKind, Schema};

pub const NAME_MAX_LENGTH: usize = 256;
pub const BIOGRAPHY_MAX_LENGTH: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub biography: Option<String>,
    pub birth_year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub static SUPPORTED_FILTERS: LazyLock<SupportedFilters> = LazyLock::new(|| {
    SupportedFilters::new()
        .field("name", FilterKind::TEXT)
        .field("birth_year", FilterKind::NUMERIC)
});

pub fn birth_year_kind() -> FieldKind {
    FieldKind::integer_range(MIN_YEAR, MAX_YEAR)
}

pub fn author_schema() -> Schema {
    Schema::new()
        .required("id", FieldKind::Uuid)
        .required("name", FieldKind::string())
        .optional("biography", FieldKind::string())
        .optional("birth_year", FieldKind::integer())
        .required("created_at", FieldKind::string())
        .required("updated_at", FieldKind::string())
}
