use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::filter::{FilterKind, SupportedFilters};
use crate::http::{FieldKind, Schema};

pub const NAME_MAX_LENGTH: usize = 100;
pub const DESCRIPTION_MAX_LENGTH: usize = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub static SUPPORTED_FILTERS: LazyLock<SupportedFilters> =
    LazyLock::new(|| SupportedFilters::new().field("name", FilterKind::TEXT));

pub fn category_schema() -> Schema {
    Schema::new()
        .required("id", FieldKind::Uuid)
        .required("name", FieldKind::string())
        .optional("description", FieldKind::string())
        .required("created_at", FieldKind::string())
        .required("updated_at", FieldKind::string())
}
