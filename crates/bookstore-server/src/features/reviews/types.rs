use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::filter::{FilterKind, SupportedFilters};
use crate::http::{FieldKind, Schema};

pub const REVIEWER_NAME_MAX_LENGTH: usize = 100;
pub const COMMENT_MAX_LENGTH: usize = 5000;
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub book_id: Uuid,
    pub reviewer_name: String,
    /// 1 to 5 stars
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub static SUPPORTED_FILTERS: LazyLock<SupportedFilters> =
    LazyLock::new(|| SupportedFilters::new().field("rating", FilterKind::NUMERIC));

pub fn rating_kind() -> FieldKind {
    FieldKind::integer_range(i64::from(MIN_RATING), i64::from(MAX_RATING))
}

pub fn review_schema() -> Schema {
    Schema::new()
        .required("id", FieldKind::Uuid)
        .required("book_id", FieldKind::Uuid)
        .required("reviewer_name", FieldKind::string())
        .required("rating", rating_kind())
        .optional("comment", FieldKind::string())
        .required("created_at", FieldKind::string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationLocation;

    #[test]
    fn test_serialized_review_matches_schema() {
        let review = Review {
            id: Uuid::new_v4(),
            book_id: Uuid::new_v4(),
            reviewer_name: "mara".to_string(),
            rating: 4,
            comment: Some("Slow start, great ending".to_string()),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&review).unwrap();
        assert!(review_schema()
            .validate(&value, ValidationLocation::Response)
            .is_ok());
    }

    #[test]
    fn test_out_of_range_rating_breaks_the_contract() {
        let value = serde_json::json!({
            "id": Uuid::nil(),
            "book_id": Uuid::nil(),
            "reviewer_name": "mara",
            "rating": 9,
            "created_at": "2025-01-01T00:00:00Z"
        });
        assert!(review_schema()
            .validate(&value, ValidationLocation::Response)
            .is_err());
    }
}
