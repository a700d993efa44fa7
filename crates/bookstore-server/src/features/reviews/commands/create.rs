//! Create review command

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::reviews::{
    error::ReviewError,
    types::{Review, COMMENT_MAX_LENGTH, MAX_RATING, MIN_RATING, REVIEWER_NAME_MAX_LENGTH},
};
use crate::features::shared::{
    error_helpers::map_foreign_key_violation,
    validation::{validate_name, validate_optional_text, validate_range},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewCommand {
    /// Taken from the path
    #[serde(skip)]
    pub book_id: Uuid,

    pub reviewer_name: String,

    pub rating: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl CreateReviewCommand {
    pub fn validate(&self) -> Result<(), ReviewError> {
        validate_name("reviewer_name", &self.reviewer_name, REVIEWER_NAME_MAX_LENGTH)?;
        validate_range(
            "rating",
            i64::from(self.rating),
            i64::from(MIN_RATING),
            i64::from(MAX_RATING),
        )?;
        validate_optional_text("comment", self.comment.as_deref(), COMMENT_MAX_LENGTH)?;
        Ok(())
    }
}

/// # Errors
///
/// - `Validation` for a blank reviewer name or a rating outside 1..=5
/// - `BookNotFound` if the book does not exist
#[tracing::instrument(skip(pool, command), fields(book_id = %command.book_id, rating = command.rating))]
pub async fn handle(pool: PgPool, command: CreateReviewCommand) -> Result<Review, ReviewError> {
    command.validate()?;

    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (book_id, reviewer_name, rating, comment)
        VALUES ($1, $2, $3, $4)
        RETURNING id, book_id, reviewer_name, rating, comment, created_at
        "#,
    )
    .bind(command.book_id)
    .bind(command.reviewer_name.trim())
    .bind(command.rating)
    .bind(&command.comment)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        map_foreign_key_violation(e, ReviewError::BookNotFound(command.book_id), ReviewError::Database)
    })?;

    tracing::info!(review_id = %review.id, "Review created");

    Ok(review)
}
