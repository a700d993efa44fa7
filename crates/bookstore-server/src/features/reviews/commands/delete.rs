use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::reviews::error::ReviewError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteReviewCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteReviewResponse {
    pub id: Uuid,
}

#[tracing::instrument(skip(pool), fields(review_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteReviewCommand,
) -> Result<DeleteReviewResponse, ReviewError> {
    let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ReviewError::NotFound(command.id));
    }

    tracing::info!("Review deleted");

    Ok(DeleteReviewResponse { id: command.id })
}
