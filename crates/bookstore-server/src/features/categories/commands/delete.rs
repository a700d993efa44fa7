//! Delete category command
//!
//! Books in the category keep existing with `category_id` cleared.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::categories::error::CategoryError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCategoryCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCategoryResponse {
    pub id: Uuid,
}

#[tracing::instrument(skip(pool), fields(category_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteCategoryCommand,
) -> Result<DeleteCategoryResponse, CategoryError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CategoryError::NotFound(command.id));
    }

    tracing::info!("Category deleted");

    Ok(DeleteCategoryResponse { id: command.id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test]
    #[ignore = "requires PostgreSQL (DATABASE_URL)"]
    async fn test_handle_missing_category(pool: PgPool) -> sqlx::Result<()> {
        let result = handle(pool, DeleteCategoryCommand { id: Uuid::new_v4() }).await;
        assert!(matches!(result, Err(CategoryError::NotFound(_))));
        Ok(())
    }
}
