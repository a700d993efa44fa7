use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::categories::{error::CategoryError, types::Category};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCategoryQuery {
    pub id: Uuid,
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetCategoryQuery) -> Result<Category, CategoryError> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, description, created_at, updated_at
        FROM categories
        WHERE id = $1
        "#,
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(CategoryError::NotFound(query.id))
}
