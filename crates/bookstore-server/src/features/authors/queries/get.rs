use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::authors::{error::AuthorError, types::Author};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAuthorQuery {
    pub id: Uuid,
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetAuthorQuery) -> Result<Author, AuthorError> {
    sqlx::query_as::<_, Author>(
        r#"
        SELECT id, name, biography, birth_year, created_at, updated_at
        FROM authors
        WHERE id = $1
        "#,
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AuthorError::NotFound(query.id))
}
