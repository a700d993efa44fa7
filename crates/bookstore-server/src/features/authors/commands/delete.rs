//! Delete author command
//!
//! Refused while any book still credits the author.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::authors::error::AuthorError;
use crate::features::shared::error_helpers::map_foreign_key_violation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAuthorCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAuthorResponse {
    pub id: Uuid,
}

#[tracing::instrument(skip(pool), fields(author_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteAuthorCommand,
) -> Result<DeleteAuthorResponse, AuthorError> {
    let result = sqlx::query("DELETE FROM authors WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, AuthorError::HasBooks(command.id), AuthorError::Database))?;

    if result.rows_affected() == 0 {
        return Err(AuthorError::NotFound(command.id));
    }

    tracing::info!("Author deleted");

    Ok(DeleteAuthorResponse { id: command.id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test]
    #[ignore = "requires PostgreSQL (DATABASE_URL)"]
    async fn test_handle_refuses_credited_author(pool: PgPool) -> sqlx::Result<()> {
        let author_id: Uuid =
            sqlx::query_scalar("INSERT INTO authors (name) VALUES ('Le Guin') RETURNING id")
                .fetch_one(&pool)
                .await?;
        let book_id: Uuid = sqlx::query_scalar(
            "INSERT INTO books (title, isbn, price) VALUES ('Earthsea', '0553383043', 9.99) RETURNING id",
        )
        .fetch_one(&pool)
        .await?;
        sqlx::query("INSERT INTO book_authors (book_id, author_id) VALUES ($1, $2)")
            .bind(book_id)
            .bind(author_id)
            .execute(&pool)
            .await?;

        let result = handle(pool, DeleteAuthorCommand { id: author_id }).await;
        assert!(matches!(result, Err(AuthorError::HasBooks(id)) if id == author_id));
        Ok(())
    }
}
