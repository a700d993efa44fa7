//! Delete book command
//!
//! Author links and reviews go with the book.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::books::error::BookError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBookCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBookResponse {
    pub id: Uuid,
}

#[tracing::instrument(skip(pool), fields(book_id = %command.id))]
pub async fn handle(pool: PgPool, command: DeleteBookCommand) -> Result<DeleteBookResponse, BookError> {
    let result = sqlx::query("DELETE FROM books WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(BookError::NotFound(command.id));
    }

    tracing::info!("Book deleted");

    Ok(DeleteBookResponse { id: command.id })
}
