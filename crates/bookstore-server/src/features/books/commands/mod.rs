pub mod create;
pub mod delete;
pub mod update;

pub use create::CreateBookCommand;
pub use delete::{DeleteBookCommand, DeleteBookResponse};
pub use update::UpdateBookCommand;

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::error::BookError;

/// Credit `author_ids` on `book_id`; duplicates are ignored
async fn link_authors(
    tx: &mut Transaction<'_, Postgres>,
    book_id: Uuid,
    author_ids: &[Uuid],
) -> Result<(), BookError> {
    if author_ids.is_empty() {
        return Ok(());
    }

    let mut ids = author_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    sqlx::query("INSERT INTO book_authors (book_id, author_id) SELECT $1, UNNEST($2::uuid[])")
        .bind(book_id)
        .bind(ids)
        .execute(&mut **tx)
        .await
        .map_err(|e| BookError::from_write(e, None))?;

    Ok(())
}
