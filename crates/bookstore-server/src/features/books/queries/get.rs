use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::books::{
    error::BookError,
    types::{book_query, Book},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBookQuery {
    pub id: Uuid,
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetBookQuery) -> Result<Book, BookError> {
    book_query()
        .where_related("b", "id", query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(BookError::NotFound(query.id))
}
