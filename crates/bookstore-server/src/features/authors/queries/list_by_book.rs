//! Authors credited on one book
//!
//! Join variant of the list query: `authors` joined through `book_authors`
//! and restricted to a single book, with the same filters and window.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::authors::{
    error::AuthorError,
    types::{Author, SUPPORTED_FILTERS},
};
use crate::features::shared::{PageWindow, Paginated};
use crate::filter::parse_filters;
use crate::query::{EntityQuery, SortDirection};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListBookAuthorsQuery {
    pub book_id: Uuid,
    #[serde(default)]
    pub filters: Vec<String>,
    pub window: PageWindow,
}

impl ListBookAuthorsQuery {
    pub fn to_entity_query(&self) -> Result<EntityQuery, AuthorError> {
        let filters = parse_filters(&self.filters, &SUPPORTED_FILTERS)?;
        Ok(EntityQuery::new("authors", "a")
            .left_join("book_authors", "ba", "ba.author_id = a.id")
            .where_related("ba", "book_id", self.book_id)
            .where_filters(&filters)
            .order_by("name", SortDirection::Asc))
    }
}

#[tracing::instrument(skip(pool), fields(book_id = %query.book_id))]
pub async fn handle(
    pool: PgPool,
    query: ListBookAuthorsQuery,
) -> Result<Paginated<Author>, AuthorError> {
    let entity_query = query.to_entity_query()?;

    let book_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
        .bind(query.book_id)
        .fetch_one(&pool)
        .await?;
    if !book_exists {
        return Err(AuthorError::BookNotFound(query.book_id));
    }

    let total = entity_query.count(&pool).await?;
    let items: Vec<Author> = entity_query
        .take(query.window.limit)
        .skip(query.window.offset)
        .fetch_all(&pool)
        .await?;

    Ok(Paginated::new(items, query.window, total))
}
