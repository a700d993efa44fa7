use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::reviews::{
    error::ReviewError,
    types::{Review, SUPPORTED_FILTERS},
};
use crate::features::shared::{PageWindow, Paginated};
use crate::filter::parse_filters;
use crate::query::{EntityQuery, SortDirection};

/// Reviews of one book, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListBookReviewsQuery {
    pub book_id: Uuid,
    #[serde(default)]
    pub filters: Vec<String>,
    pub window: PageWindow,
}

impl ListBookReviewsQuery {
    pub fn to_entity_query(&self) -> Result<EntityQuery, ReviewError> {
        let filters = parse_filters(&self.filters, &SUPPORTED_FILTERS)?;
        Ok(EntityQuery::new("reviews", "r")
            .where_related("r", "book_id", self.book_id)
            .where_filters(&filters)
            .order_by("created_at", SortDirection::Desc))
    }
}

#[tracing::instrument(skip(pool), fields(book_id = %query.book_id))]
pub async fn handle(
    pool: PgPool,
    query: ListBookReviewsQuery,
) -> Result<Paginated<Review>, ReviewError> {
    let entity_query = query.to_entity_query()?;

    let book_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
        .bind(query.book_id)
        .fetch_one(&pool)
        .await?;
    if !book_exists {
        return Err(ReviewError::BookNotFound(query.book_id));
    }

    let total = entity_query.count(&pool).await?;
    let items: Vec<Review> = entity_query
        .take(query.window.limit)
        .skip(query.window.offset)
        .fetch_all(&pool)
        .await?;

    Ok(Paginated::new(items, query.window, total))
}
