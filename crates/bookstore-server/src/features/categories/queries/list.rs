use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::categories::{
    error::CategoryError,
    types::{Category, SUPPORTED_FILTERS},
};
use crate::features::shared::{PageWindow, Paginated};
use crate::filter::parse_filters;
use crate::query::{EntityQuery, SortDirection};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListCategoriesQuery {
    /// Raw `field||operation||value` strings
    #[serde(default)]
    pub filters: Vec<String>,
    pub window: PageWindow,
}

impl ListCategoriesQuery {
    pub fn to_entity_query(&self) -> Result<EntityQuery, CategoryError> {
        let filters = parse_filters(&self.filters, &SUPPORTED_FILTERS)?;
        Ok(EntityQuery::new("categories", "c")
            .where_filters(&filters)
            .order_by("name", SortDirection::Asc))
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListCategoriesQuery,
) -> Result<Paginated<Category>, CategoryError> {
    let entity_query = query.to_entity_query()?;

    let total = entity_query.count(&pool).await?;
    let items: Vec<Category> = entity_query
        .take(query.window.limit)
        .skip(query.window.offset)
        .fetch_all(&pool)
        .await?;

    Ok(Paginated::new(items, query.window, total))
}
