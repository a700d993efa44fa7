use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::authors::{
    error::AuthorError,
    types::{Author, SUPPORTED_FILTERS},
};
use crate::features::shared::{PageWindow, Paginated};
use crate::filter::parse_filters;
use crate::query::{EntityQuery, SortDirection};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAuthorsQuery {
    #[serde(default)]
    pub filters: Vec<String>,
    pub window: PageWindow,
}

impl ListAuthorsQuery {
    pub fn to_entity_query(&self) -> Result<EntityQuery, AuthorError> {
        let filters = parse_filters(&self.filters, &SUPPORTED_FILTERS)?;
        Ok(EntityQuery::new("authors", "a")
            .where_filters(&filters)
            .order_by("name", SortDirection::Asc))
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: ListAuthorsQuery) -> Result<Paginated<Author>, AuthorError> {
    let entity_query = query.to_entity_query()?;

    let total = entity_query.count(&pool).await?;
    let items: Vec<Author> = entity_query
        .take(query.window.limit)
        .skip(query.window.offset)
        .fetch_all(&pool)
        .await?;

    Ok(Paginated::new(items, query.window, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_query_sql() {
        let query = ListAuthorsQuery {
            filters: vec![
                "birth_year||between||1900,1950".to_string(),
                "name||like||le guin".to_string(),
            ],
            window: PageWindow { limit: 5, offset: 0 },
        };

        assert_eq!(
            query.to_entity_query().unwrap().to_count().into_sql(),
            r#"SELECT COUNT(*) FROM "authors" a WHERE a."birth_year" BETWEEN $1 AND $2 AND a."name" ILIKE $3"#
        );
    }

    #[test]
    fn test_non_numeric_year_is_rejected() {
        let query = ListAuthorsQuery {
            filters: vec!["birth_year||gt||old".to_string()],
            window: PageWindow { limit: 5, offset: 0 },
        };
        assert!(matches!(query.to_entity_query(), Err(AuthorError::Filter(_))));
    }
}
