use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::books::{
    error::BookError,
    types::{book_query, Book, SUPPORTED_FILTERS},
};
use crate::features::shared::{validation::compact_isbn, PageWindow, Paginated};
use crate::filter::{parse_filters, Filter, FilterOperation};
use crate::query::{EntityQuery, SortDirection};

/// Newest books first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListBooksQuery {
    #[serde(default)]
    pub filters: Vec<String>,
    pub window: PageWindow,
}

impl ListBooksQuery {
    pub fn to_entity_query(&self) -> Result<EntityQuery, BookError> {
        let filters: Vec<Filter> = parse_filters(&self.filters, &SUPPORTED_FILTERS)?
            .into_iter()
            .map(compact_isbn_filter)
            .collect();
        Ok(book_query()
            .where_filters(&filters)
            .order_by("created_at", SortDirection::Desc))
    }
}

/// ISBNs are stored compact, so `isbn` filter values are compacted the same way
fn compact_isbn_filter(mut filter: Filter) -> Filter {
    if filter.field_name == "isbn" {
        if let FilterOperation::Equal(values) = &mut filter.operation {
            for value in values.iter_mut() {
                *value = compact_isbn(value);
            }
        }
    }
    filter
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: ListBooksQuery) -> Result<Paginated<Book>, BookError> {
    let entity_query = query.to_entity_query()?;

    let total = entity_query.count(&pool).await?;
    let items: Vec<Book> = entity_query
        .take(query.window.limit)
        .skip(query.window.offset)
        .fetch_all(&pool)
        .await?;

    Ok(Paginated::new(items, query.window, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterSyntaxError;

    fn query(filters: &[&str]) -> ListBooksQuery {
        ListBooksQuery {
            filters: filters.iter().map(|f| f.to_string()).collect(),
            window: PageWindow { limit: 5, offset: 10 },
        }
    }

    #[test]
    fn test_count_sql() {
        let sql = query(&[
            "title||like||dune",
            "price||between||5,20",
            "published_year||gte||0",
            "category_id||eq||6f9619ff-8b86-d011-b42d-00c04fc964ff",
        ])
        .to_entity_query()
        .unwrap()
        .to_count()
        .into_sql();

        assert_eq!(
            sql,
            r#"SELECT COUNT(*) FROM "books" b WHERE b."title" ILIKE $1 AND b."price" BETWEEN $2 AND $3 AND b."published_year" >= $4 AND b."category_id"::text = ANY($5)"#
        );
    }

    #[test]
    fn test_select_is_ordered_and_windowed() {
        let sql = query(&["isbn||eq||0441013597"])
            .to_entity_query()
            .unwrap()
            .take(5)
            .skip(10)
            .to_select()
            .into_sql();

        assert!(sql.ends_with(
            r#"WHERE b."isbn"::text = ANY($1) ORDER BY b."created_at" DESC LIMIT $2 OFFSET $3"#
        ));
    }

    #[test]
    fn test_isbn_filter_values_are_compacted() {
        let filters = parse_filters(
            &["isbn||eq||978-0-441-01359-3,0 441 01359 7".to_string()],
            &SUPPORTED_FILTERS,
        )
        .unwrap();
        let compacted: Vec<Filter> = filters.into_iter().map(compact_isbn_filter).collect();

        assert_eq!(
            compacted[0].operation,
            FilterOperation::Equal(vec!["9780441013593".to_string(), "0441013597".to_string()])
        );
    }

    #[test]
    fn test_title_filter_is_left_alone() {
        let filters = parse_filters(&["title||eq||Dune - Messiah".to_string()], &SUPPORTED_FILTERS)
            .unwrap();
        let compacted: Vec<Filter> = filters.into_iter().map(compact_isbn_filter).collect();

        assert_eq!(
            compacted[0].operation,
            FilterOperation::Equal(vec!["Dune - Messiah".to_string()])
        );
    }

    #[test]
    fn test_unsupported_filters_are_dropped() {
        let sql = query(&["price||like||cheap", "rating||gt||3"])
            .to_entity_query()
            .unwrap()
            .to_count()
            .into_sql();
        assert_eq!(sql, r#"SELECT COUNT(*) FROM "books" b"#);
    }

    #[test]
    fn test_bad_price_bound() {
        let err = query(&["price||lt||cheap"]).to_entity_query().unwrap_err();
        assert!(matches!(
            err,
            BookError::Filter(FilterSyntaxError::InvalidNumber { .. })
        ));
    }
}
