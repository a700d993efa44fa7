//! Generic entity query builder
//!
//! Turns parsed [`Filter`]s, relational joins, ordering and a limit/offset
//! window into a parameterised PostgreSQL `SELECT` on top of
//! [`sqlx::QueryBuilder`]. Identifiers are double-quoted and every value is
//! bound, never spliced into the SQL text.
//!
//! # Examples
//!
//! ```rust
//! use bookstore_server::filter::{Filter, FilterOperation};
//! use bookstore_server::query::{EntityQuery, SortDirection};
//!
//! let filters = vec![
//!     Filter::new("title", FilterOperation::Equal(vec!["Dune".to_string()])),
//!     Filter::new("price", FilterOperation::LessThan(10)),
//! ];
//!
//! let query = EntityQuery::new("books", "b")
//!     .where_filters(&filters)
//!     .order_by("created_at", SortDirection::Desc)
//!     .take(5)
//!     .skip(0);
//!
//! assert_eq!(
//!     query.to_select().sql(),
//!     r#"SELECT b.* FROM "books" b WHERE b."title"::text = ANY($1) AND b."price" < $2 ORDER BY b."created_at" DESC LIMIT $3 OFFSET $4"#
//! );
//! ```

use sqlx::{postgres::PgRow, FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::filter::{Filter, FilterOperation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
struct Join {
    table: String,
    alias: String,
    on: String,
}

#[derive(Debug, Clone)]
enum Condition {
    Filter { alias: String, filter: Filter },
    Related { alias: String, column: String, id: Uuid },
}

/// Query over one table, optionally joined to others
///
/// Built per request and consumed by [`EntityQuery::fetch_all`] /
/// [`EntityQuery::count`]. The builder only holds owned data, so the same
/// value can render both the page query and its count.
#[derive(Debug, Clone)]
pub struct EntityQuery {
    table: String,
    alias: String,
    columns: Vec<String>,
    joins: Vec<Join>,
    conditions: Vec<Condition>,
    order: Vec<(String, SortDirection)>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl EntityQuery {
    pub fn new(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: alias.into(),
            columns: Vec::new(),
            joins: Vec::new(),
            conditions: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Replace the default `<alias>.*` projection
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// AND every filter onto the main table's conditions
    pub fn where_filters(mut self, filters: &[Filter]) -> Self {
        let alias = self.alias.clone();
        self.conditions
            .extend(filters.iter().cloned().map(|filter| Condition::Filter {
                alias: alias.clone(),
                filter,
            }));
        self
    }

    /// `on` is trusted SQL written by the caller, not user input
    pub fn left_join(
        mut self,
        table: impl Into<String>,
        alias: impl Into<String>,
        on: impl Into<String>,
    ) -> Self {
        self.joins.push(Join {
            table: table.into(),
            alias: alias.into(),
            on: on.into(),
        });
        self
    }

    /// Restrict to rows whose `alias.column` equals `id`
    pub fn where_related(
        mut self,
        alias: impl Into<String>,
        column: impl Into<String>,
        id: Uuid,
    ) -> Self {
        self.conditions.push(Condition::Related {
            alias: alias.into(),
            column: column.into(),
            id,
        });
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order.push((column.into(), direction));
        self
    }

    pub fn skip(mut self, offset: i64) -> Self {
        self.offset = Some(offset.max(0));
        self
    }

    pub fn take(mut self, limit: i64) -> Self {
        self.limit = Some(limit.max(0));
        self
    }

    /// Render the paged `SELECT`
    pub fn to_select(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT ");
        if self.columns.is_empty() {
            builder.push(format!("{}.*", self.alias));
        } else {
            builder.push(self.columns.join(", "));
        }

        self.push_from(&mut builder);
        self.push_where(&mut builder);

        for (index, (column, direction)) in self.order.iter().enumerate() {
            builder.push(if index == 0 { " ORDER BY " } else { ", " });
            builder.push(format!(
                "{}.{} {}",
                self.alias,
                quote_ident(column),
                direction.as_sql()
            ));
        }

        if let Some(limit) = self.limit {
            builder.push(" LIMIT ");
            builder.push_bind(limit);
        }
        if let Some(offset) = self.offset {
            builder.push(" OFFSET ");
            builder.push_bind(offset);
        }

        builder
    }

    /// Render a `COUNT(*)` over the same rows, ignoring order and window
    pub fn to_count(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*)");
        self.push_from(&mut builder);
        self.push_where(&mut builder);
        builder
    }

    #[tracing::instrument(skip(self, pool), fields(table = %self.table))]
    pub async fn fetch_all<T>(&self, pool: &PgPool) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut builder = self.to_select();
        tracing::debug!(sql = builder.sql(), "Executing entity query");
        builder.build_query_as::<T>().fetch_all(pool).await
    }

    /// First row of the select, if any
    pub async fn fetch_optional<T>(&self, pool: &PgPool) -> Result<Option<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut builder = self.to_select();
        builder.build_query_as::<T>().fetch_optional(pool).await
    }

    #[tracing::instrument(skip(self, pool), fields(table = %self.table))]
    pub async fn count(&self, pool: &PgPool) -> Result<i64, sqlx::Error> {
        let mut builder = self.to_count();
        builder.build_query_scalar::<i64>().fetch_one(pool).await
    }

    fn push_from(&self, builder: &mut QueryBuilder<'static, Postgres>) {
        builder.push(format!(" FROM {} {}", quote_ident(&self.table), self.alias));
        for join in &self.joins {
            builder.push(format!(
                " LEFT JOIN {} {} ON {}",
                quote_ident(&join.table),
                join.alias,
                join.on
            ));
        }
    }

    fn push_where(&self, builder: &mut QueryBuilder<'static, Postgres>) {
        for (index, condition) in self.conditions.iter().enumerate() {
            builder.push(if index == 0 { " WHERE " } else { " AND " });
            match condition {
                Condition::Filter { alias, filter } => push_filter(builder, alias, filter),
                Condition::Related { alias, column, id } => {
                    builder.push(format!("{}.{} = ", alias, quote_ident(column)));
                    builder.push_bind(*id);
                },
            }
        }
    }
}

fn push_filter(builder: &mut QueryBuilder<'static, Postgres>, alias: &str, filter: &Filter) {
    let column = format!("{}.{}", alias, quote_ident(&filter.field_name));

    match &filter.operation {
        FilterOperation::Equal(values) => {
            builder.push(format!("{}::text = ANY(", column));
            builder.push_bind(values.clone());
            builder.push(")");
        },
        FilterOperation::LessThan(value) => push_comparison(builder, &column, "<", *value),
        FilterOperation::LessThanOrEqual(value) => push_comparison(builder, &column, "<=", *value),
        FilterOperation::GreaterThan(value) => push_comparison(builder, &column, ">", *value),
        FilterOperation::GreaterThanOrEqual(value) => {
            push_comparison(builder, &column, ">=", *value)
        },
        FilterOperation::Between(low, high) => {
            builder.push(format!("{} BETWEEN ", column));
            builder.push_bind(*low);
            builder.push(" AND ");
            builder.push_bind(*high);
        },
        FilterOperation::Like(value) => {
            builder.push(format!("{} ILIKE ", column));
            builder.push_bind(format!("%{}%", escape_like(value)));
        },
    }
}

fn push_comparison(
    builder: &mut QueryBuilder<'static, Postgres>,
    column: &str,
    operator: &str,
    value: i64,
) {
    builder.push(format!("{} {} ", column, operator));
    builder.push_bind(value);
}

/// Double-quote an identifier, doubling embedded quotes
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Escape `\`, `%` and `_` so user text matches literally inside `LIKE`
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_projection() {
        let query = EntityQuery::new("categories", "c");
        assert_eq!(query.to_select().sql(), r#"SELECT c.* FROM "categories" c"#);
    }

    #[test]
    fn test_every_operation_binds_values() {
        let filters = vec![
            Filter::new("rating", FilterOperation::LessThanOrEqual(4)),
            Filter::new("rating", FilterOperation::GreaterThan(1)),
            Filter::new("rating", FilterOperation::GreaterThanOrEqual(0)),
            Filter::new("rating", FilterOperation::Between(2, 3)),
            Filter::new("comment", FilterOperation::Like("great".to_string())),
        ];

        let sql = EntityQuery::new("reviews", "r")
            .where_filters(&filters)
            .to_select()
            .into_sql();

        assert_eq!(
            sql,
            r#"SELECT r.* FROM "reviews" r WHERE r."rating" <= $1 AND r."rating" > $2 AND r."rating" >= $3 AND r."rating" BETWEEN $4 AND $5 AND r."comment" ILIKE $6"#
        );
    }

    #[test]
    fn test_values_never_appear_in_sql() {
        let filters = vec![
            Filter::new(
                "title",
                FilterOperation::Equal(vec!["'; DROP TABLE books; --".to_string()]),
            ),
            Filter::new("title", FilterOperation::Like("50%".to_string())),
        ];

        let sql = EntityQuery::new("books", "b")
            .where_filters(&filters)
            .to_select()
            .into_sql();

        assert!(!sql.contains("DROP"));
        assert!(!sql.contains("50%"));
    }

    #[test]
    fn test_join_variant() {
        let book_id = Uuid::new_v4();
        let sql = EntityQuery::new("authors", "a")
            .left_join("book_authors", "ba", "ba.author_id = a.id")
            .where_related("ba", "book_id", book_id)
            .where_filters(&[Filter::new("birth_year", FilterOperation::GreaterThan(1900))])
            .order_by("name", SortDirection::Asc)
            .take(5)
            .skip(10)
            .to_select()
            .into_sql();

        assert_eq!(
            sql,
            r#"SELECT a.* FROM "authors" a LEFT JOIN "book_authors" ba ON ba.author_id = a.id WHERE ba."book_id" = $1 AND a."birth_year" > $2 ORDER BY a."name" ASC LIMIT $3 OFFSET $4"#
        );
    }

    #[test]
    fn test_count_ignores_order_and_window() {
        let sql = EntityQuery::new("books", "b")
            .where_filters(&[Filter::new("price", FilterOperation::Between(10, 20))])
            .order_by("created_at", SortDirection::Desc)
            .take(5)
            .skip(5)
            .to_count()
            .into_sql();

        assert_eq!(
            sql,
            r#"SELECT COUNT(*) FROM "books" b WHERE b."price" BETWEEN $1 AND $2"#
        );
    }

    #[test]
    fn test_custom_projection_and_multiple_orderings() {
        let sql = EntityQuery::new("books", "b")
            .select(["b.id", "b.title"])
            .order_by("title", SortDirection::Asc)
            .order_by("created_at", SortDirection::Desc)
            .to_select()
            .into_sql();

        assert_eq!(
            sql,
            r#"SELECT b.id, b.title FROM "books" b ORDER BY b."title" ASC, b."created_at" DESC"#
        );
    }

    #[test]
    fn test_negative_window_is_clamped() {
        let query = EntityQuery::new("books", "b").take(-1).skip(-5);
        assert_eq!(query.limit, Some(0));
        assert_eq!(query.offset, Some(0));
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("title"), r#""title""#);
        assert_eq!(quote_ident(r#"we"ird"#), r#""we""ird""#);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("100%_off"), r"100\%\_off");
        assert_eq!(escape_like(r"back\slash"), r"back\\slash");
    }
}
