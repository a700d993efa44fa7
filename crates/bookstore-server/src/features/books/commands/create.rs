//! Create book command
//!
//! Inserts the book and its author links in one transaction.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::link_authors;
use crate::features::books::{
    error::BookError,
    types::{book_query, Book, DESCRIPTION_MAX_LENGTH, TITLE_MAX_LENGTH},
};
use crate::features::shared::validation::{
    normalize_isbn, validate_name, validate_optional_text, validate_price, validate_range,
    validate_year,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookCommand {
    pub title: String,

    /// ISBN-10 or ISBN-13; hyphens and spaces are stripped
    pub isbn: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,

    #[serde(default)]
    pub author_ids: Vec<Uuid>,
}

impl CreateBookCommand {
    pub fn validate(&self) -> Result<(), BookError> {
        validate_name("title", &self.title, TITLE_MAX_LENGTH)?;
        normalize_isbn(&self.isbn)?;
        validate_optional_text("description", self.description.as_deref(), DESCRIPTION_MAX_LENGTH)?;
        validate_price(self.price)?;
        validate_year("published_year", self.published_year)?;
        if let Some(pages) = self.page_count {
            validate_range("page_count", i64::from(pages), 1, i64::from(i32::MAX))?;
        }
        Ok(())
    }
}

/// # Errors
///
/// - `Validation` for a blank title, malformed ISBN or negative price
/// - `AlreadyExists` if the ISBN is taken
/// - `InvalidReference` if the category or an author does not exist
#[tracing::instrument(skip(pool, command), fields(isbn = %command.isbn))]
pub async fn handle(pool: PgPool, command: CreateBookCommand) -> Result<Book, BookError> {
    command.validate()?;
    let isbn = normalize_isbn(&command.isbn)?;

    let mut tx = pool.begin().await?;

    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO books (title, isbn, description, price, published_year, page_count, category_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(command.title.trim())
    .bind(&isbn)
    .bind(&command.description)
    .bind(command.price)
    .bind(command.published_year)
    .bind(command.page_count)
    .bind(command.category_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| BookError::from_write(e, Some(&isbn)))?;

    link_authors(&mut tx, id, &command.author_ids).await?;
    tx.commit().await?;

    tracing::info!(book_id = %id, authors = command.author_ids.len(), "Book created");

    book_query()
        .where_related("b", "id", id)
        .fetch_optional(&pool)
        .await?
        .ok_or(BookError::NotFound(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::FieldError;

    fn command() -> CreateBookCommand {
        CreateBookCommand {
            title: "The Left Hand of Darkness".to_string(),
            isbn: "0-441-47812-3".to_string(),
            description: None,
            price: 8.99,
            published_year: Some(1969),
            page_count: Some(304),
            category_id: None,
            author_ids: vec![],
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(command().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_isbn() {
        let cmd = CreateBookCommand {
            isbn: "not-an-isbn".to_string(),
            ..command()
        };
        assert!(matches!(
            cmd.validate(),
            Err(BookError::Validation(FieldError::InvalidIsbn))
        ));
    }

    #[test]
    fn test_validation_rejects_negative_price() {
        let cmd = CreateBookCommand {
            price: -1.0,
            ..command()
        };
        assert!(matches!(cmd.validate(), Err(BookError::Validation(_))));
    }

    #[test]
    fn test_validation_rejects_zero_pages() {
        let cmd = CreateBookCommand {
            page_count: Some(0),
            ..command()
        };
        assert!(matches!(cmd.validate(), Err(BookError::Validation(_))));
    }

    #[sqlx::test]
    #[ignore = "requires PostgreSQL (DATABASE_URL)"]
    async fn test_handle_links_authors(pool: PgPool) -> sqlx::Result<()> {
        let author_id: Uuid =
            sqlx::query_scalar("INSERT INTO authors (name) VALUES ('Ursula K. Le Guin') RETURNING id")
                .fetch_one(&pool)
                .await?;

        let book = handle(
            pool,
            CreateBookCommand {
                author_ids: vec![author_id, author_id],
                ..command()
            },
        )
        .await
        .unwrap();

        assert_eq!(book.isbn, "0441478123");
        assert_eq!(book.author_ids, vec![author_id]);
        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requires PostgreSQL (DATABASE_URL)"]
    async fn test_handle_unknown_author_rolls_back(pool: PgPool) -> sqlx::Result<()> {
        let result = handle(
            pool.clone(),
            CreateBookCommand {
                author_ids: vec![Uuid::new_v4()],
                ..command()
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(BookError::InvalidReference { field: "author_ids" })
        ));

        let books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&pool)
            .await?;
        assert_eq!(books, 0);
        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requires PostgreSQL (DATABASE_URL)"]
    async fn test_handle_duplicate_isbn(pool: PgPool) -> sqlx::Result<()> {
        handle(pool.clone(), command()).await.unwrap();
        let result = handle(pool, command()).await;
        assert!(matches!(result, Err(BookError::AlreadyExists(isbn)) if isbn == "0441478123"));
        Ok(())
    }
}
