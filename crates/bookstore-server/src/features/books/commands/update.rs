//! Update book command
//!
//! Omitted fields keep their stored value. When `author_ids` is present it
//! replaces the full set of credited authors.

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

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBookCommand {
    #[serde(skip)]
    pub id: Uuid,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_ids: Option<Vec<Uuid>>,
}

impl UpdateBookCommand {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.isbn.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.published_year.is_none()
            && self.page_count.is_none()
            && self.category_id.is_none()
            && self.author_ids.is_none()
    }

    pub fn validate(&self) -> Result<(), BookError> {
        if self.is_empty() {
            return Err(BookError::NoFieldsToUpdate);
        }
        if let Some(ref title) = self.title {
            validate_name("title", title, TITLE_MAX_LENGTH)?;
        }
        if let Some(ref isbn) = self.isbn {
            normalize_isbn(isbn)?;
        }
        validate_optional_text("description", self.description.as_deref(), DESCRIPTION_MAX_LENGTH)?;
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        validate_year("published_year", self.published_year)?;
        if let Some(pages) = self.page_count {
            validate_range("page_count", i64::from(pages), 1, i64::from(i32::MAX))?;
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(book_id = %command.id))]
pub async fn handle(pool: PgPool, command: UpdateBookCommand) -> Result<Book, BookError> {
    command.validate()?;
    let isbn = command.isbn.as_deref().map(normalize_isbn).transpose()?;

    let mut tx = pool.begin().await?;

    sqlx::query_scalar::<_, Uuid>(
        r#"
        UPDATE books
        SET title = COALESCE($2, title),
            isbn = COALESCE($3, isbn),
            description = COALESCE($4, description),
            price = COALESCE($5, price),
            published_year = COALESCE($6, published_year),
            page_count = COALESCE($7, page_count),
            category_id = COALESCE($8, category_id),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id
        "#,
    )
    .bind(command.id)
    .bind(command.title.as_deref().map(str::trim))
    .bind(&isbn)
    .bind(&command.description)
    .bind(command.price)
    .bind(command.published_year)
    .bind(command.page_count)
    .bind(command.category_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| BookError::from_write(e, isbn.as_deref()))?
    .ok_or(BookError::NotFound(command.id))?;

    if let Some(ref author_ids) = command.author_ids {
        sqlx::query("DELETE FROM book_authors WHERE book_id = $1")
            .bind(command.id)
            .execute(&mut *tx)
            .await?;
        link_authors(&mut tx, command.id, author_ids).await?;
    }

    tx.commit().await?;

    tracing::info!("Book updated");

    book_query()
        .where_related("b", "id", command.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(BookError::NotFound(command.id))
}
