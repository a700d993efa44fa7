//! Update author command
//!
//! Omitted fields keep their stored value.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::authors::{
    error::AuthorError,
    types::{Author, BIOGRAPHY_MAX_LENGTH, NAME_MAX_LENGTH},
};
use crate::features::shared::validation::{validate_name, validate_optional_text, validate_year};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAuthorCommand {
    #[serde(skip)]
    pub id: Uuid,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
}

impl UpdateAuthorCommand {
    pub fn validate(&self) -> Result<(), AuthorError> {
        if self.name.is_none() && self.biography.is_none() && self.birth_year.is_none() {
            return Err(AuthorError::NoFieldsToUpdate);
        }
        if let Some(ref name) = self.name {
            validate_name("name", name, NAME_MAX_LENGTH)?;
        }
        validate_optional_text("biography", self.biography.as_deref(), BIOGRAPHY_MAX_LENGTH)?;
        validate_year("birth_year", self.birth_year)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(author_id = %command.id))]
pub async fn handle(pool: PgPool, command: UpdateAuthorCommand) -> Result<Author, AuthorError> {
    command.validate()?;

    let author = sqlx::query_as::<_, Author>(
        r#"
        UPDATE authors
        SET name = COALESCE($2, name),
            biography = COALESCE($3, biography),
            birth_year = COALESCE($4, birth_year),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, biography, birth_year, created_at, updated_at
        "#,
    )
    .bind(command.id)
    .bind(command.name.as_deref().map(str::trim))
    .bind(&command.biography)
    .bind(command.birth_year)
    .fetch_optional(&pool)
    .await?
    .ok_or(AuthorError::NotFound(command.id))?;

    tracing::info!("Author updated");

    Ok(author)
}
