//! Create author command

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::authors::{
    error::AuthorError,
    types::{Author, BIOGRAPHY_MAX_LENGTH, NAME_MAX_LENGTH},
};
use crate::features::shared::validation::{validate_name, validate_optional_text, validate_year};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuthorCommand {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
}

impl CreateAuthorCommand {
    pub fn validate(&self) -> Result<(), AuthorError> {
        validate_name("name", &self.name, NAME_MAX_LENGTH)?;
        validate_optional_text("biography", self.biography.as_deref(), BIOGRAPHY_MAX_LENGTH)?;
        validate_year("birth_year", self.birth_year)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(pool: PgPool, command: CreateAuthorCommand) -> Result<Author, AuthorError> {
    command.validate()?;

    let author = sqlx::query_as::<_, Author>(
        r#"
        INSERT INTO authors (name, biography, birth_year)
        VALUES ($1, $2, $3)
        RETURNING id, name, biography, birth_year, created_at, updated_at
        "#,
    )
    .bind(command.name.trim())
    .bind(&command.biography)
    .bind(command.birth_year)
    .fetch_one(&pool)
    .await?;

    tracing::info!(author_id = %author.id, "Author created");

    Ok(author)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> CreateAuthorCommand {
        CreateAuthorCommand {
            name: "Octavia E. Butler".to_string(),
            biography: None,
            birth_year: Some(1947),
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(command().validate().is_ok());
    }

    #[test]
    fn test_validation_blank_name() {
        let cmd = CreateAuthorCommand {
            name: String::new(),
            ..command()
        };
        assert!(matches!(cmd.validate(), Err(AuthorError::Validation(_))));
    }

    #[test]
    fn test_validation_birth_year_out_of_range() {
        let cmd = CreateAuthorCommand {
            birth_year: Some(-40),
            ..command()
        };
        assert!(matches!(cmd.validate(), Err(AuthorError::Validation(_))));
    }

    #[sqlx::test]
    #[ignore = "requires PostgreSQL (DATABASE_URL)"]
    async fn test_handle_creates_author(pool: PgPool) -> sqlx::Result<()> {
        let author = handle(pool, command()).await.unwrap();
        assert_eq!(author.name, "Octavia E. Butler");
        assert_eq!(author.birth_year, Some(1947));
        Ok(())
    }
}
