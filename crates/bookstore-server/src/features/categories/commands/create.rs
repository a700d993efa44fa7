//! Create category command

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::categories::{
    error::CategoryError,
    types::{Category, DESCRIPTION_MAX_LENGTH, NAME_MAX_LENGTH},
};
use crate::features::shared::{
    error_helpers::map_unique_violation,
    validation::{validate_name, validate_optional_text},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryCommand {
    /// Unique display name
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateCategoryCommand {
    pub fn validate(&self) -> Result<(), CategoryError> {
        validate_name("name", &self.name, NAME_MAX_LENGTH)?;
        validate_optional_text(
            "description",
            self.description.as_deref(),
            DESCRIPTION_MAX_LENGTH,
        )?;
        Ok(())
    }
}

/// # Errors
///
/// - `Validation` if the name is blank or a field is too long
/// - `AlreadyExists` if another category has the same name
#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(pool: PgPool, command: CreateCategoryCommand) -> Result<Category, CategoryError> {
    command.validate()?;

    let name = command.name.trim().to_string();

    let category = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (name, description)
        VALUES ($1, $2)
        RETURNING id, name, description, created_at, updated_at
        "#,
    )
    .bind(&name)
    .bind(&command.description)
    .fetch_one(&pool)
    .await
    .map_err(|e| map_unique_violation(e, CategoryError::AlreadyExists(name.clone()), CategoryError::Database))?;

    tracing::info!(category_id = %category.id, "Category created");

    Ok(category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_success() {
        let cmd = CreateCategoryCommand {
            name: "Fantasy".to_string(),
            description: Some("Dragons and such".to_string()),
        };
        assert!(cmd.validate().is_ok());
    }

    #[test]
    fn test_validation_blank_name() {
        let cmd = CreateCategoryCommand {
            name: "  ".to_string(),
            description: None,
        };
        assert!(matches!(cmd.validate(), Err(CategoryError::Validation(_))));
    }

    #[test]
    fn test_validation_name_too_long() {
        let cmd = CreateCategoryCommand {
            name: "a".repeat(NAME_MAX_LENGTH + 1),
            description: None,
        };
        assert!(matches!(cmd.validate(), Err(CategoryError::Validation(_))));
    }

    #[sqlx::test]
    #[ignore = "requires PostgreSQL (DATABASE_URL)"]
    async fn test_handle_creates_category(pool: PgPool) -> sqlx::Result<()> {
        let cmd = CreateCategoryCommand {
            name: " Mystery ".to_string(),
            description: None,
        };

        let category = handle(pool, cmd).await.unwrap();
        assert_eq!(category.name, "Mystery");
        assert!(category.description.is_none());
        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requires PostgreSQL (DATABASE_URL)"]
    async fn test_handle_duplicate_name(pool: PgPool) -> sqlx::Result<()> {
        let cmd = CreateCategoryCommand {
            name: "Poetry".to_string(),
            description: None,
        };
        handle(pool.clone(), cmd.clone()).await.unwrap();

        let result = handle(pool, cmd).await;
        assert!(matches!(result, Err(CategoryError::AlreadyExists(name)) if name == "Poetry"));
        Ok(())
    }
}
