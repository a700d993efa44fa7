//! Update category command
//!
//! Omitted fields keep their stored value.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::categories::{
    error::CategoryError,
    types::{Category, DESCRIPTION_MAX_LENGTH, NAME_MAX_LENGTH},
};
use crate::features::shared::{
    error_helpers::map_unique_violation,
    validation::{validate_name, validate_optional_text},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCategoryCommand {
    /// Taken from the path
    #[serde(skip)]
    pub id: Uuid,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateCategoryCommand {
    pub fn validate(&self) -> Result<(), CategoryError> {
        if self.name.is_none() && self.description.is_none() {
            return Err(CategoryError::NoFieldsToUpdate);
        }
        if let Some(ref name) = self.name {
            validate_name("name", name, NAME_MAX_LENGTH)?;
        }
        validate_optional_text(
            "description",
            self.description.as_deref(),
            DESCRIPTION_MAX_LENGTH,
        )?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(category_id = %command.id))]
pub async fn handle(pool: PgPool, command: UpdateCategoryCommand) -> Result<Category, CategoryError> {
    command.validate()?;

    let name = command.name.as_deref().map(str::trim).map(str::to_string);

    let category = sqlx::query_as::<_, Category>(
        r#"
        UPDATE categories
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, description, created_at, updated_at
        "#,
    )
    .bind(command.id)
    .bind(&name)
    .bind(&command.description)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            CategoryError::AlreadyExists(name.clone().unwrap_or_default()),
            CategoryError::Database,
        )
    })?
    .ok_or(CategoryError::NotFound(command.id))?;

    tracing::info!("Category updated");

    Ok(category)
}
