pub mod create;
pub mod delete;
pub mod update;

pub use create::CreateCategoryCommand;
pub use delete::{DeleteCategoryCommand, DeleteCategoryResponse};
pub use update::UpdateCategoryCommand;
