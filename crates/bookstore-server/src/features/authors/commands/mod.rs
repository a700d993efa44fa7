pub mod create;
pub mod delete;
pub mod update;

pub use create::CreateAuthorCommand;
pub use delete::{DeleteAuthorCommand, DeleteAuthorResponse};
pub use update::UpdateAuthorCommand;
