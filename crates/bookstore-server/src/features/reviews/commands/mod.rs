pub mod create;
pub mod delete;

pub use create::CreateReviewCommand;
pub use delete::{DeleteReviewCommand, DeleteReviewResponse};
