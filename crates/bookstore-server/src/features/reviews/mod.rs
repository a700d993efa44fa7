//! Reader reviews, always scoped to a book

pub mod commands;
pub mod error;
pub mod queries;
pub mod routes;
pub mod types;

pub use error::ReviewError;
pub use routes::ReviewsController;
pub use types::Review;
