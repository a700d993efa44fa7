//! Books: the catalog entries, with optional category and credited authors

pub mod commands;
pub mod error;
pub mod queries;
pub mod routes;
pub mod types;

pub use error::BookError;
pub use routes::BooksController;
pub use types::Book;
