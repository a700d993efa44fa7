//! Authors, linked to books many-to-many through `book_authors`

pub mod commands;
pub mod error;
pub mod queries;
pub mod routes;
pub mod types;

pub use error::AuthorError;
pub use routes::AuthorsController;
pub use types::Author;
