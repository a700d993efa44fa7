//! Categories: flat book classification (fiction, history, ...)

pub mod commands;
pub mod error;
pub mod queries;
pub mod routes;
pub mod types;

pub use error::CategoryError;
pub use routes::CategoriesController;
pub use types::Category;
