pub mod get;
pub mod list;
pub mod list_by_book;

pub use get::GetAuthorQuery;
pub use list::ListAuthorsQuery;
pub use list_by_book::ListBookAuthorsQuery;
