pub mod get;
pub mod list;

pub use get::GetCategoryQuery;
pub use list::ListCategoriesQuery;
