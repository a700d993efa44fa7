pub mod list_for_book;

pub use list_for_book::ListBookReviewsQuery;
