//! Feature modules implementing the bookstore API
//!
//! Each resource is a vertical slice:
//! - `commands/` - write operations (create, update, delete)
//! - `queries/` - read operations (get, list)
//! - `routes.rs` - the resource's [`HttpController`] with its schemas
//! - `types.rs` - entity rows and the supported-filters registry
//! - `error.rs` - the slice's error enum and its HTTP mapping

pub mod authors;
pub mod books;
pub mod categories;
pub mod reviews;
pub mod shared;

use std::future::Future;

use axum::Router;
use sqlx::PgPool;

use crate::error::ApiResult;
use crate::http::{build_api_router, HttpController, HttpRequest, HttpResponse};
use shared::PaginationLimits;

/// Shared state handed to every route handler
#[derive(Clone)]
pub struct FeatureState {
    pub db: PgPool,
    pub limits: PaginationLimits,
}

impl FeatureState {
    pub fn new(db: PgPool, limits: PaginationLimits) -> Self {
        Self { db, limits }
    }
}

/// Adapt `handler(state, request)` to the single-argument route handler shape
pub fn with_state<F, Fut>(
    state: &FeatureState,
    handler: F,
) -> impl Fn(HttpRequest) -> Fut + Send + Sync + 'static
where
    F: Fn(FeatureState, HttpRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ApiResult<HttpResponse>> + Send + 'static,
{
    let state = state.clone();
    move |request| handler(state.clone(), request)
}

/// Every resource controller, in mount order
pub fn controllers(state: &FeatureState) -> Vec<Box<dyn HttpController>> {
    vec![
        Box::new(categories::CategoriesController::new(state.clone())),
        Box::new(authors::AuthorsController::new(state.clone())),
        Box::new(books::BooksController::new(state.clone())),
        Box::new(reviews::ReviewsController::new(state.clone())),
    ]
}

/// Router with every resource mounted under `root_path`
pub fn router(state: &FeatureState, root_path: &str) -> Router {
    build_api_router(root_path, &controllers(state))
}
