//! Bookstore Server Library
//!
//! HTTP backend for a bookstore catalog: categories, authors, books and
//! reader reviews.
//!
//! # Overview
//!
//! Three pieces carry every resource endpoint:
//!
//! - **Filters** ([`filter`]): parse the `field||operation||value` query
//!   mini-language against a per-resource allowlist
//! - **Queries** ([`query`]): turn parsed filters, joins and a page window
//!   into parameterised PostgreSQL statements
//! - **HTTP pipeline** ([`http`]): declarative routes with request and
//!   response schemas, mounted onto axum, with uniform error bodies
//!
//! # Architecture
//!
//! Resources live in [`features`] as vertical slices following a
//! **CQRS** layout:
//!
//! - **Commands** (write operations): create, update, delete
//! - **Queries** (read operations): get, list
//!
//! Each command and query is a plain serde struct with a standalone
//! `handle(pool, request)` function that route handlers call directly.
//!
//! ## Framework Stack
//!
//! - **Axum**: routing and extraction
//! - **SQLx**: PostgreSQL pool, migrations and `QueryBuilder`
//! - **tower-http**: middleware (CORS, tracing, compression)
//!
//! # Example
//!
//! ```no_run
//! use bookstore_server::{api, config::Config, db};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&config.database).await?;
//!     let app = api::create_router(api::AppState::new(pool), &config);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod filter;
pub mod http;
pub mod middleware;
pub mod query;

pub use config::Config;
pub use error::{ApiError, ApiResult};
