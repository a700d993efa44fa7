//! HTTP router and request pipeline
//!
//! Resources describe their endpoints as [`HttpRoute`] values (method,
//! relative path, handler, optional schemas) and group them behind an
//! [`HttpController`]. [`build_api_router`] turns those descriptors into an
//! axum router where every request goes through [`run_pipeline`].
//!
//! # Examples
//!
//! ```rust
//! use bookstore_server::http::{
//!     build_api_router, FieldKind, HttpController, HttpResponse, HttpRoute, RequestSchema,
//!     Schema,
//! };
//!
//! struct Ping;
//!
//! impl HttpController for Ping {
//!     fn base_path(&self) -> &'static str {
//!         "ping"
//!     }
//!
//!     fn http_routes(&self) -> Vec<HttpRoute> {
//!         vec![HttpRoute::get("/", |_request| async { HttpResponse::ok(&"pong") })
//!             .with_request_schema(
//!                 RequestSchema::new().query(Schema::new().optional("n", FieldKind::integer())),
//!             )]
//!     }
//! }
//!
//! let controllers: Vec<Box<dyn HttpController>> = vec![Box::new(Ping)];
//! let _router = build_api_router("api/v1", &controllers);
//! ```

pub mod pipeline;
pub mod route;
pub mod schema;

pub use pipeline::{
    build_api_router, into_http_response, normalize_path, register_routes, run_pipeline,
    HttpController,
};
pub use route::{HttpMethod, HttpRequest, HttpResponse, HttpRoute, RequestSchema, RouteHandler};
pub use schema::{FieldKind, FieldSchema, Schema};
