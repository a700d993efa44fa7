//! Shared helpers for integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use bookstore_server::{
    api::{self, AppState},
    config::Config,
    db,
};
use serde_json::Value;
use sqlx::PgPool;

/// Router over a pool that never connects unless a handler reaches the store
pub fn lazy_app() -> Router {
    let config = Config::default();
    let pool = db::create_lazy_pool(&config.database).expect("valid database url");
    api::create_router(AppState::new(pool), &config)
}

pub fn app_with_pool(pool: PgPool) -> Router {
    api::create_router(AppState::new(pool), &Config::default())
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
