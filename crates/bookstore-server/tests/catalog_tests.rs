//! End-to-end catalog flows against PostgreSQL
//!
//! Run with `DATABASE_URL` pointing at a scratch server and `--ignored`.

mod helpers;

use axum::{http::StatusCode, Router};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use helpers::{app_with_pool, body_json, delete, get, json_request};

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(json_request("POST", uri, &body))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

async fn fetch(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app.clone().oneshot(get(uri)).await.unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_book_lifecycle(pool: PgPool) {
    let app = app_with_pool(pool);

    let (status, category) = post(&app, "/api/v1/categories", json!({ "name": "Science Fiction" })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, author) = post(&app, "/api/v1/authors", json!({ "name": "Frank Herbert", "birth_year": 1920 })).await;

    let (status, book) = post(
        &app,
        "/api/v1/books",
        json!({
            "title": "Dune",
            "isbn": "978-0-441-01359-3",
            "price": 9.99,
            "published_year": 1965,
            "category_id": category["id"],
            "author_ids": [author["id"]]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(book["isbn"], "9780441013593");
    assert_eq!(book["author_ids"], json!([author["id"]]));

    let book_uri = format!("/api/v1/books/{}", book["id"].as_str().unwrap());

    let (status, found) = fetch(
        &app,
        "/api/v1/books?filter=isbn%7C%7Ceq%7C%7C978-0-441-01359-3",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["items"][0]["id"], book["id"]);

    let (status, authors) = fetch(&app, &format!("{}/authors", book_uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(authors["items"][0]["name"], "Frank Herbert");
    assert_eq!(authors["pagination"]["total"], 1);

    let (status, _) = post(
        &app,
        &format!("{}/reviews", book_uri),
        json!({ "reviewer_name": "kim", "rating": 5 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request("PUT", &book_uri, &json!({ "price": 7.5 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["price"], 7.5);

    let response = app.clone().oneshot(delete(&book_uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, body) = fetch(&app, &book_uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["name"], "BookNotFoundError");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_list_filters_and_pagination(pool: PgPool) {
    let app = app_with_pool(pool);

    for (title, isbn, price) in [
        ("Emma", "0141439580", 4.0),
        ("Dracula", "0141439846", 6.0),
        ("Middlemarch", "0141439548", 12.0),
        ("Persuasion", "0141439688", 5.0),
    ] {
        let (status, _) = post(
            &app,
            "/api/v1/books",
            json!({ "title": title, "isbn": isbn, "price": price }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) = fetch(&app, "/api/v1/books?filter=price%7C%7Clt%7C%7C6").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["pagination"]["total"], 2);

    let (_, page) = fetch(&app, "/api/v1/books?filter=title%7C%7Clike%7C%7CMIDDLE").await;
    assert_eq!(page["items"][0]["title"], "Middlemarch");

    let (_, page) = fetch(&app, "/api/v1/books?filter=title%7C%7Ceq%7C%7CEmma,Dracula&limit=1").await;
    assert_eq!(page["pagination"]["total"], 2);
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["pagination"]["has_next"], true);

    let (_, page) = fetch(&app, "/api/v1/books?limit=3&page=2").await;
    assert_eq!(page["pagination"]["offset"], 3);
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_conflicts_and_references(pool: PgPool) {
    let app = app_with_pool(pool);

    let (_, author) = post(&app, "/api/v1/authors", json!({ "name": "Mary Shelley" })).await;
    let book = json!({
        "title": "Frankenstein",
        "isbn": "0486282112",
        "price": 3.0,
        "author_ids": [author["id"]]
    });

    let (status, _) = post(&app, "/api/v1/books", book.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(&app, "/api/v1/books", book).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["name"], "BookAlreadyExistsError");
    assert_eq!(body["error"]["context"]["isbn"], "0486282112");

    let (status, body) = post(
        &app,
        "/api/v1/books",
        json!({
            "title": "Nowhere",
            "isbn": "0000000000",
            "price": 1.0,
            "category_id": "6f9619ff-8b86-d011-b42d-00c04fc964ff"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["context"]["field"], "category_id");

    let author_uri = format!("/api/v1/authors/{}", author["id"].as_str().unwrap());
    let response = app.clone().oneshot(delete(&author_uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"]["name"], "AuthorHasBooksError");

    let (status, body) = post(
        &app,
        "/api/v1/books/6f9619ff-8b86-d011-b42d-00c04fc964ff/reviews",
        json!({ "reviewer_name": "lee", "rating": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["name"], "BookNotFoundError");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_health_with_database(pool: PgPool) {
    let app = app_with_pool(pool);
    let (status, body) = fetch(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "connected");
}
