//! Book API routes
//!
//! - `POST /books` - Create a book, optionally crediting authors
//! - `GET /books` - List books, newest first
//! - `GET /books/:id` - Get a book
//! - `PUT /books/:id` - Update a book
//! - `DELETE /books/:id` - Delete a book with its reviews
//! - `GET /books/:id/authors` - List the authors credited on a book
//!
//! List filters: `title` eq/like, `isbn` eq, `price` lt/lte/gt/gte/between,
//! `published_year` numeric, `category_id` eq.

use uuid::Uuid;

use super::{
    commands::{self, CreateBookCommand, DeleteBookCommand, UpdateBookCommand},
    queries::{self, GetBookQuery, ListBooksQuery},
    types::{
        book_schema, page_count_kind, published_year_kind, DESCRIPTION_MAX_LENGTH,
        ISBN_INPUT_MAX_LENGTH, TITLE_MAX_LENGTH,
    },
};
use crate::error::ApiResult;
use crate::features::{
    authors::{self, queries::ListBookAuthorsQuery, types::author_schema},
    shared::{list_query_schema, paginated_schema, ListParams},
    with_state, FeatureState,
};
use crate::http::{
    FieldKind, HttpController, HttpRequest, HttpResponse, HttpRoute, RequestSchema, Schema,
};

pub struct BooksController {
    state: FeatureState,
}

impl BooksController {
    pub fn new(state: FeatureState) -> Self {
        Self { state }
    }
}

fn id_params() -> Schema {
    Schema::new().required("id", FieldKind::Uuid)
}

fn book_body(create: bool) -> Schema {
    let title = FieldKind::string_len(1, TITLE_MAX_LENGTH);
    let isbn = FieldKind::string_len(10, ISBN_INPUT_MAX_LENGTH);

    let schema = if create {
        Schema::new()
            .required("title", title)
            .required("isbn", isbn)
            .required("price", FieldKind::Number)
    } else {
        Schema::new()
            .optional("title", title)
            .optional("isbn", isbn)
            .optional("price", FieldKind::Number)
    };

    schema
        .optional("description", FieldKind::string_len(0, DESCRIPTION_MAX_LENGTH))
        .optional("published_year", published_year_kind())
        .optional("page_count", page_count_kind())
        .optional("category_id", FieldKind::Uuid)
        .optional("author_ids", FieldKind::array(FieldKind::Uuid))
}

impl HttpController for BooksController {
    fn base_path(&self) -> &'static str {
        "books"
    }

    fn http_routes(&self) -> Vec<HttpRoute> {
        vec![
            HttpRoute::post("/", with_state(&self.state, create_book))
                .with_request_schema(RequestSchema::new().body(book_body(true)))
                .with_response_schema(book_schema()),
            HttpRoute::get("/", with_state(&self.state, list_books))
                .with_request_schema(RequestSchema::new().query(list_query_schema()))
                .with_response_schema(paginated_schema(book_schema())),
            HttpRoute::get("/:id", with_state(&self.state, get_book))
                .with_request_schema(RequestSchema::new().params(id_params()))
                .with_response_schema(book_schema()),
            HttpRoute::put("/:id", with_state(&self.state, update_book))
                .with_request_schema(
                    RequestSchema::new()
                        .params(id_params())
                        .body(book_body(false)),
                )
                .with_response_schema(book_schema()),
            HttpRoute::delete("/:id", with_state(&self.state, delete_book))
                .with_request_schema(RequestSchema::new().params(id_params())),
            HttpRoute::get("/:id/authors", with_state(&self.state, list_book_authors))
                .with_request_schema(
                    RequestSchema::new()
                        .params(id_params())
                        .query(list_query_schema()),
                )
                .with_response_schema(paginated_schema(author_schema())),
        ]
    }
}

#[tracing::instrument(skip_all)]
async fn create_book(state: FeatureState, request: HttpRequest) -> ApiResult<HttpResponse> {
    let command: CreateBookCommand = request.body_as()?;
    let book = commands::create::handle(state.db, command).await?;
    HttpResponse::created(&book)
}

#[tracing::instrument(skip_all)]
async fn list_books(state: FeatureState, request: HttpRequest) -> ApiResult<HttpResponse> {
    let params: ListParams = request.query_as()?;
    let query = ListBooksQuery {
        window: params.pagination().window(&state.limits),
        filters: params.filter,
    };

    let page = queries::list::handle(state.db, query).await?;
    tracing::debug!(count = page.items.len(), total = page.pagination.total, "Books listed");
    HttpResponse::ok(&page)
}

#[tracing::instrument(skip_all)]
async fn get_book(state: FeatureState, request: HttpRequest) -> ApiResult<HttpResponse> {
    let id: Uuid = request.param("id")?;
    let book = queries::get::handle(state.db, GetBookQuery { id }).await?;
    HttpResponse::ok(&book)
}

#[tracing::instrument(skip_all)]
async fn update_book(state: FeatureState, request: HttpRequest) -> ApiResult<HttpResponse> {
    let mut command: UpdateBookCommand = request.body_as()?;
    command.id = request.param("id")?;
    let book = commands::update::handle(state.db, command).await?;
    HttpResponse::ok(&book)
}

#[tracing::instrument(skip_all)]
async fn delete_book(state: FeatureState, request: HttpRequest) -> ApiResult<HttpResponse> {
    let id: Uuid = request.param("id")?;
    commands::delete::handle(state.db, DeleteBookCommand { id }).await?;
    Ok(HttpResponse::no_content())
}

#[tracing::instrument(skip_all)]
async fn list_book_authors(state: FeatureState, request: HttpRequest) -> ApiResult<HttpResponse> {
    let book_id: Uuid = request.param("id")?;
    let params: ListParams = request.query_as()?;
    let query = ListBookAuthorsQuery {
        book_id,
        window: params.pagination().window(&state.limits),
        filters: params.filter,
    };

    let page = authors::queries::list_by_book::handle(state.db, query).await?;
    HttpResponse::ok(&page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationLocation;
    use crate::features::shared::PaginationLimits;
    use crate::http::HttpMethod;
    use serde_json::json;
    use sqlx::postgres::PgPoolOptions;

    fn controller() -> BooksController {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/bookstore_test")
            .unwrap();
        BooksController::new(FeatureState::new(pool, PaginationLimits::default()))
    }

    #[tokio::test]
    async fn test_route_table() {
        let table: Vec<(HttpMethod, String)> = controller()
            .http_routes()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect();

        assert!(table.contains(&(HttpMethod::Get, "/:id/authors".to_string())));
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn test_create_body_schema() {
        let schema = book_body(true);
        let body = json!({
            "title": "Kindred",
            "isbn": "978-0-8070-8369-7",
            "price": 12,
            "author_ids": ["6f9619ff-8b86-d011-b42d-00c04fc964ff"]
        });
        assert!(schema.validate(&body, ValidationLocation::Body).is_ok());

        let missing_price = json!({ "title": "Kindred", "isbn": "9780807083697" });
        assert!(schema.validate(&missing_price, ValidationLocation::Body).is_err());

        let bad_author = json!({
            "title": "Kindred",
            "isbn": "9780807083697",
            "price": 12.5,
            "author_ids": ["butler"]
        });
        assert!(schema.validate(&bad_author, ValidationLocation::Body).is_err());
    }

    #[test]
    fn test_update_body_schema_allows_partial() {
        assert!(book_body(false)
            .validate(&json!({ "price": 3.5 }), ValidationLocation::Body)
            .is_ok());
    }
}
