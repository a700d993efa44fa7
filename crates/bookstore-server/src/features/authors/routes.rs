//! Author API routes
//!
//! - `POST /authors` - Create an author
//! - `GET /authors` - List authors (filters: `name` eq/like, `birth_year` numeric)
//! - `GET /authors/:id` - Get an author
//! - `PUT /authors/:id` - Update an author
//! - `DELETE /authors/:id` - Delete an author not credited on any book

use uuid::Uuid;

use super::{
    commands::{self, CreateAuthorCommand, DeleteAuthorCommand, UpdateAuthorCommand},
    queries::{self, GetAuthorQuery, ListAuthorsQuery},
    types::{author_schema, birth_year_kind, BIOGRAPHY_MAX_LENGTH, NAME_MAX_LENGTH},
};
use crate::error::ApiResult;
use crate::features::{
    shared::{list_query_schema, paginated_schema, ListParams},
    with_state, FeatureState,
};
use crate::http::{
    FieldKind, HttpController, HttpRequest, HttpResponse, HttpRoute, RequestSchema, Schema,
};

pub struct AuthorsController {
    state: FeatureState,
}

impl AuthorsController {
    pub fn new(state: FeatureState) -> Self {
        Self { state }
    }
}

fn id_params() -> Schema {
    Schema::new().required("id", FieldKind::Uuid)
}

fn author_body(name_required: bool) -> Schema {
    let name = FieldKind::string_len(1, NAME_MAX_LENGTH);
    let schema = if name_required {
        Schema::new().required("name", name)
    } else {
        Schema::new().optional("name", name)
    };
    schema
        .optional("biography", FieldKind::string_len(0, BIOGRAPHY_MAX_LENGTH))
        .optional("birth_year", birth_year_kind())
}

impl HttpController for AuthorsController {
    fn base_path(&self) -> &'static str {
        "authors"
    }

    fn http_routes(&self) -> Vec<HttpRoute> {
        vec![
            HttpRoute::post("/", with_state(&self.state, create_author))
                .with_request_schema(RequestSchema::new().body(author_body(true)))
                .with_response_schema(author_schema()),
            HttpRoute::get("/", with_state(&self.state, list_authors))
                .with_request_schema(RequestSchema::new().query(list_query_schema()))
                .with_response_schema(paginated_schema(author_schema())),
            HttpRoute::get("/:id", with_state(&self.state, get_author))
                .with_request_schema(RequestSchema::new().params(id_params()))
                .with_response_schema(author_schema()),
            HttpRoute::put("/:id", with_state(&self.state, update_author))
                .with_request_schema(
                    RequestSchema::new()
                        .params(id_params())
                        .body(author_body(false)),
                )
                .with_response_schema(author_schema()),
            HttpRoute::delete("/:id", with_state(&self.state, delete_author))
                .with_request_schema(RequestSchema::new().params(id_params())),
        ]
    }
}

#[tracing::instrument(skip_all)]
async fn create_author(state: FeatureState, request: HttpRequest) -> ApiResult<HttpResponse> {
    let command: CreateAuthorCommand = request.body_as()?;
    let author = commands::create::handle(state.db, command).await?;
    HttpResponse::created(&author)
}

#[tracing::instrument(skip_all)]
async fn list_authors(state: FeatureState, request: HttpRequest) -> ApiResult<HttpResponse> {
    let params: ListParams = request.query_as()?;
    let query = ListAuthorsQuery {
        window: params.pagination().window(&state.limits),
        filters: params.filter,
    };

    let page = queries::list::handle(state.db, query).await?;
    tracing::debug!(count = page.items.len(), total = page.pagination.total, "Authors listed");
    HttpResponse::ok(&page)
}

#[tracing::instrument(skip_all)]
async fn get_author(state: FeatureState, request: HttpRequest) -> ApiResult<HttpResponse> {
    let id: Uuid = request.param("id")?;
    let author = queries::get::handle(state.db, GetAuthorQuery { id }).await?;
    HttpResponse::ok(&author)
}

#[tracing::instrument(skip_all)]
async fn update_author(state: FeatureState, request: HttpRequest) -> ApiResult<HttpResponse> {
    let mut command: UpdateAuthorCommand = request.body_as()?;
    command.id = request.param("id")?;
    let author = commands::update::handle(state.db, command).await?;
    HttpResponse::ok(&author)
}

#[tracing::instrument(skip_all)]
async fn delete_author(state: FeatureState, request: HttpRequest) -> ApiResult<HttpResponse> {
    let id: Uuid = request.param("id")?;
    commands::delete::handle(state.db, DeleteAuthorCommand { id }).await?;
    Ok(HttpResponse::no_content())
}
