//! Category API routes
//!
//! - `POST /categories` - Create a category
//! - `GET /categories` - List categories (filters: `name` eq/like)
//! - `GET /categories/:id` - Get a category
//! - `PUT /categories/:id` - Update a category
//! - `DELETE /categories/:id` - Delete a category

use uuid::Uuid;

use super::{
    commands::{
        self, CreateCategoryCommand, DeleteCategoryCommand, UpdateCategoryCommand,
    },
    queries::{self, GetCategoryQuery, ListCategoriesQuery},
    types::{category_schema, DESCRIPTION_MAX_LENGTH, NAME_MAX_LENGTH},
};
use crate::error::ApiResult;
use crate::features::{
    shared::{list_query_schema, paginated_schema, ListParams},
    with_state, FeatureState,
};
use crate::http::{
    FieldKind, HttpController, HttpRequest, HttpResponse, HttpRoute, RequestSchema, Schema,
};

pub struct CategoriesController {
    state: FeatureState,
}

impl CategoriesController {
    pub fn new(state: FeatureState) -> Self {
        Self { state }
    }
}

fn id_params() -> Schema {
    Schema::new().required("id", FieldKind::Uuid)
}

fn name_kind() -> FieldKind {
    FieldKind::string_len(1, NAME_MAX_LENGTH)
}

fn description_kind() -> FieldKind {
    FieldKind::string_len(0, DESCRIPTION_MAX_LENGTH)
}

impl HttpController for CategoriesController {
    fn base_path(&self) -> &'static str {
        "categories"
    }

    fn http_routes(&self) -> Vec<HttpRoute> {
        vec![
            HttpRoute::post("/", with_state(&self.state, create_category))
                .with_request_schema(
                    RequestSchema::new().body(
                        Schema::new()
                            .required("name", name_kind())
                            .optional("description", description_kind()),
                    ),
                )
                .with_response_schema(category_schema()),
            HttpRoute::get("/", with_state(&self.state, list_categories))
                .with_request_schema(RequestSchema::new().query(list_query_schema()))
                .with_response_schema(paginated_schema(category_schema())),
            HttpRoute::get("/:id", with_state(&self.state, get_category))
                .with_request_schema(RequestSchema::new().params(id_params()))
                .with_response_schema(category_schema()),
            HttpRoute::put("/:id", with_state(&self.state, update_category))
                .with_request_schema(
                    RequestSchema::new().params(id_params()).body(
                        Schema::new()
                            .optional("name", name_kind())
                            .optional("description", description_kind()),
                    ),
                )
                .with_response_schema(category_schema()),
            HttpRoute::delete("/:id", with_state(&self.state, delete_category))
                .with_request_schema(RequestSchema::new().params(id_params())),
        ]
    }
}

#[tracing::instrument(skip_all)]
async fn create_category(state: FeatureState, request: HttpRequest) -> ApiResult<HttpResponse> {
    let command: CreateCategoryCommand = request.body_as()?;
    let category = commands::create::handle(state.db, command).await?;
    HttpResponse::created(&category)
}

#[tracing::instrument(skip_all)]
async fn list_categories(state: FeatureState, request: HttpRequest) -> ApiResult<HttpResponse> {
    let params: ListParams = request.query_as()?;
    let query = ListCategoriesQuery {
        window: params.pagination().window(&state.limits),
        filters: params.filter,
    };

    let page = queries::list::handle(state.db, query).await?;
    tracing::debug!(count = page.items.len(), total = page.pagination.total, "Categories listed");
    HttpResponse::ok(&page)
}

#[tracing::instrument(skip_all)]
async fn get_category(state: FeatureState, request: HttpRequest) -> ApiResult<HttpResponse> {
    let id: Uuid = request.param("id")?;
    let category = queries::get::handle(state.db, GetCategoryQuery { id }).await?;
    HttpResponse::ok(&category)
}

#[tracing::instrument(skip_all)]
async fn update_category(state: FeatureState, request: HttpRequest) -> ApiResult<HttpResponse> {
    let mut command: UpdateCategoryCommand = request.body_as()?;
    command.id = request.param("id")?;
    let category = commands::update::handle(state.db, command).await?;
    HttpResponse::ok(&category)
}

#[tracing::instrument(skip_all)]
async fn delete_category(state: FeatureState, request: HttpRequest) -> ApiResult<HttpResponse> {
    let id: Uuid = request.param("id")?;
    commands::delete::handle(state.db, DeleteCategoryCommand { id }).await?;
    Ok(HttpResponse::no_content())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::PaginationLimits;
    use crate::http::HttpMethod;
    use sqlx::postgres::PgPoolOptions;

    fn controller() -> CategoriesController {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/bookstore_test")
            .unwrap();
        CategoriesController::new(FeatureState::new(pool, PaginationLimits::default()))
    }

    #[tokio::test]
    async fn test_route_table() {
        let routes = controller().http_routes();
        let table: Vec<(HttpMethod, &str)> = routes
            .iter()
            .map(|r| (r.method, r.path.as_str()))
            .collect();

        assert_eq!(
            table,
            vec![
                (HttpMethod::Post, "/"),
                (HttpMethod::Get, "/"),
                (HttpMethod::Get, "/:id"),
                (HttpMethod::Put, "/:id"),
                (HttpMethod::Delete, "/:id"),
            ]
        );
        assert!(routes.iter().all(|r| r.request_schema.is_some()));
    }
}
