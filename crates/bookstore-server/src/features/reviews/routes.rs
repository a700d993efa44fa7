//! Review API routes
//!
//! Reviews hang off their book, so this controller mounts at the API root:
//!
//! - `POST /books/:id/reviews` - Review a book
//! - `GET /books/:id/reviews` - List a book's reviews (filters: `rating` numeric)
//! - `DELETE /reviews/:id` - Delete a review

use uuid::Uuid;

use super::{
    commands::{self, CreateReviewCommand, DeleteReviewCommand},
    queries::{self, ListBookReviewsQuery},
    types::{rating_kind, review_schema, COMMENT_MAX_LENGTH, REVIEWER_NAME_MAX_LENGTH},
};
use crate::error::ApiResult;
use crate::features::{
    shared::{list_query_schema, paginated_schema, ListParams},
    with_state, FeatureState,
};
use crate::http::{
    FieldKind, HttpController, HttpRequest, HttpResponse, HttpRoute, RequestSchema, Schema,
};

pub struct ReviewsController {
    state: FeatureState,
}

impl ReviewsController {
    pub fn new(state: FeatureState) -> Self {
        Self { state }
    }
}

fn id_params() -> Schema {
    Schema::new().required("id", FieldKind::Uuid)
}

impl HttpController for ReviewsController {
    fn base_path(&self) -> &'static str {
        ""
    }

    fn http_routes(&self) -> Vec<HttpRoute> {
        vec![
            HttpRoute::post("/books/:id/reviews", with_state(&self.state, create_review))
                .with_request_schema(
                    RequestSchema::new().params(id_params()).body(
                        Schema::new()
                            .required(
                                "reviewer_name",
                                FieldKind::string_len(1, REVIEWER_NAME_MAX_LENGTH),
                            )
                            .required("rating", rating_kind())
                            .optional("comment", FieldKind::string_len(0, COMMENT_MAX_LENGTH)),
                    ),
                )
                .with_response_schema(review_schema()),
            HttpRoute::get("/books/:id/reviews", with_state(&self.state, list_reviews))
                .with_request_schema(
                    RequestSchema::new()
                        .params(id_params())
                        .query(list_query_schema()),
                )
                .with_response_schema(paginated_schema(review_schema())),
            HttpRoute::delete("/reviews/:id", with_state(&self.state, delete_review))
                .with_request_schema(RequestSchema::new().params(id_params())),
        ]
    }
}

#[tracing::instrument(skip_all)]
async fn create_review(state: FeatureState, request: HttpRequest) -> ApiResult<HttpResponse> {
    let mut command: CreateReviewCommand = request.body_as()?;
    command.book_id = request.param("id")?;
    let review = commands::create::handle(state.db, command).await?;
    HttpResponse::created(&review)
}

#[tracing::instrument(skip_all)]
async fn list_reviews(state: FeatureState, request: HttpRequest) -> ApiResult<HttpResponse> {
    let book_id: Uuid = request.param("id")?;
    let params: ListParams = request.query_as()?;
    let query = ListBookReviewsQuery {
        book_id,
        window: params.pagination().window(&state.limits),
        filters: params.filter,
    };

    let page = queries::list_for_book::handle(state.db, query).await?;
    HttpResponse::ok(&page)
}

#[tracing::instrument(skip_all)]
async fn delete_review(state: FeatureState, request: HttpRequest) -> ApiResult<HttpResponse> {
    let id: Uuid = request.param("id")?;
    commands::delete::handle(state.db, DeleteReviewCommand { id }).await?;
    Ok(HttpResponse::no_content())
}
