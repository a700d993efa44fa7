//! Request pipeline
//!
//! Mounts [`HttpRoute`]s onto an axum [`Router`] and runs every request
//! through the same stages:
//!
//! 1. decode path params and query pairs (typed by schema when declared)
//! 2. parse and validate the JSON body
//! 3. invoke the handler
//! 4. check the response body against the declared response schema
//! 5. serialise, or log the error once and map it to a response

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, RawQuery},
    response::{IntoResponse, Response},
    routing::on,
    Json, Router,
};
use serde_json::{Map, Value};

use super::{
    route::{HttpRequest, HttpResponse, HttpRoute},
    schema::untyped_pairs,
};
use crate::error::{ApiError, ApiResult, ValidationError, ValidationLocation};

/// A resource that contributes routes under a common base path
pub trait HttpController: Send + Sync {
    fn base_path(&self) -> &'static str;

    fn http_routes(&self) -> Vec<HttpRoute>;
}

/// Collapse repeated `/`, drop one trailing `/` and ensure a leading `/`
///
/// Idempotent. The bare root stays `/`.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 1);
    normalized.push('/');
    for ch in path.chars() {
        if ch == '/' && normalized.ends_with('/') {
            continue;
        }
        normalized.push(ch);
    }
    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// Mount `routes` at `/{root_path}/{base_path}/{route.path}`
pub fn register_routes(
    mut router: Router,
    root_path: &str,
    base_path: &str,
    routes: Vec<HttpRoute>,
) -> Router {
    for route in routes {
        let url = normalize_path(&format!("/{}/{}/{}", root_path, base_path, route.path));
        tracing::debug!(method = %route.method, url = %url, "Registering route");

        let filter = route.method.method_filter();
        let route = Arc::new(route);
        let handler = move |params: Option<Path<HashMap<String, String>>>,
                            RawQuery(query): RawQuery,
                            body: Bytes| {
            let route = Arc::clone(&route);
            async move {
                let params = params.map(|Path(params)| params).unwrap_or_default();
                into_http_response(run_pipeline(&route, params, query, body).await)
            }
        };

        router = router.route(&url, on(filter, handler));
    }
    router
}

/// Mount every controller under `root_path`
pub fn build_api_router(root_path: &str, controllers: &[Box<dyn HttpController>]) -> Router {
    controllers.iter().fold(Router::new(), |router, controller| {
        register_routes(
            router,
            root_path,
            controller.base_path(),
            controller.http_routes(),
        )
    })
}

/// Decode, validate, dispatch and check one request against `route`
#[tracing::instrument(skip_all, fields(method = %route.method, path = %route.path))]
pub async fn run_pipeline(
    route: &HttpRoute,
    params: HashMap<String, String>,
    raw_query: Option<String>,
    body: Bytes,
) -> ApiResult<HttpResponse> {
    let schema = route.request_schema.as_ref();

    let params = match schema.and_then(|s| s.params.as_ref()) {
        Some(params_schema) => params_schema.decode_params(&params)?,
        None => params
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect::<Map<String, Value>>(),
    };

    let pairs: Vec<(String, String)> = raw_query
        .as_deref()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();
    let query = match schema.and_then(|s| s.query.as_ref()) {
        Some(query_schema) => query_schema.decode_query(&pairs)?,
        None => untyped_pairs(&pairs),
    };

    let body = parse_body(&body)?;
    if let Some(body_schema) = schema.and_then(|s| s.body.as_ref()) {
        body_schema.validate(&body, ValidationLocation::Body)?;
    }

    let response = (route.handler)(HttpRequest {
        params,
        query,
        body,
    })
    .await?;

    if let (Some(response_schema), Some(body)) = (&route.response_schema, &response.body) {
        response_schema
            .validate(body, ValidationLocation::Response)
            .map_err(|e| {
                ApiError::internal(
                    anyhow::Error::new(e).context("Handler response does not match its schema"),
                )
            })?;
    }

    Ok(response)
}

fn parse_body(bytes: &Bytes) -> Result<Value, ValidationError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|e| {
        ValidationError::new(
            ValidationLocation::Body,
            "",
            format!("malformed JSON: {}", e),
        )
    })
}

/// Serialise a pipeline result; errors are logged here and nowhere else
pub fn into_http_response(result: ApiResult<HttpResponse>) -> Response {
    match result {
        Ok(HttpResponse {
            status,
            body: Some(body),
        }) => (status, Json(body)).into_response(),
        Ok(HttpResponse { status, body: None }) => status.into_response(),
        Err(error) => {
            error.log();
            error.into_response()
        },
    }
}
