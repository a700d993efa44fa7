//! Declarative route descriptors

use std::{fmt, future::Future, sync::Arc};

use axum::{http::StatusCode, routing::MethodFilter};
use futures::future::{BoxFuture, FutureExt};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use super::schema::Schema;
use crate::error::{ApiError, ApiResult, ValidationError, ValidationLocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn method_filter(self) -> MethodFilter {
        match self {
            HttpMethod::Get => MethodFilter::GET,
            HttpMethod::Post => MethodFilter::POST,
            HttpMethod::Put => MethodFilter::PUT,
            HttpMethod::Patch => MethodFilter::PATCH,
            HttpMethod::Delete => MethodFilter::DELETE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded request handed to a route handler
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    pub params: Map<String, Value>,
    pub query: Map<String, Value>,
    pub body: Value,
}

impl HttpRequest {
    /// Deserialize one path parameter
    pub fn param<T: DeserializeOwned>(&self, name: &str) -> Result<T, ValidationError> {
        let value = self
            .params
            .get(name)
            .cloned()
            .ok_or_else(|| ValidationError::new(ValidationLocation::Params, name, "is required"))?;
        serde_json::from_value(value)
            .map_err(|e| ValidationError::new(ValidationLocation::Params, name, e.to_string()))
    }

    /// Deserialize the whole decoded query into `T`
    pub fn query_as<T: DeserializeOwned>(&self) -> Result<T, ValidationError> {
        serde_json::from_value(Value::Object(self.query.clone()))
            .map_err(|e| ValidationError::new(ValidationLocation::Query, "", e.to_string()))
    }

    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, ValidationError> {
        let body = match &self.body {
            Value::Null => Value::Object(Map::new()),
            body => body.clone(),
        };
        serde_json::from_value(body)
            .map_err(|e| ValidationError::new(ValidationLocation::Body, "", e.to_string()))
    }
}

/// What a handler produced; `None` body means an empty response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl HttpResponse {
    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> ApiResult<Self> {
        let body = serde_json::to_value(body).map_err(ApiError::internal)?;
        Ok(Self {
            status,
            body: Some(body),
        })
    }

    pub fn ok<T: Serialize>(body: &T) -> ApiResult<Self> {
        Self::json(StatusCode::OK, body)
    }

    pub fn created<T: Serialize>(body: &T) -> ApiResult<Self> {
        Self::json(StatusCode::CREATED, body)
    }

    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
        }
    }
}

pub type RouteHandler =
    Arc<dyn Fn(HttpRequest) -> BoxFuture<'static, ApiResult<HttpResponse>> + Send + Sync>;

/// Schemas applied to the incoming parts of a request
#[derive(Debug, Clone, Default)]
pub struct RequestSchema {
    pub body: Option<Schema>,
    pub query: Option<Schema>,
    pub params: Option<Schema>,
}

impl RequestSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, schema: Schema) -> Self {
        self.body = Some(schema);
        self
    }

    pub fn query(mut self, schema: Schema) -> Self {
        self.query = Some(schema);
        self
    }

    pub fn params(mut self, schema: Schema) -> Self {
        self.params = Some(schema);
        self
    }
}

/// One endpoint: method, path relative to its controller, handler and schemas
#[derive(Clone)]
pub struct HttpRoute {
    pub method: HttpMethod,
    pub path: String,
    pub handler: RouteHandler,
    pub request_schema: Option<RequestSchema>,
    pub response_schema: Option<Schema>,
}

impl HttpRoute {
    pub fn new<F, Fut>(method: HttpMethod, path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<HttpResponse>> + Send + 'static,
    {
        Self {
            method,
            path: path.into(),
            handler: Arc::new(move |request| handler(request).boxed()),
            request_schema: None,
            response_schema: None,
        }
    }

    pub fn get<F, Fut>(path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<HttpResponse>> + Send + 'static,
    {
        Self::new(HttpMethod::Get, path, handler)
    }

    pub fn post<F, Fut>(path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<HttpResponse>> + Send + 'static,
    {
        Self::new(HttpMethod::Post, path, handler)
    }

    pub fn put<F, Fut>(path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<HttpResponse>> + Send + 'static,
    {
        Self::new(HttpMethod::Put, path, handler)
    }

    pub fn patch<F, Fut>(path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<HttpResponse>> + Send + 'static,
    {
        Self::new(HttpMethod::Patch, path, handler)
    }

    pub fn delete<F, Fut>(path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<HttpResponse>> + Send + 'static,
    {
        Self::new(HttpMethod::Delete, path, handler)
    }

    pub fn with_request_schema(mut self, schema: RequestSchema) -> Self {
        self.request_schema = Some(schema);
        self
    }

    pub fn with_response_schema(mut self, schema: Schema) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

impl fmt::Debug for HttpRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRoute")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("request_schema", &self.request_schema)
            .field("response_schema", &self.response_schema)
            .finish_non_exhaustive()
    }
}
