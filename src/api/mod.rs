//! Typed access to the content API.
//!
//! [`ApiTransport`] is the seam between the engine and the network: the
//! [`HttpTransport`] talks to a real server, the [`MockTransport`] replays
//! scripted responses. [`ResourceClient`] layers typed CRUD and response
//! shape normalization on top of either.

mod error;
mod http;
mod mock;
pub mod normalize;

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::entity::{Resource, UpdateMethod};
use crate::error::{FolioError, Result};

pub use error::ApiError;
pub use http::HttpTransport;
pub use mock::MockTransport;

pub const DEFAULT_API_PREFIX: &str = "/api";

/// Characters escaped in a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// A request against the API, relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A decoded response. `body` is `None` when the server sent nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Option<Value>) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(StatusCode::OK, Some(body))
    }

    pub fn created(body: Value) -> Self {
        Self::new(StatusCode::CREATED, Some(body))
    }

    pub fn no_content() -> Self {
        Self::new(StatusCode::NO_CONTENT, None)
    }

    /// An error response carrying `{ "error": message }`.
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self::new(status, Some(serde_json::json!({ "error": message })))
    }

    /// The body of a 2xx response, or the API error it describes.
    pub fn into_result(self) -> Result<Option<Value>> {
        if self.status.is_success() {
            Ok(self.body)
        } else {
            Err(ApiError::from_response(self.status, self.body.as_ref()).into())
        }
    }
}

/// Sends requests to the content API.
pub trait ApiTransport: Send + Sync {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse>> + Send;
}

/// Typed CRUD over one resource endpoint.
pub struct ResourceClient<R, T> {
    transport: Arc<T>,
    prefix: String,
    _resource: PhantomData<fn() -> R>,
}

impl<R, T> Clone for ResourceClient<R, T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            prefix: self.prefix.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource, T: ApiTransport> ResourceClient<R, T> {
    pub fn new(transport: Arc<T>, prefix: &str) -> Self {
        Self {
            transport,
            prefix: prefix.trim_end_matches('/').to_string(),
            _resource: PhantomData,
        }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn collection_path(&self) -> String {
        format!("{}/{}", self.prefix, R::PATH)
    }

    /// Path of one record. The id is escaped so it stays a single segment.
    pub fn item_path(&self, id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.prefix,
            R::PATH,
            utf8_percent_encode(id, PATH_SEGMENT)
        )
    }

    /// Fetch the full collection.
    pub async fn list(&self) -> Result<Vec<R>> {
        let response = self
            .transport
            .send(ApiRequest::get(self.collection_path()))
            .await?;
        let body = response
            .into_result()?
            .ok_or_else(|| FolioError::ShapeMismatch {
                resource: R::PATH.to_string(),
                detail: "empty response body".to_string(),
            })?;

        normalize::collection(R::PATH, R::COLLECTION_KEY, body)?
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value(value).map_err(|e| FolioError::ShapeMismatch {
                    resource: R::PATH.to_string(),
                    detail: format!("item {index}: {e}"),
                })
            })
            .collect()
    }

    /// Create a record. Returns the created record when the response carries
    /// one.
    pub async fn create(&self, draft: &R::Draft) -> Result<Option<R>> {
        let request =
            ApiRequest::new(Method::POST, self.collection_path()).with_body(serde_json::to_value(draft)?);
        let body = self.transport.send(request).await?.into_result()?;
        Ok(self.decode_entity(body))
    }

    /// Apply a partial update. Returns the updated record when the response
    /// carries one.
    pub async fn update(&self, id: &str, patch: Value) -> Result<Option<R>> {
        let method = match R::UPDATE_METHOD {
            UpdateMethod::Put => Method::PUT,
            UpdateMethod::Patch => Method::PATCH,
        };
        let request = ApiRequest::new(method, self.item_path(id)).with_body(patch);
        let body = self.transport.send(request).await?.into_result()?;
        Ok(self.decode_entity(body))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.transport
            .send(ApiRequest::delete(self.item_path(id)))
            .await?
            .into_result()?;
        Ok(())
    }

    fn decode_entity(&self, body: Option<Value>) -> Option<R> {
        let value = normalize::entity(R::ENTITY_KEY, body?)?;
        match serde_json::from_value(value) {
            Ok(entity) => Some(entity),
            Err(e) => {
                debug!(resource = R::PATH, error = %e, "response record did not decode");
                None
            }
        }
    }
}
