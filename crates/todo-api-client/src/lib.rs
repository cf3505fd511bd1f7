use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use todo_client_core::auth::{AuthApiTransport, LoginForm, LoginResponse, SignupRequest};
use todo_client_core::error::ApiError;
use todo_client_core::flags::FeatureFlagTransport;
use todo_client_core::sync::TodoApiTransport;
use todo_client_core::todo::{TodoId, TodoPayload};
use uuid::Uuid;

const MIN_TIMEOUT_MS: u64 = 250;

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub base_url: String,
    /// Per-request deadline. `None` waits for the backend indefinitely.
    pub timeout_ms: Option<u64>,
}

impl HttpClientConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: None,
        }
    }
}

/// `reqwest` transport for every backend boundary the client core talks to.
/// One attempt per call; the core never retries.
#[derive(Debug, Clone)]
pub struct TodoHttpClient {
    base_url: String,
    timeout: Option<Duration>,
    http: reqwest::Client,
}

#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("todo_client_base_url_missing")]
    BaseUrlMissing,
    #[error("todo_client_invalid_path")]
    InvalidPath,
    #[error("todo_request_failed:{message}")]
    Request { message: String },
    #[error("todo_read_failed:{message}")]
    Read { message: String },
    #[error("todo_http_{status}:{body}")]
    Http { status: StatusCode, body: String },
    #[error("todo_json_decode_failed:{message}")]
    Decode { status: StatusCode, message: String },
}

impl From<HttpClientError> for ApiError {
    fn from(error: HttpClientError) -> Self {
        match &error {
            HttpClientError::Http { status, .. } | HttpClientError::Decode { status, .. } => {
                ApiError::http(status.as_u16(), error.to_string())
            }
            HttpClientError::BaseUrlMissing
            | HttpClientError::InvalidPath
            | HttpClientError::Request { .. }
            | HttpClientError::Read { .. } => ApiError::transport(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

enum Body<'a, T: Serialize + ?Sized> {
    Empty,
    Json(&'a T),
    Form(&'a T),
}

impl TodoHttpClient {
    pub fn new(config: HttpClientConfig) -> Result<Self, HttpClientError> {
        let base_url = normalize_base_url(&config.base_url)?;
        Ok(Self {
            base_url,
            timeout: config
                .timeout_ms
                .map(|timeout_ms| Duration::from_millis(timeout_ms.max(MIN_TIMEOUT_MS))),
            http: reqwest::Client::new(),
        })
    }

    pub fn from_base_url(base_url: &str) -> Result<Self, HttpClientError> {
        Self::new(HttpClientConfig::new(base_url))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn endpoint(&self, path: &str) -> Option<String> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.starts_with('/') {
            Some(format!("{}{}", self.base_url, trimmed))
        } else {
            Some(format!("{}/{}", self.base_url, trimmed))
        }
    }

    #[must_use]
    pub fn feature_flags_path() -> &'static str {
        "/feature-flags/"
    }

    #[must_use]
    pub fn signup_path() -> &'static str {
        "/auth/signup"
    }

    #[must_use]
    pub fn login_path() -> &'static str {
        "/auth/login"
    }

    #[must_use]
    pub fn todos_path() -> &'static str {
        "/todos/"
    }

    /// Opaque ids are percent-encoded so they stay a single path segment.
    #[must_use]
    pub fn todo_path(id: &TodoId) -> String {
        format!("/todos/{}/", urlencoding::encode(&id.to_string()))
    }

    pub async fn get_feature_flags(&self) -> Result<Value, HttpClientError> {
        let response = self
            .send::<()>(Method::Get, Self::feature_flags_path(), None, Body::Empty)
            .await?;
        decode_json_response(response).await
    }

    pub async fn post_signup(&self, request: &SignupRequest) -> Result<(), HttpClientError> {
        let response = self
            .send(Method::Post, Self::signup_path(), None, Body::Json(request))
            .await?;
        expect_success(response).await
    }

    pub async fn post_login(&self, form: &LoginForm) -> Result<LoginResponse, HttpClientError> {
        let response = self
            .send(Method::Post, Self::login_path(), None, Body::Form(form))
            .await?;
        decode_json_response(response).await
    }

    pub async fn get_todos(&self, token: &str) -> Result<Value, HttpClientError> {
        let response = self
            .send::<()>(Method::Get, Self::todos_path(), Some(token), Body::Empty)
            .await?;
        decode_json_response(response).await
    }

    pub async fn post_todo(&self, token: &str, title: &str) -> Result<(), HttpClientError> {
        let payload = TodoPayload { title };
        let response = self
            .send(Method::Post, Self::todos_path(), Some(token), Body::Json(&payload))
            .await?;
        expect_success(response).await
    }

    pub async fn put_todo(
        &self,
        token: &str,
        id: &TodoId,
        title: &str,
    ) -> Result<(), HttpClientError> {
        let payload = TodoPayload { title };
        let path = Self::todo_path(id);
        let response = self
            .send(Method::Put, &path, Some(token), Body::Json(&payload))
            .await?;
        expect_success(response).await
    }

    pub async fn delete_todo_by_id(&self, token: &str, id: &TodoId) -> Result<(), HttpClientError> {
        let path = Self::todo_path(id);
        let response = self
            .send::<()>(Method::Delete, &path, Some(token), Body::Empty)
            .await?;
        expect_success(response).await
    }

    async fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        bearer: Option<&str>,
        body: Body<'_, T>,
    ) -> Result<reqwest::Response, HttpClientError> {
        let url = self.endpoint(path).ok_or(HttpClientError::InvalidPath)?;
        let request_id = format!("req_{}", Uuid::new_v4().simple());
        tracing::debug!(method = ?method, %url, %request_id, "sending request");

        let mut request = self
            .http
            .request(method.as_reqwest(), url.as_str())
            .header("x-request-id", request_id);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        request = match body {
            Body::Empty => request,
            Body::Json(payload) => request.json(payload),
            Body::Form(payload) => request.form(payload),
        };

        request
            .send()
            .await
            .map_err(|error| HttpClientError::Request {
                message: error.to_string(),
            })
    }
}

#[async_trait(?Send)]
impl FeatureFlagTransport for TodoHttpClient {
    async fn fetch_flags(&self) -> Result<Value, ApiError> {
        self.get_feature_flags().await.map_err(ApiError::from)
    }
}

#[async_trait(?Send)]
impl AuthApiTransport for TodoHttpClient {
    async fn signup(&self, request: SignupRequest) -> Result<(), ApiError> {
        self.post_signup(&request).await.map_err(ApiError::from)
    }

    async fn login(&self, form: LoginForm) -> Result<LoginResponse, ApiError> {
        self.post_login(&form).await.map_err(ApiError::from)
    }
}

#[async_trait(?Send)]
impl TodoApiTransport for TodoHttpClient {
    async fn list_todos(&self, token: &str) -> Result<Value, ApiError> {
        self.get_todos(token).await.map_err(ApiError::from)
    }

    async fn create_todo(&self, token: &str, title: &str) -> Result<(), ApiError> {
        self.post_todo(token, title).await.map_err(ApiError::from)
    }

    async fn update_todo(&self, token: &str, id: &TodoId, title: &str) -> Result<(), ApiError> {
        self.put_todo(token, id, title).await.map_err(ApiError::from)
    }

    async fn delete_todo(&self, token: &str, id: &TodoId) -> Result<(), ApiError> {
        self.delete_todo_by_id(token, id)
            .await
            .map_err(ApiError::from)
    }
}

pub fn format_http_error(status: StatusCode, body: &[u8]) -> HttpClientError {
    let body = non_empty_string(String::from_utf8_lossy(body).to_string())
        .unwrap_or_else(|| "<empty>".to_string());
    HttpClientError::Http { status, body }
}

fn normalize_base_url(base_url: &str) -> Result<String, HttpClientError> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(HttpClientError::BaseUrlMissing);
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

async fn read_body(response: reqwest::Response) -> Result<(StatusCode, Vec<u8>), HttpClientError> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|error| HttpClientError::Read {
            message: error.to_string(),
        })?;
    if !status.is_success() {
        return Err(format_http_error(status, &bytes));
    }
    Ok((status, bytes.to_vec()))
}

async fn expect_success(response: reqwest::Response) -> Result<(), HttpClientError> {
    read_body(response).await.map(|_| ())
}

async fn decode_json_response<T>(response: reqwest::Response) -> Result<T, HttpClientError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let (status, bytes) = read_body(response).await?;
    serde_json::from_slice::<T>(&bytes).map_err(|error| HttpClientError::Decode {
        status,
        message: error.to_string(),
    })
}

fn non_empty_string(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
