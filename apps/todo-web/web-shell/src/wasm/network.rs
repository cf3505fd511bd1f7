use super::*;

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use todo_client_core::auth::{AuthApiTransport, LoginForm, LoginResponse, SignupRequest};
use todo_client_core::error::ApiError;
use todo_client_core::flags::FeatureFlagTransport;
use todo_client_core::sync::TodoApiTransport;
use todo_client_core::todo::{TodoId, TodoPayload};

/// `fetch`-backed transport. Requests are issued once; the browser owns
/// timeouts.
pub(super) struct BrowserTransport {
    base_url: String,
}

impl BrowserTransport {
    pub(super) fn new(base_url: String) -> Self {
        Self { base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Opaque ids are percent-encoded so they stay a single path segment.
    fn todo_url(&self, id: &TodoId) -> String {
        let segment = String::from(js_sys::encode_uri_component(&id.to_string()));
        self.url(&format!("/todos/{segment}/"))
    }
}

fn authorized(builder: RequestBuilder, token: &str) -> RequestBuilder {
    builder.header("authorization", &format!("Bearer {token}"))
}

fn map_network_error(error: gloo_net::Error) -> ApiError {
    ApiError::transport(format!("network error: {error}"))
}

fn encode_form_field(value: &str) -> String {
    String::from(js_sys::encode_uri_component(value))
}

async fn send_request(request: Request) -> Result<(u16, String), ApiError> {
    let response = request.send().await.map_err(map_network_error)?;
    read_response(response).await
}

async fn read_response(response: Response) -> Result<(u16, String), ApiError> {
    let status = response.status();
    let raw = response
        .text()
        .await
        .map_err(|error| ApiError::http(status, format!("response read failed: {error}")))?;
    if !(200..=299).contains(&status) {
        let message = if raw.trim().is_empty() {
            format!("request failed with status {status}")
        } else {
            raw
        };
        return Err(ApiError::http(status, message));
    }
    Ok((status, raw))
}

fn decode_json<T: DeserializeOwned>(status: u16, raw: &str) -> Result<T, ApiError> {
    serde_json::from_str(raw)
        .map_err(|error| ApiError::http(status, format!("invalid response body: {error}")))
}

#[async_trait(?Send)]
impl FeatureFlagTransport for BrowserTransport {
    async fn fetch_flags(&self) -> Result<Value, ApiError> {
        let response = Request::get(&self.url("/feature-flags/"))
            .send()
            .await
            .map_err(map_network_error)?;
        let (status, raw) = read_response(response).await?;
        decode_json(status, &raw)
    }
}

#[async_trait(?Send)]
impl AuthApiTransport for BrowserTransport {
    async fn signup(&self, request: SignupRequest) -> Result<(), ApiError> {
        let request = Request::post(&self.url("/auth/signup"))
            .json(&request)
            .map_err(|error| ApiError::transport(format!("failed to build request: {error}")))?;
        send_request(request).await.map(|_| ())
    }

    async fn login(&self, form: LoginForm) -> Result<LoginResponse, ApiError> {
        let body = format!(
            "username={}&password={}",
            encode_form_field(&form.username),
            encode_form_field(&form.password)
        );
        let request = Request::post(&self.url("/auth/login"))
            .header("content-type", "application/x-www-form-urlencoded")
            .body(body)
            .map_err(|error| ApiError::transport(format!("failed to build request: {error}")))?;
        let (status, raw) = send_request(request).await?;
        decode_json(status, &raw)
    }
}

#[async_trait(?Send)]
impl TodoApiTransport for BrowserTransport {
    async fn list_todos(&self, token: &str) -> Result<Value, ApiError> {
        let response = authorized(Request::get(&self.url("/todos/")), token)
            .send()
            .await
            .map_err(map_network_error)?;
        let (status, raw) = read_response(response).await?;
        decode_json(status, &raw)
    }

    async fn create_todo(&self, token: &str, title: &str) -> Result<(), ApiError> {
        let request = authorized(Request::post(&self.url("/todos/")), token)
            .json(&TodoPayload { title })
            .map_err(|error| ApiError::transport(format!("failed to build request: {error}")))?;
        send_request(request).await.map(|_| ())
    }

    async fn update_todo(&self, token: &str, id: &TodoId, title: &str) -> Result<(), ApiError> {
        let request = authorized(Request::put(&self.todo_url(id)), token)
            .json(&TodoPayload { title })
            .map_err(|error| ApiError::transport(format!("failed to build request: {error}")))?;
        send_request(request).await.map(|_| ())
    }

    async fn delete_todo(&self, token: &str, id: &TodoId) -> Result<(), ApiError> {
        let response = authorized(Request::delete(&self.todo_url(id)), token)
            .send()
            .await
            .map_err(map_network_error)?;
        read_response(response).await.map(|_| ())
    }
}
