use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub const LOGIN_ERROR_MESSAGE: &str = "Login error";
pub const LOGIN_NO_TOKEN_MESSAGE: &str = "No token received";
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed";
pub const REGISTRATION_ERROR_MESSAGE: &str = "Registration error";
pub const REGISTRATION_SUCCESS_MESSAGE: &str = "Registration successful!";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthInputError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Username/password pair. Presence is the only check; values are sent as
/// typed, whitespace included.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, AuthInputError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() {
            return Err(AuthInputError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(AuthInputError::EmptyPassword);
        }
        Ok(Self { username, password })
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn signup_request(&self) -> SignupRequest {
        SignupRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }

    #[must_use]
    pub fn login_form(&self) -> LoginForm {
        LoginForm {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// JSON body for `POST /auth/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

/// Form-encoded body for `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

#[async_trait(?Send)]
pub trait AuthApiTransport {
    async fn signup(&self, request: SignupRequest) -> Result<(), ApiError>;
    async fn login(&self, form: LoginForm) -> Result<LoginResponse, ApiError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(String),
    Failed(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    Failed(&'static str),
}

/// Exchanges credentials for a bearer token. The token is handed back to the
/// caller; persisting it is the session controller's job.
pub async fn authenticate<T>(transport: &T, credentials: &Credentials) -> LoginOutcome
where
    T: AuthApiTransport + ?Sized,
{
    match transport.login(credentials.login_form()).await {
        Ok(LoginResponse {
            access_token: Some(token),
        }) if !token.is_empty() => LoginOutcome::Authenticated(token),
        Ok(_) => {
            tracing::warn!("login succeeded without an access token");
            LoginOutcome::Failed(LOGIN_NO_TOKEN_MESSAGE)
        }
        Err(error) if error.is_rejected_status() => {
            tracing::debug!(status = ?error.status, "login rejected");
            LoginOutcome::Failed(LOGIN_FAILED_MESSAGE)
        }
        Err(error) => {
            tracing::warn!(%error, "login request failed");
            LoginOutcome::Failed(LOGIN_ERROR_MESSAGE)
        }
    }
}

pub async fn register<T>(transport: &T, credentials: &Credentials) -> RegistrationOutcome
where
    T: AuthApiTransport + ?Sized,
{
    match transport.signup(credentials.signup_request()).await {
        Ok(()) => RegistrationOutcome::Registered,
        Err(error) if error.is_rejected_status() => {
            tracing::debug!(status = ?error.status, "registration rejected");
            RegistrationOutcome::Failed(REGISTRATION_FAILED_MESSAGE)
        }
        Err(error) => {
            tracing::warn!(%error, "registration request failed");
            RegistrationOutcome::Failed(REGISTRATION_ERROR_MESSAGE)
        }
    }
}
