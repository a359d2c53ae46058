//! Remote authentication client.
//!
//! [`AuthApi`] is the capability the session flows consume; [`HttpAuthClient`]
//! is the reqwest-backed reference implementation. Every non-success response
//! funnels through [`ApiError::from_status`], so callers making their own
//! protected calls classify failures the same way via
//! [`HttpAuthClient::check_response`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::ApiError;

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Remote operations the auth flows require.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a session token.
    async fn login(&self, email: &str, password: &str) -> Result<String, ApiError>;
    /// Create an account and return its first session token.
    async fn register(&self, email: &str, password: &str) -> Result<String, ApiError>;
}

#[derive(Debug, Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Auth client for a token-issuing HTTP API.
/// Clone is cheap: `reqwest::Client` shares its connection pool internally.
#[derive(Debug, Clone)]
pub struct HttpAuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthClient {
    /// Create a client against `base_url` (e.g. `https://api.example.com`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Classify a response: success passes through, anything else becomes an
    /// [`ApiError`] built from the status and body.
    pub async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body))
    }

    async fn post_credentials(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "sending credential request");

        let response = self
            .client
            .post(&url)
            .json(&CredentialsBody { email, password })
            .send()
            .await
            .map_err(|err| ApiError::transport(url.clone(), err))?;

        let response = Self::check_response(response).await?;
        let status = response.status();
        let payload: TokenResponse = response.json().await.map_err(|err| ApiError::Api {
            status: status.as_u16(),
            message: format!("unexpected response body: {err}"),
        })?;
        Ok(payload.token)
    }
}

#[async_trait]
impl AuthApi for HttpAuthClient {
    async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        self.post_credentials("/auth/login", email, password).await
    }

    async fn register(&self, email: &str, password: &str) -> Result<String, ApiError> {
        self.post_credentials("/auth/register", email, password)
            .await
    }
}
