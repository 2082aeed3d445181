/// API client adapters for the Linkdeck backend
///
/// Leaf HTTP wrappers that translate typed requests into calls against the
/// remote backend and normalize error payloads into human-readable strings.
pub mod analytics;
pub mod auth;
pub mod links;
pub mod profile;
pub mod public;

pub use analytics::AnalyticsApi;
pub use auth::{AuthApi, AuthTransport};
pub use links::{LinksApi, LinksTransport};
pub use profile::{ProfileApi, ProfileTransport};
pub use public::PublicApi;

use crate::{
    config::ClientConfig,
    error::{ClientError, ClientResult},
    models::AuthTokens,
};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Envelope used by most backend responses
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Envelope for delete-style responses
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Shared HTTP client with base URL and bearer token handling
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<RwLock<Option<AuthTokens>>>,
}

impl ApiClient {
    /// Create a new API client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            tokens: Arc::new(RwLock::new(None)),
        })
    }

    /// Handle to the token slot, shared with the auth store
    pub fn tokens(&self) -> Arc<RwLock<Option<AuthTokens>>> {
        Arc::clone(&self.tokens)
    }

    /// Current access token, if any
    pub fn access_token(&self) -> Option<String> {
        self.tokens.read().as_ref().map(|t| t.access_token.clone())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: &str,
    ) -> ClientResult<T> {
        let request = self.http.get(self.endpoint(path));
        self.execute(request, fallback).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> ClientResult<T> {
        let request = self.http.post(self.endpoint(path)).json(body);
        self.execute(request, fallback).await
    }

    /// POST with an empty body (e.g. logout, click recording)
    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: &str,
    ) -> ClientResult<T> {
        let request = self.http.post(self.endpoint(path));
        self.execute(request, fallback).await
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> ClientResult<T> {
        let request = self.http.put(self.endpoint(path)).json(body);
        self.execute(request, fallback).await
    }

    pub async fn delete_json<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: &str,
    ) -> ClientResult<T> {
        let request = self.http.delete(self.endpoint(path));
        self.execute(request, fallback).await
    }

    /// POST a multipart form (image uploads)
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        fallback: &str,
    ) -> ClientResult<T> {
        let request = self.http.post(self.endpoint(path)).multipart(form);
        self.execute(request, fallback).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        fallback: &str,
    ) -> ClientResult<T> {
        let request = match self.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = parse_api_error(&body, fallback);
            warn!("API request failed ({}): {}", status, message);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

/// Error envelope returned by the backend on failure
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    detail: Option<ErrorDetail>,
}

/// Shapes the `detail` field is known to take
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    /// Plain message string
    Message(String),
    /// Field validation errors
    Fields(Vec<FieldError>),
    /// Single object carrying a `msg` field
    Single(FieldError),
}

#[derive(Debug, Deserialize)]
struct FieldError {
    msg: Option<String>,
}

/// Best-effort decode of the backend's error envelope into a display string
///
/// Falls back to the supplied message when the body is not an envelope or
/// the detail carries no usable text.
pub fn parse_api_error(body: &str, fallback: &str) -> String {
    let envelope: ErrorEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) => return fallback.to_string(),
    };

    match envelope.detail {
        Some(ErrorDetail::Message(message)) => message,
        Some(ErrorDetail::Fields(fields)) => {
            let messages: Vec<String> =
                fields.into_iter().filter_map(|f| f.msg).collect();
            if messages.is_empty() {
                fallback.to_string()
            } else {
                messages.join(", ")
            }
        }
        Some(ErrorDetail::Single(field)) => {
            field.msg.unwrap_or_else(|| fallback.to_string())
        }
        None => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_error_string_detail() {
        let body = r#"{"detail": "Username already taken"}"#;
        assert_eq!(
            parse_api_error(body, "fallback"),
            "Username already taken"
        );
    }

    #[test]
    fn test_parse_api_error_validation_array() {
        let body = r#"{"detail": [
            {"loc": ["body", "url"], "msg": "invalid URL"},
            {"loc": ["body", "title"], "msg": "field required"}
        ]}"#;
        assert_eq!(
            parse_api_error(body, "fallback"),
            "invalid URL, field required"
        );
    }

    #[test]
    fn test_parse_api_error_object_detail() {
        let body = r#"{"detail": {"msg": "Too many links"}}"#;
        assert_eq!(parse_api_error(body, "fallback"), "Too many links");
    }

    #[test]
    fn test_parse_api_error_falls_back() {
        assert_eq!(parse_api_error("", "Failed to fetch"), "Failed to fetch");
        assert_eq!(
            parse_api_error("<html>502</html>", "Failed to fetch"),
            "Failed to fetch"
        );
        assert_eq!(parse_api_error(r#"{"detail": 42}"#, "f"), "f");
        assert_eq!(parse_api_error(r#"{"detail": [{}]}"#, "f"), "f");
        assert_eq!(parse_api_error(r#"{"other": "x"}"#, "f"), "f");
    }
}
