//! Thin HTTP transport for the supporter API.
//!
//! The client knows nothing about the wire schema beyond header injection:
//! models serialize themselves, the envelope parses responses. Everything
//! here is "send request, get raw text back".

use serde_json::Value;
use std::time::Duration;

use crate::config::Config;
use crate::errors::ApiError;

/// Request method as the remote API distinguishes them: plain form-encoded
/// GET/POST, plus the JSON-bodied verbs used by the integration endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    JsonPost,
    JsonPut,
    JsonGet,
    JsonDelete,
}

impl Method {
    fn http(self) -> reqwest::Method {
        match self {
            Method::Get | Method::JsonGet => reqwest::Method::GET,
            Method::Post | Method::JsonPost => reqwest::Method::POST,
            Method::JsonPut => reqwest::Method::PUT,
            Method::JsonDelete => reqwest::Method::DELETE,
        }
    }

    fn is_json(self) -> bool {
        matches!(
            self,
            Method::JsonPost | Method::JsonPut | Method::JsonGet | Method::JsonDelete
        )
    }
}

/// Client for the supporter API endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to create API client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Sends a request to an endpoint path and returns the raw response
    /// body. JSON methods serialize `body` as JSON; plain POST form-encodes
    /// it. The `authToken` header is always injected.
    pub async fn send(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<String, ApiError> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        tracing::debug!("{:?} {}", method.http(), url);

        let mut request = self
            .client
            .request(method.http(), &url)
            .header("authToken", &self.token);
        if let Some(body) = body {
            request = if method.is_json() {
                request.json(body)
            } else {
                request.form(body)
            };
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("API returned {}: {}", status, error_text);
            return Err(ApiError::Transport(format!(
                "API returned {}: {}",
                status, error_text
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read API response: {}", e)))?;
        Ok(text)
    }
}
