//! HTTP plumbing shared by every endpoint.

use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use evcharge_core::config::ApiConfig;

use super::response::ApiResponse;
use crate::session::SessionStore;

/// Marks requests as coming from the mobile client.
pub const CLIENT_TYPE_HEADER: &str = "x-client-type";
const CLIENT_TYPE: &str = "Mobile";

/// Errors building the client. Requests themselves never fail with these.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// REST client for the charging backend.
///
/// Reads the bearer token from the [`SessionStore`] on every request, so a
/// login or logout takes effect immediately.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(config: &ApiConfig, session: SessionStore) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::Config("base_url is empty".into()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "base_url must be http(s): {base_url}"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(CLIENT_TYPE_HEADER),
            HeaderValue::from_static(CLIENT_TYPE),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        // Ensure a TLS crypto provider is installed (reqwest uses rustls-no-provider).
        // The `Err` case just means it was already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Build the absolute URL for an endpoint path.
    pub(crate) fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Percent-encode one path segment (ids are user-controlled).
    pub(crate) fn encode_segment(segment: &str) -> String {
        use std::fmt::Write;
        let mut out = String::with_capacity(segment.len());
        for b in segment.bytes() {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
                out.push(char::from(b));
            } else {
                let _ = write!(out, "%{b:02X}");
            }
        }
        out
    }

    /// Perform one call and normalize the outcome.
    #[instrument(skip(self, body))]
    pub async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> ApiResponse {
        let mut request = self.http.request(method, self.url(path));
        if let Some(token) = self.session.token().await {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, timeout = e.is_timeout(), "Request failed before a response");
                return ApiResponse::network_failure(e.is_timeout());
            }
        };

        let status = response.status().as_u16();
        let text = match response.text().await {
            Ok(t) => t,
            Err(e) => {
                warn!(status, error = %e, "Failed to read response body");
                return ApiResponse::network_failure(e.is_timeout());
            }
        };

        let result = ApiResponse::from_http(status, text);
        if result.success {
            debug!(status, "Request succeeded");
        } else {
            debug!(status, message = %result.message, "Request rejected");
        }
        result
    }

    pub async fn get(&self, path: &str) -> ApiResponse {
        self.send(Method::GET, path, None).await
    }

    /// PATCH without a body (state transitions).
    pub async fn patch(&self, path: &str) -> ApiResponse {
        self.send(Method::PATCH, path, None).await
    }

    pub async fn post_json<T: Serialize + Sync>(&self, path: &str, body: &T) -> ApiResponse {
        self.send_json(Method::POST, path, body).await
    }

    pub async fn patch_json<T: Serialize + Sync>(&self, path: &str, body: &T) -> ApiResponse {
        self.send_json(Method::PATCH, path, body).await
    }

    async fn send_json<T: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &T,
    ) -> ApiResponse {
        match serde_json::to_value(body) {
            Ok(value) => self.send(method, path, Some(&value)).await,
            Err(e) => {
                warn!(error = %e, "Failed to encode request body");
                ApiResponse::failure("Could not encode the request.", None)
            }
        }
    }
}
