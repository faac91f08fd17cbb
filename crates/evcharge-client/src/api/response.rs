//! Uniform result of one request/response cycle.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use evcharge_core::Error;

use crate::error::ClientError;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection and try again.";
pub const TIMEOUT_MESSAGE: &str = "The server took too long to respond. Please try again.";
pub const UNAUTHORIZED_MESSAGE: &str = "You are not authorized. Please log in again.";
pub const MALFORMED_RESPONSE_MESSAGE: &str = "Unexpected response from the server.";

/// Keys searched, in order, for a human-readable message in a JSON body.
const MESSAGE_KEYS: &[&str] = &["message", "error", "title"];

/// Outcome of an API call.
///
/// `data` is the raw response body, unchanged, for successful calls with a
/// non-empty body. `status` is `None` when no HTTP response was received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    pub data: Option<String>,
    pub status: Option<u16>,
}

impl ApiResponse {
    /// Normalize an HTTP status and body.
    pub fn from_http(status: u16, body: String) -> Self {
        let extracted = extract_message(&body);

        if (200..300).contains(&status) {
            return Self {
                success: true,
                message: extracted.unwrap_or_else(|| "OK".to_string()),
                data: (!body.is_empty()).then_some(body),
                status: Some(status),
            };
        }

        Self {
            success: false,
            message: extracted.unwrap_or_else(|| fallback_message(status)),
            data: None,
            status: Some(status),
        }
    }

    /// A failure that never reached the server, or whose reply was unusable.
    pub fn failure(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            status,
        }
    }

    pub fn network_failure(timed_out: bool) -> Self {
        let message = if timed_out {
            TIMEOUT_MESSAGE
        } else {
            NETWORK_ERROR_MESSAGE
        };
        Self::failure(message, None)
    }

    /// Decode `data` into a typed view model.
    ///
    /// This is the only place server payloads are validated.
    pub fn decode<T: DeserializeOwned>(&self) -> evcharge_core::Result<T> {
        let raw = self
            .data
            .as_deref()
            .ok_or_else(|| Error::Payload("response has no body".into()))?;
        serde_json::from_str(raw).map_err(|e| Error::Payload(e.to_string()))
    }

    /// Turn a failed response into [`ClientError::Rejected`], keeping
    /// successful ones.
    pub fn into_result(self) -> Result<Self, ClientError> {
        if self.success {
            Ok(self)
        } else {
            Err(ClientError::Rejected(self))
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401 | 403))
    }

    pub const fn is_network_failure(&self) -> bool {
        !self.success && self.status.is_none()
    }
}

fn extract_message(body: &str) -> Option<String> {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
        return None;
    };
    MESSAGE_KEYS.iter().find_map(|key| match map.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    })
}

fn fallback_message(status: u16) -> String {
    match status {
        401 | 403 => UNAUTHORIZED_MESSAGE.to_string(),
        _ => format!("Request failed (HTTP {status})"),
    }
}
