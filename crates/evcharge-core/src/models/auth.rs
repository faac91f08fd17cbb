//! Authentication request and response bodies.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Owner self-registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub nic: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Successful `POST /auth/login` body.
///
/// Aliases: `token` | `accessToken` | `access_token`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginPayload {
    #[serde(alias = "accessToken", alias = "access_token")]
    pub token: String,
    #[serde(default)]
    pub message: Option<String>,
}
