//! Service-level error type.

use thiserror::Error;

use crate::api::{ApiError, ApiResponse};
use crate::notifications::HubError;
use evcharge_core::db::DatabaseError;

/// Errors surfaced by the service layer and the application context.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server (or the network) refused the request. The response carries
    /// the user-facing message.
    #[error("{}", .0.message)]
    Rejected(ApiResponse),

    #[error(transparent)]
    Core(#[from] evcharge_core::Error),

    #[error("Cache error: {0}")]
    Database(#[from] DatabaseError),

    #[error("API client error: {0}")]
    Api(#[from] ApiError),

    #[error(transparent)]
    Hub(#[from] HubError),

    #[error("Local storage error: {0}")]
    Session(#[from] std::io::Error),
}

impl From<ApiResponse> for ClientError {
    fn from(resp: ApiResponse) -> Self {
        Self::Rejected(resp)
    }
}
