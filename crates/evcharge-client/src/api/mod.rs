//! Backend REST API integration.
//!
//! Provides a reqwest-based client whose every call ends in an
//! [`ApiResponse`]; transport and HTTP failures never escape as errors.

mod client;
mod endpoints;
mod response;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;

pub use client::{ApiClient, ApiError, CLIENT_TYPE_HEADER};
pub use response::{
    ApiResponse, MALFORMED_RESPONSE_MESSAGE, NETWORK_ERROR_MESSAGE, TIMEOUT_MESSAGE,
    UNAUTHORIZED_MESSAGE,
};
