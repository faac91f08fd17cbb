//! Use-case layer combining the API client, session store and cache.
//!
//! The cache is advisory: a failed read or write is logged and the
//! operation carries on as if nothing were cached.

mod auth;
mod bookings;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;

pub use auth::AuthService;
pub use bookings::BookingService;

use tracing::warn;

use crate::storage::DatabaseError;

/// Log a cache failure and degrade it to `None`.
fn cache_ok<T>(result: Result<T, DatabaseError>, operation: &'static str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, operation, "Cache operation failed");
            None
        }
    }
}
