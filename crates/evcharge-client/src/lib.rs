//! `EVCharge` Client Library
//!
//! Everything the charging app does besides drawing screens:
//! - REST API client with a uniform result type
//! - Durable session store (token and remembered credentials)
//! - `SQLite` cache of the current user, operator and bookings
//! - Realtime notification hub with a multi-subscriber bus
//! - Auth and booking services tying the pieces together

pub mod api;
pub mod app;
pub mod error;
pub mod notifications;
pub mod services;
pub mod session;
pub mod storage;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test_support;

pub use api::{ApiClient, ApiResponse};
pub use app::EvChargeApp;
pub use error::ClientError;
pub use notifications::{NotificationBus, NotificationHub};
pub use session::SessionStore;
pub use storage::CacheDatabase;
