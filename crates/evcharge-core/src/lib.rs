//! `EVCharge` Core Library
//!
//! Shared functionality for `EVCharge` components:
//! - Domain models with a tolerant JSON schema
//! - Bearer token claim decoding
//! - Configuration resolution and hierarchy
//! - `SQLite` pool helpers for the local cache
//! - Common error types

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod token;
pub mod tracing_init;

pub use config::Config;
pub use error::{Error, Result};
pub use token::TokenClaims;
