//! `SQLite` cache for `EVCharge` client.
//!
//! Holds the logged-in user, the operator's station assignment, and a
//! denormalized copy of bookings keyed by id. Everything here is a copy of
//! server state; logout clears it all.

mod db;
mod models;
mod queries;
mod queries_bookings;


pub use db::{CacheDatabase, DatabaseError};
pub use models::{BookingRow, OperatorRow, UserRow};
