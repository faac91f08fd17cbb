//! The client's cache database type.

pub use evcharge_core::db::DatabaseError;

evcharge_core::define_database!(CacheDatabase, "Cache migrations complete");
