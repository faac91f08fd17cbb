//! `SQLite` plumbing for the local cache.
//!
//! [`CacheLocation`] picks between an on-disk file and a private memory
//! database; [`connect`] turns it into a pool. Cache types are declared with
//! [`define_database!`], which adds constructors that also run the calling
//! crate's migrations.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;

/// Cache failures. Callers above the storage layer usually log these and
/// carry on without cached data.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Cannot prepare cache directory: {0}")]
    Io(String),

    #[error("Cannot open cache database: {0}")]
    Connection(String),

    #[error("Cache schema migration failed: {0}")]
    Migration(String),

    #[error("Cache query failed: {0}")]
    Query(String),

    /// A stored value no longer parses, e.g. an enum written by a newer
    /// client.
    #[error("Unreadable cached value in {column}: {reason}")]
    CorruptRow {
        column: &'static str,
        reason: String,
    },
}

impl From<sqlx::Error> for DatabaseError {
    fn from(e: sqlx::Error) -> Self {
        Self::Query(e.to_string())
    }
}

/// Where a cache database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLocation {
    File(PathBuf),
    /// Private to the pool; gone when the pool closes.
    Memory,
}

impl CacheLocation {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

/// Open a pool for `location`.
///
/// File databases get their parent directory created, WAL journaling and a
/// short busy timeout. A memory database is pinned to one connection that
/// never expires, since each `SQLite` memory connection is its own database.
pub async fn connect(location: &CacheLocation) -> Result<Pool<Sqlite>, DatabaseError> {
    let (options, pool_options) = match location {
        CacheLocation::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| DatabaseError::Io(e.to_string()))?;
            }
            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(Duration::from_secs(5));
            (options, SqlitePoolOptions::new().max_connections(4))
        }
        CacheLocation::Memory => {
            let options = SqliteConnectOptions::new().in_memory(true);
            let pool_options = SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
            (options, pool_options)
        }
    };

    let pool = pool_options
        .connect_with(options.foreign_keys(true))
        .await
        .map_err(|e| DatabaseError::Connection(e.to_string()))?;

    if let CacheLocation::File(path) = location {
        info!(path = %path.display(), "Cache database opened");
    }
    Ok(pool)
}

/// Seconds since the Unix epoch, used for `cached_at` stamps.
#[allow(clippy::cast_possible_wrap)]
pub fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Declare a cache database type backed by a `SQLite` pool.
///
/// ```ignore
/// evcharge_core::define_database!(CacheDatabase, "Cache migrations complete");
/// ```
///
/// The type gets `connect`, `open`, `open_in_memory`, `pool` and `close`.
/// Migrations come from the `migrations/` directory of the crate that
/// invokes the macro and run on every connect.
#[macro_export]
macro_rules! define_database {
    ($name:ident, $migration_msg:expr) => {
        #[derive(Clone)]
        pub struct $name {
            pool: ::sqlx::Pool<::sqlx::Sqlite>,
        }

        impl $name {
            pub async fn connect(
                location: &$crate::db::CacheLocation,
            ) -> ::std::result::Result<Self, $crate::db::DatabaseError> {
                let pool = $crate::db::connect(location).await?;
                ::sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .map_err(|e| $crate::db::DatabaseError::Migration(e.to_string()))?;
                ::tracing::debug!($migration_msg);
                Ok(Self { pool })
            }

            pub async fn open(
                path: &::std::path::Path,
            ) -> ::std::result::Result<Self, $crate::db::DatabaseError> {
                Self::connect(&$crate::db::CacheLocation::file(path)).await
            }

            pub async fn open_in_memory() -> ::std::result::Result<Self, $crate::db::DatabaseError>
            {
                Self::connect(&$crate::db::CacheLocation::Memory).await
            }

            pub const fn pool(&self) -> &::sqlx::Pool<::sqlx::Sqlite> {
                &self.pool
            }

            /// Wait for in-flight queries and close every connection.
            pub async fn close(&self) {
                self.pool.close().await;
            }
        }
    };
}
