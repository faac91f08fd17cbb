//! Single-row caches: current user and operator.

use evcharge_core::db::unix_timestamp;
use evcharge_core::models::{Operator, User};
use tracing::debug;

use super::db::{CacheDatabase, DatabaseError};
use super::models::{OperatorRow, UserRow};

impl CacheDatabase {
    // =========================================================================
    // User queries
    // =========================================================================

    /// Replace the cached current user.
    ///
    /// Any previous row is deleted in the same transaction, so the table
    /// never holds more than one user.
    pub async fn save_user(&self, user: &User) -> Result<(), DatabaseError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM users").execute(&mut *tx).await?;
        sqlx::query(
            r"
            INSERT INTO users (user_id, full_name, email, role, station_id, station_name,
                               station_location, is_active, created_at, updated_at, cached_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&user.user_id)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(&user.station_id)
        .bind(&user.station_name)
        .bind(&user.station_location)
        .bind(i64::from(user.is_active))
        .bind(&user.created_at)
        .bind(&user.updated_at)
        .bind(unix_timestamp())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(user_id = %user.user_id, "Cached current user");
        Ok(())
    }

    /// The cached current user, if any.
    pub async fn logged_in_user(&self) -> Result<Option<User>, DatabaseError> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY cached_at DESC LIMIT 1")
            .fetch_optional(self.pool())
            .await?
            .map(User::try_from)
            .transpose()
    }

    pub async fn clear_user(&self) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM users").execute(self.pool()).await?;
        Ok(())
    }

    /// Number of cached user rows (0 or 1).
    pub async fn user_count(&self) -> Result<i64, DatabaseError> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool())
            .await?;
        Ok(n)
    }

    // =========================================================================
    // Operator queries
    // =========================================================================

    /// Replace the cached operator record.
    pub async fn save_operator(&self, operator: &Operator) -> Result<(), DatabaseError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM operators")
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            r"
            INSERT INTO operators (operator_id, full_name, email, station_id, station_name,
                                   station_location, cached_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&operator.operator_id)
        .bind(&operator.full_name)
        .bind(&operator.email)
        .bind(&operator.station_id)
        .bind(&operator.station_name)
        .bind(&operator.station_location)
        .bind(unix_timestamp())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn operator(&self) -> Result<Option<Operator>, DatabaseError> {
        let row = sqlx::query_as::<_, OperatorRow>(
            "SELECT * FROM operators ORDER BY cached_at DESC LIMIT 1",
        )
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(Operator::from))
    }

    pub async fn clear_operator(&self) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM operators")
            .execute(self.pool())
            .await?;
        Ok(())
    }

    // =========================================================================
    // Logout
    // =========================================================================

    /// Empty every cache table in one transaction.
    pub async fn clear_all(&self) -> Result<(), DatabaseError> {
        let mut tx = self.pool().begin().await?;
        for sql in [
            "DELETE FROM users",
            "DELETE FROM operators",
            "DELETE FROM bookings",
        ] {
            sqlx::query(sql).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        debug!("Cache cleared");
        Ok(())
    }
}
