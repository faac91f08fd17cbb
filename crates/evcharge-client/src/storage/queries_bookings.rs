//! Booking cache queries, keyed by booking id.

use evcharge_core::db::unix_timestamp;
use evcharge_core::models::BookingItem;
use sqlx::SqliteConnection;

use super::db::{CacheDatabase, DatabaseError};
use super::models::BookingRow;

const UPSERT_BOOKING: &str = r"
    INSERT INTO bookings (booking_id, station_id, station_name, slot_id, slot_number, owner_id,
                          status, start_time, end_time, qr_code, qr_image_base64, qr_expires_at,
                          created_at, cached_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(booking_id) DO UPDATE SET
        station_id = excluded.station_id,
        station_name = excluded.station_name,
        slot_id = excluded.slot_id,
        slot_number = excluded.slot_number,
        owner_id = excluded.owner_id,
        status = excluded.status,
        start_time = excluded.start_time,
        end_time = excluded.end_time,
        qr_code = excluded.qr_code,
        qr_image_base64 = excluded.qr_image_base64,
        qr_expires_at = excluded.qr_expires_at,
        created_at = excluded.created_at,
        cached_at = excluded.cached_at
";

async fn upsert(
    conn: &mut SqliteConnection,
    booking: &BookingItem,
    now: i64,
) -> Result<(), DatabaseError> {
    let qr = booking.qr.as_ref();
    sqlx::query(UPSERT_BOOKING)
        .bind(&booking.booking_id)
        .bind(&booking.station_id)
        .bind(&booking.station_name)
        .bind(&booking.slot_id)
        .bind(booking.slot_number)
        .bind(&booking.owner_id)
        .bind(booking.status.as_str())
        .bind(&booking.start_time)
        .bind(&booking.end_time)
        .bind(qr.map(|q| q.code.as_str()))
        .bind(qr.and_then(|q| q.image_base64.as_deref()))
        .bind(qr.and_then(|q| q.expires_at.as_deref()))
        .bind(&booking.created_at)
        .bind(now)
        .execute(conn)
        .await?;
    Ok(())
}

fn into_items(rows: Vec<BookingRow>) -> Result<Vec<BookingItem>, DatabaseError> {
    rows.into_iter().map(BookingItem::try_from).collect()
}

impl CacheDatabase {
    /// Insert or replace one booking.
    pub async fn save_booking(&self, booking: &BookingItem) -> Result<(), DatabaseError> {
        let mut conn = self.pool().acquire().await?;
        upsert(&mut conn, booking, unix_timestamp()).await
    }

    /// Insert or replace a batch of bookings in one transaction.
    pub async fn save_bookings(&self, bookings: &[BookingItem]) -> Result<(), DatabaseError> {
        if bookings.is_empty() {
            return Ok(());
        }
        let now = unix_timestamp();
        let mut tx = self.pool().begin().await?;
        for booking in bookings {
            upsert(&mut tx, booking, now).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn booking(&self, booking_id: &str) -> Result<Option<BookingItem>, DatabaseError> {
        sqlx::query_as::<_, BookingRow>("SELECT * FROM bookings WHERE booking_id = ?")
            .bind(booking_id)
            .fetch_optional(self.pool())
            .await?
            .map(BookingItem::try_from)
            .transpose()
    }

    /// Bookings of one owner, soonest first.
    pub async fn bookings_for_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<BookingItem>, DatabaseError> {
        let rows = sqlx::query_as::<_, BookingRow>(
            "SELECT * FROM bookings WHERE owner_id = ? ORDER BY start_time ASC",
        )
        .bind(owner_id)
        .fetch_all(self.pool())
        .await?;
        into_items(rows)
    }

    /// Bookings at one station, soonest first.
    pub async fn bookings_for_station(
        &self,
        station_id: &str,
    ) -> Result<Vec<BookingItem>, DatabaseError> {
        let rows = sqlx::query_as::<_, BookingRow>(
            "SELECT * FROM bookings WHERE station_id = ? ORDER BY start_time ASC",
        )
        .bind(station_id)
        .fetch_all(self.pool())
        .await?;
        into_items(rows)
    }

    /// Returns `true` if a row was removed.
    pub async fn delete_booking(&self, booking_id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM bookings WHERE booking_id = ?")
            .bind(booking_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn clear_bookings(&self) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM bookings")
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
