//! Row types for the cache tables and their conversion to domain models.

use serde::{Deserialize, Serialize};

use evcharge_core::models::{BookingItem, Operator, QrPayload, User};

use super::db::DatabaseError;

fn corrupt(column: &'static str) -> impl Fn(evcharge_core::Error) -> DatabaseError {
    move |e| DatabaseError::CorruptRow {
        column,
        reason: e.to_string(),
    }
}

/// Cached current-user row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: String,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub station_id: Option<String>,
    pub station_name: Option<String>,
    pub station_location: Option<String>,
    pub is_active: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub cached_at: i64,
}

impl TryFrom<UserRow> for User {
    type Error = DatabaseError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            role: row
                .role
                .parse()
                .map_err(corrupt("users.role"))?,
            user_id: row.user_id,
            full_name: row.full_name,
            email: row.email,
            station_id: row.station_id,
            station_name: row.station_name,
            station_location: row.station_location,
            is_active: row.is_active != 0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Cached operator row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OperatorRow {
    pub operator_id: String,
    pub full_name: String,
    pub email: String,
    pub station_id: String,
    pub station_name: Option<String>,
    pub station_location: Option<String>,
    pub cached_at: i64,
}

impl From<OperatorRow> for Operator {
    fn from(row: OperatorRow) -> Self {
        Self {
            operator_id: row.operator_id,
            full_name: row.full_name,
            email: row.email,
            station_id: row.station_id,
            station_name: row.station_name,
            station_location: row.station_location,
        }
    }
}

/// Cached booking row. The QR payload is flattened into three columns.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: String,
    pub station_id: String,
    pub station_name: Option<String>,
    pub slot_id: String,
    pub slot_number: Option<i64>,
    pub owner_id: String,
    pub status: String,
    pub start_time: String,
    pub end_time: String,
    pub qr_code: Option<String>,
    pub qr_image_base64: Option<String>,
    pub qr_expires_at: Option<String>,
    pub created_at: Option<String>,
    pub cached_at: i64,
}

impl TryFrom<BookingRow> for BookingItem {
    type Error = DatabaseError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(corrupt("bookings.status"))?;
        let qr = row.qr_code.map(|code| QrPayload {
            code,
            image_base64: row.qr_image_base64,
            expires_at: row.qr_expires_at,
        });
        Ok(Self {
            booking_id: row.booking_id,
            station_id: row.station_id,
            station_name: row.station_name,
            slot_id: row.slot_id,
            slot_number: row.slot_number,
            owner_id: row.owner_id,
            status,
            start_time: row.start_time,
            end_time: row.end_time,
            qr,
            created_at: row.created_at,
        })
    }
}
