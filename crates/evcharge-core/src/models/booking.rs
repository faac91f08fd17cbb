//! Booking records and their status lifecycle.

use serde::{Deserialize, Serialize};

/// Booking lifecycle: Pending → Approved → Charging → Finalized, or
/// Cancelled / Expired. Transitions are decided server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Pending,
    Approved,
    Charging,
    Finalized,
    Cancelled,
    Expired,
}

super::text_enum!(BookingStatus, "booking status" {
    Pending => "Pending",
    Approved => "Approved" | "confirmed",
    Charging => "Charging" | "inprogress",
    Finalized => "Finalized" | "completed",
    Cancelled => "Cancelled" | "canceled",
    Expired => "Expired",
});

impl BookingStatus {
    /// Whether no further transition can happen.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finalized | Self::Cancelled | Self::Expired)
    }
}

/// QR code issued for an approved booking.
///
/// Aliases: `code` | `qrCode`, `imageBase64` | `qrImageBase64` | `qrImage`,
/// `expiresAt` | `qrExpiresAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    #[serde(alias = "qrCode")]
    pub code: String,
    #[serde(default, alias = "qrImageBase64", alias = "qrImage")]
    pub image_base64: Option<String>,
    #[serde(default, alias = "qrExpiresAt")]
    pub expires_at: Option<String>,
}

/// A reservation of one slot for a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "BookingWire")]
pub struct BookingItem {
    pub booking_id: String,
    pub station_id: String,
    pub station_name: Option<String>,
    pub slot_id: String,
    pub slot_number: Option<i64>,
    pub owner_id: String,
    pub status: BookingStatus,
    pub start_time: String,
    pub end_time: String,
    pub qr: Option<QrPayload>,
    pub created_at: Option<String>,
}

/// Wire shape of a booking.
///
/// The QR payload arrives either nested under `qr` or flattened as
/// `qrCode` / `qrImageBase64` / `qrExpiresAt`; the nested form wins.
///
/// Aliases: `bookingId` | `id` | `_id`, `slotNumber` | `number`,
/// `ownerId` | `ownerNic` | `nic`, `startTime` | `reservationStart`,
/// `endTime` | `reservationEnd`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookingWire {
    #[serde(alias = "id", alias = "_id")]
    booking_id: String,
    station_id: String,
    #[serde(default)]
    station_name: Option<String>,
    slot_id: String,
    #[serde(default, alias = "number")]
    slot_number: Option<i64>,
    #[serde(alias = "ownerNic", alias = "nic")]
    owner_id: String,
    status: BookingStatus,
    #[serde(alias = "reservationStart")]
    start_time: String,
    #[serde(alias = "reservationEnd")]
    end_time: String,
    #[serde(default)]
    qr: Option<QrPayload>,
    #[serde(default)]
    qr_code: Option<String>,
    #[serde(default, alias = "qrImage")]
    qr_image_base64: Option<String>,
    #[serde(default)]
    qr_expires_at: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<BookingWire> for BookingItem {
    fn from(w: BookingWire) -> Self {
        let flat_qr = w.qr_code.map(|code| QrPayload {
            code,
            image_base64: w.qr_image_base64,
            expires_at: w.qr_expires_at,
        });
        Self {
            booking_id: w.booking_id,
            station_id: w.station_id,
            station_name: w.station_name,
            slot_id: w.slot_id,
            slot_number: w.slot_number,
            owner_id: w.owner_id,
            status: w.status,
            start_time: w.start_time,
            end_time: w.end_time,
            qr: w.qr.or(flat_qr),
            created_at: w.created_at,
        }
    }
}

/// Body of `POST /bookings`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub station_id: String,
    pub slot_id: String,
    pub owner_id: String,
    pub start_time: String,
    pub end_time: String,
}
