//! Charging slots at a station.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotStatus {
    Available,
    Booked,
    Charging,
    Maintenance,
    OutOfOrder,
}

super::text_enum!(SlotStatus, "slot status" {
    Available => "Available",
    Booked => "Booked" | "reserved",
    Charging => "Charging" | "inuse",
    Maintenance => "Maintenance",
    OutOfOrder => "OutOfOrder" | "faulted",
});

/// An individual charging point.
///
/// Aliases: `slotId` | `id`, `number` | `slotNumber`,
/// `connectorType` | `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    #[serde(alias = "id")]
    pub slot_id: String,
    pub station_id: String,
    #[serde(alias = "slotNumber")]
    pub number: i64,
    #[serde(default, alias = "type")]
    pub connector_type: Option<String>,
    pub status: SlotStatus,
}

/// Body of `PATCH /slots/{id}/status`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SlotStatusUpdate {
    pub status: SlotStatus,
}
