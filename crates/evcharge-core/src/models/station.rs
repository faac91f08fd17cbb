//! Charging stations.

use serde::{Deserialize, Serialize};

/// Aliases: `latitude` | `lat`, `longitude` | `lng` | `lon`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationLocation {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: f64,
}

/// A physical charging location.
///
/// Aliases: `stationId` | `id`, `chargerType` | `type`,
/// `distanceKm` | `distance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    #[serde(alias = "id")]
    pub station_id: String,
    pub name: String,
    pub location: StationLocation,
    #[serde(default, alias = "type")]
    pub charger_type: Option<String>,
    #[serde(default)]
    pub total_slots: Option<u32>,
    #[serde(default)]
    pub available_slots: Option<u32>,
    #[serde(default, alias = "distance")]
    pub distance_km: Option<f64>,
}
