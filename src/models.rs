//! Data models.

use serde::{Deserialize, Serialize};

/// A vessel detected in free text, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipMention {
    /// Nationality prefix, one of `USS`, `HMS`, `JS`, `FS`, `HMAS`
    pub name_prefix: String,
    /// Name without prefix, trimmed
    pub name: String,
    /// Hull designator, e.g. `CVN-78`
    pub hull: String,
    /// Paragraph text following the mention
    pub raw_status: String,
}

impl ShipMention {
    /// Prefix and name joined, e.g. `USS Cole`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name_prefix, self.name)
    }
}

/// Ship row produced by one scrape batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScrapedShipRecord {
    pub name: String,
    pub hull: String,
    #[sqlx(rename = "class")]
    #[serde(rename = "class")]
    pub ship_class: String,
    pub status: String,
    #[serde(rename = "locationReported")]
    pub location_reported: String,
}

/// Position as served to clients: `[longitude, latitude]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates(pub f64, pub f64);

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self(longitude, latitude)
    }

    pub fn longitude(&self) -> f64 {
        self.0
    }

    pub fn latitude(&self) -> f64 {
        self.1
    }
}

/// Full ship entry.
///
/// The bundled reference data uses this shape, and so does the merged output
/// served from `/api/fleet`. Field names follow the JSON contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipRecord {
    pub name: String,
    pub hull: String,
    #[serde(rename = "class")]
    pub ship_class: String,
    pub country: String,
    pub group: String,
    pub homeport: String,
    pub status: String,
    pub coordinates: Coordinates,
    pub image: String,
    pub description: String,
    pub region: String,
    #[serde(rename = "locationReported")]
    pub location_reported: String,
    #[serde(rename = "commissionedYear")]
    pub commissioned_year: u16,
    pub length_ft: u32,
    pub beam_ft: u32,
    pub draft_ft: u32,
    pub speed_kn: f64,
    pub complement: u32,
    pub tonnage: u32,
    pub history: String,
    pub armament: Vec<String>,
}

/// Merged records share the reference shape
pub type MergedShipRecord = ShipRecord;

/// Response body of the fleet endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
    pub ships: Vec<ShipRecord>,
}
