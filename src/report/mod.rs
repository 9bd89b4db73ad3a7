use crate::geo::Coordinate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod validation;
#[cfg(test)]
mod tests;

pub use validation::{validate_and_prepare, ValidationError};

/// PositionReport is an immutable position sample for one entity.
///
/// Reports are created once at ingestion and never mutated; the history
/// store owns them for the entity's lifetime. The capture timestamp is
/// caller-supplied and NOT trusted to be monotonic — ordering is always
/// re-derived by sorting, never assumed from arrival order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PositionReport {
    /// UUIDv7 identifier (time-ordered). Auto-generated if not provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Identifier of the tracked entity (device/person)
    #[serde(rename = "userId")]
    pub user_id: String,

    /// Latitude in degrees
    pub latitude: f64,

    /// Longitude in degrees
    pub longitude: f64,

    /// Reported accuracy radius in meters
    pub accuracy: f64,

    /// Capture time (RFC 3339). Caller-supplied; duplicates allowed.
    pub timestamp: DateTime<Utc>,

    /// Battery level at capture time, 0–100
    #[serde(rename = "batteryLevel")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<f64>,

    /// Reverse-geocoded address label, if the reporter resolved one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl PositionReport {
    /// The report's coordinate pair.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Validates and prepares a report for ingestion.
    ///
    /// Checks the entity identifier is present and generates a UUIDv7
    /// id if missing. Coordinates are deliberately NOT range-checked:
    /// out-of-range or non-finite values are accepted and evaluate to
    /// NaN distances downstream (treated as "outside" every fence).
    pub fn validate_and_prepare(&mut self) -> Result<(), ValidationError> {
        validation::validate_and_prepare(self)
    }
}
