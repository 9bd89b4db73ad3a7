use super::PositionReport;
use std::fmt;
use uuid::Uuid;

/// Validation errors for PositionReport
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingUserId,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingUserId => write!(f, "userId is required"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validates and prepares a PositionReport for ingestion.
///
/// Rules:
/// - userId must be non-empty
/// - id: auto-generated UUIDv7 if missing or empty
///
/// Coordinates, accuracy, and battery level are accepted as-is; the
/// evaluation engine treats NaN distances as non-containing, so bad
/// values degrade to "no notification" rather than an ingestion error.
pub fn validate_and_prepare(report: &mut PositionReport) -> Result<(), ValidationError> {
    if report.user_id.is_empty() {
        return Err(ValidationError::MissingUserId);
    }

    // Generate UUIDv7 if missing or empty
    if report.id.is_none() || report.id.as_ref().map_or(false, |id| id.is_empty()) {
        report.id = Some(Uuid::now_v7().to_string());
    }

    Ok(())
}
