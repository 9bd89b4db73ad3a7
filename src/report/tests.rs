use super::*;
use chrono::TimeZone;

fn make_report(user_id: &str) -> PositionReport {
    PositionReport {
        id: None, // Will be auto-generated
        user_id: user_id.to_string(),
        latitude: 52.52,
        longitude: 13.405,
        accuracy: 10.0,
        timestamp: Utc.with_ymd_and_hms(2026, 2, 11, 13, 0, 0).unwrap(),
        battery_level: Some(87.0),
        address: None,
    }
}

#[test]
fn test_valid_report_passes_validation() {
    let mut report = make_report("child-1");

    let result = report.validate_and_prepare();
    assert!(result.is_ok());
    assert!(report.id.is_some()); // UUIDv7 was generated
    assert_eq!(report.id.unwrap().len(), 36); // UUID format
}

#[test]
fn test_missing_user_id_fails() {
    let mut report = make_report("");

    let result = report.validate_and_prepare();
    assert!(result.is_err());
    assert_eq!(result.unwrap_err(), ValidationError::MissingUserId);
}

#[test]
fn test_existing_id_is_preserved() {
    let mut report = make_report("child-1");
    report.id = Some("client-supplied-id".to_string());

    report.validate_and_prepare().unwrap();
    assert_eq!(report.id.unwrap(), "client-supplied-id");
}

#[test]
fn test_empty_id_is_replaced() {
    let mut report = make_report("child-1");
    report.id = Some("".to_string());

    report.validate_and_prepare().unwrap();
    assert_eq!(report.id.unwrap().len(), 36);
}

#[test]
fn test_non_finite_coordinates_are_accepted() {
    // Bad coordinates degrade to NaN distances downstream, never to
    // an ingestion rejection
    let mut report = make_report("child-1");
    report.latitude = f64::NAN;
    report.longitude = f64::INFINITY;

    assert!(report.validate_and_prepare().is_ok());
}

#[test]
fn test_json_round_trip_uses_camel_case() {
    let mut report = make_report("child-1");
    report.validate_and_prepare().unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("userId").is_some());
    assert!(json.get("batteryLevel").is_some());
    assert!(json.get("user_id").is_none());

    let parsed: PositionReport = serde_json::from_value(json).unwrap();
    assert_eq!(parsed.user_id, "child-1");
    assert_eq!(parsed.battery_level, Some(87.0));
}

#[test]
fn test_optional_fields_omitted_when_absent() {
    let mut report = make_report("child-1");
    report.battery_level = None;
    report.address = None;
    report.validate_and_prepare().unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("batteryLevel").is_none());
    assert!(json.get("address").is_none());
}
