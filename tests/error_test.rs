//! Error case tests
//!
//! Error handling for missing files, bad input and conversions

use samgis_prompt::config::Config;
use samgis_prompt::error::SamGisError;
use samgis_prompt::replay;
use std::path::Path;
use tempfile::tempdir;

/// Replaying a file that does not exist
#[test]
fn test_replay_nonexistent_file() {
    let result = replay::load_events(Path::new("/nonexistent/path/events.json"));
    assert!(matches!(result.unwrap_err(), SamGisError::FileNotFound(_)));
}

/// Events file that is not JSON
#[test]
fn test_replay_invalid_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("events.json");
    std::fs::write(&path, "not json").unwrap();

    let result = replay::load_events(&path);
    assert!(matches!(result.unwrap_err(), SamGisError::JsonParse(_)));
}

/// Marker event carrying bounds surfaces the shared library error
#[test]
fn test_replay_geometry_mismatch() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("events.json");
    std::fs::write(
        &path,
        r#"[{"action": "created", "id": 7, "shape": "IncludeMarkerPrompt",
             "geometry": {"ne": {"lat": 1.0, "lng": 1.0}, "sw": {"lat": 0.0, "lng": 0.0}}}]"#,
    )
    .unwrap();

    let events = replay::load_events(&path).unwrap();
    let err = replay::replay_events(&events).unwrap_err();
    assert!(matches!(
        err,
        SamGisError::Common(samgis_prompt_common::Error::ShapeGeometry(_))
    ));
    assert!(err.to_string().contains("id:7"));
}

/// Unknown widget shape name is rejected at parse time
#[test]
fn test_replay_unknown_shape() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("events.json");
    std::fs::write(
        &path,
        r#"[{"action": "created", "id": 1, "shape": "CirclePrompt", "geometry": {"lat": 0.0, "lng": 0.0}}]"#,
    )
    .unwrap();

    assert!(replay::load_events(&path).is_err());
}

/// Config file that is not JSON
#[test]
fn test_config_invalid_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ endpoint").unwrap();

    assert!(matches!(Config::load_from(&path).unwrap_err(), SamGisError::JsonParse(_)));
}

/// SamGisError Display
#[test]
fn test_error_display() {
    let errors = vec![
        SamGisError::Config("bad config".to_string()),
        SamGisError::FileNotFound("events.json".to_string()),
        SamGisError::InvalidArgument("zoom".to_string()),
        SamGisError::EmptyPrompt,
        SamGisError::Common(samgis_prompt_common::Error::MissingViewport),
    ];

    for err in errors {
        let msg = err.to_string();
        assert!(!msg.is_empty());
    }
}

/// io::Error converts via From
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: SamGisError = io_err.into();
    assert!(matches!(err, SamGisError::Io(_)));
}
