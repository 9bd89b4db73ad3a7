// Config file loading tests.

use fenceline::config::load_config;
use fenceline::fence::FenceShape;
use std::io::Write;

#[test]
fn test_load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r##"
        [server]
        bind_addr = "127.0.0.1:8181"

        [map]
        default_center_latitude = 40.7128
        default_center_longitude = -74.0060

        [[bootstrap_fences]]
        id = "home"
        name = "Home"
        type = "circle"
        radius = 250.0
        color = "#22c55e"
        active = true
        notifyOnEnter = true
        notifyOnExit = true
        appliesTo = ["child-1", "child-2"]

        [bootstrap_fences.center]
        latitude = 40.7128
        longitude = -74.0060
        "##
    )
    .unwrap();

    let config = load_config(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.server.bind_addr, "127.0.0.1:8181");
    assert_eq!(config.map.default_center_latitude, 40.7128);
    assert_eq!(config.map.default_zoom, 13); // Default

    assert_eq!(config.bootstrap_fences.len(), 1);
    let fence = &config.bootstrap_fences[0];
    assert_eq!(fence.applies_to, vec!["child-1", "child-2"]);
    match &fence.shape {
        FenceShape::Circle { radius, .. } => assert_eq!(*radius, Some(250.0)),
        FenceShape::Polygon { .. } => panic!("expected circle"),
    }
}

#[test]
fn test_load_missing_file_is_an_error() {
    assert!(load_config("/nonexistent/fenceline.toml").is_err());
}

#[test]
fn test_load_invalid_toml_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not [valid toml").unwrap();
    assert!(load_config(file.path().to_str().unwrap()).is_err());
}
