//! ViewerConfig loading from TOML and JSON (requires the `config` feature).

use std::io::Write;

use pagepan_viewport::{ConfigError, OverscrollEdges, PageTurnConfig, ViewerConfig};
use web_time::Duration;

#[test]
fn empty_toml_yields_defaults() {
    let config = ViewerConfig::from_toml_str("").unwrap();
    assert_eq!(config, ViewerConfig::default());
}

#[test]
fn partial_toml_overrides_only_named_fields() {
    let config = ViewerConfig::from_toml_str(
        r#"
        kinetic_tick_ms = 10

        [overscroll]
        left = true
        right = true

        [page_turn]
        swipe_threshold_ms = 300
        "#,
    )
    .unwrap();

    assert_eq!(config.kinetic_tick(), Duration::from_millis(10));
    assert_eq!(config.overscroll, OverscrollEdges::HORIZONTAL);
    assert_eq!(config.overscroll_sequence_limit, 10);
    assert_eq!(config.page_turn.swipe_threshold_ms, 300);
    assert_eq!(
        config.page_turn.change_page_fraction,
        PageTurnConfig::default().change_page_fraction
    );
    assert!(config.enabled);
}

#[test]
fn toml_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "enabled = false\noverscroll_sequence_limit = 4").unwrap();

    let config = ViewerConfig::from_toml_file(file.path()).unwrap();
    assert!(!config.enabled);
    assert!(!config.gesture_config().enabled);
    assert_eq!(config.overscroll_sequence_limit, 4);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    let err = ViewerConfig::from_toml_file(missing).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn malformed_input_is_parse_error() {
    let err = ViewerConfig::from_toml_str("kinetic_tick_ms = \"fast\"").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
    assert!(err.to_string().starts_with("TOML parse error"));

    let err = ViewerConfig::from_json_str("{ \"enabled\": 3 }").unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn out_of_range_values_fail_validation() {
    let err = ViewerConfig::from_json_str(
        r#"{ "kinetic_tick_ms": 0, "page_turn": { "change_page_fraction": 1.5 } }"#,
    )
    .unwrap_err();
    match err {
        ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn serialized_config_loads_back() {
    let config = ViewerConfig::default()
        .with_overscroll(OverscrollEdges {
            top: true,
            ..OverscrollEdges::NONE
        })
        .with_kinetic_tick(Duration::from_millis(12));
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(ViewerConfig::from_json_str(&json).unwrap(), config);

    let toml = toml::to_string(&config).unwrap();
    assert_eq!(ViewerConfig::from_toml_str(&toml).unwrap(), config);
}
