//! Tests for the full validation pipeline.

use super::*;
use std::path::PathBuf;

#[test]
fn default_config_validates() {
    let config = PorticoConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_pump_interval_zero() {
    let mut config = PorticoConfig::default();
    config.engine.pump_interval_ms = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("engine.pump_interval_ms"));
}

#[test]
fn catches_pump_interval_too_large() {
    let mut config = PorticoConfig::default();
    config.engine.pump_interval_ms = 5000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("engine.pump_interval_ms = 5000 is out of range [1, 1000]"));
}

#[test]
fn catches_empty_resources_dir() {
    let mut config = PorticoConfig::default();
    config.engine.resources_dir = Some(PathBuf::new());
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("engine.resources_dir"));
}

#[test]
fn catches_zero_window_width() {
    let mut config = PorticoConfig::default();
    config.window.width = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.width"));
}

#[test]
fn catches_window_height_too_large() {
    let mut config = PorticoConfig::default();
    config.window.height = 20000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.height"));
}

#[test]
fn negative_window_position_is_allowed() {
    let mut config = PorticoConfig::default();
    config.window.x = -1920;
    config.window.y = -40;
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_empty_render_handler() {
    let mut config = PorticoConfig::default();
    config.client.render_handler = "   ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("client.render_handler must not be empty"));
}

#[test]
fn catches_reserved_render_handler() {
    let mut config = PorticoConfig::default();
    config.client.render_handler = "SetRenderHandler".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("reserved name"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = PorticoConfig::default();
    config.window.width = 0;
    config.engine.pump_interval_ms = 0;
    config.client.start_url = String::new();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.width"));
    assert!(err.contains("engine.pump_interval_ms"));
    assert!(err.contains("client.start_url"));
    assert_eq!(err.matches("; ").count(), 2);
}
