//! Integration tests for configuration validation

#![allow(clippy::expect_used, clippy::unwrap_used)]

use tracing::Level;
use wire_router::config::{
    LoggingConfig, RouterConfig, WireRouterConfig, MAX_CONFIGURABLE_SIZE, MAX_MESSAGE_SIZE,
};
use wire_router::error::{DispatchError, ProtocolError};
use wire_router::protocol::{querier, QueryContext, QueryRouter};

#[test]
fn test_default_config_validates() {
    let config = WireRouterConfig::default();
    let errors = config.validate();
    assert!(
        errors.is_empty(),
        "Default config should be valid, but got errors: {:?}",
        errors
    );
    assert_eq!(config.router.max_request_size, MAX_MESSAGE_SIZE);
    assert_eq!(config.router.max_response_size, MAX_MESSAGE_SIZE);
}

#[test]
fn test_zero_request_size() {
    let mut config = WireRouterConfig::default();
    config.router.max_request_size = 0;

    let errors = config.validate();
    assert!(!errors.is_empty());
    assert!(errors
        .iter()
        .any(|e| e.contains("max_request_size must be greater than 0")));
}

#[test]
fn test_excessive_response_size() {
    let mut config = WireRouterConfig::default();
    config.router.max_response_size = MAX_CONFIGURABLE_SIZE + 1;

    let errors = config.validate();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("max_response_size too large"));
}

#[test]
fn test_ceiling_is_inclusive() {
    let config = RouterConfig {
        max_request_size: MAX_CONFIGURABLE_SIZE,
        max_response_size: 1,
    };
    assert!(config.validate().is_empty());
}

#[test]
fn test_empty_app_name() {
    let mut config = WireRouterConfig::default();
    config.logging.app_name = String::new();

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("cannot be empty")));
}

#[test]
fn test_long_app_name() {
    let mut config = WireRouterConfig::default();
    config.logging.app_name = "a".repeat(65);

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Application name too long")));
}

#[test]
fn test_file_logging_without_path() {
    let mut config = WireRouterConfig::default();
    config.logging.log_to_file = true;
    config.logging.log_file_path = None;

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("log_file_path must be specified")));
}

#[test]
fn test_file_logging_missing_directory() {
    let mut config = WireRouterConfig::default();
    config.logging.log_to_file = true;
    config.logging.log_file_path = Some("/nonexistent/wire-router/log.txt".into());

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Log file directory does not exist")));
}

#[test]
fn test_no_logging_output() {
    let config = LoggingConfig {
        log_to_console: false,
        log_to_file: false,
        ..LoggingConfig::default()
    };

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("At least one logging output")));
}

#[test]
fn test_multiple_errors_reported() {
    let mut config = WireRouterConfig::default();
    config.router.max_request_size = 0;
    config.router.max_response_size = 0;
    config.logging.app_name = String::new();

    assert_eq!(config.validate().len(), 3);
}

#[test]
fn test_validate_strict() {
    assert!(WireRouterConfig::default().validate_strict().is_ok());

    let config = WireRouterConfig::default_with_overrides(|c| c.router.max_request_size = 0);
    match config.validate_strict() {
        Err(ProtocolError::Config(msg)) => {
            assert!(msg.contains("Configuration validation failed"));
            assert!(msg.contains("max_request_size"));
        }
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn test_from_toml_partial_sections() {
    let config = WireRouterConfig::from_toml(
        r#"
        [router]
        max_request_size = 1024
        max_response_size = 2048
        "#,
    )
    .expect("parse");

    assert_eq!(config.router.max_request_size, 1024);
    assert_eq!(config.router.max_response_size, 2048);
    assert_eq!(config.logging.app_name, "wire-router");
    assert_eq!(config.logging.log_level, Level::INFO);
}

#[test]
fn test_from_toml_log_level() {
    let config = WireRouterConfig::from_toml(
        r#"
        [logging]
        app_name = "node"
        log_level = "debug"
        log_to_console = true
        log_to_file = false
        json_format = true
        "#,
    )
    .expect("parse");

    assert_eq!(config.logging.log_level, Level::DEBUG);
    assert!(config.logging.json_format);
}

#[test]
fn test_from_toml_rejects_bad_level() {
    let result = WireRouterConfig::from_toml(
        r#"
        [logging]
        app_name = "node"
        log_level = "loud"
        log_to_console = true
        log_to_file = false
        json_format = false
        "#,
    );
    assert!(matches!(result, Err(ProtocolError::Config(_))));
}

#[test]
fn test_example_config_parses_back() {
    let example = WireRouterConfig::example_config();
    assert!(example.contains("[router]"));
    assert!(example.contains("log_level = \"info\""));

    let parsed = WireRouterConfig::from_toml(&example).expect("parse example");
    assert!(parsed.validate().is_empty());
}

#[test]
fn test_save_and_load_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("wire-router.toml");

    let config = WireRouterConfig::default_with_overrides(|c| {
        c.router.max_response_size = 65_536;
        c.logging.log_level = Level::WARN;
    });
    config.save_to_file(&path).expect("save");

    let loaded = WireRouterConfig::from_file(&path).expect("load");
    assert_eq!(loaded.router.max_response_size, 65_536);
    assert_eq!(loaded.logging.log_level, Level::WARN);
}

#[test]
fn test_from_file_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = WireRouterConfig::from_file(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ProtocolError::Config(msg)) if msg.contains("Failed to open")));
}

#[test]
fn test_router_applies_configured_limits() {
    let config = WireRouterConfig::default_with_overrides(|c| c.router.max_request_size = 2);
    let mut router = QueryRouter::with_config(config.router.clone());
    router
        .add_route("echo", querier(|_ctx, _path, data| Ok(data.to_vec())))
        .unwrap();

    let err = router
        .dispatch(&QueryContext::default(), "echo", &["x"], b"abc")
        .unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::Dispatch(DispatchError::RequestTooLarge { size: 3, limit: 2 })
    ));
}

#[test]
fn test_from_env_overrides() {
    std::env::set_var("WIRE_ROUTER_MAX_REQUEST_SIZE", "4096");
    std::env::set_var("WIRE_ROUTER_MAX_RESPONSE_SIZE", "8192");
    std::env::set_var("WIRE_ROUTER_LOG_LEVEL", "trace");
    let config = WireRouterConfig::from_env().expect("env config");
    assert_eq!(config.router.max_request_size, 4096);
    assert_eq!(config.router.max_response_size, 8192);
    assert_eq!(config.logging.log_level, Level::TRACE);

    std::env::set_var("WIRE_ROUTER_MAX_REQUEST_SIZE", "lots");
    let result = WireRouterConfig::from_env();
    assert!(
        matches!(result, Err(ProtocolError::Config(msg)) if msg.contains("WIRE_ROUTER_MAX_REQUEST_SIZE"))
    );

    std::env::remove_var("WIRE_ROUTER_MAX_REQUEST_SIZE");
    std::env::remove_var("WIRE_ROUTER_MAX_RESPONSE_SIZE");
    std::env::remove_var("WIRE_ROUTER_LOG_LEVEL");
}
