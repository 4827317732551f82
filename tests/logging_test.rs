// ABOUTME: Tests for logging configuration and environment variable handling
// ABOUTME: Covers defaults, production toggles, and the quieter command-line profile
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use formiq::logging::{LogFormat, LoggingConfig};
use serial_test::serial;
use std::env;

const LOGGING_VARS: [&str; 8] = [
    "RUST_LOG",
    "LOG_FORMAT",
    "ENVIRONMENT",
    "SERVICE_NAME",
    "SERVICE_VERSION",
    "LOG_INCLUDE_LOCATION",
    "LOG_INCLUDE_THREAD",
    "LOG_INCLUDE_SPANS",
];

fn clear_logging_env() {
    for var in LOGGING_VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_default_logging_config() {
    let config = LoggingConfig::default();

    assert_eq!(config.level, "info");
    assert_eq!(config.format, LogFormat::Pretty);
    assert_eq!(config.environment, "development");
    assert_eq!(config.service_name, "formiq");
    assert!(!config.include_location);
    assert!(!config.include_spans);
}

#[test]
#[serial]
fn test_logging_config_from_env() {
    clear_logging_env();
    env::set_var("RUST_LOG", "debug");
    env::set_var("LOG_FORMAT", "json");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("SERVICE_NAME", "formiq-test");

    let config = LoggingConfig::from_env();
    clear_logging_env();

    assert_eq!(config.level, "debug");
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.service_name, "formiq-test");
    // Production turns on every detail toggle
    assert!(config.include_location);
    assert!(config.include_thread);
    assert!(config.include_spans);
}

#[test]
#[serial]
fn test_cli_profile_is_compact_and_quiet() {
    clear_logging_env();

    let quiet = LoggingConfig::for_cli(false);
    assert_eq!(quiet.format, LogFormat::Compact);
    assert_eq!(quiet.level, "warn");
    assert_eq!(quiet.service_name, "formiq-cli");

    let verbose = LoggingConfig::for_cli(true);
    assert_eq!(verbose.level, "debug");

    env::set_var("LOG_FORMAT", "json");
    env::set_var("RUST_LOG", "info");
    let configured = LoggingConfig::for_cli(false);
    clear_logging_env();

    assert_eq!(configured.format, LogFormat::Json);
    assert_eq!(configured.level, "info");
}

#[test]
#[serial]
fn test_env_filter_includes_engine_crates() {
    clear_logging_env();
    let config = LoggingConfig {
        level: "trace".into(),
        ..LoggingConfig::default()
    };

    let rendered = config.env_filter().to_string();
    assert!(rendered.contains("formiq_intelligence=trace"), "{rendered}");
    assert!(rendered.contains("formiq_cli=trace"), "{rendered}");
}
