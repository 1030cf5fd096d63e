// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel};
use crate::config::GlobalConfig;
use std::path::{Path, PathBuf};

#[test]
fn test_log_level_range() {
    assert_eq!(LogLevel::new(6).ok(), Some(LogLevel::OUTPUT));
    assert_eq!(LogLevel::from_u8(7), None);
    assert!(LogLevel::try_from(3).is_ok());

    let err = LogLevel::new(7).expect_err("7 is out of range");
    insta::assert_snapshot!(err.to_string(), @"invalid value for 'log_level' in section '[global]': log level must be 0-6, got 7");
}

#[test]
fn test_log_level_ordering() {
    assert!(LogLevel::SILENT < LogLevel::ERROR);
    assert!(LogLevel::TRACE < LogLevel::OUTPUT);
    assert_eq!(LogLevel::default(), LogLevel::INFO);
}

#[test]
fn test_filter_strings() {
    let filters: Vec<_> = (0..=6)
        .filter_map(LogLevel::from_u8)
        .map(LogLevel::to_filter_string)
        .collect();
    insta::assert_debug_snapshot!(filters, @r#"
    [
        "off",
        "error",
        "warn",
        "info",
        "debug",
        "trace,harbor::output=off",
        "trace",
    ]
    "#);
}

#[test]
fn test_log_level_serde() {
    let ok: LogLevel = serde_json::from_str("4").expect("valid level");
    assert_eq!(ok, LogLevel::DEBUG);
    assert!(serde_json::from_str::<LogLevel>("9").is_err());
    assert_eq!(serde_json::to_string(&LogLevel::WARN).unwrap(), "2");
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert!(config.log_file().is_none());
    assert!(config.show_timestamps());
    assert!(!config.json_file());

    let custom = LogConfig::builder()
        .with_console_level(LogLevel::WARN)
        .with_log_file("harbor.log")
        .with_json_file(true)
        .build();
    assert_eq!(custom.log_file(), Some(Path::new("harbor.log")));
    assert!(custom.json_file());
}

#[test]
fn test_log_config_from_global_options() {
    let global = GlobalConfig {
        output_log_level: LogLevel::DEBUG,
        file_log_level: LogLevel::OUTPUT,
        log_file: Some(PathBuf::from("/var/log/harbor.log")),
        log_json: true,
        ..GlobalConfig::default()
    };

    let config = global.log_config();

    assert_eq!(config.console_level(), LogLevel::DEBUG);
    assert_eq!(config.file_level(), LogLevel::OUTPUT);
    assert_eq!(config.log_file(), Some(Path::new("/var/log/harbor.log")));
    assert!(config.json_file());
}
