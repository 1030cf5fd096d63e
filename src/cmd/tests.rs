// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::config::{load_config, parse_override};
use super::list::format_app_list;
use super::run::{check_report, format_report};
use crate::cli::global::GlobalOptions;
use crate::config::Config;
use crate::deploy::{AppReport, DeploymentOutcome, RunReport, SkipReason, Stage, StageFailure};
use crate::test_utils::exited;
use std::path::PathBuf;

const APPS: &str = r"
apps:
  web:
    url: https://git.example.com/web.git
    branch: main
  api:
    url: https://git.example.com/api.git
  legacy:
    url: https://git.example.com/legacy.git
    enabled: false
";

fn write_config(dir: &std::path::Path, content: &str) -> PathBuf {
    let path = dir.join("harbor.yml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_parse_override() {
    assert_eq!(
        parse_override("apps.web.branch = staging").unwrap(),
        ("apps.web.branch", "staging")
    );
    assert_eq!(parse_override("global.working_dir=/a=b").unwrap().1, "/a=b");

    let err = parse_override("global.workers").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"invalid value for 'global.workers' in section '[override]': expected KEY=VALUE");
    assert!(parse_override("=4").is_err());
}

#[test]
fn test_load_config_applies_overrides_in_order() {
    let temp = tempfile::tempdir().unwrap();
    let global = GlobalOptions {
        config: Some(write_config(temp.path(), APPS)),
        working_dir: Some(PathBuf::from("/srv/harbor")),
        log_level: Some(4),
        options: vec![
            "apps.api.branch=staging".to_string(),
            "global.working_dir=/ignored".to_string(),
            "global.compose_command=docker compose".to_string(),
        ],
        ..GlobalOptions::default()
    };

    let config = load_config(&global, &["global.workers=3".to_string()]).expect("config loads");

    assert_eq!(config.global.working_dir, PathBuf::from("/srv/harbor"));
    assert_eq!(config.global.workers, 3);
    assert_eq!(config.global.compose_command, ["docker", "compose"]);
    assert_eq!(config.global.output_log_level.as_u8(), 4);
    assert_eq!(config.global.file_log_level.as_u8(), 4);
    assert_eq!(
        config.apps.get("api").and_then(|app| app.branch.as_deref()),
        Some("staging")
    );
}

#[test]
fn test_load_config_missing_explicit_file() {
    let temp = tempfile::tempdir().unwrap();
    let global = GlobalOptions {
        config: Some(temp.path().join("absent.yml")),
        ..GlobalOptions::default()
    };
    assert!(load_config(&global, &[]).is_err());
}

#[test]
fn test_load_config_rejects_invalid_override() {
    let temp = tempfile::tempdir().unwrap();
    let global = GlobalOptions {
        config: Some(write_config(temp.path(), APPS)),
        options: vec!["global.workers=0".to_string()],
        ..GlobalOptions::default()
    };
    let err = load_config(&global, &[]).unwrap_err();
    assert!(err.to_string().contains("workers"), "{err}");
}

#[test]
fn test_format_app_list() {
    let config = Config::parse(APPS).unwrap();

    insta::assert_snapshot!(format_app_list(&config, false).join("\n"), @r"
    web     https://git.example.com/web.git @ main
    api     https://git.example.com/api.git
    legacy  https://git.example.com/legacy.git (disabled)
    ");
    insta::assert_snapshot!(format_app_list(&config, true).join("\n"), @r"
    web  https://git.example.com/web.git @ main
    api  https://git.example.com/api.git
    ");
    assert!(format_app_list(&Config::default(), false).is_empty());
}

#[test]
fn test_format_report_text_and_json() {
    let report = RunReport::new(vec![AppReport {
        app: "web".to_string(),
        outcome: DeploymentOutcome::Skipped {
            reason: SkipReason::UpToDate,
        },
    }]);

    insta::assert_snapshot!(format_report(&report, false).unwrap(), @r"
    web  skipped (up to date)
    0 deployed, 1 skipped, 0 stopped, 0 failed
    ");

    let json: serde_json::Value =
        serde_json::from_str(&format_report(&report, true).unwrap()).unwrap();
    assert_eq!(json["apps"][0]["status"], "skipped");
    assert_eq!(json["apps"][0]["reason"], "up_to_date");
    assert!(check_report(&report).is_ok());
}

#[test]
fn test_check_report_fails_on_any_failure() {
    let report = RunReport::new(vec![
        AppReport {
            app: "web".to_string(),
            outcome: DeploymentOutcome::Stopped,
        },
        AppReport {
            app: "api".to_string(),
            outcome: DeploymentOutcome::Failed(StageFailure::from_result(
                Stage::Up,
                exited(1, "", "port in use"),
            )),
        },
    ]);

    let err = check_report(&report).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"fatal error: 1 of 2 applications failed");
}
