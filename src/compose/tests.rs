// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::BTreeMap;
use std::path::Path;

use super::{ComposeController, DEFAULT_COMPOSE_COMMAND, parse_service_names};
use crate::deploy::model::Application;
use crate::error::ComposeError;
use crate::test_utils::{ScriptedRunner, exited};

fn default_command() -> Vec<String> {
    vec![DEFAULT_COMPOSE_COMMAND.to_string()]
}

fn app() -> Application {
    Application::builder()
        .id("myapp")
        .source("https://git.example.com/myapp.git")
        .environment(BTreeMap::from([("TAG".to_string(), "v2".to_string())]))
        .build()
}

#[test]
fn test_parse_service_names_skips_blank_lines() {
    let names = parse_service_names("web\n\n  db  \nworker\n\n");
    insta::assert_debug_snapshot!(names, @r#"
    {
        "db",
        "web",
        "worker",
    }
    "#);
}

#[test]
fn test_command_line_shape() {
    let command = vec!["docker".to_string(), "compose".to_string()];
    let app = Application::builder()
        .id("myapp")
        .source("x")
        .compose_file("prod.yml")
        .build();
    let runner = ScriptedRunner::new();
    let compose = ComposeController::new(&runner, &command, &app, Path::new("/srv/myapp"));

    insta::assert_snapshot!(
        compose.command(&["up", "--remove-orphans", "--build", "-d"]).join(" "),
        @"docker compose -f prod.yml up --remove-orphans --build -d"
    );
}

#[test]
fn test_compose_dir_is_resolved_against_working_copy() {
    let command = default_command();
    let app = Application::builder()
        .id("myapp")
        .source("x")
        .compose_dir("deploy/prod")
        .build();
    let runner = ScriptedRunner::new();
    let compose = ComposeController::new(&runner, &command, &app, Path::new("/srv/myapp"));

    assert_eq!(compose.project_dir(), Path::new("/srv/myapp/deploy/prod"));
}

#[tokio::test]
async fn test_verbs_run_in_project_dir_with_app_env() {
    let command = default_command();
    let app = app();
    let runner = ScriptedRunner::new();
    let compose = ComposeController::new(&runner, &command, &app, Path::new("/srv/myapp"));

    assert!(compose.pull_images().await.expect("launch").success());
    assert!(compose.up_stack(true).await.expect("launch").success());
    assert!(compose.down_stack().await.expect("launch").success());

    let calls = runner.calls();
    insta::assert_debug_snapshot!(calls.iter().map(|c| c.line()).collect::<Vec<_>>(), @r#"
    [
        "docker-compose -f docker-compose.yml pull",
        "docker-compose -f docker-compose.yml up --remove-orphans --build -d",
        "docker-compose -f docker-compose.yml down --remove-orphans",
    ]
    "#);
    assert!(calls.iter().all(|c| c.cwd == Path::new("/srv/myapp")));
    assert!(calls.iter().all(|c| c.env.get("TAG").map(String::as_str) == Some("v2")));
}

#[tokio::test]
async fn test_up_without_rebuild_skips_build_flag() {
    let command = default_command();
    let app = app();
    let runner = ScriptedRunner::new();
    let compose = ComposeController::new(&runner, &command, &app, Path::new("/srv/myapp"));

    compose.up_stack(false).await.expect("launch");

    insta::assert_snapshot!(runner.calls()[0].line(), @"docker-compose -f docker-compose.yml up --remove-orphans -d");
}

#[tokio::test]
async fn test_running_services_parses_output() {
    let command = default_command();
    let app = app();
    let runner = ScriptedRunner::new().respond("ps --services", exited(0, "web\ndb\n", ""));
    let compose = ComposeController::new(&runner, &command, &app, Path::new("/srv/myapp"));

    let running = compose.query_running_services().await.expect("query should succeed");

    assert_eq!(running.len(), 2);
    assert!(running.contains("web"));
    assert!(running.contains("db"));
}

#[tokio::test]
async fn test_running_services_non_zero_is_query_failed() {
    let command = default_command();
    let app = app();
    let runner =
        ScriptedRunner::new().respond("ps --services", exited(1, "", "no such project\n"));
    let compose = ComposeController::new(&runner, &command, &app, Path::new("/srv/myapp"));

    let err = compose.query_running_services().await.expect_err("query must fail");

    insta::assert_snapshot!(err.to_string(), @"'docker-compose -f docker-compose.yml ps --services --filter status=running' exited with code 1: no such project");
}

#[tokio::test]
async fn test_query_failure_quotes_spaced_compose_file() {
    let command = default_command();
    let app = Application::builder()
        .id("myapp")
        .source("x")
        .compose_file("prod stack.yml")
        .build();
    let runner = ScriptedRunner::new().respond("ps --services", exited(1, "", "no such file\n"));
    let compose = ComposeController::new(&runner, &command, &app, Path::new("/srv/myapp"));

    let err = compose.query_running_services().await.expect_err("query must fail");

    insta::assert_snapshot!(err.to_string(), @r#"'docker-compose -f "prod stack.yml" ps --services --filter status=running' exited with code 1: no such file"#);
}

#[tokio::test]
async fn test_missing_tool_is_launch_error() {
    let command = default_command();
    let app = app();
    let runner = ScriptedRunner::new().fail_launch("docker-compose");
    let compose = ComposeController::new(&runner, &command, &app, Path::new("/srv/myapp"));

    assert!(compose.pull_images().await.is_err());
    assert!(matches!(
        compose.query_running_services().await,
        Err(ComposeError::Launch(_))
    ));
}
