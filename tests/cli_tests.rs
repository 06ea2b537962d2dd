// End-to-end runs of the pgsnap binary against fake tools
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Write an executable script standing in for an external tool
fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Run the binary with a clean environment so PG_* settings from the shell do not leak in
fn pgsnap(dir: &TempDir, heroku: &Path, args: &[&str]) -> Output {
    pgsnap_with(dir, heroku, &[], args)
}

fn pgsnap_with(dir: &TempDir, heroku: &Path, envs: &[(&str, &Path)], args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pgsnap"))
        .current_dir(dir.path())
        .env_clear()
        .env("PATH", std::env::var_os("PATH").unwrap_or_default())
        .env("DOTENV_PATH", dir.path().join("missing.env"))
        .env("HEROKU_BIN", heroku)
        .env("DOCKER_BIN", dir.path().join("no-such-docker"))
        .envs(envs.iter().copied())
        .arg(format!("--log_file={}", dir.path().join("pgsnap.log").display()))
        .arg(format!("--data_directory={}", dir.path().join("pgdata").display()))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn missing_version_label_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let heroku = fake_tool(dir.path(), "heroku", "echo 'Plan: Essential 0'");
    let output = pgsnap(&dir, &heroku, &["--create_container"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("PG Version"), "stderr was: {}", stderr);
    assert!(!dir.path().join("pgdata").exists());
}

#[test]
fn dry_run_prints_commands_with_discovered_version() {
    let dir = tempfile::tempdir().unwrap();
    let heroku = fake_tool(dir.path(), "heroku", "echo 'PG Version:            15.3'");
    let output = pgsnap(&dir, &heroku, &["--create_container", "--container_name=shopdb", "--dry_run"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("no-such-docker pull postgres:15.3"));
    assert!(lines[1].contains(" run --name shopdb "));
    assert!(lines[1].contains("POSTGRES_PASSWORD=[hidden]"));
}

#[test]
fn failed_tool_does_not_stop_the_run_unless_strict() {
    let dir = tempfile::tempdir().unwrap();
    let heroku = fake_tool(dir.path(), "heroku", "exit 3");

    let lenient = pgsnap(&dir, &heroku, &["--download_backup"]);
    assert!(lenient.status.success());

    let strict = pgsnap(&dir, &heroku, &["--download_backup", "--strict"]);
    assert_eq!(strict.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&strict.stderr).contains("exit code 3"));
}

#[test]
fn log_file_records_the_commands() {
    let dir = tempfile::tempdir().unwrap();
    let heroku = fake_tool(dir.path(), "heroku", "true");
    let output = pgsnap(&dir, &heroku, &["--create_backup", "--app_name=shop"]);
    assert!(output.status.success());

    let log = fs::read_to_string(dir.path().join("pgsnap.log")).unwrap();
    assert!(log.contains("pg:backups:capture --app shop"));
    assert!(log.contains("pg:backups:download --app shop"));
}

#[test]
fn bad_port_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let heroku = fake_tool(dir.path(), "heroku", "true");
    let output = pgsnap(&dir, &heroku, &["--port=not-a-port"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn missing_docker_still_runs_the_restore() {
    let dir = tempfile::tempdir().unwrap();
    let heroku = fake_tool(dir.path(), "heroku", "true");
    let marker = dir.path().join("restored");
    let pg_restore = fake_tool(dir.path(), "pg_restore", &format!("touch '{}'", marker.display()));
    let output = pgsnap_with(
        &dir,
        &heroku,
        &[("PG_RESTORE_BIN", pg_restore.as_path())],
        &["--create_container", "--postgres_version=16", "--import_data"],
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(marker.exists());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no-such-docker"));
}
