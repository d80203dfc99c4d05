//! File logging set up by the binary, checked through `--dry-run` runs.
use assert_cmd::prelude::*;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn run(config_home: &Path, log_env: Option<&str>, args: &[&str]) -> Output {
    let mut cmd = Command::cargo_bin("launerdash").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home).env_remove("LAUNERDASH_LOG");
    if let Some(v) = log_env {
        cmd.env("LAUNERDASH_LOG", v);
    }
    cmd.args(args).output().expect("run launerdash")
}

#[test]
fn log_file_flag_creates_file_with_info_events() {
    let td = tempfile::tempdir().unwrap();
    let log = td.path().join("logs").join("dash.log");
    let log_arg = log.to_string_lossy().to_string();
    let out = run(
        td.path(),
        None,
        &["--log-file", &log_arg, "--dry-run", "http://localhost:8000/api"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let data = fs::read_to_string(&log).expect("log file created");
    assert!(data.contains("resolved backend"), "missing info event: {data}");
    assert!(data.contains("INFO"));
    assert!(!data.contains('\x1b'), "ANSI escapes in log file");
}

#[test]
fn default_log_lands_in_config_dir() {
    let td = tempfile::tempdir().unwrap();
    let out = run(td.path(), None, &["--dry-run", "http://localhost:8000/api"]);
    assert!(out.status.success());
    assert!(td.path().join("launerdash").join("launerdash.log").exists());
}

#[test]
fn env_filter_can_silence_info() {
    let td = tempfile::tempdir().unwrap();
    let log = td.path().join("quiet.log");
    let log_arg = format!("--log-file={}", log.display());
    let out = run(
        td.path(),
        Some("launerdash=warn"),
        &[&log_arg, "--dry-run", "http://localhost:8000/api"],
    );
    assert!(out.status.success());
    let data = fs::read_to_string(&log).expect("log file created");
    assert!(!data.contains("resolved backend"), "info event not filtered: {data}");
}

#[test]
fn missing_tls_ca_fails_startup() {
    let td = tempfile::tempdir().unwrap();
    let missing = td.path().join("nope.pem");
    let ca = missing.to_string_lossy().to_string();
    let log_arg = td.path().join("l.log").to_string_lossy().to_string();
    let out = run(
        td.path(),
        None,
        &["--tls-ca", &ca, "--log-file", &log_arg, "https://localhost:8443/api"],
    );
    assert!(!out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("reading TLS CA"), "{err}");
}
