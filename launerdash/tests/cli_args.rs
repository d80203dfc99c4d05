//! CLI arg handling for launerdash, exercised through the built binary.
use assert_cmd::prelude::*;
use std::process::{Command, Output};

fn run(args: &[&str], config_home: &std::path::Path) -> Output {
    Command::cargo_bin("launerdash")
        .expect("binary exists")
        .env("XDG_CONFIG_HOME", config_home)
        .args(args)
        .output()
        .expect("run launerdash")
}

fn text(out: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    )
}

#[test]
fn help_mentions_short_and_long_flags() {
    let td = tempfile::tempdir().unwrap();
    let out = run(&["--help"], td.path());
    assert!(out.status.success());
    let t = text(&out);
    for flag in ["--tls-ca", "-t", "--profile", "-P", "--user", "-u", "--logout", "--dry-run"] {
        assert!(t.contains(flag), "help text missing {flag}\n{t}");
    }
}

#[test]
fn help_wins_over_other_flags() {
    let td = tempfile::tempdir().unwrap();
    for args in [
        &["--tls-ca", "/tmp/cert.pem", "--help"][..],
        &["-t", "/tmp/cert.pem", "--help"][..],
        &["--profile", "dev", "--help"][..],
    ] {
        let out = run(args, td.path());
        assert!(out.status.success(), "{args:?} did not succeed");
        assert!(text(&out).contains("Usage:"));
    }
}

#[test]
fn dry_run_prints_resolved_backend() {
    let td = tempfile::tempdir().unwrap();
    let out = run(&["--dry-run", "http://localhost:8000/api"], td.path());
    assert!(out.status.success(), "{}", text(&out));
    assert_eq!(
        String::from_utf8_lossy(&out.stdout).trim(),
        "http://localhost:8000/api"
    );
}

#[test]
fn non_http_url_is_rejected() {
    let td = tempfile::tempdir().unwrap();
    let out = run(&["--dry-run", "ws://localhost:8000/ws"], td.path());
    assert!(!out.status.success());
    assert!(text(&out).contains("unsupported scheme"), "{}", text(&out));
}

#[test]
fn unknown_flag_and_extra_positional_fail() {
    let td = tempfile::tempdir().unwrap();
    let out = run(&["--bogus"], td.path());
    assert_eq!(out.status.code(), Some(2));
    assert!(text(&out).contains("Unknown option"));

    let out = run(&["http://a:1/api", "http://b:2/api"], td.path());
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn no_url_and_no_profiles_exits_cleanly() {
    let td = tempfile::tempdir().unwrap();
    let out = run(&[], td.path());
    assert!(out.status.success());
    assert!(text(&out).contains("No URL provided"));
}
