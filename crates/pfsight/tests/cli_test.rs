//! Integration tests for the `pfsight` CLI binary.
//!
//! Argument parsing, help, completions and config failures run without a
//! firewall; request paths run against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `pfsight` binary with env isolation.
///
/// Clears all `PFSENSE_*` / `PFSIGHT_*` env vars and points config
/// directories at a nonexistent path so tests never read a real setup.
fn pfsight_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("pfsight");
    cmd.env("HOME", "/tmp/pfsight-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/pfsight-cli-test-nonexistent")
        .env_remove("PFSENSE_API_URL")
        .env_remove("PFSENSE_API_KEY")
        .env_remove("PFSENSE_INTERFACE")
        .env_remove("PFSENSE_POLL_INTERVAL_MS")
        .env_remove("PFSENSE_INSECURE")
        .env_remove("PFSIGHT_CONFIG")
        .env_remove("PFSIGHT_OUTPUT")
        .env_remove("RUST_LOG");
    cmd
}

fn with_firewall(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = pfsight_cmd();
    cmd.env("PFSENSE_API_URL", server.uri())
        .env("PFSENSE_API_KEY", "cli-test-key");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = pfsight_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    pfsight_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("pfSense")
            .and(predicate::str::contains("query"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_version_flag() {
    pfsight_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pfsight"));
}

#[test]
fn test_completions_zsh() {
    pfsight_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    pfsight_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_invalid_sort_order_is_usage_error() {
    pfsight_cmd()
        .args(["query", "/api/v2/firewall/rules", "--sort-order", "sideways"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("sideways"));
}

// ── Missing configuration ───────────────────────────────────────────

#[test]
fn test_query_without_config_names_both_settings() {
    pfsight_cmd()
        .args(["query", "/api/v2/status/system"])
        .assert()
        .code(3)
        .stderr(
            predicate::str::contains("PFSENSE_API_URL")
                .and(predicate::str::contains("PFSENSE_API_KEY")),
        );
}

#[test]
fn test_watch_with_only_url_is_missing_config() {
    pfsight_cmd()
        .env("PFSENSE_API_URL", "https://192.0.2.1")
        .args(["watch", "--count", "1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("PFSENSE_API_KEY"));
}

#[test]
fn test_config_show_redacts_key() {
    pfsight_cmd()
        .env("PFSENSE_API_URL", "https://192.0.2.1")
        .env("PFSENSE_API_KEY", "supersecretkey1234")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("****1234")
                .and(predicate::str::contains("supersecret").not())
                .and(predicate::str::contains("interface = \"wan\"")),
        );
}

// ── Requests against a mock firewall ────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_query_success_prints_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/firewall/rules"))
        .and(query_param("interface", "wan"))
        .and(header("authorization", "Bearer cli-test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 200, "data": [{ "tracker": 1001 }] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    with_firewall(&server)
        .args([
            "-o",
            "json-compact",
            "query",
            "api/v2/firewall/rules",
            "-f",
            "interface=wan",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""success":true"#)
                .and(predicate::str::contains(r#""status":200"#))
                .and(predicate::str::contains("1001")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_query_http_error_exits_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/status/system"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "message": "insufficient privileges" })),
        )
        .mount(&server)
        .await;

    with_firewall(&server)
        .args(["query", "/api/v2/status/system"])
        .assert()
        .code(1)
        .stderr(
            predicate::str::contains("403").and(predicate::str::contains("insufficient privileges")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_post_without_body_never_hits_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    with_firewall(&server)
        .args(["query", "-X", "post", "/api/v2/firewall/rule"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("body required for POST"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_file_supplies_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/status/system"))
        .and(header("authorization", "Bearer from-file"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "api_url = \"{}\"\napi_key = \"from-file\"",
        server.uri()
    )
    .unwrap();

    pfsight_cmd()
        .arg("--config")
        .arg(file.path())
        .args(["-o", "json-compact", "query", "/api/v2/status/system"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"success":true,"status":204}"#));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_numeric_env_key_is_sent_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/status/system"))
        .and(header("authorization", "Bearer 00123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(1)
        .mount(&server)
        .await;

    pfsight_cmd()
        .env("PFSENSE_API_URL", server.uri())
        .env("PFSENSE_API_KEY", "00123")
        .args(["query", "/api/v2/status/system"])
        .assert()
        .success();
}

#[test]
fn test_key_with_control_characters_is_a_config_error() {
    let output = pfsight_cmd()
        .env("PFSENSE_API_URL", "https://192.0.2.1")
        .env("PFSENSE_API_KEY", "first\nsecond")
        .args(["query", "/api/v2/status/system"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("PFSENSE_API_KEY"), "got:\n{stderr}");
    assert!(!stderr.contains("--insecure"), "got:\n{stderr}");
}

struct GrowingCounters {
    hits: AtomicU64,
}

impl Respond for GrowingCounters {
    fn respond(&self, _: &Request) -> ResponseTemplate {
        let n = self.hits.fetch_add(1, Ordering::SeqCst) + 1;
        ResponseTemplate::new(200).set_body_json(json!({
            "data": { "name": "lan", "inbytes": n * 2048, "outbytes": n * 512 }
        }))
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_watch_prints_requested_samples() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/status/interface/lan"))
        .respond_with(GrowingCounters {
            hits: AtomicU64::new(0),
        })
        .mount(&server)
        .await;

    let output = with_firewall(&server)
        .args([
            "-o",
            "json-compact",
            "watch",
            "--interface",
            "lan",
            "--interval-ms",
            "100",
            "--count",
            "2",
        ])
        .timeout(std::time::Duration::from_secs(20))
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "unexpected output:\n{stdout}");
    for line in lines {
        let sample: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(sample["uploadKBs"].as_f64().unwrap() > 0.0);
        assert!(sample["downloadKBs"].as_f64().unwrap() > sample["uploadKBs"].as_f64().unwrap());
    }
}
