//! Integration tests for `modlink --json` output.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const NS: &str = "http://example.com/ns/booking/v1";

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-p", "modlink-cli", "--bin", "modlink", "--"]);
    cmd
}

fn write(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

fn run_json(args: &[&str]) -> (Option<i32>, serde_json::Value) {
    let output = cargo_bin()
        .arg("--json")
        .args(args)
        .output()
        .expect("Failed to run modlink");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    (output.status.code(), json)
}

#[test]
fn test_version_json() {
    let (code, json) = run_json(&["version"]);

    assert_eq!(code, Some(0));
    assert_eq!(json["schema_version"].as_u64(), Some(1));
    assert!(json["version"].as_str().is_some(), "Missing version");
}

#[test]
fn test_resolve_json_reports_model() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "Booking.lib.json",
        &format!(r#"{{"namespace": "{NS}", "includes": ["common.json"]}}"#),
    );
    write(dir.path(), "common.json", r#"{"content": {"types": ["Money"]}}"#);

    let root = dir.path().join("Booking.lib.json");
    let (code, json) = run_json(&["resolve", root.to_str().unwrap()]);

    assert_eq!(code, Some(0), "unexpected output: {json}");
    assert_eq!(json["ok"], true);
    assert_eq!(json["schema_version"].as_u64(), Some(1));

    let modules = json["modules"].as_array().expect("modules array");
    assert_eq!(modules.len(), 2);
    assert!(modules
        .iter()
        .all(|m| m["namespace"].as_str() == Some(NS)));

    let booking = modules
        .iter()
        .find(|m| m["name"] == "Booking")
        .expect("root library in model");
    assert_eq!(booking["kind"], "library");
    assert_eq!(booking["crc"].as_str().map(str::len), Some(64));

    assert!(json["findings"].as_array().unwrap().is_empty());
}

#[test]
fn test_resolve_json_unreadable_include_fails() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "Booking.lib.json",
        &format!(r#"{{"namespace": "{NS}", "includes": ["missing.json"]}}"#),
    );

    let (code, json) = run_json(&[
        "--cwd",
        dir.path().to_str().unwrap(),
        "resolve",
        "Booking.lib.json",
    ]);

    assert_eq!(code, Some(1));
    assert_eq!(json["ok"], false);
    let findings = json["findings"].as_array().unwrap();
    assert!(findings.iter().any(|f| {
        f["code"] == "UNKNOWN_EXCEPTION_DURING_MODULE_LOAD" && f["severity"] == "error"
    }));
}

#[test]
fn test_resolve_json_unresolved_import_is_a_warning() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "Booking.lib.json",
        &format!(
            r#"{{"namespace": "{NS}", "imports": [{{"namespace": "http://example.com/ns/nowhere", "prefix": "n"}}]}}"#
        ),
    );

    let root = dir.path().join("Booking.lib.json");
    let (code, json) = run_json(&["resolve", root.to_str().unwrap()]);

    assert_eq!(code, Some(0));
    assert_eq!(json["ok"], true);
    let findings = json["findings"].as_array().unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["code"], "UNRESOLVED_LIBRARY_NAMESPACE");
    assert_eq!(findings[0]["severity"], "warning");
}

#[test]
fn test_resolve_json_missing_root_exits_2() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("absent.json");

    let (code, json) = run_json(&["resolve", root.to_str().unwrap()]);

    assert_eq!(code, Some(2));
    assert_eq!(json["ok"], false);
    assert!(json["error"].as_str().is_some(), "Missing error");
}

#[test]
fn test_checksum_json() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "Travel.lib.json",
        &format!(r#"{{"namespace": "{NS}", "content": {{"types": ["Trip"]}}}}"#),
    );

    let file = dir.path().join("Travel.lib.json");
    let (code, json) = run_json(&["checksum", file.to_str().unwrap()]);

    assert_eq!(code, Some(0));
    let crc = json["crc"].as_str().expect("crc string");
    assert_eq!(crc.len(), 64);
    assert!(crc.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(json["declared"].is_null());
    assert!(json["matches"].is_null());
}
