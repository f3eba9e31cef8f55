//! Integration tests for the CLI subcommands.
//!
//! These tests use `assert_cmd` against the checked-in order sheet fixture and
//! never reach the network: geocoding goes through an offline address table.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

fn orders_csv() -> String {
    fixtures().join("orders.csv").display().to_string()
}

/// CLI without colors and without any user config file.
fn cli() -> Command {
    let mut cmd = Command::cargo_bin("nakimi-cli").expect("binary exists");
    cmd.env("NO_COLOR", "1")
        .env("XDG_CONFIG_HOME", env!("CARGO_TARGET_TMPDIR"))
        .env_remove("RUST_LOG");
    cmd
}

fn json_output(args: &[&str]) -> Value {
    let output = cli().args(args).output().expect("run cli");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn ids(stops: &Value) -> Vec<String> {
    stops
        .as_array()
        .expect("array of stops")
        .iter()
        .map(|stop| stop["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

// =============================================================================
// validate
// =============================================================================

#[test]
fn validate_reports_invalid_orders() {
    cli()
        .args(["validate", "--orders", &orders_csv()])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK      PED-1001"))
        .stdout(predicate::str::contains("INVALID PED-1006 (missing phone)"))
        .stdout(predicate::str::contains("INVALID PED-1007 (missing address)"))
        .stdout(predicate::str::contains("8 orders: 6 valid, 2 invalid (25.0%)"));
}

#[test]
fn validate_json_output() {
    let reports = json_output(&["--format", "json", "validate", "--orders", &orders_csv()]);
    let reports = reports.as_array().expect("array");

    assert_eq!(reports.len(), 8);
    assert_eq!(reports[0]["isValid"], true);
    assert_eq!(reports[5]["id"], "PED-1006");
    assert_eq!(reports[5]["errors"], serde_json::json!(["missing phone"]));
}

#[test]
fn validate_missing_file_fails() {
    cli()
        .args(["validate", "--orders", "does-not-exist.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load orders"));
}

#[test]
fn validate_rejects_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orders.xlsx");
    fs::write(&path, "id").unwrap();

    cli()
        .args(["validate", "--orders", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected .csv or .json"));
}

// =============================================================================
// sequence
// =============================================================================

#[test]
fn sequence_from_depot_coordinates() {
    let route = json_output(&[
        "--format",
        "json",
        "sequence",
        "--orders",
        &orders_csv(),
        "--origin-lat",
        "-33.45",
        "--origin-lng",
        "-70.66",
    ]);

    assert_eq!(
        ids(&route["order"]),
        ["PED-1005", "PED-1002", "PED-1004", "PED-1001", "PED-1003"]
    );
    assert_eq!(route["unpositioned"], serde_json::json!(["PED-1008"]));
    assert_eq!(route["path"].as_array().unwrap().len(), 6);
}

#[test]
fn sequence_manual_keeps_sheet_order() {
    let route = json_output(&[
        "--format",
        "json",
        "sequence",
        "--orders",
        &orders_csv(),
        "--strategy",
        "manual",
    ]);

    assert_eq!(route["strategy"], "manual");
    assert_eq!(
        ids(&route["order"]),
        ["PED-1001", "PED-1002", "PED-1003", "PED-1004", "PED-1005"]
    );
}

#[test]
fn sequence_text_output() {
    cli()
        .args(["sequence", "--orders", &orders_csv()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sequence (5 stops; strategy: nearest-neighbor):"))
        .stdout(predicate::str::contains("  1. PED-1001 Av. Apoquindo 4500, Las Condes"))
        .stdout(predicate::str::contains("Without coordinates: PED-1008"));
}

#[test]
fn sequence_origin_needs_both_components() {
    cli()
        .args([
            "sequence",
            "--orders",
            &orders_csv(),
            "--origin-lat",
            "-33.45",
        ])
        .assert()
        .failure();
}

// =============================================================================
// link
// =============================================================================

#[test]
fn link_prints_exact_url() {
    cli()
        .args([
            "link",
            "--origin",
            "A",
            "--destination",
            "B",
            "--waypoint",
            "C",
            "--waypoint",
            "D",
        ])
        .assert()
        .success()
        .stdout("https://www.google.com/maps/dir/?api=1&origin=A&destination=B&waypoints=C|D\n");
}

#[test]
fn link_without_origin_fails() {
    cli()
        .args(["link", "--destination", "B"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("origin and destination are mandatory"));
}

#[test]
fn link_rejects_too_many_waypoints() {
    let mut args = vec![
        "link".to_string(),
        "--origin".to_string(),
        "A".to_string(),
        "--destination".to_string(),
        "B".to_string(),
    ];
    for i in 1..=24 {
        args.push("--waypoint".to_string());
        args.push(format!("Parada {i}"));
    }

    cli()
        .args(&args)
        .assert()
        .failure()
        .stderr(predicate::str::contains("waypoint limit exceeded: max 23, got 24"));
}

#[test]
fn link_takes_waypoints_from_orders() {
    let link = json_output(&[
        "--format",
        "json",
        "link",
        "--origin",
        "Centro Logístico",
        "--destination",
        "Centro Logístico",
        "--orders",
        &orders_csv(),
    ]);

    assert_eq!(link["waypoints"], 6);
    let url = link["url"].as_str().unwrap();
    assert!(url.contains("origin=Centro%20Log%C3%ADstico"));
    assert!(url.contains("&waypoints=Av.%20Apoquindo%204500%2C%20Las%20Condes|"));
    assert!(url.ends_with("|Calle%20Sin%20Coordenadas%2010%2C%20Recoleta"));
    assert!(!url.contains("Moneda"));
}

#[test]
fn link_honours_config_limit() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"max_waypoints": 1}"#).unwrap();

    cli()
        .args([
            "--config",
            config.to_str().unwrap(),
            "link",
            "--origin",
            "A",
            "--destination",
            "B",
            "--waypoint",
            "C",
            "--waypoint",
            "D",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max 1, got 2"));
}

// =============================================================================
// plan
// =============================================================================

#[test]
fn plan_with_coordinate_origin() {
    let plan = json_output(&[
        "--format",
        "json",
        "plan",
        "--orders",
        &orders_csv(),
        "--origin",
        "-33.45,-70.66",
        "--destination",
        "Bodega Central",
    ]);

    assert_eq!(plan["summary"]["total_orders"], 8);
    assert_eq!(plan["summary"]["invalid_orders"], 2);
    assert_eq!(plan["summary"]["stops_sequenced"], 5);
    assert_eq!(plan["rejected"].as_array().unwrap().len(), 2);
    assert_eq!(ids(&plan["sequence"]["order"])[0], "PED-1005");
    let url = plan["url"].as_str().unwrap();
    assert!(url.starts_with(
        "https://www.google.com/maps/dir/?api=1&origin=-33.45%2C-70.66&destination=Bodega%20Central"
    ));
}

#[test]
fn plan_geocodes_from_offline_table() {
    let table = fixtures().join("geocode.json");
    let plan = json_output(&[
        "--format",
        "json",
        "plan",
        "--orders",
        &orders_csv(),
        "--geocode-table",
        table.to_str().unwrap(),
    ]);

    assert_eq!(plan["summary"]["stops_sequenced"], 6);
    assert!(plan["sequence"].get("unpositioned").is_none());
    assert_eq!(plan["link_error"], "origin and destination are mandatory");
}

#[test]
fn plan_uses_configured_depot() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"depot": "Centro Logístico"}"#).unwrap();

    cli()
        .args([
            "--config",
            config.to_str().unwrap(),
            "plan",
            "--orders",
            &orders_csv(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Orders: 8 total, 6 valid, 2 invalid (25.0%)"))
        .stdout(predicate::str::contains(
            "Navigation: https://www.google.com/maps/dir/?api=1&origin=Centro%20Log%C3%ADstico&destination=Centro%20Log%C3%ADstico",
        ))
        .stdout(predicate::str::contains("PED-1006 (missing phone)"));
}

// =============================================================================
// driver
// =============================================================================

#[test]
fn driver_requires_depot() {
    cli()
        .args(["driver", "--orders", &orders_csv()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no depot address"));
}

#[test]
fn driver_marks_deliveries() {
    let manifest = json_output(&[
        "--format",
        "json",
        "driver",
        "--orders",
        &orders_csv(),
        "--depot",
        "Centro Logístico",
        "--delivered",
        "PED-1001",
        "--delivered",
        "PED-9999",
    ]);

    assert_eq!(manifest["delivered"], 1);
    assert_eq!(
        ids(&manifest["pending"]),
        ["PED-1002", "PED-1003", "PED-1004", "PED-1005", "PED-1008"]
    );
    let url = manifest["url"].as_str().unwrap();
    assert!(url.contains("&destination=Centro%20Log%C3%ADstico&waypoints=Av.%20Providencia"));
}
