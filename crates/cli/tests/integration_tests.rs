//! Integration tests for uvcctl CLI
//!
//! These run the binary against the bundled webcam topology and check
//! output formats and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;
type Fallible<T> = Result<T, Box<dyn std::error::Error>>;

const WEBCAM: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/generic_webcam.yaml");

/// Custom predicate to check if output is valid JSON
fn is_json() -> impl predicates::Predicate<[u8]> {
    predicates::function::function(|s: &[u8]| {
        if let Ok(text) = std::str::from_utf8(s) {
            serde_json::from_str::<Value>(text).is_ok()
        } else {
            false
        }
    })
}

/// Test helper to create a uvcctl command with no inherited topology
fn uvcctl() -> Fallible<Command> {
    let mut cmd = Command::cargo_bin("uvcctl")?;
    cmd.env_remove("UVCCTL_TOPOLOGY").env_remove("RUST_LOG");
    Ok(cmd)
}

fn webcam() -> Fallible<Command> {
    let mut cmd = uvcctl()?;
    cmd.args(["--topology", WEBCAM]);
    Ok(cmd)
}

fn json_stdout(cmd: &mut Command) -> Fallible<Value> {
    let output = cmd.arg("--json").output()?;
    Ok(serde_json::from_slice(&output.stdout)?)
}

fn array<'a>(value: &'a Value, key: &str) -> Fallible<&'a Vec<Value>> {
    value[key]
        .as_array()
        .ok_or_else(|| format!("`{key}` is not an array").into())
}

#[test]
fn test_cli_help() -> TestResult {
    uvcctl()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("UVC control"));
    Ok(())
}

#[test]
fn test_cli_version() -> TestResult {
    uvcctl()?
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("uvcctl"));
    Ok(())
}

#[test]
fn test_catalog_lists_mappings() -> TestResult {
    uvcctl()?
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("Brightness"))
        .stdout(predicate::str::contains("Privacy"));
    Ok(())
}

#[test]
fn test_catalog_physical_json() -> TestResult {
    uvcctl()?
        .args(["catalog", "--physical", "--json"])
        .assert()
        .success()
        .stdout(is_json());
    Ok(())
}

#[test]
fn test_unit_list_json() -> TestResult {
    let value = json_stdout(webcam()?.args(["unit", "list"]))?;
    assert_eq!(value["success"], true);

    assert_eq!(array(&value, "units")?.len(), 3);
    let units = &value["units"];
    assert_eq!(units[0]["kind"], "camera_terminal");
    assert_eq!(array(&units[1], "controls")?.len(), 14);
    assert_eq!(units[2]["kind"], "extension");
    assert_eq!(units[2]["guid"], "961073c7-49f7-44f2-ab42-e940405940c2");
    Ok(())
}

#[test]
fn test_ctrl_list_json_is_sorted() -> TestResult {
    let value = json_stdout(webcam()?.args(["ctrl", "list"]))?;
    let ids: Vec<u64> = array(&value, "controls")?
        .iter()
        .filter_map(|c| c["id"].as_u64())
        .collect();
    assert_eq!(ids.len(), 23);
    assert!(ids.windows(2).all(|w| w.first() < w.last()));
    assert_eq!(ids.first(), Some(&0x0098_0900));
    assert_eq!(ids.last(), Some(&0x009a_0910));
    Ok(())
}

#[test]
fn test_ctrl_list_human() -> TestResult {
    webcam()?
        .args(["ctrl", "list", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Controls:"))
        .stdout(predicate::str::contains("Power Line Frequency"));
    Ok(())
}

#[test]
fn test_query_brightness_bounds() -> TestResult {
    let value = json_stdout(webcam()?.args(["ctrl", "query", "brightness"]))?;
    let control = &value["control"];
    assert_eq!(control["id"], 0x0098_0900);
    assert_eq!(control["type"], "integer");
    assert_eq!(control["minimum"], -64);
    assert_eq!(control["maximum"], 64);
    assert_eq!(control["step"], 1);
    assert_eq!(control["default_value"], 0);
    Ok(())
}

#[test]
fn test_query_menu_default_index() -> TestResult {
    let value = json_stdout(webcam()?.args(["ctrl", "query", "0x00980918"]))?;
    assert_eq!(value["control"]["name"], "Power Line Frequency");
    assert_eq!(value["control"]["maximum"], 2);
    assert_eq!(value["control"]["default_value"], 2);
    Ok(())
}

#[test]
fn test_query_next_after_hue() -> TestResult {
    let value = json_stdout(webcam()?.args(["ctrl", "query", "Hue", "--next"]))?;
    assert_eq!(value["control"]["name"], "White Balance Temperature, Auto");
    Ok(())
}

#[test]
fn test_menu_skips_unsupported_entries() -> TestResult {
    let value = json_stdout(webcam()?.args(["ctrl", "menu", "Exposure, Auto"]))?;
    let names: Vec<&str> = array(&value, "entries")?
        .iter()
        .filter_map(|e| e["name"].as_str())
        .collect();
    assert_eq!(names, ["Auto Mode", "Manual Mode"]);
    Ok(())
}

#[test]
fn test_menu_unfiltered_without_cached_resolution() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("cam.yaml");
    fs::write(
        &path,
        "units:\n  - { id: 1, entity_type: camera, bm_controls: [10] }\nvalues:\n  - { unit: 1, bit: 1, slot: def, bytes: [2] }\n",
    )?;

    let value = json_stdout(
        uvcctl()?
            .arg("--topology")
            .arg(&path)
            .args(["ctrl", "menu", "Exposure, Auto"]),
    )?;
    assert_eq!(array(&value, "entries")?.len(), 4);

    let value = json_stdout(
        uvcctl()?
            .arg("--topology")
            .arg(&path)
            .args(["ctrl", "query", "Exposure (Absolute)"]),
    )?;
    assert_eq!(value["control"]["name"], "Exposure (Absolute)");
    let flags = value["control"]["flags"].as_str().unwrap_or_default();
    assert!(!flags.contains("INACTIVE"), "unexpected flags: {flags}");
    Ok(())
}

#[test]
fn test_menu_single_entry() -> TestResult {
    webcam()?
        .args(["ctrl", "menu", "Power Line Frequency", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("50 Hz"));
    Ok(())
}

#[test]
fn test_menu_on_integer_control_fails() -> TestResult {
    webcam()?
        .args(["ctrl", "menu", "Brightness"])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("not a menu control"));
    Ok(())
}

#[test]
fn test_unknown_control_exit_code() -> TestResult {
    webcam()?
        .args(["ctrl", "query", "0x00980901"])
        .assert()
        .success();

    webcam()?
        .args(["ctrl", "query", "0x00980905"])
        .assert()
        .failure()
        .code(2);

    webcam()?
        .args(["ctrl", "query", "Warp Drive"])
        .assert()
        .failure()
        .code(2);
    Ok(())
}

#[test]
fn test_next_past_last_control_exit_code() -> TestResult {
    webcam()?
        .args(["ctrl", "query", "Privacy", "--next"])
        .assert()
        .failure()
        .code(2);
    Ok(())
}

#[test]
fn test_deny_access_exit_code() -> TestResult {
    webcam()?
        .args(["--deny-access", "ctrl", "list"])
        .assert()
        .failure()
        .code(6);
    Ok(())
}

#[test]
fn test_deny_access_still_lists_units() -> TestResult {
    webcam()?
        .args(["--deny-access", "unit", "list"])
        .assert()
        .success();
    Ok(())
}

#[test]
fn test_missing_topology_exit_code() -> TestResult {
    uvcctl()?.args(["ctrl", "list"]).assert().failure().code(3);

    uvcctl()?
        .args(["--topology", "/nonexistent/cam.yaml", "ctrl", "list"])
        .assert()
        .failure()
        .code(3);
    Ok(())
}

#[test]
fn test_unreadable_topology_exit_code() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("cam.yaml");
    fs::create_dir(&path)?;

    uvcctl()?
        .arg("--topology")
        .arg(&path)
        .args(["unit", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to read topology"));
    Ok(())
}

#[test]
fn test_error_json_format() -> TestResult {
    let output = uvcctl()?
        .args(["--json", "--topology", "/nonexistent/cam.json", "unit", "list"])
        .output()?;
    assert_eq!(output.status.code(), Some(3));

    let value: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["success"], false);
    assert_eq!(value["error"]["type"], "TopologyNotFound");
    Ok(())
}

#[test]
fn test_json_topology_from_tempdir() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("pu.json");
    let topology = serde_json::json!({
        "units": [
            { "id": 2, "entity_type": "processing", "bm_controls": [5] },
            { "id": 4, "entity_type": { "other": 257 }, "bm_controls": [255] }
        ],
        "values": [
            { "unit": 2, "bit": 2, "slot": "max", "bytes": [180, 0] }
        ]
    });
    fs::write(&path, serde_json::to_string_pretty(&topology)?)?;

    let value = json_stdout(
        uvcctl()?
            .arg("--topology")
            .arg(&path)
            .args(["ctrl", "query", "hue"]),
    )?;
    assert_eq!(value["control"]["maximum"], 180);

    let value = json_stdout(uvcctl()?.arg("--topology").arg(&path).args(["ctrl", "list"]))?;
    assert_eq!(array(&value, "controls")?.len(), 2);
    Ok(())
}

#[test]
fn test_bad_slot_value_is_invalid_topology() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("bad.yaml");
    fs::write(
        &path,
        "units:\n  - { id: 2, entity_type: processing, bm_controls: [1] }\nvalues:\n  - { unit: 2, bit: 0, slot: min, bytes: [1] }\n",
    )?;

    uvcctl()?
        .arg("--topology")
        .arg(&path)
        .args(["ctrl", "list"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("expected 2 bytes, got 1"));
    Ok(())
}

#[test]
fn test_unsupported_topology_format() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("cam.toml");
    fs::write(&path, "units = []\n")?;

    uvcctl()?
        .arg("--topology")
        .arg(&path)
        .args(["unit", "list"])
        .assert()
        .failure()
        .code(4);
    Ok(())
}
