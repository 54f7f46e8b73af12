//! Validate the JSONL output schema of the `weightd` binary in demo mode.

use assert_cmd::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_demo_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[pins]
# pins are unused by the synthetic ADC but must parse
hx711_dt = 5
hx711_sck = 6

[filter]
# fast cadence keeps the test short
sample_rate_hz = 80
median_window = 3

[stability]
window = 3
tolerance_g = 0.5

[hardware]
sensor_read_timeout_ms = 50
failure_threshold = 5
gain_pulses = 1
demo_mode = true

[calibration]
scale_g_per_count = 1.0
offset_counts = 0.0
"#;
    let path = dir.path().join("weightd.toml");
    fs::write(&path, toml).unwrap();
    path
}

#[rstest]
fn read_emits_reading_lines_with_exact_keys() {
    let dir = tempdir().unwrap();
    let cfg = write_demo_config(&dir);

    let mut cmd = Command::cargo_bin("weightd").unwrap();
    let output = cmd
        .arg("--config")
        .arg(&cfg)
        .arg("--json")
        .arg("read")
        .arg("--count")
        .arg("3")
        .output()
        .expect("run binary");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 3, "expected 3 readings, got: {stdout}");

    for line in lines {
        let v: serde_json::Value = serde_json::from_str(line).expect("valid JSON line");
        let obj = v.as_object().expect("object");
        assert_eq!(obj.len(), 3, "exactly grams/ts/stable: {line}");
        assert!(obj["grams"].is_f64() || obj["grams"].is_i64(), "grams numeric");
        let ts = obj["ts"].as_str().expect("ts string");
        assert!(ts.contains('T') && ts.ends_with('Z'), "ISO-8601 UTC: {ts}");
        assert!(obj["stable"].is_boolean());
    }
}

#[rstest]
fn tare_reports_offset_and_persists_to_config() {
    let dir = tempdir().unwrap();
    let cfg = write_demo_config(&dir);

    let mut cmd = Command::cargo_bin("weightd").unwrap();
    let output = cmd
        .arg("--config")
        .arg(&cfg)
        .arg("tare")
        .output()
        .expect("run binary");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let line = String::from_utf8(output.stdout).unwrap();
    let v: serde_json::Value = serde_json::from_str(line.trim()).expect("JSON status line");
    assert_eq!(v["status"], "ok");
    let offset = v["offset"].as_f64().expect("offset");
    // synthetic signal oscillates around its baseline of 100
    assert!((85.0..=115.0).contains(&offset), "offset: {offset}");

    // persisted into the [calibration] table of the same file
    let stored = weightd_config::load_path(&cfg).expect("reload config");
    assert_eq!(stored.calibration.offset_counts, offset);
}

#[rstest]
fn calibrate_rejects_non_positive_reference() {
    let dir = tempdir().unwrap();
    let cfg = write_demo_config(&dir);

    let mut cmd = Command::cargo_bin("weightd").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .arg("calibrate")
        .arg("--grams")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid reference"));
}
