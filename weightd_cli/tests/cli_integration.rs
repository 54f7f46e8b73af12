//! CLI behavior outside the happy path.

use assert_cmd::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn invalid_config_is_rejected_with_section_name() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("weightd.toml");
    fs::write(&path, "[filter]\nsample_rate_hz = 0\n").unwrap();

    Command::cargo_bin("weightd")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .arg("read")
        .assert()
        .failure()
        .stderr(predicates::str::contains("sample_rate_hz"));
}

#[cfg(not(feature = "hardware"))]
#[test]
fn hardware_mode_without_gpio_support_explains_demo_flag() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("weightd.toml");
    fs::write(&path, "[hardware]\ndemo_mode = false\n").unwrap();

    Command::cargo_bin("weightd")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .arg("read")
        .assert()
        .failure()
        .stderr(predicates::str::contains("--demo"));
}

#[test]
fn demo_flag_overrides_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("weightd.toml");
    fs::write(
        &path,
        "[filter]\nsample_rate_hz = 80\nmedian_window = 1\n[hardware]\ndemo_mode = false\n",
    )
    .unwrap();

    Command::cargo_bin("weightd")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .arg("--demo")
        .arg("read")
        .arg("--count")
        .arg("1")
        .assert()
        .success();
}

#[test]
fn missing_subcommand_shows_usage() {
    Command::cargo_bin("weightd")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicates::str::contains("Usage"));
}

#[test]
fn missing_config_file_falls_back_to_defaults_in_demo() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("does-not-exist.toml");

    Command::cargo_bin("weightd")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .arg("--demo")
        .arg("read")
        .arg("--count")
        .arg("1")
        .assert()
        .success();
}
