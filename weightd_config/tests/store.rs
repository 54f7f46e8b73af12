use tempfile::tempdir;
use weightd_config::{Config, TomlCalibrationStore, load_path, save_path};
use weightd_traits::CalibrationStore;

#[test]
fn config_round_trips_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("weightd.toml");

    let mut cfg = Config::default();
    cfg.filter.sample_rate_hz = 20;
    cfg.calibration.scale_g_per_count = 0.25;
    cfg.calibration.offset_counts = 1000.0;
    save_path(&cfg, &path).expect("save");

    let loaded = load_path(&path).expect("load");
    assert_eq!(loaded.filter.sample_rate_hz, 20);
    assert_eq!(loaded.calibration.scale_g_per_count, 0.25);
    assert_eq!(loaded.calibration.offset_counts, 1000.0);
}

#[test]
fn persist_rewrites_only_calibration() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("weightd.toml");

    let mut cfg = Config::default();
    cfg.filter.median_window = 7;
    cfg.hardware.demo_mode = true;
    save_path(&cfg, &path).expect("save");

    let store = TomlCalibrationStore::new(&path);
    store.persist(0.5, 842_913.0).expect("persist");

    let loaded = load_path(&path).expect("reload");
    assert_eq!(loaded.calibration.scale_g_per_count, 0.5);
    assert_eq!(loaded.calibration.offset_counts, 842_913.0);
    // untouched settings survive the rewrite
    assert_eq!(loaded.filter.median_window, 7);
    assert!(loaded.hardware.demo_mode);
}

#[test]
fn persist_creates_file_on_fresh_install() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data").join("weightd.toml");
    assert!(!path.exists());

    let store = TomlCalibrationStore::new(&path);
    store.persist(1.0, 123.0).expect("persist");

    let loaded = load_path(&path).expect("load created file");
    assert_eq!(loaded.calibration.offset_counts, 123.0);
}

#[test]
fn persist_fails_on_unwritable_path() {
    let dir = tempdir().unwrap();
    // A directory where the file should be makes the write fail.
    let path = dir.path().join("weightd.toml");
    std::fs::create_dir(&path).unwrap();

    let store = TomlCalibrationStore::new(&path);
    assert!(store.persist(1.0, 0.0).is_err());
}
