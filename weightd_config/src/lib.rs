#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and calibration persistence for the weight gateway.
//!
//! - `Config` and sub-structs round-trip through TOML and are validated.
//! - `TomlCalibrationStore` rewrites the `[calibration]` table in place so
//!   scale/offset survive a restart; everything else in the file is kept.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// GPIO pin assignment for the HX711 two-wire interface (BCM numbering).
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
#[serde(default)]
pub struct Pins {
    pub hx711_dt: u8,
    pub hx711_sck: u8,
}

impl Default for Pins {
    fn default() -> Self {
        Self {
            hx711_dt: 5,
            hx711_sck: 6,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
#[serde(default)]
pub struct FilterCfg {
    /// Sampling cadence in Hz. The HX711 supports 10/80 SPS natively;
    /// anything in 1..=80 is accepted.
    pub sample_rate_hz: u32,
    /// Median window length in samples. 1 means pass-through (no
    /// filtering), which is a valid mode for demo and bring-up.
    pub median_window: usize,
}

impl Default for FilterCfg {
    fn default() -> Self {
        Self {
            sample_rate_hz: 10,
            median_window: 5,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
#[serde(default)]
pub struct StabilityCfg {
    /// Consecutive in-tolerance deltas required before a reading is
    /// reported stable.
    pub window: usize,
    /// Maximum gram-to-gram delta still considered settled.
    pub tolerance_g: f64,
}

impl Default for StabilityCfg {
    fn default() -> Self {
        Self {
            window: 5,
            tolerance_g: 0.5,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
#[serde(default)]
pub struct Hardware {
    /// Max time to wait for HX711 data-ready (DT low) before failing a tick.
    pub sensor_read_timeout_ms: u64,
    /// Consecutive failed reads before the health surface reports the
    /// hardware as unavailable. The loop keeps retrying regardless.
    pub failure_threshold: u32,
    /// Extra clock pulses after the 24 data bits: 1 = channel A gain 128,
    /// 2 = channel B gain 32, 3 = channel A gain 64.
    pub gain_pulses: u8,
    /// Replace the GPIO driver with a synthetic signal generator.
    pub demo_mode: bool,
}

impl Default for Hardware {
    fn default() -> Self {
        Self {
            sensor_read_timeout_ms: 100,
            failure_threshold: 10,
            gain_pulses: 1,
            demo_mode: false,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

/// Persisted calibration parameters, the only state that must survive a
/// process restart.
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
#[serde(default)]
pub struct Calibration {
    /// Grams per raw count.
    pub scale_g_per_count: f64,
    /// Filtered-raw value at zero load.
    pub offset_counts: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            scale_g_per_count: 1.0,
            offset_counts: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub pins: Pins,
    pub filter: FilterCfg,
    pub stability: StabilityCfg,
    pub hardware: Hardware,
    pub logging: Logging,
    pub calibration: Calibration,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse, and validate a config file.
pub fn load_path(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Serialize and write a config file, creating parent directories.
pub fn save_path(cfg: &Config, path: &Path) -> eyre::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| eyre::eyre!("create config dir {:?}: {}", parent, e))?;
    }
    let text = toml::to_string_pretty(cfg)
        .map_err(|e| eyre::eyre!("serialize config: {}", e))?;
    std::fs::write(path, text).map_err(|e| eyre::eyre!("write config {:?}: {}", path, e))?;
    Ok(())
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Filter
        if self.filter.sample_rate_hz == 0 || self.filter.sample_rate_hz > 80 {
            eyre::bail!("filter.sample_rate_hz must be in 1..=80");
        }
        if self.filter.median_window == 0 {
            eyre::bail!("filter.median_window must be >= 1");
        }
        if self.filter.median_window > 1024 {
            eyre::bail!("filter.median_window is unreasonably large (>1024)");
        }

        // Stability
        if self.stability.window == 0 {
            eyre::bail!("stability.window must be >= 1");
        }
        if self.stability.tolerance_g <= 0.0 || !self.stability.tolerance_g.is_finite() {
            eyre::bail!("stability.tolerance_g must be a finite value > 0");
        }

        // Hardware
        if self.hardware.sensor_read_timeout_ms == 0 {
            eyre::bail!("hardware.sensor_read_timeout_ms must be >= 1");
        }
        if self.hardware.failure_threshold == 0 {
            eyre::bail!("hardware.failure_threshold must be >= 1");
        }
        if !(1..=3).contains(&self.hardware.gain_pulses) {
            eyre::bail!("hardware.gain_pulses must be 1, 2 or 3");
        }

        // Calibration
        if self.calibration.scale_g_per_count == 0.0
            || !self.calibration.scale_g_per_count.is_finite()
        {
            eyre::bail!("calibration.scale_g_per_count must be finite and non-zero");
        }
        if !self.calibration.offset_counts.is_finite() {
            eyre::bail!("calibration.offset_counts must be finite");
        }

        Ok(())
    }
}

/// Calibration store that rewrites the `[calibration]` table of a TOML
/// config file. If the file does not exist yet it is created from
/// defaults so a tare on a fresh install still persists.
#[derive(Debug, Clone)]
pub struct TomlCalibrationStore {
    path: PathBuf,
}

impl TomlCalibrationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl weightd_traits::CalibrationStore for TomlCalibrationStore {
    fn persist(
        &self,
        scale: f64,
        offset: f64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut cfg = if self.path.exists() {
            load_path(&self.path).map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                e.to_string().into()
            })?
        } else {
            Config::default()
        };
        cfg.calibration.scale_g_per_count = scale;
        cfg.calibration.offset_counts = offset;
        save_path(&cfg, &self.path).map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
            e.to_string().into()
        })?;
        Ok(())
    }
}
