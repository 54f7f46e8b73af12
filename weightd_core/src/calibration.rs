//! Linear raw→grams calibration model.
//!
//! `grams = (filtered_raw - offset) * scale` where `offset` is the
//! filtered-raw value at zero load and `scale` is grams per raw count.
//! These two fields are the only state that must survive a restart; the
//! gateway persists them through a `weightd_traits::CalibrationStore`.

use serde::{Deserialize, Serialize};

use crate::error::CalibrationError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationState {
    /// Grams per raw count. Non-zero invariant, enforced at every
    /// mutation so conversion never divides or multiplies by zero.
    pub scale: f64,
    /// Filtered-raw value representing zero load.
    pub offset: f64,
}

impl Default for CalibrationState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: 0.0,
        }
    }
}

impl CalibrationState {
    /// Convert a filtered raw value to grams. Pure; no side effects.
    #[must_use]
    pub fn convert(&self, filtered_raw: f64) -> f64 {
        // A zero scale can only come from bypassing tare/calibrate; that
        // is a fatal misconfiguration, not a recoverable input error.
        assert!(
            self.scale != 0.0,
            "calibration scale is zero; state was mutated outside calibrate()"
        );
        (filtered_raw - self.offset) * self.scale
    }

    /// Re-baseline: capture `filtered_raw` as the new zero reference.
    /// `scale` is untouched. Used by both tare and zero actions.
    pub fn rebaseline(&mut self, filtered_raw: f64) {
        self.offset = filtered_raw;
    }

    /// Derive a new scale from a known reference mass sitting on the
    /// scale. Rejects a non-positive reference and a no-load condition
    /// (`filtered_raw == offset`, zero denominator) without mutating.
    pub fn derive_scale(
        &mut self,
        known_grams: f64,
        filtered_raw: f64,
    ) -> Result<f64, CalibrationError> {
        if known_grams <= 0.0 || !known_grams.is_finite() {
            return Err(CalibrationError::InvalidReference(
                "known_grams must be a finite value > 0",
            ));
        }
        let span = filtered_raw - self.offset;
        if span == 0.0 {
            return Err(CalibrationError::InvalidReference(
                "raw value equals offset; no load detected on the scale",
            ));
        }
        let scale = known_grams / span;
        if !scale.is_finite() || scale == 0.0 {
            return Err(CalibrationError::InvalidReference(
                "derived scale is not a usable non-zero value",
            ));
        }
        self.scale = scale;
        Ok(scale)
    }
}

impl From<weightd_config::Calibration> for CalibrationState {
    fn from(c: weightd_config::Calibration) -> Self {
        Self {
            scale: c.scale_g_per_count,
            offset: c.offset_counts,
        }
    }
}
