use std::time::{Duration, Instant};

use weightd_traits::LoadCellAdc;

/// Demo-mode ADC: a plausible noisy signal around a baseline.
///
/// Satisfies the same contract as the HX711 driver (one raw sample per
/// call, always "ready") so the rest of the pipeline runs unchanged
/// without hardware. The signal is a slow sine drift plus a small fast
/// ripple, matching what a lightly loaded bench scale looks like.
pub struct SyntheticAdc {
    baseline: f64,
    drift_amplitude: f64,
    ripple_amplitude: f64,
    t0: Instant,
}

impl SyntheticAdc {
    pub fn new(baseline: f64) -> Self {
        Self {
            baseline,
            drift_amplitude: 10.0,
            ripple_amplitude: 0.5,
            t0: Instant::now(),
        }
    }

    /// A generator with no drift or ripple; reads the baseline exactly.
    /// Useful for calibration walk-throughs in demo mode.
    pub fn steady(baseline: f64) -> Self {
        Self {
            baseline,
            drift_amplitude: 0.0,
            ripple_amplitude: 0.0,
            t0: Instant::now(),
        }
    }

    fn sample(&self) -> f64 {
        let t = self.t0.elapsed().as_secs_f64();
        self.baseline
            + self.drift_amplitude * (t / 3.0).sin()
            + self.ripple_amplitude * (t * 7.0).sin()
    }
}

impl Default for SyntheticAdc {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl LoadCellAdc for SyntheticAdc {
    fn read_raw(
        &mut self,
        _timeout: Duration,
    ) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.sample().round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_within_envelope() {
        let mut adc = SyntheticAdc::new(100.0);
        for _ in 0..50 {
            let v = adc.read_raw(Duration::from_millis(1)).expect("always ready");
            assert!((89..=111).contains(&v), "out of envelope: {v}");
        }
    }

    #[test]
    fn steady_reads_baseline() {
        let mut adc = SyntheticAdc::steady(3000.0);
        assert_eq!(adc.read_raw(Duration::from_millis(1)).unwrap(), 3000);
    }
}
