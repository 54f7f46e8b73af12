//! Settle detection over consecutive calibrated readings.
//!
//! Two states, `Unstable` and `Stable`. The classifier flips up only
//! after `window` consecutive gram deltas each within `tolerance_g`, and
//! flips down immediately on a single out-of-tolerance delta. Any
//! calibration change resets it: the absolute baseline just moved, so
//! accumulated history is meaningless.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityCfg {
    /// Consecutive in-tolerance deltas required to report stable.
    pub window: usize,
    /// Maximum reading-to-reading delta, in grams, still considered settled.
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

impl From<&weightd_config::StabilityCfg> for StabilityCfg {
    fn from(c: &weightd_config::StabilityCfg) -> Self {
        Self {
            window: c.window.max(1),
            tolerance_g: c.tolerance_g,
        }
    }
}

#[derive(Debug)]
pub struct StabilityClassifier {
    cfg: StabilityCfg,
    last_grams: Option<f64>,
    in_tolerance_run: usize,
    stable: bool,
}

impl StabilityClassifier {
    #[must_use]
    pub fn new(cfg: StabilityCfg) -> Self {
        Self {
            cfg,
            last_grams: None,
            in_tolerance_run: 0,
            stable: false,
        }
    }

    /// Feed the next calibrated reading; returns the current stability.
    ///
    /// The first reading after construction or reset never reports
    /// stable: there is no history to judge it against.
    pub fn update(&mut self, grams: f64) -> bool {
        match self.last_grams {
            None => {
                self.in_tolerance_run = 0;
                self.stable = false;
            }
            Some(prev) => {
                if (grams - prev).abs() <= self.cfg.tolerance_g {
                    self.in_tolerance_run = self.in_tolerance_run.saturating_add(1);
                    if self.in_tolerance_run >= self.cfg.window {
                        self.stable = true;
                    }
                } else {
                    self.in_tolerance_run = 0;
                    self.stable = false;
                }
            }
        }
        self.last_grams = Some(grams);
        self.stable
    }

    /// Drop all history and return to `Unstable`. Called whenever
    /// calibration parameters change.
    pub fn reset(&mut self) {
        self.last_grams = None;
        self.in_tolerance_run = 0;
        self.stable = false;
    }

    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.stable
    }
}
