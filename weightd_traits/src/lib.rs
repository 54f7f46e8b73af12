pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Load-cell ADC boundary.
///
/// One call yields one raw signed sample (the 24-bit conversion result
/// sign-extended to `i32`). `timeout` is a hard bound on waiting for the
/// conversion-ready condition; a chip that never becomes ready surfaces
/// as an error, not a hang.
pub trait LoadCellAdc {
    fn read_raw(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<i32, Box<dyn std::error::Error + Send + Sync>>;
}

/// Durable store for calibration parameters.
///
/// Implementations persist `scale` (grams per raw count) and `offset`
/// (raw counts at zero load) so they survive a process restart. A failed
/// persist must not invalidate the in-memory state; the caller decides
/// how to surface the failure.
pub trait CalibrationStore {
    fn persist(
        &self,
        scale: f64,
        offset: f64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
