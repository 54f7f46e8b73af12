//! Test and helper doubles for weightd_core.

use std::time::Duration;

use weightd_traits::LoadCellAdc;

/// ADC that replays a fixed sequence, then repeats the last value.
pub struct SeqAdc {
    seq: Vec<i32>,
    idx: usize,
}

impl SeqAdc {
    #[must_use]
    pub fn new(seq: impl Into<Vec<i32>>) -> Self {
        Self {
            seq: seq.into(),
            idx: 0,
        }
    }
}

impl LoadCellAdc for SeqAdc {
    fn read_raw(
        &mut self,
        _timeout: Duration,
    ) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        let v = if self.idx < self.seq.len() {
            let x = self.seq[self.idx];
            self.idx += 1;
            x
        } else {
            self.seq.last().copied().unwrap_or(0)
        };
        Ok(v)
    }
}

/// ADC that is never ready, like an absent or disconnected chip.
pub struct NoopAdc;

impl LoadCellAdc for NoopAdc {
    fn read_raw(
        &mut self,
        _timeout: Duration,
    ) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        Err("adc not ready within timeout".into())
    }
}

/// ADC that succeeds `good` times, then reports not-ready forever.
pub struct FlakyAdc {
    inner: SeqAdc,
    good: usize,
    served: usize,
}

impl FlakyAdc {
    #[must_use]
    pub fn new(seq: impl Into<Vec<i32>>, good: usize) -> Self {
        Self {
            inner: SeqAdc::new(seq),
            good,
            served: 0,
        }
    }
}

impl LoadCellAdc for FlakyAdc {
    fn read_raw(
        &mut self,
        timeout: Duration,
    ) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        if self.served >= self.good {
            return Err("adc not ready within timeout".into());
        }
        self.served += 1;
        self.inner.read_raw(timeout)
    }
}

/// In-memory calibration store recording every persist call.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub persisted: std::sync::Mutex<Vec<(f64, f64)>>,
}

impl weightd_traits::CalibrationStore for MemoryStore {
    fn persist(
        &self,
        scale: f64,
        offset: f64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Ok(mut log) = self.persisted.lock() {
            log.push((scale, offset));
        }
        Ok(())
    }
}

/// Calibration store whose writes always fail, for degraded-persistence paths.
#[derive(Debug, Default)]
pub struct FailingStore;

impl weightd_traits::CalibrationStore for FailingStore {
    fn persist(
        &self,
        _scale: f64,
        _offset: f64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Err("store unavailable".into())
    }
}
