//! Shared gateway state: the single point of contact between the
//! sampling thread and the transport-layer handlers.
//!
//! Compound values sit behind `RwLock`s, flags and counters are atomics.
//! Every critical section is an O(1) field read or write; nothing waits
//! on hardware or network while holding a lock.

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use serde::Serialize;

use crate::calibration::CalibrationState;
use crate::reading::Reading;

/// Snapshot for the external health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub hardware_available: bool,
    pub consecutive_failures: u32,
    pub calibration_persisted: bool,
}

#[derive(Debug)]
pub struct GatewayState {
    latest: RwLock<Option<Reading>>,
    filtered_raw: RwLock<Option<f64>>,
    calibration: RwLock<CalibrationState>,
    /// Bumped on every calibration mutation; the sampling thread resets
    /// its stability classifier when it observes a change.
    calibration_epoch: AtomicU64,
    consecutive_failures: AtomicU32,
    hardware_available: AtomicBool,
    calibration_persisted: AtomicBool,
}

/// Read a lock even if a writer panicked; the guarded values are plain
/// data and never left half-written.
fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl GatewayState {
    #[must_use]
    pub fn new(calibration: CalibrationState) -> Self {
        Self {
            latest: RwLock::new(None),
            filtered_raw: RwLock::new(None),
            calibration: RwLock::new(calibration),
            calibration_epoch: AtomicU64::new(0),
            consecutive_failures: AtomicU32::new(0),
            hardware_available: AtomicBool::new(true),
            calibration_persisted: AtomicBool::new(true),
        }
    }

    /// Most recently published reading; `None` before the first sample.
    /// Non-blocking apart from a brief read lock.
    pub fn latest_reading(&self) -> Option<Reading> {
        read_lock(&self.latest).clone()
    }

    pub(crate) fn publish_reading(&self, reading: Reading) {
        *write_lock(&self.latest) = Some(reading);
    }

    /// Latest filtered raw value (median output), used as the reference
    /// by tare/zero/calibrate.
    pub fn filtered_raw(&self) -> Option<f64> {
        *read_lock(&self.filtered_raw)
    }

    pub(crate) fn set_filtered_raw(&self, value: f64) {
        *write_lock(&self.filtered_raw) = Some(value);
    }

    pub fn calibration(&self) -> CalibrationState {
        *read_lock(&self.calibration)
    }

    /// Mutate calibration under the write lock and bump the epoch so the
    /// sampling thread invalidates its stability history.
    pub fn update_calibration<R>(
        &self,
        f: impl FnOnce(&mut CalibrationState) -> R,
    ) -> (R, CalibrationState) {
        let mut guard = write_lock(&self.calibration);
        let out = f(&mut guard);
        let snapshot = *guard;
        drop(guard);
        self.calibration_epoch.fetch_add(1, Ordering::Release);
        (out, snapshot)
    }

    pub fn calibration_epoch(&self) -> u64 {
        self.calibration_epoch.load(Ordering::Acquire)
    }

    pub(crate) fn record_success(&self) {
        self.consecutive_failures.store(0, Ordering::Relaxed);
        self.hardware_available.store(true, Ordering::Relaxed);
    }

    /// Count a failed tick; past `threshold` the health surface flips to
    /// hardware-unavailable. Returns the updated count.
    pub(crate) fn record_failure(&self, threshold: u32) -> u32 {
        let n = self
            .consecutive_failures
            .fetch_add(1, Ordering::Relaxed)
            .saturating_add(1);
        if n >= threshold {
            self.hardware_available.store(false, Ordering::Relaxed);
        }
        n
    }

    pub fn hardware_available(&self) -> bool {
        self.hardware_available.load(Ordering::Relaxed)
    }

    pub(crate) fn set_calibration_persisted(&self, persisted: bool) {
        self.calibration_persisted.store(persisted, Ordering::Relaxed);
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            hardware_available: self.hardware_available.load(Ordering::Relaxed),
            consecutive_failures: self.consecutive_failures.load(Ordering::Relaxed),
            calibration_persisted: self.calibration_persisted.load(Ordering::Relaxed),
        }
    }
}

impl Default for GatewayState {
    fn default() -> Self {
        Self::new(CalibrationState::default())
    }
}
