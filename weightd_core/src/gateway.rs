//! Operator-facing facade over the shared state.
//!
//! The transport layer holds a `WeightGateway` and calls these methods
//! from its request handlers; the sampling thread only ever sees the
//! underlying `GatewayState`. All calibration actions are atomic
//! all-or-nothing: input faults reject synchronously without mutating.

use std::sync::Arc;

use tracing::{info, warn};
use weightd_traits::CalibrationStore;

use crate::calibration::CalibrationState;
use crate::error::{ConfigPersistError, GatewayError};
use crate::reading::Reading;
use crate::state::{GatewayState, HealthStatus};

pub struct WeightGateway {
    state: Arc<GatewayState>,
    store: Box<dyn CalibrationStore + Send + Sync>,
}

impl WeightGateway {
    pub fn new(state: Arc<GatewayState>, store: Box<dyn CalibrationStore + Send + Sync>) -> Self {
        Self { state, store }
    }

    /// Shared state handle for the sampling loop and health endpoint.
    #[must_use]
    pub fn state(&self) -> Arc<GatewayState> {
        Arc::clone(&self.state)
    }

    /// Non-blocking; `None` before the first sample is published.
    #[must_use]
    pub fn latest_reading(&self) -> Option<Reading> {
        self.state.latest_reading()
    }

    #[must_use]
    pub fn health(&self) -> HealthStatus {
        self.state.health()
    }

    #[must_use]
    pub fn calibration(&self) -> CalibrationState {
        self.state.calibration()
    }

    /// Capture the current filtered raw value as the new zero reference.
    /// Returns the new offset. Subsequent readings show ~0 g until the
    /// load changes.
    pub fn tare(&self) -> Result<f64, GatewayError> {
        self.rebaseline("tare")
    }

    /// Identical contract to `tare()`: operators distinguish "remove my
    /// container" from "this should read zero", the computation does not.
    pub fn zero(&self) -> Result<f64, GatewayError> {
        self.rebaseline("zero")
    }

    /// Derive the scale from a known reference mass currently on the
    /// scale. Returns the new scale (grams per raw count) for operator
    /// confirmation.
    pub fn calibrate(&self, known_grams: f64) -> Result<f64, GatewayError> {
        let filtered = self.state.filtered_raw().ok_or(GatewayError::NotReady)?;
        let (result, snapshot) = self
            .state
            .update_calibration(|cal| cal.derive_scale(known_grams, filtered));
        let scale = result?;
        info!(known_grams, filtered_raw = filtered, scale, "calibrated");
        self.persist(snapshot);
        Ok(scale)
    }

    fn rebaseline(&self, action: &'static str) -> Result<f64, GatewayError> {
        let filtered = self.state.filtered_raw().ok_or(GatewayError::NotReady)?;
        let ((), snapshot) = self
            .state
            .update_calibration(|cal| cal.rebaseline(filtered));
        info!(action, offset = snapshot.offset, "re-baselined zero reference");
        self.persist(snapshot);
        Ok(snapshot.offset)
    }

    /// Persist outside the calibration lock. On failure the in-memory
    /// state stays authoritative for the running gateway; the health
    /// surface flags the calibration as unpersisted until a later
    /// mutation succeeds.
    fn persist(&self, cal: CalibrationState) {
        match self.store.persist(cal.scale, cal.offset) {
            Ok(()) => self.state.set_calibration_persisted(true),
            Err(e) => {
                let err = ConfigPersistError(e.to_string());
                warn!(error = %err, "in-memory calibration still active, flagged unpersisted");
                self.state.set_calibration_persisted(false);
            }
        }
    }
}
