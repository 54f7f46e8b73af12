#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Sampling and calibration core of the weight gateway (hardware-agnostic).
//!
//! All hardware access goes through `weightd_traits::LoadCellAdc`; the
//! transport layer (HTTP/WS/MQTT) is an external collaborator that only
//! reads published readings and invokes calibration actions.
//!
//! ## Architecture
//!
//! - **Filtering**: fixed-capacity median window over raw samples (`filter`)
//! - **Calibration**: linear raw→grams model with tare/zero/calibrate (`calibration`)
//! - **Stability**: two-state settle classifier over gram deltas (`stability`)
//! - **Sampling**: background thread driving the pipeline at a fixed cadence (`sampler`)
//! - **Sharing**: lock-guarded latest reading + calibration state (`state`)
//! - **Facade**: operator actions and health surface (`gateway`)

pub mod calibration;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod hw_error;
pub mod mocks;
pub mod reading;
pub mod sampler;
pub mod stability;
pub mod state;

pub use calibration::CalibrationState;
pub use error::{CalibrationError, GatewayError};
pub use filter::MedianWindow;
pub use gateway::WeightGateway;
pub use reading::Reading;
pub use sampler::{Sampler, SamplingCfg};
pub use stability::{StabilityCfg, StabilityClassifier};
pub use state::{GatewayState, HealthStatus};
