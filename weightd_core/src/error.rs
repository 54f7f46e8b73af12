use thiserror::Error;

/// Calibration-input faults: rejected synchronously, state unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalibrationError {
    #[error("invalid reference: {0}")]
    InvalidReference(&'static str),
}

/// Config-store write failure. The in-memory calibration still updates;
/// the change is flagged unpersisted on the health surface.
#[derive(Debug, Error, Clone)]
#[error("config persist failed: {0}")]
pub struct ConfigPersistError(pub String);

#[derive(Debug, Error, Clone)]
pub enum GatewayError {
    /// No filtered value has been produced yet (before the first
    /// successful sample, or while hardware is absent).
    #[error("no reading available yet")]
    NotReady,
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[error("timeout waiting for sensor")]
    Timeout,
    #[error("hardware error: {0}")]
    Hardware(String),
}
