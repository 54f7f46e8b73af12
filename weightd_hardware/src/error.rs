use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("gpio error: {0}")]
    Gpio(String),
    #[error("adc not ready within timeout")]
    NotReady,
    #[error("invalid gain pulse count: {0} (expected 1..=3)")]
    InvalidGain(u8),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
