//! Maps `Box<dyn Error>` from the ADC trait boundary to typed `GatewayError`.
//!
//! `weightd_traits::LoadCellAdc` uses `Box<dyn Error + Send + Sync>` for
//! maximum flexibility; this module converts those to our typed enum,
//! with an optional feature-gated path for `weightd_hardware::HwError`
//! downcasting.

use crate::error::GatewayError;

/// Map a trait-boundary error to a typed `GatewayError`.
///
/// Attempts to downcast known hardware error types first, then falls
/// back to string-based heuristics.
pub fn map_adc_error(e: &(dyn std::error::Error + 'static)) -> GatewayError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<weightd_hardware::error::HwError>() {
            return match hw {
                weightd_hardware::error::HwError::NotReady => GatewayError::Timeout,
                other => GatewayError::Hardware(other.to_string()),
            };
        }
    }

    // Fallback: string-based detection
    let s = e.to_string();
    let lower = s.to_lowercase();
    if lower.contains("not ready") || lower.contains("timeout") {
        GatewayError::Timeout
    } else {
        GatewayError::Hardware(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_heuristic_detects_not_ready() {
        let e: Box<dyn std::error::Error + Send + Sync> = "adc not ready within timeout".into();
        assert!(matches!(map_adc_error(&*e), GatewayError::Timeout));
    }

    #[test]
    fn unknown_errors_map_to_hardware() {
        let e: Box<dyn std::error::Error + Send + Sync> = "gpio error: pin busy".into();
        match map_adc_error(&*e) {
            GatewayError::Hardware(msg) => assert!(msg.contains("pin busy")),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[cfg(feature = "hardware-errors")]
    #[test]
    fn typed_not_ready_downcasts_to_timeout() {
        let e: Box<dyn std::error::Error + Send + Sync> =
            Box::new(weightd_hardware::error::HwError::NotReady);
        assert!(matches!(map_adc_error(&*e), GatewayError::Timeout));
    }
}
