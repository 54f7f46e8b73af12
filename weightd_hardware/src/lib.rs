//! ADC backends for the weight gateway.
//!
//! Two implementations of `weightd_traits::LoadCellAdc`:
//! - `hx711::Hx711` (feature `hardware`): bit-banged HX711 over rppal GPIO.
//! - `synthetic::SyntheticAdc`: demo-mode generator with the same contract.

pub mod error;
pub mod synthetic;
pub mod util;

#[cfg(feature = "hardware")]
pub mod hx711;

/// Sign-extend a 24-bit two's-complement value to `i32`.
///
/// The HX711 shifts out 24 bits MSB-first; bit 23 is the sign bit.
#[inline]
#[must_use]
pub fn sign_extend_24(value: i32) -> i32 {
    if (value & 0x80_0000) != 0 {
        value | !0xFF_FFFF
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::sign_extend_24;

    #[test]
    fn negative_full_scale() {
        assert_eq!(sign_extend_24(0x80_0000), -8_388_608);
    }

    #[test]
    fn positive_full_scale() {
        assert_eq!(sign_extend_24(0x7F_FFFF), 8_388_607);
    }

    #[test]
    fn zero() {
        assert_eq!(sign_extend_24(0x00_0000), 0);
    }

    #[test]
    fn minus_one() {
        assert_eq!(sign_extend_24(0xFF_FFFF), -1);
    }
}
