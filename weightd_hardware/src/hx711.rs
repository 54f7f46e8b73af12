use std::time::Duration;
use tracing::trace;

use crate::error::{HwError, Result};
use crate::{sign_extend_24, util::wait_until_low_with_timeout};

/// Bit-banged HX711 driver over two GPIO lines (BCM numbering).
///
/// Owns the gain/channel selection: `gain_pulses` extra clock pulses are
/// issued after the 24 data bits (1 = channel A gain 128, 2 = channel B
/// gain 32, 3 = channel A gain 64). The selection is fixed at
/// construction; the chip applies it to the *next* conversion.
pub struct Hx711 {
    dt: rppal::gpio::InputPin,
    sck: rppal::gpio::OutputPin,
    gain_pulses: u8,
}

impl Hx711 {
    pub fn new(dt_pin: u8, sck_pin: u8, gain_pulses: u8) -> Result<Self> {
        if !(1..=3).contains(&gain_pulses) {
            return Err(HwError::InvalidGain(gain_pulses));
        }
        let gpio = rppal::gpio::Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
        let dt = gpio
            .get(dt_pin)
            .map_err(|e| HwError::Gpio(format!("DT pin {dt_pin}: {e}")))?
            .into_input();
        let mut sck = gpio
            .get(sck_pin)
            .map_err(|e| HwError::Gpio(format!("SCK pin {sck_pin}: {e}")))?
            .into_output();
        sck.set_low(); // clock idle low
        Ok(Self {
            dt,
            sck,
            gain_pulses,
        })
    }

    /// Read one raw sample, waiting at most `timeout` for data-ready.
    ///
    /// A chip that is absent or disconnected never pulls DT low and
    /// surfaces as `HwError::NotReady`; callers treat that as a skipped
    /// tick, not a fatal condition.
    pub fn read_with_timeout(&mut self, timeout: Duration) -> Result<i32> {
        wait_until_low_with_timeout(
            || self.dt.is_high(),
            timeout,
            Duration::from_micros(200),
        )?;

        // Clock out 24 bits, MSB first
        let mut value: i32 = 0;
        for _ in 0..24 {
            self.sck.set_high();
            spin_delay_100ns();
            value = (value << 1) | i32::from(self.dt.is_high());
            self.sck.set_low();
            spin_delay_100ns();
        }

        // Gain/channel selection for the next conversion
        for _ in 0..self.gain_pulses {
            self.sck.set_high();
            spin_delay_100ns();
            self.sck.set_low();
            spin_delay_100ns();
        }

        let value = sign_extend_24(value);
        trace!(raw = value, "hx711 raw read");
        Ok(value)
    }
}

impl weightd_traits::LoadCellAdc for Hx711 {
    fn read_raw(
        &mut self,
        timeout: Duration,
    ) -> std::result::Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        self.read_with_timeout(timeout).map_err(Into::into)
    }
}

#[inline(always)]
fn spin_delay_100ns() {
    // HX711 needs >=0.2us between clock edges; a few CPU cycles suffice.
    std::hint::spin_loop();
}
