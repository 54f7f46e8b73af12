//! Background sampling loop.
//!
//! Spawns a thread that owns the ADC and drives the whole pipeline at a
//! fixed cadence: read raw → median filter → calibrate → classify →
//! publish into the shared `GatewayState`. Failed reads skip the tick
//! (no fabricated values) and feed the consecutive-failure counter; the
//! loop retries forever and never takes the process down with it.
//!
//! Safety: each `Sampler` spawns exactly one thread that is shut down
//! when the `Sampler` is dropped, preventing thread leaks.

use crossbeam_channel as xch;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use weightd_traits::LoadCellAdc;
use weightd_traits::clock::Clock;

use crate::filter::MedianWindow;
use crate::hw_error::map_adc_error;
use crate::reading::Reading;
use crate::stability::{StabilityCfg, StabilityClassifier};
use crate::state::GatewayState;

#[derive(Debug, Clone, Copy)]
pub struct SamplingCfg {
    /// Samples per second, 1..=80.
    pub sample_rate_hz: u32,
    /// Median window length in raw samples.
    pub median_window: usize,
    /// Hard bound on each ADC read.
    pub read_timeout: Duration,
    /// Consecutive failures before health reports hardware-unavailable.
    pub failure_threshold: u32,
    pub stability: StabilityCfg,
}

impl Default for SamplingCfg {
    fn default() -> Self {
        Self {
            sample_rate_hz: 10,
            median_window: 5,
            read_timeout: Duration::from_millis(100),
            failure_threshold: 10,
            stability: StabilityCfg::default(),
        }
    }
}

impl From<&weightd_config::Config> for SamplingCfg {
    fn from(cfg: &weightd_config::Config) -> Self {
        Self {
            sample_rate_hz: cfg.filter.sample_rate_hz,
            median_window: cfg.filter.median_window,
            read_timeout: Duration::from_millis(cfg.hardware.sensor_read_timeout_ms),
            failure_threshold: cfg.hardware.failure_threshold,
            stability: (&cfg.stability).into(),
        }
    }
}

/// Tick period in microseconds for a sampling rate in Hz, clamped so a
/// zero rate cannot divide by zero and the period is at least 1us.
#[inline]
fn period_us(hz: u32) -> u64 {
    (1_000_000 / u64::from(hz.max(1))).max(1)
}

pub struct Sampler {
    raw_rx: xch::Receiver<i32>,
    /// Shutdown flag for immediate response (atomic for lock-free check)
    shutdown: Arc<AtomicBool>,
    /// Join handle for graceful thread cleanup
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Sampler {
    pub fn spawn<A, C>(mut adc: A, state: Arc<GatewayState>, cfg: SamplingCfg, clock: C) -> Self
    where
        A: LoadCellAdc + Send + 'static,
        C: Clock + Send + Sync + 'static,
    {
        // Bounded latest-raw tap for diagnostics; the shared state is the
        // real delivery path, so a full channel is simply skipped.
        let (raw_tx, raw_rx) = xch::bounded(1);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = shutdown.clone();
        let period = Duration::from_micros(period_us(cfg.sample_rate_hz));

        let join_handle = std::thread::spawn(move || {
            let mut window = MedianWindow::new(cfg.median_window);
            let mut classifier = StabilityClassifier::new(cfg.stability);
            let mut seen_epoch = state.calibration_epoch();

            loop {
                // Immediate shutdown check (lock-free atomic)
                if shutdown_flag.load(Ordering::Relaxed) {
                    tracing::debug!("sampling thread received shutdown signal");
                    break;
                }

                match adc.read_raw(cfg.read_timeout) {
                    Ok(raw) => {
                        let _ = raw_tx.try_send(raw);
                        window.push(raw);
                        if let Some(filtered) = window.median() {
                            state.set_filtered_raw(filtered);

                            // Calibration may have changed since the last
                            // tick; a moved baseline voids the history.
                            let epoch = state.calibration_epoch();
                            if epoch != seen_epoch {
                                classifier.reset();
                                seen_epoch = epoch;
                            }

                            let grams = state.calibration().convert(filtered);
                            let stable = classifier.update(grams);
                            state.publish_reading(Reading::now(grams, stable));
                        }
                        state.record_success();
                    }
                    Err(e) => {
                        // Skip the tick: never push a fabricated sample.
                        let failures = state.record_failure(cfg.failure_threshold);
                        let mapped = map_adc_error(&*e);
                        if failures == cfg.failure_threshold {
                            tracing::warn!(
                                failures,
                                error = %mapped,
                                "adc unavailable, degrading health and retrying"
                            );
                        } else {
                            tracing::debug!(failures, error = %mapped, "adc read failed, tick skipped");
                        }
                    }
                }

                // Check shutdown before sleep to avoid unnecessary delay
                if shutdown_flag.load(Ordering::Relaxed) {
                    break;
                }
                clock.sleep(period);
            }
            tracing::trace!("sampling thread exiting cleanly");
        });

        Self {
            raw_rx,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Most recent raw sample seen by the loop, if any. Diagnostics only;
    /// calibrated readings come from `GatewayState::latest_reading`.
    pub fn latest_raw(&self) -> Option<i32> {
        self.raw_rx.try_iter().last()
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        // Signal shutdown immediately; the thread exits after at most one
        // ADC read (bounded by the read timeout) plus one sleep period.
        self.shutdown.store(true, Ordering::Relaxed);

        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("sampling thread joined successfully");
                }
                Err(e) => {
                    // Thread panicked; log but don't propagate (we're in Drop)
                    tracing::warn!(?e, "sampling thread panicked during shutdown");
                }
            }
        }
    }
}
