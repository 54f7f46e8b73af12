mod cli;

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use crossbeam_channel::RecvTimeoutError;
use eyre::{Result, WrapErr};
use tracing::{info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use cli::{Cli, Commands, FILE_GUARD};
use weightd_config::{Config, TomlCalibrationStore};
use weightd_core::{GatewayState, Sampler, WeightGateway};
use weightd_hardware::synthetic::SyntheticAdc;
use weightd_traits::{LoadCellAdc, MonotonicClock};

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    let mut cfg = if args.config.exists() {
        weightd_config::load_path(&args.config)?
    } else {
        Config::default()
    };
    if args.demo {
        cfg.hardware.demo_mode = true;
    }

    init_tracing(&args, &cfg)?;
    if !args.config.exists() {
        warn!(path = %args.config.display(), "config file not found, using defaults");
    }

    if cfg.hardware.demo_mode {
        let adc = SyntheticAdc::default();
        serve(adc, &args, &cfg)
    } else {
        build_hardware_adc(&cfg).and_then(|adc| serve(adc, &args, &cfg))
    }
}

#[cfg(feature = "hardware")]
fn build_hardware_adc(cfg: &Config) -> Result<weightd_hardware::hx711::Hx711> {
    weightd_hardware::hx711::Hx711::new(
        cfg.pins.hx711_dt,
        cfg.pins.hx711_sck,
        cfg.hardware.gain_pulses,
    )
    .wrap_err("initializing HX711 GPIO driver")
}

#[cfg(not(feature = "hardware"))]
fn build_hardware_adc(_cfg: &Config) -> Result<SyntheticAdc> {
    eyre::bail!(
        "this build has no GPIO support (feature `hardware` disabled); \
         run with --demo or set hardware.demo_mode = true"
    )
}

/// Wire the pipeline and execute the requested command.
fn serve(adc: impl LoadCellAdc + Send + 'static, args: &Cli, cfg: &Config) -> Result<()> {
    let state = Arc::new(GatewayState::new(cfg.calibration.into()));
    let store = TomlCalibrationStore::new(&args.config);
    let gateway = WeightGateway::new(state.clone(), Box::new(store));
    let sampler = Sampler::spawn(adc, state, cfg.into(), MonotonicClock::new());

    let period = Duration::from_millis((1000 / u64::from(cfg.filter.sample_rate_hz.max(1))).max(1));
    let result = match args.cmd {
        Commands::Run => stream_readings(&gateway, period, None),
        Commands::Read { count } => stream_readings(&gateway, period, Some(count)),
        Commands::Tare => {
            wait_for_first_sample(&gateway, period)?;
            let offset = gateway.tare()?;
            println!("{}", serde_json::json!({ "status": "ok", "offset": offset }));
            Ok(())
        }
        Commands::Zero => {
            wait_for_first_sample(&gateway, period)?;
            let offset = gateway.zero()?;
            println!("{}", serde_json::json!({ "status": "ok", "offset": offset }));
            Ok(())
        }
        Commands::Calibrate { grams } => {
            wait_for_first_sample(&gateway, period)?;
            let scale = gateway.calibrate(grams)?;
            println!("{}", serde_json::json!({ "status": "ok", "scale": scale }));
            Ok(())
        }
    };

    // Dropping the sampler joins the sampling thread; calibration is
    // already persisted by this point.
    drop(sampler);
    result
}

/// Print readings as JSON lines, one per sampling tick, until the count
/// is reached (or ctrl-c for an unbounded run).
fn stream_readings(gateway: &WeightGateway, period: Duration, count: Option<u32>) -> Result<()> {
    let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = stop_tx.try_send(());
    })
    .wrap_err("installing ctrl-c handler")?;

    // Bounded runs must not hang forever when the chip is absent.
    let deadline = count.map(|n| {
        Instant::now() + period * (n.saturating_mul(10).max(10)) + Duration::from_secs(5)
    });

    let mut printed = 0u32;
    let mut last_ts = None;
    loop {
        match stop_rx.recv_timeout(period) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                info!("shutting down");
                return Ok(());
            }
            Err(RecvTimeoutError::Timeout) => {}
        }

        if let Some(reading) = gateway.latest_reading()
            && last_ts != Some(reading.ts)
        {
            last_ts = Some(reading.ts);
            println!("{}", serde_json::to_string(&reading)?);
            printed += 1;
            if count.is_some_and(|n| printed >= n) {
                return Ok(());
            }
        }

        if let Some(deadline) = deadline
            && Instant::now() >= deadline
        {
            eyre::bail!(
                "no readings after {printed} of {} (hardware absent or not ready)",
                count.unwrap_or(0)
            );
        }
    }
}

/// Calibration actions need a filtered value; give the loop a moment to
/// produce one before rejecting.
fn wait_for_first_sample(gateway: &WeightGateway, period: Duration) -> Result<()> {
    let deadline = Instant::now() + (period * 20).max(Duration::from_secs(5));
    while gateway.latest_reading().is_none() {
        if Instant::now() >= deadline {
            eyre::bail!("no sample from the ADC; check wiring or run with --demo");
        }
        std::thread::sleep(period.min(Duration::from_millis(50)));
    }
    Ok(())
}

fn init_tracing(args: &Cli, cfg: &Config) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = cfg.logging.level.as_deref().unwrap_or(&args.log_level);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match cfg.logging.file.as_deref() {
        Some(path) => Some(file_appender_layer(path, cfg.logging.rotation.as_deref())?),
        None => None,
    };

    let console = if args.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console)
        .init();
    Ok(())
}

type FileLayer<S> = tracing_subscriber::fmt::Layer<
    S,
    tracing_subscriber::fmt::format::JsonFields,
    tracing_subscriber::fmt::format::Format<tracing_subscriber::fmt::format::Json>,
    tracing_appender::non_blocking::NonBlocking,
>;

fn file_appender_layer<S>(path: &str, rotation: Option<&str>) -> Result<FileLayer<S>>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let path = Path::new(path);
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| eyre::eyre!("logging.file has no file name: {path:?}"))?;

    let appender = match rotation.unwrap_or("never") {
        "daily" => tracing_appender::rolling::daily(dir, name),
        "hourly" => tracing_appender::rolling::hourly(dir, name),
        "never" => tracing_appender::rolling::never(dir, name),
        other => eyre::bail!("logging.rotation must be never|daily|hourly, got {other:?}"),
    };
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = FILE_GUARD.set(guard);

    Ok(tracing_subscriber::fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(non_blocking))
}
