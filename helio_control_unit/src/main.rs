//! # HELIO Control Unit
//!
//! Runs the tracking control loop against the built-in simulation rig.
//!
//! Loads the TOML configuration, commands the initial angles, waits for the
//! servos to settle and then cycles until SIGINT/SIGTERM or until the
//! optional cycle budget is spent.

use clap::Parser;
use helio_common::consts::DEFAULT_CONFIG_PATH;
use helio_common::tracker::io::SystemClock;
use helio_common::tracker::state::Axis;
use helio_control_unit::config::{LoadedConfig, load_config};
use helio_control_unit::control::clamp::clamp_to;
use helio_control_unit::cycle::CycleRunner;
use helio_control_unit::sim::SimulatedRig;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

/// HELIO Control Unit — two-axis light tracking loop
#[derive(Parser, Debug)]
#[command(name = "helio_control_unit")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Two-axis light tracking control loop")]
struct Args {
    /// Path to the tracker configuration TOML.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Stop after this many cycles (default: run until interrupted).
    #[arg(long, value_name = "N")]
    cycles: Option<u64>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    // Config is read before tracing so its log level can apply.
    let loaded = load_config(&args.config);
    let level = match &loaded {
        Ok(config) => config.shared.log_level.into(),
        Err(_) => Level::INFO,
    };
    setup_tracing(&args, level);

    info!("HELIO Control Unit v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = loaded
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|config| run(&args, config));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("HELIO Control Unit shutdown complete");
}

fn run(args: &Args, loaded: LoadedConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        service = %loaded.shared.service_name,
        config = %args.config.display(),
        "Config OK: cycle_delay={}ms, settle_delay={}ms",
        loaded.tracker.cycle_delay_ms,
        loaded.tracker.settle_delay_ms,
    );

    let initial = Axis::ALL.map(|axis| {
        let axis_config = loaded.tracker.axis(axis);
        clamp_to(axis_config.initial_angle, axis_config.limits())
    });
    let rig = SimulatedRig::new(loaded.simulation_or_default(), initial);

    let mut runner = CycleRunner::new(
        loaded.tracker,
        rig.sensor(),
        rig.actuator(),
        rig.remote(),
        SystemClock,
    )?;

    // Setup signal handler for graceful shutdown.
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    runner.start();
    info!("CycleRunner initialized, entering control loop");
    runner.run(&running, args.cycles);
    runner.log_stats();

    let world = rig.snapshot();
    info!(
        sun_vertical = world.sun[Axis::Vertical.index()],
        sun_horizontal = world.sun[Axis::Horizontal.index()],
        panel_vertical = world.panel[Axis::Vertical.index()],
        panel_horizontal = world.panel[Axis::Horizontal.index()],
        commands = world.commands,
        "Simulation finished"
    );

    Ok(())
}

/// Setup tracing subscriber based on CLI arguments and the configured level.
fn setup_tracing(args: &Args, configured: Level) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        configured
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
