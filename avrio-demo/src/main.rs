//! avrio demo
//!
//! Runs the event loop, scheduler and interrupt sources on a simulated
//! ATmega328P and reports what happened. `RUST_LOG=debug` shows every
//! event, `RUST_LOG=trace` every job run.

use std::path::PathBuf;

use clap::Parser;
use log::info;

use avrio_demo::{run_simulation, DemoConfig, DemoError, DemoQueue};

/// Queue shared by the simulated interrupt handlers and the main loop
static EVENTS: DemoQueue = DemoQueue::new();

#[derive(Parser)]
#[command(name = "avrio-demo")]
#[command(about = "Run the avrio event loop on a simulated ATmega328P")]
struct Cli {
    /// TOML config file (default: the embedded demo.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the simulated run time
    #[arg(short, long)]
    duration_ms: Option<u32>,
}

fn main() -> Result<(), DemoError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = DemoConfig::load(cli.config.as_deref())?;
    if let Some(duration_ms) = cli.duration_ms {
        config.duration_ms = duration_ms;
    }
    info!(
        "avrio demo starting: tick {:?}, {} jobs",
        config.scheduler.tick,
        config.jobs.len()
    );

    let report = run_simulation(&config, &EVENTS)?;

    info!(
        "simulated {} ms (clock {} ms, scheduler {} ms)",
        report.elapsed_ms, report.clock_ms, report.scheduler_ms
    );
    for job in &report.jobs {
        info!(
            "job {}: {} runs, {} LED transitions",
            job.name, job.runs, job.led_transitions
        );
    }
    info!(
        "buttons: {} presses, INT0: {} events, overflows: {}, spurious: {}",
        report.button_presses, report.external_events, report.overflows, report.spurious
    );
    Ok(())
}
