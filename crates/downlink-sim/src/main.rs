//! Satellite telemetry & command simulator.
//!
//! Wires a satellite and a ground station to an impaired link, runs the
//! session for the requested duration, and reports the metrics of all
//! three at the end.

mod schedule;
mod sink;
mod spacecraft;

use std::{path::PathBuf, process::ExitCode, sync::Arc, thread, time::Duration};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use downlink_channel::Link;
use downlink_core::config::{ArqConfig, GroundConfig, LinkConfig, SatelliteConfig};
use downlink_endpoint::{GroundStation, Satellite};

use crate::{schedule::RotatingScheduler, sink::CsvSink, spacecraft::OrbitModel};

#[derive(Parser, Debug)]
#[command(name = "downlink-sim", version, about = "Satellite telemetry & command simulator")]
struct Args {
    /// Simulation duration in seconds
    #[arg(long, default_value_t = 20)]
    duration_sec: u64,

    /// Telemetry emission rate in Hz
    #[arg(long, default_value_t = 5.0)]
    telemetry_rate_hz: f64,

    /// Packet loss probability 0..1
    #[arg(long, default_value_t = 0.05)]
    loss: f64,

    /// Mean link latency in ms
    #[arg(long, default_value_t = 100)]
    latency_ms: u64,

    /// Latency jitter (std dev) in ms
    #[arg(long, default_value_t = 30)]
    jitter_ms: u64,

    /// ACK timeout in ms
    #[arg(long, default_value_t = 150)]
    ack_timeout_ms: u64,

    /// Maximum retry attempts
    #[arg(long, default_value_t = 3)]
    max_retries: u32,

    /// Random seed for determinism
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Telemetry log file path
    #[arg(long, default_value = "telemetry.log")]
    log_file: PathBuf,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = if err.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
            let _ = err.print();
            return code;
        }
    };

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> downlink_core::Result<()> {
    let link_config = LinkConfig {
        latency_ms: args.latency_ms,
        jitter_ms: args.jitter_ms,
        loss_prob: args.loss,
        seed: args.seed,
    };
    let arq = ArqConfig {
        ack_timeout: Duration::from_millis(args.ack_timeout_ms),
        max_retries: args.max_retries,
    };
    let sat_config =
        SatelliteConfig { telemetry_rate_hz: args.telemetry_rate_hz, arq: arq.clone() };
    let gs_config = GroundConfig { arq };

    link_config.validate()?;
    sat_config.validate()?;
    gs_config.validate()?;

    println!("=== Satellite Telemetry & Command Simulator ===");
    println!("Duration: {}s", args.duration_sec);
    println!("Telemetry rate: {} Hz", args.telemetry_rate_hz);
    println!("Loss probability: {}%", args.loss * 100.0);
    println!("Link latency: {}ms ± {}ms", args.latency_ms, args.jitter_ms);
    println!("ACK timeout: {}ms", args.ack_timeout_ms);
    println!("Max retries: {}", args.max_retries);
    println!("Random seed: {}", args.seed);
    println!("Log file: {}", args.log_file.display());
    println!("===============================================\n");

    let link = Arc::new(Link::new(link_config));

    let mut satellite = Satellite::new(
        link.clone(),
        sat_config,
        Box::new(OrbitModel::new(args.seed)),
    );

    let sink = CsvSink::create(&args.log_file)?;
    let mut station = GroundStation::new(
        link.clone(),
        gs_config,
        Box::new(sink),
        Box::new(RotatingScheduler::new(args.seed.wrapping_add(1000))),
    );

    println!("Starting simulation...");
    satellite.start();
    station.start();

    thread::sleep(Duration::from_secs(args.duration_sec));

    println!("\nStopping simulation...");
    satellite.stop();
    station.stop();

    let sat = satellite.metrics();
    let gs = station.metrics();
    let lnk = link.metrics();

    println!("\n=== Simulation Metrics ===");
    println!("Satellite:");
    println!("  Telemetry sent: {}", sat.telemetry_sent);
    println!("  Commands received: {}", sat.commands_received);
    println!("  Retries: {}", sat.retries);
    println!("  NAKs received: {}", sat.naks_received);
    println!("\nGround Station:");
    println!("  Telemetry received: {}", gs.telemetry_received);
    println!("  Commands sent: {}", gs.commands_sent);
    println!("  Retries: {}", gs.retries);
    println!("  NAKs sent: {}", gs.naks_sent);
    println!("\nLink:");
    println!("  Packets sent: {}", lnk.packets_sent);
    println!("  Packets dropped: {}", lnk.packets_dropped);
    println!("  Drop rate: {:.2}%", lnk.drop_rate() * 100.0);
    println!("==========================\n");

    println!("Telemetry logged to: {}", args.log_file.display());

    Ok(())
}
