//! # stepper-position
//!
//! Runs the motion controller and accepts one command per line on stdin
//! (`goto 2048`, `nudge -10`, `stop`, `speed 300`, `zero`, `limit 8000`,
//! `spr 4096`, `status`, `history`). Every command is answered with one
//! JSON line on stdout. Logs go to stderr.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use stepper_position::{
    load_config, select_coils, Command, ControllerConfig, FileStateStore, LogLevel,
    MotionController, Reply,
};

/// Single-axis stepper position controller
#[derive(Parser, Debug)]
#[command(name = "stepper-position")]
#[command(version)]
#[command(about = "Half-step stepper position controller with persisted state")]
struct Args {
    /// Path to the controller configuration TOML. Defaults apply when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the persisted state file from the configuration.
    #[arg(long, value_name = "FILE")]
    state_file: Option<PathBuf>,

    /// Run without GPIO access.
    #[arg(long)]
    simulate: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                setup_tracing(&args, LogLevel::Info);
                error!("FATAL: {e}");
                process::exit(1);
            }
        },
        None => ControllerConfig::default(),
    };
    setup_tracing(&args, config.log_level);

    info!("stepper-position v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args, config) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("stepper-position shutdown complete");
}

fn run(args: &Args, config: ControllerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state_file = args
        .state_file
        .clone()
        .unwrap_or_else(|| config.state_file.clone());
    info!("Using state file {:?}", state_file);

    let coils = select_coils(&config.pins, args.simulate);
    let store = FileStateStore::new(state_file, config.motor);
    let mut controller = MotionController::spawn(coils, store, config.timing)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = match Command::parse(&line, &config.motor) {
            Ok(command) => command.apply(&controller),
            Err(e) => Reply::rejected(&e),
        };
        serde_json::to_writer(&mut stdout, &reply)?;
        writeln!(stdout)?;
        stdout.flush()?;
    }

    info!("Input closed, shutting down");
    controller.shutdown();
    Ok(())
}

fn setup_tracing(args: &Args, configured: LogLevel) {
    let directive: Directive = if args.verbose {
        Level::DEBUG.into()
    } else {
        match configured.as_directive().parse() {
            Ok(directive) => directive,
            Err(_) => Level::INFO.into(),
        }
    };

    let filter = EnvFilter::from_default_env().add_directive(directive);

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .compact()
            .init();
    }
}
