//! Biathlon Results CLI Application
//!
//! This is the command-line interface for the biathlon race engine.
//! It uses the biathlon-engine library and adds:
//! - Locating the race configuration and event log
//! - Optional TOML run settings
//! - Text and JSON report generation

use anyhow::{Context, Result};
use biathlon_engine::{results, Interpreter, RaceConfig};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

mod config;
mod report;

use config::{OutputFormat, Overrides, RunPlan, RunSettings};
use report::Report;

/// Biathlon Results - Reconstruct race results from an event log
#[derive(Parser, Debug)]
#[command(name = "biathlon")]
#[command(about = "Reconstruct biathlon race results from an event log", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the race configuration (JSON) [default: config.json]
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to the event log [default: events]
    #[arg(short, long, value_name = "FILE")]
    events: Option<PathBuf>,

    /// Output file for the report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to run settings (settings.toml)
    #[arg(short, long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Omit the per-event narrative from text reports
    #[arg(long)]
    no_narrative: bool,

    /// Abort on the first malformed or inapplicable event line
    #[arg(long)]
    strict: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Biathlon Results CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using engine library v{}", biathlon_engine::VERSION);

    let settings = match &args.settings {
        Some(path) => {
            log::info!("Loading run settings from: {:?}", path);
            config::load_settings(path)?
        }
        None => RunSettings::default(),
    };

    let plan = settings.resolve(Overrides {
        config: args.config,
        events: args.events,
        output: args.output,
        format: args.format,
        no_narrative: args.no_narrative,
        strict: args.strict,
    });
    log::debug!("Run plan: {:?}", plan);

    run(&plan)
}

/// Process the event log and write the report
fn run(plan: &RunPlan) -> Result<()> {
    let race = RaceConfig::load(&plan.config)
        .with_context(|| format!("Failed to load race configuration: {:?}", plan.config))?;

    let events = File::open(&plan.events)
        .with_context(|| format!("Failed to open event log: {:?}", plan.events))?;

    log::info!("Interpreting event log: {:?}", plan.events);
    let mut narrative = Vec::new();
    let mut interpreter = Interpreter::new(&race).with_strict(plan.strict);
    let stats = interpreter
        .run(BufReader::new(events), &mut narrative)
        .with_context(|| format!("Failed to interpret event log: {:?}", plan.events))?;

    let store = interpreter.into_store();
    let standings = results::standings(&store);
    log::info!("{} competitor(s) in the results table", standings.len());

    let narrative = String::from_utf8_lossy(&narrative);
    let report = Report {
        config: &race,
        stats: &stats,
        narrative: &narrative,
        standings: &standings,
    };

    let mut out: Box<dyn Write> = match &plan.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output file: {:?}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    report.write(&mut out, plan.format, plan.narrative)?;
    out.flush().context("Failed to flush report")?;

    if let Some(path) = &plan.output {
        log::info!("Report written to {:?}", path);
    }
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
