use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use snowfall_tracker::analysis::SpikePolicy;
use snowfall_tracker::logging::{self, LogLevel};
use snowfall_tracker::regions::REGION_REGISTRY;
use snowfall_tracker::render::PresentationState;
use snowfall_tracker::{SnowfallView, Tracker, TrackerConfig, verify};

#[derive(Parser, Debug)]
#[command(name = "snowfall_tracker")]
#[command(about = "Rank SNOTEL stations in a region by snowfall over the last 48 hours")]
struct Args {
    /// Region key (see --list-regions)
    region: Option<String>,

    /// List the available regions and exit
    #[arg(long)]
    list_regions: bool,

    /// Check discovery and station data for every region and exit
    #[arg(long)]
    verify: bool,

    /// Print the ranked result as JSON on stdout
    #[arg(long)]
    json: bool,

    /// TOML configuration file
    #[arg(short, long, env = "SNOWFALL_CONFIG")]
    config: Option<PathBuf>,

    /// How to treat sudden depth jumps
    #[arg(long, value_enum)]
    spike_policy: Option<SpikePolicy>,

    /// Cap on concurrent station requests
    #[arg(long)]
    max_in_flight: Option<NonZeroUsize>,

    /// Log level (debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Prefix console log lines with a timestamp
    #[arg(long)]
    log_timestamps: bool,

    /// Also append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Renders tracker states on the terminal. Status goes to stderr so that
/// `--json` output on stdout stays machine-readable.
struct TerminalView {
    json: bool,
}

impl SnowfallView for TerminalView {
    fn show(&mut self, state: &PresentationState) {
        match state {
            PresentationState::Ranked(_) if self.json => {}
            PresentationState::Ranked(_) => print!("{}", state.render_text()),
            _ => eprintln!("{}", state.render_text()),
        }
    }
}

fn build_config(args: &Args) -> Result<TrackerConfig> {
    let mut config = match &args.config {
        Some(path) => TrackerConfig::load(path).inspect_err(|e| {
            logging::log_config_error(&path.display().to_string(), e);
        })?,
        None => TrackerConfig::default(),
    }
    .with_env_overrides();

    if let Some(policy) = args.spike_policy {
        config.spike_policy = policy;
    }
    if args.max_in_flight.is_some() {
        config.max_in_flight = args.max_in_flight;
    }
    config
        .validate()
        .inspect_err(|e| logging::log_config_error("cli", e))?;
    Ok(config)
}

async fn run(args: Args) -> Result<bool> {
    if args.list_regions {
        for region in REGION_REGISTRY {
            println!("{:<10} {}", region.key, region.name);
        }
        return Ok(true);
    }

    let config = build_config(&args)?;
    let tracker = Tracker::start(config).context("Failed to start tracker")?;

    if args.verify {
        let report = verify::verify_all_regions(&tracker.pipeline()).await;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            verify::print_summary(&report);
        }
        return Ok(report.summary.regions_failed == 0);
    }

    let mut view = TerminalView { json: args.json };
    let result = tracker
        .on_fetch_requested(args.region.as_deref(), &mut view)
        .await;

    match result {
        Some(ranked) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&ranked)?);
            }
            Ok(true)
        }
        None => Ok(false),
    }
}

fn main() {
    let args = Args::parse();

    let level = LogLevel::parse(&args.log_level).unwrap_or_else(|| {
        eprintln!("Unknown log level '{}', using info", args.log_level);
        LogLevel::Info
    });
    if let Err(e) = logging::init_logger(level, args.log_file.as_deref(), args.log_timestamps) {
        eprintln!("Failed to open log file: {}", e);
        process::exit(1);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Failed to create async runtime: {}", e);
            process::exit(1);
        });

    match runtime.block_on(run(args)) {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
