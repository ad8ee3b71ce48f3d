/// Structured logging for the snowfall tracker
///
/// Provides context-rich logging with station/region identifiers and
/// severity levels on top of `tracing`. Supports console output on stderr
/// and optional append-to-file logging.

use std::fmt;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, Layer, fmt as tfmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ConfigError;
use crate::model::{DiscoveryError, StationFetchError};

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Parses `debug`, `info`, `warn`/`warning` or `error`, case-insensitively.
    pub fn parse(s: &str) -> Option<LogLevel> {
        match s.to_ascii_lowercase().as_str() {
            "debug" | "trace" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    fn filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline Stages
// ---------------------------------------------------------------------------

/// Which part of a run a log line comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discovery,
    Station,
    Pipeline,
    Config,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Discovery => write!(f, "DISCOVERY"),
            Stage::Station => write!(f, "STATION"),
            Stage::Pipeline => write!(f, "PIPELINE"),
            Stage::Config => write!(f, "CONFIG"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - station may be offline, decommissioned, or in maintenance
    Expected,
    /// Unexpected failure - indicates service degradation or configuration issue
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides `min_level` when set. Calling this twice is harmless;
/// the second call leaves the first subscriber in place.
pub fn init_logger(
    min_level: LogLevel,
    log_file: Option<&Path>,
    console_timestamps: bool,
) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("snowfall_tracker={}", min_level.filter_directive()))
    });

    let console = if console_timestamps {
        tfmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tfmt::layer()
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tfmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init();
    Ok(())
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Log a general informational message
pub fn info(stage: Stage, id: Option<&str>, message: &str) {
    tracing::info!(stage = %stage, id = id.unwrap_or("-"), "{}", message);
}

/// Log a warning message
pub fn warn(stage: Stage, id: Option<&str>, message: &str) {
    tracing::warn!(stage = %stage, id = id.unwrap_or("-"), "{}", message);
}

/// Log an error message
pub fn error(stage: Stage, id: Option<&str>, message: &str) {
    tracing::error!(stage = %stage, id = id.unwrap_or("-"), "{}", message);
}

/// Log a debug message
pub fn debug(stage: Stage, id: Option<&str>, message: &str) {
    tracing::debug!(stage = %stage, id = id.unwrap_or("-"), "{}", message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a station fetch failure.
///
/// A 404 means AWDB no longer serves the station, which happens when a site
/// is retired between discovery and fetch. Other statuses and transport
/// faults point at the service; payload problems could be either.
pub fn classify_station_failure(err: &StationFetchError) -> FailureType {
    match err {
        StationFetchError::Status(404) => FailureType::Expected,
        StationFetchError::Status(_) => FailureType::Unexpected,
        StationFetchError::Transport(_) => FailureType::Unexpected,
        StationFetchError::Payload(_) => FailureType::Unknown,
    }
}

/// Classify a discovery failure. Discovery failures end the run, so nothing
/// here is expected.
pub fn classify_discovery_failure(err: &DiscoveryError) -> FailureType {
    match err {
        DiscoveryError::Status(_) | DiscoveryError::Transport(_) => FailureType::Unexpected,
        DiscoveryError::Payload(_) => FailureType::Unknown,
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

fn log_classified(stage: Stage, id: &str, failure_type: FailureType, message: &str) {
    match failure_type {
        FailureType::Expected => debug(stage, Some(id), message),
        FailureType::Unexpected => error(stage, Some(id), message),
        FailureType::Unknown => warn(stage, Some(id), message),
    }
}

/// Log a station fetch failure, keyed by the station's display name.
pub fn log_station_failure(display_name: &str, err: &StationFetchError) {
    let failure_type = classify_station_failure(err);
    let message = format!("Snow depth fetch failed [{}]: {}", failure_type, err);
    log_classified(Stage::Station, display_name, failure_type, &message);
}

/// Log a station whose fetch succeeded but returned no readings.
pub fn log_empty_series(display_name: &str) {
    warn(
        Stage::Station,
        Some(display_name),
        "Snow depth series was empty for the lookback window",
    );
}

/// Log a discovery failure for a region.
pub fn log_discovery_failure(region_key: &str, err: &DiscoveryError) {
    let failure_type = classify_discovery_failure(err);
    let message = format!("Station discovery failed [{}]: {}", failure_type, err);
    log_classified(Stage::Discovery, region_key, failure_type, &message);
}

/// Log a configuration that could not be read, parsed or validated.
/// `source` names where it came from (a file path, or `cli`).
pub fn log_config_error(source: &str, err: &ConfigError) {
    error(Stage::Config, Some(source), &format!("Configuration rejected: {}", err));
}

// ---------------------------------------------------------------------------
// Run Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of one pipeline run.
pub fn log_run_summary(region_key: &str, discovered: usize, ranked: usize) {
    let failed = discovered - ranked.min(discovered);
    let message = format!(
        "Run complete: {}/{} stations ranked, {} excluded",
        ranked, discovered, failed
    );

    if failed == 0 {
        info(Stage::Pipeline, Some(region_key), &message);
    } else if ranked == 0 {
        error(Stage::Pipeline, Some(region_key), &message);
    } else {
        warn(Stage::Pipeline, Some(region_key), &message);
    }
}
