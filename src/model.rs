/// Core data types for the snowfall tracker.
///
/// This module defines the shared domain model imported by all other modules:
/// station descriptors as returned by discovery, raw depth readings, the
/// tagged snowfall metric, the immutable `Station` record and the final
/// `RankedResult`. The only logic here is construction and formatting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::aliases::AliasTable;

// ---------------------------------------------------------------------------
// Element codes
// ---------------------------------------------------------------------------

/// AWDB element code for snow depth, in inches.
pub const ELEMENT_SNOW_DEPTH: &str = "SNWD";

/// AWDB duration code for hourly series.
pub const DURATION_HOURLY: &str = "HOURLY";

// ---------------------------------------------------------------------------
// Discovery and reading types
// ---------------------------------------------------------------------------

/// One station entry from the AWDB `stations` metadata endpoint.
///
/// Only the three fields the tracker needs are kept; everything else in the
/// metadata payload is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDescriptor {
    /// `id:state:network` key, e.g. `"1308:UT:SNTL"`.
    pub station_triplet: String,
    /// Raw station name as published by NRCS.
    pub name: String,
    /// Elevation in feet. Absent for some stations.
    #[serde(default)]
    pub elevation: Option<f64>,
}

/// A single timestamped snow depth value.
///
/// `value` is optional because AWDB omits it for hours with no observation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawReading {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
}

impl RawReading {
    /// Convenience constructor for a reading with a value and no timestamp.
    pub fn of(value: f64) -> Self {
        RawReading {
            date: None,
            value: Some(value),
        }
    }
}

// ---------------------------------------------------------------------------
// Snowfall metric
// ---------------------------------------------------------------------------

/// Legacy numeric encoding of a failed or unparseable station.
pub const SENTINEL_FETCH_FAILED: f64 = -1.0;

/// Legacy numeric encoding of a station whose series was empty.
pub const SENTINEL_EMPTY_SERIES: f64 = -2.0;

/// Outcome of deriving snowfall for one station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnowfallMetric {
    /// Net depth increase over the lookback window, in inches.
    Measured(f64),
    /// The fetch failed or the series could not be interpreted.
    FetchFailed,
    /// The fetch succeeded but the series held no readings.
    EmptySeries,
}

impl SnowfallMetric {
    /// The number used by the original numeric channel: the measured value,
    /// `-1` for a failed fetch, `-2` for an empty series.
    pub fn legacy_value(&self) -> f64 {
        match self {
            SnowfallMetric::Measured(v) => *v,
            SnowfallMetric::FetchFailed => SENTINEL_FETCH_FAILED,
            SnowfallMetric::EmptySeries => SENTINEL_EMPTY_SERIES,
        }
    }

    /// The measured value, if there is one.
    pub fn measured(&self) -> Option<f64> {
        match self {
            SnowfallMetric::Measured(v) => Some(*v),
            _ => None,
        }
    }
}

fn serialize_legacy<S: Serializer>(metric: &SnowfallMetric, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(metric.legacy_value())
}

// ---------------------------------------------------------------------------
// Station record
// ---------------------------------------------------------------------------

/// A station as presented to the user. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    name: String,
    elevation: String,
    #[serde(serialize_with = "serialize_legacy")]
    snowfall: SnowfallMetric,
}

impl Station {
    /// Builds a station, resolving the display name through `aliases` and
    /// formatting the elevation. Neither is re-derived afterwards.
    pub fn new(
        raw_name: &str,
        elevation_ft: Option<f64>,
        snowfall: SnowfallMetric,
        aliases: &AliasTable,
    ) -> Self {
        Station {
            name: aliases.resolve(raw_name).to_string(),
            elevation: format_elevation(elevation_ft),
            snowfall,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elevation(&self) -> &str {
        &self.elevation
    }

    pub fn snowfall(&self) -> SnowfallMetric {
        self.snowfall
    }

    /// A station is rankable when its snowfall was actually measured.
    pub fn is_valid(&self) -> bool {
        self.snowfall.legacy_value() >= 0.0
    }
}

/// Formats an elevation in feet as `"<value> ft."`.
pub fn format_elevation(elevation_ft: Option<f64>) -> String {
    match elevation_ft {
        Some(ft) => format!("{} ft.", ft),
        None => "n/a ft.".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Ranked result
// ---------------------------------------------------------------------------

/// The filtered, sorted outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub region: String,
    /// Number of stations returned by discovery, before filtering.
    pub discovered: usize,
    pub fetched_at: DateTime<Utc>,
    stations: Vec<Station>,
}

impl RankedResult {
    /// Keeps valid stations and sorts them by snowfall, most first.
    /// `sort_by` is stable, so ties keep their input order.
    pub fn rank(
        region: &str,
        stations: Vec<Station>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let discovered = stations.len();
        let mut kept: Vec<Station> = stations.into_iter().filter(Station::is_valid).collect();
        kept.sort_by(|a, b| {
            b.snowfall
                .legacy_value()
                .total_cmp(&a.snowfall.legacy_value())
        });

        RankedResult {
            region: region.to_string(),
            discovered,
            fetched_at,
            stations: kept,
        }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why the discovery call for a region failed. Terminal for a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiscoveryError {
    /// Non-2xx HTTP response from the metadata endpoint.
    #[error("HTTP error: {0}")]
    Status(u16),
    #[error("Request failed: {0}")]
    Transport(String),
    /// The body was not a list of station descriptors.
    #[error("Parse error: {0}")]
    Payload(String),
}

/// Why one station's time series could not be used. Never leaves the fetcher.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StationFetchError {
    #[error("HTTP error: {0}")]
    Status(u16),
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Parse error: {0}")]
    Payload(String),
}

/// Run-level failures surfaced to the caller as a single error state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    #[error("Unknown region: {0}")]
    UnknownRegion(String),
    #[error("Station discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
