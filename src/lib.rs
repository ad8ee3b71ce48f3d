//! Snowfall tracker: ranks SNOTEL stations in a region by recent snowfall.
//!
//! A run discovers the region's active stations through the NRCS AWDB
//! `stations` endpoint, fetches each station's hourly snow depth for the
//! last 48 hours concurrently, derives net snowfall per station, drops the
//! stations that failed or had no data, and sorts the rest from most to
//! least snow.
//!
//! Shells embed the library through [`app::Tracker`]; the bundled binary is
//! a terminal shell over the same entry point.

pub mod aliases;
pub mod analysis;
pub mod app;
pub mod config;
pub mod fetcher;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod regions;
pub mod render;
pub mod verify;

pub use app::{SnowfallView, Tracker};
pub use config::TrackerConfig;
pub use model::{RankedResult, SnowfallMetric, Station, TrackerError};
