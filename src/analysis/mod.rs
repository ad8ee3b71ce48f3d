/// Time-series analysis for the snowfall tracker.
///
/// Everything here is pure: no I/O, no clock, no logging. The fetcher hands
/// a parsed series in and gets a tagged metric back.
///
/// Submodules:
/// - `snowfall`: derives net snowfall from an hourly snow depth series.

pub mod snowfall;

pub use snowfall::{extract, extract_with, SpikePolicy, SPIKE_THRESHOLD_IN};
