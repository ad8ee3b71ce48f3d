//! Net snowfall from an hourly snow depth series.
//!
//! Snow depth sensors are noisy: depth settles, wind scours the pad, and the
//! ultrasonic sensor occasionally reports a bogus jump. Net snowfall is taken
//! as the rise from the lowest depth seen so far to each new maximum, and the
//! largest such rise is kept.
//!
//! The computation is order-sensitive. `change` is only recomputed when a new
//! maximum arrives, using the minimum seen *up to that point*; a later,
//! lower minimum only matters if another new maximum follows it.

use clap::ValueEnum;
use serde::Deserialize;

use crate::model::{RawReading, SnowfallMetric};

/// Rise between consecutive readings, in inches, above which a reading is
/// considered a sensor spike.
pub const SPIKE_THRESHOLD_IN: f64 = 10.0;

/// What to do when a reading jumps more than `SPIKE_THRESHOLD_IN` above the
/// reading before it.
///
/// Under `Ignore`, the default, spikes count toward the metric like any other
/// reading. `AbortOnSpike` stops the scan and reports no snowfall for the
/// station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SpikePolicy {
    #[default]
    Ignore,
    AbortOnSpike,
}

/// Computes snowfall with the default spike policy.
pub fn extract(readings: &[RawReading]) -> SnowfallMetric {
    extract_with(readings, SpikePolicy::default())
}

/// Computes net snowfall over `readings`, which must be in chronological
/// order.
///
/// - `EmptySeries` when there are no readings, or none of them has a value.
/// - `FetchFailed` when a value is not a finite number.
/// - `Measured(x)` with `x >= 0` otherwise.
///
/// Readings without a value are gaps and are skipped.
pub fn extract_with(readings: &[RawReading], policy: SpikePolicy) -> SnowfallMetric {
    let mut values = readings.iter().filter_map(|r| r.value);

    let Some(first) = values.next() else {
        return SnowfallMetric::EmptySeries;
    };
    if !first.is_finite() {
        return SnowfallMetric::FetchFailed;
    }

    let mut min_value = first;
    let mut max_value = first;
    let mut previous = first;
    let mut change = 0.0;

    for value in values {
        if !value.is_finite() {
            return SnowfallMetric::FetchFailed;
        }

        if value < min_value {
            min_value = value;
        }
        if value > max_value {
            max_value = value;
            change = max_value - min_value;
        }

        if value > previous + SPIKE_THRESHOLD_IN && policy == SpikePolicy::AbortOnSpike {
            return SnowfallMetric::Measured(0.0);
        }
        previous = value;
    }

    SnowfallMetric::Measured(change)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
