/// Text rendering of tracker states.
///
/// Mirrors the metric cards of the web UI: one row per station with the
/// display name, elevation, and snowfall in inches with a `"` suffix.

use crate::model::{RankedResult, Station};
use crate::regions::find_region;

pub const SELECT_REGION_MESSAGE: &str = "Please select a region first.";
pub const LOADING_MESSAGE: &str = "Loading stations…";
pub const NO_STATIONS_MESSAGE: &str = "No stations reported snowfall for this period.";

/// Everything the shell can be asked to display.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationState {
    /// The trigger fired with no region selected.
    NeedsRegion,
    Loading,
    Ranked(RankedResult),
    Error(String),
}

impl PresentationState {
    pub fn render_text(&self) -> String {
        match self {
            PresentationState::NeedsRegion => SELECT_REGION_MESSAGE.to_string(),
            PresentationState::Loading => LOADING_MESSAGE.to_string(),
            PresentationState::Ranked(result) => render_ranked(result),
            PresentationState::Error(message) => format!("Error: {}", message),
        }
    }
}

/// Snowfall with the inch mark, e.g. `7"`.
pub fn format_snowfall(inches: f64) -> String {
    format!("{}\"", inches)
}

/// One card row: name, elevation, snowfall.
pub fn render_row(station: &Station, name_width: usize) -> String {
    format!(
        "{:<name_width$}  {:>10}  {:>6}",
        station.name(),
        station.elevation(),
        format_snowfall(station.snowfall().legacy_value()),
        name_width = name_width,
    )
}

/// The full ranked list with a header naming the region and run time.
pub fn render_ranked(result: &RankedResult) -> String {
    let region_name = find_region(&result.region)
        .map(|r| r.name)
        .unwrap_or(result.region.as_str());
    let mut out = format!(
        "{} - snowfall ({} of {} stations, {})\n",
        region_name,
        result.len(),
        result.discovered,
        result.fetched_at.format("%Y-%m-%d %H:%M UTC"),
    );

    if result.is_empty() {
        out.push_str(NO_STATIONS_MESSAGE);
        out.push('\n');
        return out;
    }

    let name_width = result
        .stations()
        .iter()
        .map(|s| s.name().chars().count())
        .max()
        .unwrap_or(0);
    for station in result.stations() {
        out.push_str(&render_row(station, name_width));
        out.push('\n');
    }
    out
}
