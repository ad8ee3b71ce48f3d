//! Per-station snow depth fetch.
//!
//! `StationFetcher::fetch` never fails outward. Whatever goes wrong for one
//! station (bad status, dropped connection, garbage body, empty series) is
//! logged against the station's display name and folded into the returned
//! `Station` as a tagged metric, so one station can never abort a run.

use crate::aliases::AliasTable;
use crate::analysis::{SpikePolicy, extract_with};
use crate::ingest::awdb::{build_data_url, parse_data_response};
use crate::ingest::Transport;
use crate::logging;
use crate::model::{RawReading, SnowfallMetric, Station, StationDescriptor, StationFetchError};

/// Fetches and scores individual stations. Holds only shared, read-only
/// state; each `fetch` call is independent.
pub struct StationFetcher<'a> {
    transport: &'a dyn Transport,
    base_url: &'a str,
    lookback_hours: u32,
    spike_policy: SpikePolicy,
    aliases: AliasTable,
}

impl<'a> StationFetcher<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        base_url: &'a str,
        lookback_hours: u32,
        spike_policy: SpikePolicy,
        aliases: AliasTable,
    ) -> Self {
        StationFetcher {
            transport,
            base_url,
            lookback_hours,
            spike_policy,
            aliases,
        }
    }

    /// Issues exactly one data request for `descriptor` and builds its
    /// `Station`.
    pub async fn fetch(&self, descriptor: &StationDescriptor) -> Station {
        let display_name = self.aliases.resolve(&descriptor.name);

        let metric = match self.fetch_series(&descriptor.station_triplet).await {
            Ok(readings) => match extract_with(&readings, self.spike_policy) {
                SnowfallMetric::EmptySeries => {
                    logging::log_empty_series(display_name);
                    SnowfallMetric::EmptySeries
                }
                SnowfallMetric::FetchFailed => {
                    logging::log_station_failure(
                        display_name,
                        &StationFetchError::Payload("series contains a non-finite value".into()),
                    );
                    SnowfallMetric::FetchFailed
                }
                measured => {
                    logging::debug(
                        logging::Stage::Station,
                        Some(display_name),
                        &format!(
                            "{} readings, snowfall {}\"",
                            readings.len(),
                            measured.legacy_value()
                        ),
                    );
                    measured
                }
            },
            Err(err) => {
                logging::log_station_failure(display_name, &err);
                SnowfallMetric::FetchFailed
            }
        };

        Station::new(&descriptor.name, descriptor.elevation, metric, &self.aliases)
    }

    async fn fetch_series(&self, triplet: &str) -> Result<Vec<RawReading>, StationFetchError> {
        let url = build_data_url(self.base_url, triplet, self.lookback_hours);

        let response = self
            .transport
            .get(&url)
            .await
            .map_err(|e| StationFetchError::Transport(e.to_string()))?;

        if !response.is_success() {
            return Err(StationFetchError::Status(response.status));
        }

        parse_data_response(&response.body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
