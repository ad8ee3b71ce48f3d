//! Region-wide aggregation: discovery, fan-out fetch, filter and rank.
//!
//! A run suspends twice: once for the discovery call and once while every
//! station fetch is in flight. Station futures are polled together on the
//! caller's task (no spawning), so a run is concurrent but single-threaded.
//! Stations come back in discovery order even when the fan-out is capped.

use chrono::Utc;
use futures::future::join_all;
use futures::stream::{self, StreamExt};

use crate::aliases::AliasTable;
use crate::config::TrackerConfig;
use crate::fetcher::StationFetcher;
use crate::ingest::awdb::parse_discovery_response;
use crate::ingest::Transport;
use crate::logging::{self, Stage};
use crate::model::{DiscoveryError, RankedResult, Station, StationDescriptor, TrackerError};
use crate::regions::{Region, resolve_discovery_endpoint};

/// Runs the aggregation against one transport and configuration.
pub struct Pipeline<'a> {
    transport: &'a dyn Transport,
    config: &'a TrackerConfig,
    aliases: AliasTable,
}

impl<'a> Pipeline<'a> {
    pub fn new(transport: &'a dyn Transport, config: &'a TrackerConfig, aliases: AliasTable) -> Self {
        Pipeline {
            transport,
            config,
            aliases,
        }
    }

    /// Produces the ranked snowfall list for `region_key`.
    ///
    /// # Errors
    /// - `TrackerError::UnknownRegion` before any request is made.
    /// - `TrackerError::Discovery` if the station list cannot be obtained.
    ///
    /// Individual station failures are not errors; they only shorten the
    /// result.
    pub async fn run(&self, region_key: &str) -> Result<RankedResult, TrackerError> {
        let region = resolve_discovery_endpoint(region_key)?;

        let descriptors = self.discover(region).await.inspect_err(|err| {
            logging::log_discovery_failure(region.key, err);
        })?;
        logging::info(
            Stage::Discovery,
            Some(region.key),
            &format!("Discovered {} stations in {}", descriptors.len(), region.name),
        );

        let stations = self.fetch_all(&descriptors).await;
        let ranked = RankedResult::rank(region.key, stations, Utc::now());

        logging::log_run_summary(region.key, ranked.discovered, ranked.len());
        Ok(ranked)
    }

    /// Issues the region's discovery call and parses the station list.
    pub async fn discover(&self, region: &Region) -> Result<Vec<StationDescriptor>, DiscoveryError> {
        let url = region.discovery_url(&self.config.api_base_url);

        let response = self
            .transport
            .get(&url)
            .await
            .map_err(|e| DiscoveryError::Transport(e.to_string()))?;

        if !response.is_success() {
            return Err(DiscoveryError::Status(response.status));
        }

        parse_discovery_response(&response.body)
    }

    /// Fetches every station and waits for all of them. Never fails: each
    /// fetch resolves to a `Station`, failed or not.
    pub async fn fetch_all(&self, descriptors: &[StationDescriptor]) -> Vec<Station> {
        let fetcher = StationFetcher::new(
            self.transport,
            &self.config.api_base_url,
            self.config.lookback_hours,
            self.config.spike_policy,
            self.aliases,
        );
        let fetches = descriptors.iter().map(|d| fetcher.fetch(d));

        match self.config.max_in_flight {
            None => join_all(fetches).await,
            Some(limit) => stream::iter(fetches).buffered(limit.get()).collect().await,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
