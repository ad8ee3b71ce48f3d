/// Region registry for the snowfall tracker.
///
/// Defines the user-selectable regions and, for each one, the fixed query
/// used against the AWDB `stations` metadata endpoint to discover its active
/// SNOTEL sites. This is the single source of truth for region keys; an
/// unknown key is rejected here before any request is built.

use crate::model::TrackerError;

// ---------------------------------------------------------------------------
// AWDB endpoints
// ---------------------------------------------------------------------------

/// Default AWDB REST API root.
pub const AWDB_BASE_URL: &str = "https://wcc.sc.egov.usda.gov/awdbRestApi/services/v1";

// ---------------------------------------------------------------------------
// Region metadata
// ---------------------------------------------------------------------------

/// A user-selectable group of SNOTEL stations.
#[derive(Debug, PartialEq, Eq)]
pub struct Region {
    /// Canonical key used by the UI and CLI.
    pub key: &'static str,
    /// Human-readable label.
    pub name: &'static str,
    /// Query string (without the leading `?`) for the `stations` endpoint.
    /// Already percent-encoded.
    pub discovery_query: &'static str,
}

impl Region {
    /// Full discovery URL against `base_url` (no trailing slash).
    pub fn discovery_url(&self, base_url: &str) -> String {
        format!("{}/stations?{}", base_url.trim_end_matches('/'), self.discovery_query)
    }
}

/// All supported regions.
///
/// Triplet filters select SNOTEL (`SNTL`) sites by state; county or station
/// name filters narrow them to the ski areas each region cares about.
pub static REGION_REGISTRY: &[Region] = &[
    Region {
        key: "slc",
        name: "Salt Lake City",
        discovery_query: "stationTriplets=%2A%3AUT%3ASNTL\
            &countyNames=Salt%20Lake%2C%20Davis%2C%20Weber%2C%20Utah\
            &elements=SNWD&durations=HOURLY\
            &returnForecastPointMetadata=false&returnReservoirMetadata=false\
            &returnStationElements=false&activeOnly=true",
    },
    Region {
        key: "seattle",
        name: "Seattle Area",
        discovery_query: "stationTriplets=%2A%3AWA%3ASNTL\
            &stationNames=Stevens%20Pass%2C%20Olallie%20Meadows%2C%20Buckinghorse%2C%20Corral%20Pass%2C%20Paradise%2C%20White%20Pass%2A%2C%20Wells%20Creek%2C%20Rainy%20Pass\
            &elements=SNWD&durations=HOURLY\
            &returnForecastPointMetadata=false&returnReservoirMetadata=false\
            &returnStationElements=false&activeOnly=true",
    },
    Region {
        key: "reno",
        name: "Reno-Tahoe",
        discovery_query: "stationTriplets=%2A%3ANV%3ASNTL%2C%20%2A%3ACA%3ASNTL\
            &countyNames=Nevada%2C%20Placer%2C%20El%20Dorado%2C%20Alpine%2C%20Washoe\
            &elements=SNWD&durations=HOURLY\
            &returnForecastPointMetadata=false&returnReservoirMetadata=false\
            &returnStationElements=false&activeOnly=true",
    },
    Region {
        key: "denver",
        name: "Denver Area",
        discovery_query: "stationTriplets=%2A%3ACO%3ASNTL\
            &countyNames=Jefferson%2C%20Clear%20Creek%2C%20Park%2C%20Summit%2C%20Eagle\
            &elements=SNWD&durations=HOURLY\
            &returnForecastPointMetadata=false&returnReservoirMetadata=false\
            &returnStationElements=false&activeOnly=true",
    },
];

/// Returns every region key, in registry order.
pub fn all_region_keys() -> Vec<&'static str> {
    REGION_REGISTRY.iter().map(|r| r.key).collect()
}

/// Looks up a region by key. Returns `None` if not found.
pub fn find_region(key: &str) -> Option<&'static Region> {
    REGION_REGISTRY.iter().find(|r| r.key == key)
}

/// Resolves a region key to its discovery metadata, failing fast on
/// anything not in the registry.
pub fn resolve_discovery_endpoint(key: &str) -> Result<&'static Region, TrackerError> {
    find_region(key).ok_or_else(|| TrackerError::UnknownRegion(key.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
