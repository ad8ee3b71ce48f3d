/// NRCS AWDB (Air and Water Database) REST API client.
///
/// Handles URL construction and JSON response parsing for the two AWDB
/// endpoints the tracker uses:
///   - `stations`: station metadata, used for discovery
///   - `data`: hourly element values for one station
///
/// API Documentation: https://wcc.sc.egov.usda.gov/awdbRestApi/swagger-ui/index.html
///
/// See `fixtures.rs` for annotated examples of the response structure.

use serde_json::Value;

use crate::logging::{self, Stage};
use crate::model::{
    DiscoveryError, RawReading, StationDescriptor, StationFetchError, DURATION_HOURLY,
    ELEMENT_SNOW_DEPTH,
};

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Default lookback for the per-station data request, in hours.
pub const LOOKBACK_HOURS: u32 = 48;

/// Builds the `data` URL for one station's hourly snow depth over the last
/// `lookback_hours`, ending now.
///
/// AWDB accepts relative dates in hours: `beginDate=-48&endDate=0` is the
/// 48 hours up to the current hour. Flags, original values and suspect data
/// are suppressed so only the cleaned series comes back.
pub fn build_data_url(base_url: &str, station_triplet: &str, lookback_hours: u32) -> String {
    format!(
        "{}/data?stationTriplets={}&elements={}&duration={}&beginDate=-{}&endDate=0\
         &periodRef=END&centralTendencyType=NONE\
         &returnFlags=false&returnOriginalValues=false&returnSuspectData=false",
        base_url.trim_end_matches('/'),
        urlencoding::encode(station_triplet),
        ELEMENT_SNOW_DEPTH,
        DURATION_HOURLY,
        lookback_hours,
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a `stations` response body into station descriptors.
///
/// An empty array is valid: the region has no active stations. Entries
/// lacking `stationTriplet` or `name` are logged and skipped, so one bad
/// entry costs only that station.
///
/// # Errors
/// `DiscoveryError::Payload` if the body is not a JSON array.
pub fn parse_discovery_response(json: &str) -> Result<Vec<StationDescriptor>, DiscoveryError> {
    let entries: Vec<Value> =
        serde_json::from_str(json).map_err(|e| DiscoveryError::Payload(e.to_string()))?;

    let mut descriptors = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<StationDescriptor>(entry) {
            Ok(descriptor) => descriptors.push(descriptor),
            Err(e) => logging::warn(
                Stage::Discovery,
                None,
                &format!("Skipping station entry {}: {}", index, e),
            ),
        }
    }
    Ok(descriptors)
}

/// Extracts the value series from a `data` response body.
///
/// The envelope is `[ { stationTriplet, data: [ { stationElement, values: [...] } ] } ]`.
/// Only the first station's first element block is read. If any level of
/// that nesting is missing, the series is empty.
///
/// # Errors
/// `StationFetchError::Payload` if the body is not JSON, or if the `values`
/// array exists but its entries are not reading objects.
pub fn parse_data_response(json: &str) -> Result<Vec<RawReading>, StationFetchError> {
    let envelope: Value =
        serde_json::from_str(json).map_err(|e| StationFetchError::Payload(e.to_string()))?;

    let values = envelope
        .get(0)
        .and_then(|station| station.get("data"))
        .and_then(|data| data.get(0))
        .and_then(|block| block.get("values"));

    match values {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(values) => serde_json::from_value(values.clone())
            .map_err(|e| StationFetchError::Payload(format!("malformed values array: {}", e))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
