//! Integration tests for the aggregation pipeline
//!
//! These tests drive the public API end to end (region lookup, discovery,
//! fan-out, parsing, scoring, ranking) against a scripted transport, so
//! they run offline and deterministically.
//!
//! Run with: cargo test --test pipeline_integration

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use snowfall_tracker::analysis::SpikePolicy;
use snowfall_tracker::ingest::{HttpResponse, Transport, TransportError};
use snowfall_tracker::model::DiscoveryError;
use snowfall_tracker::{SnowfallMetric, Tracker, TrackerConfig, TrackerError};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Answers discovery with a fixed reply and each station's data request
/// with the reply registered for its (URL-encoded) triplet. Unregistered
/// triplets get a 404.
struct ScriptedTransport {
    discovery: Result<HttpResponse, TransportError>,
    stations: HashMap<String, Result<HttpResponse, TransportError>>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn new(discovery: Result<HttpResponse, TransportError>) -> Self {
        ScriptedTransport {
            discovery,
            stations: HashMap::new(),
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn station(mut self, triplet: &str, reply: Result<HttpResponse, TransportError>) -> Self {
        self.stations
            .insert(urlencoding::encode(triplet).into_owned(), reply);
        self
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(url.to_string());

        if url.contains("/stations?") {
            return self.discovery.clone();
        }
        for (encoded, reply) in &self.stations {
            if url.contains(&format!("stationTriplets={}&", encoded)) {
                return reply.clone();
            }
        }
        Ok(HttpResponse {
            status: 404,
            body: String::new(),
        })
    }
}

/// A shared handle so the test can read call counts after the tracker
/// takes ownership of its transport.
struct Shared(std::sync::Arc<ScriptedTransport>);

#[async_trait]
impl Transport for Shared {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.0.get(url).await
    }
}

fn tracker_with(
    transport: ScriptedTransport,
    config: TrackerConfig,
) -> (Tracker, std::sync::Arc<ScriptedTransport>) {
    let shared = std::sync::Arc::new(transport);
    let tracker = Tracker::new(config, Box::new(Shared(std::sync::Arc::clone(&shared))));
    (tracker, shared)
}

fn discovery(stations: &[(&str, &str, f64)]) -> Result<HttpResponse, TransportError> {
    let body: Vec<String> = stations
        .iter()
        .map(|(triplet, name, elevation)| {
            format!(
                r#"{{"stationTriplet":"{}","name":"{}","elevation":{}}}"#,
                triplet, name, elevation
            )
        })
        .collect();
    Ok(HttpResponse::ok(format!("[{}]", body.join(","))))
}

fn series(values: &[f64]) -> Result<HttpResponse, TransportError> {
    let values: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(hour, v)| format!(r#"{{"date":"2025-01-14 {:02}:00","value":{}}}"#, hour, v))
        .collect();
    Ok(HttpResponse::ok(format!(
        r#"[{{"stationTriplet":"x","data":[{{"values":[{}]}}]}}]"#,
        values.join(",")
    )))
}

fn wasatch() -> ScriptedTransport {
    ScriptedTransport::new(discovery(&[
        ("1308:UT:SNTL", "Atwater", 8750.0),
        ("1214:UT:SNTL", "Parrish Creek", 7740.0),
        ("766:UT:SNTL", "Snowbird", 9177.0),
        ("628:UT:SNTL", "Mill-D North", 8963.0),
        ("814:UT:SNTL", "Thaynes Canyon", 9247.0),
    ]))
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_ranked_result_sorted_by_snowfall_with_failures_excluded() {
    let transport = wasatch()
        .station("1308:UT:SNTL", series(&[60.0, 61.0, 59.0, 66.0])) // 7
        .station("1214:UT:SNTL", series(&[40.0, 42.0])) // 2
        .station("766:UT:SNTL", Ok(HttpResponse { status: 500, body: String::new() }))
        .station("628:UT:SNTL", series(&[])) // empty
        .station("814:UT:SNTL", series(&[30.0, 29.0, 38.0])); // 9

    let (tracker, shared) = tracker_with(transport, TrackerConfig::default());
    let ranked = tracker.run("slc").await.expect("run should succeed");

    let rows: Vec<(&str, f64)> = ranked
        .stations()
        .iter()
        .map(|s| (s.name(), s.snowfall().legacy_value()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Park City - Thaynes Canyon", 9.0),
            ("Alta", 7.0),
            ("Parrish Creek", 2.0),
        ]
    );
    assert_eq!(ranked.discovered, 5);
    assert_eq!(shared.calls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn test_ranked_result_is_non_increasing_and_non_negative() {
    let transport = wasatch()
        .station("1308:UT:SNTL", series(&[1.0, 4.0]))
        .station("1214:UT:SNTL", series(&[1.0, 4.0]))
        .station("766:UT:SNTL", series(&[10.0, 9.0]))
        .station("628:UT:SNTL", series(&[0.0, 12.0]))
        .station("814:UT:SNTL", Err(TransportError("connection refused".into())));

    let (tracker, _) = tracker_with(transport, TrackerConfig::default());
    let ranked = tracker.run("slc").await.expect("run should succeed");

    let values: Vec<f64> = ranked
        .stations()
        .iter()
        .map(|s| s.snowfall().legacy_value())
        .collect();
    assert!(values.iter().all(|v| *v >= 0.0), "no negative entries: {:?}", values);
    assert!(
        values.windows(2).all(|w| w[0] >= w[1]),
        "must be non-increasing: {:?}",
        values
    );
    // Ties keep discovery order: Atwater was discovered before Parrish Creek.
    let names: Vec<&str> = ranked.stations().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["Mill-D North", "Alta", "Parrish Creek", "Snowbird"]);
}

#[tokio::test]
async fn test_spike_policy_is_applied_to_every_station() {
    let transport = ScriptedTransport::new(discovery(&[("1308:UT:SNTL", "Atwater", 8750.0)]))
        .station("1308:UT:SNTL", series(&[10.0, 12.0, 25.0]));
    let config = TrackerConfig {
        spike_policy: SpikePolicy::AbortOnSpike,
        ..TrackerConfig::default()
    };

    let (tracker, _) = tracker_with(transport, config);
    let ranked = tracker.run("slc").await.expect("run should succeed");
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked.stations()[0].snowfall(), SnowfallMetric::Measured(0.0));
}

// ---------------------------------------------------------------------------
// Degenerate results
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_region_with_no_stations_is_empty_not_error() {
    let (tracker, shared) = tracker_with(
        ScriptedTransport::new(Ok(HttpResponse::ok("[]"))),
        TrackerConfig::default(),
    );

    let ranked = tracker.run("seattle").await.expect("empty region is not an error");
    assert!(ranked.is_empty());
    assert_eq!(ranked.discovered, 0);
    assert_eq!(shared.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_all_stations_failing_is_empty_not_error() {
    // No station replies registered: every data request gets a 404.
    let (tracker, shared) = tracker_with(wasatch(), TrackerConfig::default());

    let ranked = tracker.run("slc").await.expect("station failures are not run failures");
    assert!(ranked.is_empty());
    assert_eq!(ranked.discovered, 5);
    assert_eq!(shared.calls.load(Ordering::SeqCst), 6);
}

// ---------------------------------------------------------------------------
// Run-level failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_discovery_http_500_fails_the_run() {
    let transport = ScriptedTransport::new(Ok(HttpResponse {
        status: 500,
        body: "Internal Server Error".into(),
    }))
    .station("1308:UT:SNTL", series(&[1.0, 2.0]));

    let (tracker, shared) = tracker_with(transport, TrackerConfig::default());
    let result = tracker.run("reno").await;

    assert_eq!(result, Err(TrackerError::Discovery(DiscoveryError::Status(500))));
    assert_eq!(shared.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_discovery_transport_fault_fails_the_run() {
    let (tracker, _) = tracker_with(
        ScriptedTransport::new(Err(TransportError("dns error".into()))),
        TrackerConfig::default(),
    );

    let result = tracker.run("denver").await;
    assert!(
        matches!(result, Err(TrackerError::Discovery(DiscoveryError::Transport(_)))),
        "got {:?}",
        result
    );
}

#[tokio::test]
async fn test_unknown_region_issues_no_requests() {
    let (tracker, shared) = tracker_with(wasatch(), TrackerConfig::default());

    let result = tracker.run("unknown-key").await;
    assert_eq!(result, Err(TrackerError::UnknownRegion("unknown-key".into())));
    assert_eq!(shared.calls.load(Ordering::SeqCst), 0);
}

// ---------------------------------------------------------------------------
// Request shape
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_requests_use_configured_base_url() {
    let config = TrackerConfig {
        api_base_url: "http://mirror.local/awdb/v1".into(),
        ..TrackerConfig::default()
    };
    let transport = ScriptedTransport::new(discovery(&[("1308:UT:SNTL", "Atwater", 8750.0)]))
        .station("1308:UT:SNTL", series(&[1.0]));

    let (tracker, shared) = tracker_with(transport, config);
    tracker.run("slc").await.expect("run should succeed");

    let requested = shared.requested.lock().unwrap().clone();
    assert_eq!(requested.len(), 2);
    assert!(requested[0].starts_with("http://mirror.local/awdb/v1/stations?"));
    assert!(requested[1].starts_with("http://mirror.local/awdb/v1/data?stationTriplets=1308%3AUT%3ASNTL&"));
    assert!(requested[1].contains("beginDate=-48&endDate=0"));
}

#[tokio::test]
async fn test_discovery_entry_without_name_drops_only_that_station() {
    let transport = ScriptedTransport::new(Ok(HttpResponse::ok(
        r#"[{"stationTriplet":"1308:UT:SNTL","elevation":8750},
            {"stationTriplet":"766:UT:SNTL","name":"Snowbird","elevation":9177}]"#,
    )))
    .station("1308:UT:SNTL", series(&[1.0, 5.0]))
    .station("766:UT:SNTL", series(&[1.0, 3.0]));

    let (tracker, shared) = tracker_with(transport, TrackerConfig::default());
    let ranked = tracker.run("slc").await.expect("one bad entry must not fail the run");

    let names: Vec<&str> = ranked.stations().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["Snowbird"]);
    assert_eq!(shared.calls.load(Ordering::SeqCst), 2, "no request for the skipped entry");
}

// ---------------------------------------------------------------------------
// Fan-out ordering
// ---------------------------------------------------------------------------

/// Replies to each station after a per-triplet delay, so fetches complete
/// in a different order from discovery.
struct DelayedTransport {
    delays_ms: HashMap<String, u64>,
}

#[async_trait]
impl Transport for DelayedTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        if url.contains("/stations?") {
            return discovery(&[
                ("766:UT:SNTL", "Snowbird", 9177.0),
                ("628:UT:SNTL", "Mill-D North", 8963.0),
                ("366:UT:SNTL", "Brighton", 8766.0),
            ]);
        }
        for (encoded, delay) in &self.delays_ms {
            if url.contains(&format!("stationTriplets={}&", encoded)) {
                tokio::time::sleep(Duration::from_millis(*delay)).await;
                // Every station reports the same snowfall, so ranking is all ties.
                return series(&[20.0, 24.0]);
            }
        }
        Ok(HttpResponse {
            status: 404,
            body: String::new(),
        })
    }
}

fn slowest_first() -> DelayedTransport {
    let delays_ms = [("766:UT:SNTL", 60), ("628:UT:SNTL", 30), ("366:UT:SNTL", 0)]
        .into_iter()
        .map(|(triplet, ms)| (urlencoding::encode(triplet).into_owned(), ms))
        .collect();
    DelayedTransport { delays_ms }
}

async fn ranked_names(config: TrackerConfig) -> Vec<String> {
    let tracker = Tracker::new(config, Box::new(slowest_first()));
    let ranked = tokio::time::timeout(Duration::from_secs(5), tracker.run("slc"))
        .await
        .expect("run should finish")
        .expect("run should succeed");
    ranked.stations().iter().map(|s| s.name().to_string()).collect()
}

#[tokio::test]
async fn test_ties_keep_discovery_order_when_fetches_finish_out_of_order() {
    let names = ranked_names(TrackerConfig::default()).await;
    assert_eq!(names, vec!["Snowbird", "Mill-D North", "Brighton"]);
}

#[tokio::test]
async fn test_capped_fan_out_keeps_discovery_order_and_finishes() {
    for cap in [1, 2] {
        let config = TrackerConfig {
            max_in_flight: NonZeroUsize::new(cap),
            ..TrackerConfig::default()
        };
        let names = ranked_names(config).await;
        assert_eq!(
            names,
            vec!["Snowbird", "Mill-D North", "Brighton"],
            "cap {} changed the tie order",
            cap
        );
    }
}
