//! Region Verification Module
//!
//! Checks every configured region against the live API: does discovery
//! answer, how many stations does it return, and how many of those produce
//! a usable snow depth series. Use this after editing a region query or
//! when a region suddenly renders an empty list.

use chrono::Utc;
use serde::Serialize;

use crate::model::SnowfallMetric;
use crate::pipeline::Pipeline;
use crate::regions::{REGION_REGISTRY, Region};

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub timestamp: String,
    pub regions: Vec<RegionVerification>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VerificationSummary {
    pub regions_total: usize,
    pub regions_working: usize,
    pub regions_failed: usize,
    pub stations_total: usize,
    pub stations_measured: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionVerification {
    pub key: String,
    pub name: String,
    pub status: VerificationStatus,
    pub stations_discovered: usize,
    pub stations_measured: usize,
    pub stations_empty: usize,
    pub stations_failed: usize,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum VerificationStatus {
    /// Discovery worked and every station returned a series.
    Success,
    /// Discovery worked but some stations failed or were empty, or the
    /// region has no stations at all.
    PartialSuccess,
    /// Discovery failed.
    Failed,
}

// ============================================================================
// Region Verification
// ============================================================================

pub async fn verify_region(pipeline: &Pipeline<'_>, region: &Region) -> RegionVerification {
    let mut result = RegionVerification {
        key: region.key.to_string(),
        name: region.name.to_string(),
        status: VerificationStatus::Failed,
        stations_discovered: 0,
        stations_measured: 0,
        stations_empty: 0,
        stations_failed: 0,
        error_message: None,
    };

    let descriptors = match pipeline.discover(region).await {
        Ok(descriptors) => descriptors,
        Err(e) => {
            result.error_message = Some(e.to_string());
            return result;
        }
    };
    result.stations_discovered = descriptors.len();

    for station in pipeline.fetch_all(&descriptors).await {
        match station.snowfall() {
            SnowfallMetric::Measured(_) => result.stations_measured += 1,
            SnowfallMetric::EmptySeries => result.stations_empty += 1,
            SnowfallMetric::FetchFailed => result.stations_failed += 1,
        }
    }

    result.status = if result.stations_discovered > 0
        && result.stations_measured == result.stations_discovered
    {
        VerificationStatus::Success
    } else {
        VerificationStatus::PartialSuccess
    };

    result
}

/// Verifies every region in the registry, one after another.
pub async fn verify_all_regions(pipeline: &Pipeline<'_>) -> VerificationReport {
    let mut report = VerificationReport {
        timestamp: Utc::now().to_rfc3339(),
        regions: Vec::new(),
        summary: VerificationSummary::default(),
    };

    for region in REGION_REGISTRY {
        let result = verify_region(pipeline, region).await;

        report.summary.regions_total += 1;
        report.summary.stations_total += result.stations_discovered;
        report.summary.stations_measured += result.stations_measured;
        match result.status {
            VerificationStatus::Success | VerificationStatus::PartialSuccess => {
                report.summary.regions_working += 1
            }
            VerificationStatus::Failed => report.summary.regions_failed += 1,
        }

        report.regions.push(result);
    }

    report
}

pub fn print_summary(report: &VerificationReport) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("REGION VERIFICATION SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for region in &report.regions {
        match region.status {
            VerificationStatus::Success => println!(
                "  ✓ {:<16} {} stations, all measured",
                region.name, region.stations_discovered
            ),
            VerificationStatus::PartialSuccess => println!(
                "  ⚠ {:<16} {}/{} measured ({} empty, {} failed)",
                region.name,
                region.stations_measured,
                region.stations_discovered,
                region.stations_empty,
                region.stations_failed
            ),
            VerificationStatus::Failed => println!(
                "  ✗ {:<16} FAILED: {}",
                region.name,
                region.error_message.as_deref().unwrap_or("Unknown")
            ),
        }
    }

    println!();
    println!(
        "Regions:  {}/{} working  ({} failed)",
        report.summary.regions_working, report.summary.regions_total, report.summary.regions_failed
    );

    let success_rate = if report.summary.stations_total > 0 {
        (report.summary.stations_measured as f64 / report.summary.stations_total as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "Stations: {:.1}% measured ({}/{})",
        success_rate, report.summary.stations_measured, report.summary.stations_total
    );
    println!("═══════════════════════════════════════════════════════════");
}
