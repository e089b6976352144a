//! Aggregation and output documents

use crate::oci::compartments::Compartment;
use crate::resource::{Buckets, ResourceType};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Provider tag written into result metadata
pub const PROVIDER: &str = "oci";

/// Final output of a discovery run
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryResult {
    pub success: bool,
    pub resources: Buckets,
    pub summary: Summary,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_resources: usize,
    /// Non-empty buckets only
    pub by_service: BTreeMap<ResourceType, usize>,
    pub compartments_scanned: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub scan_time: String,
    pub region: String,
    pub tenancy_id: String,
    pub provider: &'static str,
}

impl Metadata {
    /// Metadata stamped with the current time
    pub fn new(region: &str, tenancy_id: &str) -> Self {
        Self {
            scan_time: now_iso8601(),
            region: region.to_string(),
            tenancy_id: tenancy_id.to_string(),
            provider: PROVIDER,
        }
    }
}

/// Build the result document. Pure: no I/O.
pub fn summarize(
    resources: Buckets,
    compartments: &[Compartment],
    metadata: Metadata,
) -> DiscoveryResult {
    let by_service: BTreeMap<ResourceType, usize> = resources
        .iter()
        .filter(|(_, records)| !records.is_empty())
        .map(|(rt, records)| (*rt, records.len()))
        .collect();
    let total_resources = resources.values().map(Vec::len).sum();

    DiscoveryResult {
        success: true,
        resources,
        summary: Summary {
            total_resources,
            by_service,
            compartments_scanned: compartments.len(),
        },
        metadata,
    }
}

/// Document written to stdout when a run fails fatally
#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    pub success: bool,
    pub error: String,
    pub timestamp: String,
}

impl FailureReport {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            timestamp: now_iso8601(),
        }
    }
}

fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}
