//! Discovery orchestrator
//!
//! Loads compartments, scans them through a bounded worker pool, runs the
//! identity pass once against the tenancy, and hands the collected records
//! to the summarizer.

use super::collectors::{self, CollectContext, Collector, IdentityCollector};
use super::summary::{summarize, DiscoveryResult, Metadata};
use crate::config::DEFAULT_MAX_WORKERS;
use crate::error::DiscoveryError;
use crate::oci::client::{Service, ServiceClients};
use crate::oci::compartments::{load_compartments, Compartment};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

type Pipeline = Arc<Vec<Box<dyn Collector>>>;

/// One discovery run
pub struct Discovery {
    clients: ServiceClients,
    tenancy_id: String,
    region: String,
    workers: usize,
}

impl Discovery {
    pub fn new(clients: ServiceClients, tenancy_id: &str, region: &str) -> Self {
        Self {
            clients,
            tenancy_id: tenancy_id.to_string(),
            region: region.to_string(),
            workers: DEFAULT_MAX_WORKERS,
        }
    }

    /// Ceiling on concurrently scanned compartments (at least 1)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Run discovery end to end.
    ///
    /// Only a compartment loading failure is fatal; every collector failure
    /// is logged and the run continues.
    pub async fn run(self) -> Result<DiscoveryResult, DiscoveryError> {
        let started = Instant::now();

        let identity = self
            .clients
            .require(Service::Identity)
            .map_err(DiscoveryError::Bootstrap)?;
        let index = load_compartments(identity.as_ref(), &self.tenancy_id)
            .await
            .map_err(DiscoveryError::CompartmentLoad)?;

        tracing::info!("Found {} compartments to scan", index.len());

        let ctx = Arc::new(CollectContext::new(self.clients, &self.tenancy_id));
        let pipeline: Pipeline = Arc::new(collectors::pipeline());

        scan_compartments(&ctx, &pipeline, index.compartments(), self.workers).await;

        let root = index.root(&self.tenancy_id);
        run_collector(&IdentityCollector, &ctx, &root).await;

        let failures = ctx.failures();
        let resources = match Arc::try_unwrap(ctx) {
            Ok(ctx) => ctx.into_resources().into_buckets(),
            Err(ctx) => ctx.resources().snapshot(),
        };

        let result = summarize(
            resources,
            index.compartments(),
            Metadata::new(&self.region, &self.tenancy_id),
        );

        tracing::info!(
            "Discovery finished in {:.1}s: {} resources, {} failed calls",
            started.elapsed().as_secs_f64(),
            result.summary.total_resources,
            failures
        );

        Ok(result)
    }
}

/// Scan every compartment, at most `workers` at a time.
/// Task failures (panics) are logged and never re-raised.
async fn scan_compartments(
    ctx: &Arc<CollectContext>,
    pipeline: &Pipeline,
    compartments: &[Compartment],
    workers: usize,
) {
    let semaphore = Arc::new(Semaphore::new(workers));
    let mut tasks = FuturesUnordered::new();

    for compartment in compartments.iter().cloned() {
        let ctx = Arc::clone(ctx);
        let pipeline = Arc::clone(pipeline);
        let semaphore = Arc::clone(&semaphore);
        let name = compartment.name.clone();

        let handle = tokio::spawn(async move {
            let _permit = match semaphore.acquire().await {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::warn!("Worker pool closed, skipping {}", compartment.name);
                    return;
                }
            };
            scan_compartment(&ctx, &pipeline, &compartment).await;
        });
        tasks.push(async move { (name, handle.await) });
    }

    while let Some((name, outcome)) = tasks.next().await {
        if let Err(e) = outcome {
            tracing::error!("Error in compartment discovery for {}: {}", name, e);
        }
    }
}

/// Run the collector groups one after another inside one compartment
async fn scan_compartment(ctx: &CollectContext, pipeline: &[Box<dyn Collector>], compartment: &Compartment) {
    tracing::info!("Scanning compartment: {}", compartment.name);
    for collector in pipeline {
        run_collector(collector.as_ref(), ctx, compartment).await;
    }
}

/// Run one group, containing a panic to that group
async fn run_collector(collector: &dyn Collector, ctx: &CollectContext, compartment: &Compartment) {
    let outcome = AssertUnwindSafe(collector.collect(ctx, compartment))
        .catch_unwind()
        .await;
    if outcome.is_err() {
        tracing::error!(
            "Error in {} discovery for {}: collector panicked",
            collector.group().as_str(),
            compartment.name
        );
    }
}
