//! Service collectors
//!
//! Each collector lists a fixed sequence of resource types in one
//! compartment. Every call is result-or-skip: records are appended to the
//! shared store, failures are logged and the next call runs.

mod additional;
mod compute;
mod database;
mod developer;
mod identity;
mod network;
mod security;
mod storage;

pub use additional::AdditionalServicesCollector;
pub use compute::ComputeCollector;
pub use database::DatabaseCollector;
pub use developer::DeveloperServicesCollector;
pub use identity::IdentityCollector;
pub use network::NetworkCollector;
pub use security::SecurityCollector;
pub use storage::StorageCollector;

use crate::error::CollectorError;
use crate::oci::client::{ApiHandle, ListRequest, ServiceClients};
use crate::oci::compartments::Compartment;
use crate::resource::{get_resource, normalize, ResourceRecord, ResourceSet, ResourceType, ServiceGroup};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::OnceCell;

/// A group of list calls run against one compartment
#[async_trait]
pub trait Collector: Send + Sync {
    fn group(&self) -> ServiceGroup;

    /// Append every resource this group finds in `compartment`.
    /// Never fails: each call's error is recorded and skipped.
    async fn collect(&self, ctx: &CollectContext, compartment: &Compartment);
}

/// Per-compartment pipeline, in execution order
pub fn pipeline() -> Vec<Box<dyn Collector>> {
    vec![
        Box::new(ComputeCollector),
        Box::new(StorageCollector),
        Box::new(NetworkCollector),
        Box::new(DatabaseCollector),
        Box::new(AdditionalServicesCollector),
        Box::new(SecurityCollector),
        Box::new(DeveloperServicesCollector),
    ]
}

/// State shared by every collector during a run
pub struct CollectContext {
    clients: ServiceClients,
    resources: ResourceSet,
    tenancy_id: String,
    failures: AtomicUsize,
    /// Object storage namespace, fetched on first use
    namespace: OnceCell<String>,
    /// Tenancy availability domains, fetched on first use
    availability_domains: OnceCell<Vec<String>>,
}

impl CollectContext {
    pub fn new(clients: ServiceClients, tenancy_id: &str) -> Self {
        Self {
            clients,
            resources: ResourceSet::new(),
            tenancy_id: tenancy_id.to_string(),
            failures: AtomicUsize::new(0),
            namespace: OnceCell::new(),
            availability_domains: OnceCell::new(),
        }
    }

    pub fn clients(&self) -> &ServiceClients {
        &self.clients
    }

    pub fn resources(&self) -> &ResourceSet {
        &self.resources
    }

    pub fn into_resources(self) -> ResourceSet {
        self.resources
    }

    pub fn tenancy_id(&self) -> &str {
        &self.tenancy_id
    }

    /// Number of list calls that failed so far
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Log and drop a failed call
    pub fn record_failure(&self, error: CollectorError) {
        let group = error.resource_type.group().map_or("-", ServiceGroup::as_str);
        tracing::warn!(
            group,
            resource_type = %error.resource_type,
            compartment = %error.compartment_name,
            "Error discovering {}: {}",
            error.resource_type,
            error.message
        );
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// List one resource type from its registry definition
    pub async fn collect_listed(&self, resource_type: ResourceType, compartment: &Compartment) {
        self.collect_listed_with(resource_type, compartment, &[])
            .await;
    }

    /// List one resource type with extra query parameters
    pub async fn collect_listed_with(
        &self,
        resource_type: ResourceType,
        compartment: &Compartment,
        extra: &[(&str, &str)],
    ) {
        let Some(def) = get_resource(resource_type) else {
            tracing::error!("No list definition for {}", resource_type);
            return;
        };

        let Some(client) = self.client_for(resource_type, compartment) else {
            return;
        };

        let mut request = ListRequest::new(def.path.as_str())
            .param("compartmentId", compartment.id.as_str())
            .single_page(def.single_page);
        for (key, value) in &def.params {
            request = request.param(key, value.as_str());
        }
        for (key, value) in extra {
            request = request.param(key, *value);
        }

        match client.list(&request).await {
            Ok(items) => {
                let records = items
                    .iter()
                    .map(|item| normalize(def, item, compartment))
                    .collect();
                self.append(resource_type, compartment, records);
            }
            Err(e) => self.record_failure(CollectorError::new(resource_type, &compartment.name, &e)),
        }
    }

    /// Client for a resource type's service.
    ///
    /// An absent optional client skips silently; an absent required client
    /// is recorded as a failure.
    pub fn client_for(
        &self,
        resource_type: ResourceType,
        compartment: &Compartment,
    ) -> Option<&ApiHandle> {
        let service = get_resource(resource_type)?.service;
        match self.clients.get(service) {
            Some(client) => Some(client),
            None if service.is_optional() => {
                tracing::trace!("{} client absent, skipping {}", service.as_str(), resource_type);
                None
            }
            None => {
                let err = anyhow::anyhow!("{} client is not available", service.as_str());
                self.record_failure(CollectorError::new(resource_type, &compartment.name, &err));
                None
            }
        }
    }

    /// Append records for one call
    pub fn append(
        &self,
        resource_type: ResourceType,
        compartment: &Compartment,
        records: Vec<ResourceRecord>,
    ) {
        tracing::debug!(
            "{}: {} {}",
            compartment.name,
            records.len(),
            resource_type
        );
        self.resources.extend(resource_type, records);
    }

    /// Object storage namespace of the tenancy.
    /// A failed fetch is not cached, so the next compartment retries.
    pub async fn namespace(&self, client: &ApiHandle) -> anyhow::Result<&str> {
        let namespace = self
            .namespace
            .get_or_try_init(|| async {
                match client.get("/n/").await? {
                    Value::String(ns) => Ok::<_, anyhow::Error>(ns),
                    other => anyhow::bail!("Unexpected namespace response: {}", other),
                }
            })
            .await?;
        Ok(namespace.as_str())
    }

    /// Availability domain names of the tenancy
    pub async fn availability_domains(&self) -> anyhow::Result<&[String]> {
        let identity = self.clients.require(crate::oci::client::Service::Identity)?;
        let domains = self
            .availability_domains
            .get_or_try_init(|| async {
                let request = ListRequest::new("/availabilityDomains")
                    .param("compartmentId", self.tenancy_id.as_str());
                let items = identity.list(&request).await?;
                Ok::<_, anyhow::Error>(
                    items
                        .iter()
                        .filter_map(|ad| ad.get("name").and_then(|n| n.as_str()))
                        .map(str::to_string)
                        .collect(),
                )
            })
            .await?;
        Ok(domains.as_slice())
    }
}
