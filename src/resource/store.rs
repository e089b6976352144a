//! Shared resource store
//!
//! Append-only, one lock per bucket. Compartment tasks append concurrently;
//! once every task has finished the store is drained into plain vectors.

use super::normalize::ResourceRecord;
use super::taxonomy::ResourceType;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Collected records keyed by bucket
pub type Buckets = BTreeMap<ResourceType, Vec<ResourceRecord>>;

/// Concurrent record store
#[derive(Debug)]
pub struct ResourceSet {
    buckets: Vec<Mutex<Vec<ResourceRecord>>>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self {
            buckets: ResourceType::ALL
                .iter()
                .map(|_| Mutex::new(Vec::new()))
                .collect(),
        }
    }

    fn bucket(&self, resource_type: ResourceType) -> MutexGuard<'_, Vec<ResourceRecord>> {
        // A poisoned bucket still holds every record appended before the panic
        self.buckets[resource_type.index()]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append one record
    pub fn push(&self, resource_type: ResourceType, record: ResourceRecord) {
        self.bucket(resource_type).push(record);
    }

    /// Append a batch of records under a single lock acquisition
    pub fn extend(&self, resource_type: ResourceType, records: Vec<ResourceRecord>) {
        if records.is_empty() {
            return;
        }
        self.bucket(resource_type).extend(records);
    }

    /// Copy of every bucket (empty ones included)
    pub fn snapshot(&self) -> Buckets {
        ResourceType::ALL
            .into_iter()
            .map(|rt| (rt, self.bucket(rt).clone()))
            .collect()
    }

    /// Consume the store, yielding every bucket (empty ones included)
    pub fn into_buckets(self) -> Buckets {
        ResourceType::ALL
            .into_iter()
            .zip(self.buckets)
            .map(|(rt, bucket)| {
                let records = bucket
                    .into_inner()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                (rt, records)
            })
            .collect()
    }
}

impl Default for ResourceSet {
    fn default() -> Self {
        Self::new()
    }
}
