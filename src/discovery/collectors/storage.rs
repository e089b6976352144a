//! Storage collector
//!
//! Block storage (volumes, boot volumes, volume groups, backups), object
//! storage buckets, and file systems.

use super::{CollectContext, Collector};
use crate::error::CollectorError;
use crate::oci::client::{ListRequest, Service};
use crate::oci::compartments::Compartment;
use crate::resource::normalize::{field, timestamp};
use crate::resource::{ResourceRecord, ResourceType, ServiceGroup};
use async_trait::async_trait;
use serde_json::Value;

const BLOCK_TYPES: [ResourceType; 4] = [
    ResourceType::BlockVolumes,
    ResourceType::BootVolumes,
    ResourceType::VolumeGroups,
    ResourceType::Backups,
];

pub struct StorageCollector;

#[async_trait]
impl Collector for StorageCollector {
    fn group(&self) -> ServiceGroup {
        ServiceGroup::Storage
    }

    async fn collect(&self, ctx: &CollectContext, compartment: &Compartment) {
        for resource_type in BLOCK_TYPES {
            ctx.collect_listed(resource_type, compartment).await;
        }
        collect_buckets(ctx, compartment).await;
        collect_file_systems(ctx, compartment).await;
    }
}

/// Buckets are listed per namespace and identified as `<namespace>:<name>`
async fn collect_buckets(ctx: &CollectContext, compartment: &Compartment) {
    let resource_type = ResourceType::ObjectStorageBuckets;
    let fail = |e: anyhow::Error| {
        ctx.record_failure(CollectorError::new(resource_type, &compartment.name, &e))
    };

    let client = match ctx.clients().require(Service::ObjectStorage) {
        Ok(client) => client,
        Err(e) => return fail(e),
    };
    let namespace = match ctx.namespace(client).await {
        Ok(ns) => ns,
        Err(e) => return fail(e),
    };

    let request = ListRequest::new(format!("/n/{}/b/", urlencoding::encode(namespace)))
        .param("compartmentId", compartment.id.as_str());
    match client.list(&request).await {
        Ok(items) => {
            let records = items
                .iter()
                .map(|item| bucket_record(namespace, item, compartment))
                .collect();
            ctx.append(resource_type, compartment, records);
        }
        Err(e) => fail(e),
    }
}

fn bucket_record(namespace: &str, item: &Value, compartment: &Compartment) -> ResourceRecord {
    let name = field(item, "name");
    let id = match name.as_str() {
        Some(name) => Value::String(format!("{}:{}", namespace, name)),
        None => Value::Null,
    };

    ResourceRecord::new(
        id,
        "name",
        name,
        field(item, "lifecycleState"),
        compartment,
        timestamp(item.get("timeCreated")),
    )
    .with("namespace", Value::String(namespace.to_string()))
    .with("etag", field(item, "etag"))
}

/// File systems are listed per availability domain
async fn collect_file_systems(ctx: &CollectContext, compartment: &Compartment) {
    let resource_type = ResourceType::FileSystems;
    if ctx.clients().get(Service::FileStorage).is_none() {
        return;
    }

    let domains = match ctx.availability_domains().await {
        Ok(domains) => domains,
        Err(e) => {
            return ctx.record_failure(CollectorError::new(resource_type, &compartment.name, &e))
        }
    };

    for domain in domains {
        ctx.collect_listed_with(
            resource_type,
            compartment,
            &[("availabilityDomain", domain.as_str())],
        )
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bucket_record_shape() {
        let compartment = Compartment::new("c1", "dev");
        let item = json!({
            "name": "logs",
            "etag": "abc",
            "timeCreated": "2024-01-02T03:04:05Z"
        });

        let record = bucket_record("acme", &item, &compartment);

        assert_eq!(record.get("id"), Some(&json!("acme:logs")));
        assert_eq!(record.get("name"), Some(&json!("logs")));
        assert_eq!(record.get("namespace"), Some(&json!("acme")));
        assert_eq!(record.get("lifecycle_state"), Some(&Value::Null));
        assert_eq!(record.get("time_created"), Some(&json!("2024-01-02T03:04:05+00:00")));
        assert_eq!(record.get("compartment_name"), Some(&json!("dev")));
    }

    #[test]
    fn test_bucket_without_name_has_null_id() {
        let record = bucket_record("acme", &json!({}), &Compartment::new("c1", "dev"));
        assert_eq!(record.get("id"), Some(&Value::Null));
        assert_eq!(record.get("etag"), Some(&Value::Null));
    }
}
