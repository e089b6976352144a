//! Additional services collector
//!
//! Functions, container instances, Kubernetes, streaming, notifications,
//! monitoring and budgets. Every client here is optional.

use super::{CollectContext, Collector};
use crate::oci::compartments::Compartment;
use crate::resource::{ResourceType, ServiceGroup};
use async_trait::async_trait;

const TYPES: [ResourceType; 7] = [
    ResourceType::Functions,
    ResourceType::Containers,
    ResourceType::KubernetesClusters,
    ResourceType::Streams,
    ResourceType::Topics,
    ResourceType::Alarms,
    ResourceType::Budgets,
];

pub struct AdditionalServicesCollector;

#[async_trait]
impl Collector for AdditionalServicesCollector {
    fn group(&self) -> ServiceGroup {
        ServiceGroup::Additional
    }

    async fn collect(&self, ctx: &CollectContext, compartment: &Compartment) {
        for resource_type in TYPES {
            ctx.collect_listed(resource_type, compartment).await;
        }
    }
}
