//! Developer services collector

use super::{CollectContext, Collector};
use crate::oci::compartments::Compartment;
use crate::resource::{ResourceType, ServiceGroup};
use async_trait::async_trait;

const TYPES: [ResourceType; 2] = [
    ResourceType::ContainerRepositories,
    ResourceType::ApiGateways,
];

pub struct DeveloperServicesCollector;

#[async_trait]
impl Collector for DeveloperServicesCollector {
    fn group(&self) -> ServiceGroup {
        ServiceGroup::Developer
    }

    async fn collect(&self, ctx: &CollectContext, compartment: &Compartment) {
        for resource_type in TYPES {
            ctx.collect_listed(resource_type, compartment).await;
        }
    }
}
