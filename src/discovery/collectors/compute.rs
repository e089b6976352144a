//! Compute collector: instances and recent images

use super::{CollectContext, Collector};
use crate::oci::compartments::Compartment;
use crate::resource::{ResourceType, ServiceGroup};
use async_trait::async_trait;

const TYPES: [ResourceType; 2] = [ResourceType::ComputeInstances, ResourceType::Images];

pub struct ComputeCollector;

#[async_trait]
impl Collector for ComputeCollector {
    fn group(&self) -> ServiceGroup {
        ServiceGroup::Compute
    }

    async fn collect(&self, ctx: &CollectContext, compartment: &Compartment) {
        for resource_type in TYPES {
            ctx.collect_listed(resource_type, compartment).await;
        }
    }
}
