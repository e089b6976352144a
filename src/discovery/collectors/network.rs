//! Network collector
//!
//! Virtual network objects (VCNs, subnets, gateways, security lists, route
//! tables, NSGs) followed by load balancers.

use super::{CollectContext, Collector};
use crate::oci::compartments::Compartment;
use crate::resource::{ResourceType, ServiceGroup};
use async_trait::async_trait;

const TYPES: [ResourceType; 9] = [
    ResourceType::Vcns,
    ResourceType::Subnets,
    ResourceType::SecurityLists,
    ResourceType::RouteTables,
    ResourceType::InternetGateways,
    ResourceType::NatGateways,
    ResourceType::ServiceGateways,
    ResourceType::NetworkSecurityGroups,
    ResourceType::LoadBalancers,
];

pub struct NetworkCollector;

#[async_trait]
impl Collector for NetworkCollector {
    fn group(&self) -> ServiceGroup {
        ServiceGroup::Network
    }

    async fn collect(&self, ctx: &CollectContext, compartment: &Compartment) {
        for resource_type in TYPES {
            ctx.collect_listed(resource_type, compartment).await;
        }
    }
}
