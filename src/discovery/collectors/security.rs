//! Security collector: bastions, certificates, WAAS policies, vault secrets

use super::{CollectContext, Collector};
use crate::oci::compartments::Compartment;
use crate::resource::{ResourceType, ServiceGroup};
use async_trait::async_trait;

const TYPES: [ResourceType; 4] = [
    ResourceType::BastionSessions,
    ResourceType::Certificates,
    ResourceType::WaasPolicies,
    ResourceType::VaultSecrets,
];

pub struct SecurityCollector;

#[async_trait]
impl Collector for SecurityCollector {
    fn group(&self) -> ServiceGroup {
        ServiceGroup::Security
    }

    async fn collect(&self, ctx: &CollectContext, compartment: &Compartment) {
        for resource_type in TYPES {
            ctx.collect_listed(resource_type, compartment).await;
        }
    }
}
