//! Identity collector
//!
//! Users, groups, dynamic groups and policies live in the tenancy, so this
//! collector runs once against the root compartment after every
//! per-compartment task has finished.

use super::{CollectContext, Collector};
use crate::oci::compartments::Compartment;
use crate::resource::{ResourceType, ServiceGroup};
use async_trait::async_trait;

const TYPES: [ResourceType; 4] = [
    ResourceType::Users,
    ResourceType::Groups,
    ResourceType::DynamicGroups,
    ResourceType::Policies,
];

pub struct IdentityCollector;

#[async_trait]
impl Collector for IdentityCollector {
    fn group(&self) -> ServiceGroup {
        ServiceGroup::Identity
    }

    async fn collect(&self, ctx: &CollectContext, root: &Compartment) {
        if root.id != ctx.tenancy_id() {
            tracing::warn!("Identity collector called for non-root compartment {}", root.name);
            return;
        }
        for resource_type in TYPES {
            ctx.collect_listed(resource_type, root).await;
        }
    }
}
