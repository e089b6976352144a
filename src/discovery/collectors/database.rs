//! Database collector

use super::{CollectContext, Collector};
use crate::oci::compartments::Compartment;
use crate::resource::{ResourceType, ServiceGroup};
use async_trait::async_trait;

const TYPES: [ResourceType; 2] = [ResourceType::AutonomousDatabases, ResourceType::DbSystems];

pub struct DatabaseCollector;

#[async_trait]
impl Collector for DatabaseCollector {
    fn group(&self) -> ServiceGroup {
        ServiceGroup::Database
    }

    async fn collect(&self, ctx: &CollectContext, compartment: &Compartment) {
        for resource_type in TYPES {
            ctx.collect_listed(resource_type, compartment).await;
        }
    }
}
