//! Resource taxonomy
//!
//! The fixed set of resource-type buckets a discovery run fills, and the
//! collector group responsible for each.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One resource-type bucket of the output document.
///
/// Declaration order is the serialization order of `resources` and
/// `summary.by_service`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    ComputeInstances,
    BlockVolumes,
    ObjectStorageBuckets,
    AutonomousDatabases,
    LoadBalancers,
    Vcns,
    Subnets,
    SecurityLists,
    RouteTables,
    InternetGateways,
    NatGateways,
    ServiceGateways,
    NetworkSecurityGroups,
    Images,
    VolumeGroups,
    BootVolumes,
    Backups,
    DbSystems,
    Functions,
    Containers,
    Streams,
    Topics,
    Alarms,
    Budgets,
    Users,
    Groups,
    DynamicGroups,
    Policies,
    KubernetesClusters,
    ContainerRepositories,
    ApiGateways,
    Certificates,
    WaasPolicies,
    BastionSessions,
    FileSystems,
    VaultSecrets,
    ApplicationDependencies,
}

impl ResourceType {
    /// Every bucket, in declaration order
    pub const ALL: [ResourceType; 37] = [
        ResourceType::ComputeInstances,
        ResourceType::BlockVolumes,
        ResourceType::ObjectStorageBuckets,
        ResourceType::AutonomousDatabases,
        ResourceType::LoadBalancers,
        ResourceType::Vcns,
        ResourceType::Subnets,
        ResourceType::SecurityLists,
        ResourceType::RouteTables,
        ResourceType::InternetGateways,
        ResourceType::NatGateways,
        ResourceType::ServiceGateways,
        ResourceType::NetworkSecurityGroups,
        ResourceType::Images,
        ResourceType::VolumeGroups,
        ResourceType::BootVolumes,
        ResourceType::Backups,
        ResourceType::DbSystems,
        ResourceType::Functions,
        ResourceType::Containers,
        ResourceType::Streams,
        ResourceType::Topics,
        ResourceType::Alarms,
        ResourceType::Budgets,
        ResourceType::Users,
        ResourceType::Groups,
        ResourceType::DynamicGroups,
        ResourceType::Policies,
        ResourceType::KubernetesClusters,
        ResourceType::ContainerRepositories,
        ResourceType::ApiGateways,
        ResourceType::Certificates,
        ResourceType::WaasPolicies,
        ResourceType::BastionSessions,
        ResourceType::FileSystems,
        ResourceType::VaultSecrets,
        ResourceType::ApplicationDependencies,
    ];

    /// Number of buckets
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this bucket in [`ResourceType::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Bucket key as it appears in the output document
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::ComputeInstances => "compute_instances",
            ResourceType::BlockVolumes => "block_volumes",
            ResourceType::ObjectStorageBuckets => "object_storage_buckets",
            ResourceType::AutonomousDatabases => "autonomous_databases",
            ResourceType::LoadBalancers => "load_balancers",
            ResourceType::Vcns => "vcns",
            ResourceType::Subnets => "subnets",
            ResourceType::SecurityLists => "security_lists",
            ResourceType::RouteTables => "route_tables",
            ResourceType::InternetGateways => "internet_gateways",
            ResourceType::NatGateways => "nat_gateways",
            ResourceType::ServiceGateways => "service_gateways",
            ResourceType::NetworkSecurityGroups => "network_security_groups",
            ResourceType::Images => "images",
            ResourceType::VolumeGroups => "volume_groups",
            ResourceType::BootVolumes => "boot_volumes",
            ResourceType::Backups => "backups",
            ResourceType::DbSystems => "db_systems",
            ResourceType::Functions => "functions",
            ResourceType::Containers => "containers",
            ResourceType::Streams => "streams",
            ResourceType::Topics => "topics",
            ResourceType::Alarms => "alarms",
            ResourceType::Budgets => "budgets",
            ResourceType::Users => "users",
            ResourceType::Groups => "groups",
            ResourceType::DynamicGroups => "dynamic_groups",
            ResourceType::Policies => "policies",
            ResourceType::KubernetesClusters => "kubernetes_clusters",
            ResourceType::ContainerRepositories => "container_repositories",
            ResourceType::ApiGateways => "api_gateways",
            ResourceType::Certificates => "certificates",
            ResourceType::WaasPolicies => "waas_policies",
            ResourceType::BastionSessions => "bastion_sessions",
            ResourceType::FileSystems => "file_systems",
            ResourceType::VaultSecrets => "vault_secrets",
            ResourceType::ApplicationDependencies => "application_dependencies",
        }
    }

    /// Collector group that fills this bucket, if any
    pub fn group(self) -> Option<ServiceGroup> {
        use ResourceType::*;
        let group = match self {
            ComputeInstances | Images => ServiceGroup::Compute,
            BlockVolumes | BootVolumes | VolumeGroups | Backups | ObjectStorageBuckets
            | FileSystems => ServiceGroup::Storage,
            Vcns | Subnets | SecurityLists | RouteTables | InternetGateways | NatGateways
            | ServiceGateways | NetworkSecurityGroups | LoadBalancers => ServiceGroup::Network,
            AutonomousDatabases | DbSystems => ServiceGroup::Database,
            Functions | Containers | KubernetesClusters | Streams | Topics | Alarms | Budgets => {
                ServiceGroup::Additional
            }
            BastionSessions | Certificates | WaasPolicies | VaultSecrets => ServiceGroup::Security,
            ContainerRepositories | ApiGateways => ServiceGroup::Developer,
            Users | Groups | DynamicGroups | Policies => ServiceGroup::Identity,
            ApplicationDependencies => return None,
        };
        Some(group)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical collector groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceGroup {
    Compute,
    Storage,
    Network,
    Database,
    Additional,
    Security,
    Developer,
    /// Tenancy-scoped, runs once against the root compartment
    Identity,
}

impl ServiceGroup {
    /// Groups run inside every compartment, in pipeline order
    pub const PER_COMPARTMENT: [ServiceGroup; 7] = [
        ServiceGroup::Compute,
        ServiceGroup::Storage,
        ServiceGroup::Network,
        ServiceGroup::Database,
        ServiceGroup::Additional,
        ServiceGroup::Security,
        ServiceGroup::Developer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceGroup::Compute => "compute",
            ServiceGroup::Storage => "storage",
            ServiceGroup::Network => "network",
            ServiceGroup::Database => "database",
            ServiceGroup::Additional => "additional",
            ServiceGroup::Security => "security",
            ServiceGroup::Developer => "developer",
            ServiceGroup::Identity => "identity",
        }
    }
}
