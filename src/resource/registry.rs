//! Resource Registry - Load list definitions from JSON
//!
//! Every listable resource type is described by a JSON definition (service,
//! path, fixed query parameters, and the fields to keep). The definitions
//! are embedded at compile time and parsed once on first access.

use super::taxonomy::ResourceType;
use crate::oci::client::Service;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[
    include_str!("../resources/compute.json"),
    include_str!("../resources/storage.json"),
    include_str!("../resources/network.json"),
    include_str!("../resources/database.json"),
    include_str!("../resources/additional.json"),
    include_str!("../resources/security.json"),
    include_str!("../resources/developer.json"),
    include_str!("../resources/identity.json"),
];

/// How a provider field is carried into a record
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Copied as-is
    #[default]
    Value,
    /// Rendered as ISO-8601 text
    Timestamp,
    /// Flattened into a map with a fixed set of sub-fields
    Nested,
}

/// Field definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDef {
    /// Key in the normalized record
    pub key: String,
    /// Field name on the provider object
    pub source: String,
    #[serde(default)]
    pub kind: FieldKind,
    /// Sub-fields, only for [`FieldKind::Nested`]
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

fn default_id_field() -> String {
    "id".to_string()
}

/// List definition for one resource type
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    pub service: Service,
    /// Path below the service endpoint
    pub path: String,
    /// Fixed query parameters (compartmentId is added per call)
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Only fetch the first page
    #[serde(default)]
    pub single_page: bool,
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Record key for the display name (`display_name` or `name`)
    pub name_key: String,
    /// Provider field holding the display name
    pub name_field: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
struct ResourceFile {
    #[serde(default)]
    resources: HashMap<String, ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<HashMap<ResourceType, ResourceDef>> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static HashMap<ResourceType, ResourceDef> {
    REGISTRY.get_or_init(|| {
        let mut registry = HashMap::new();

        for content in RESOURCE_FILES {
            let partial: ResourceFile = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            for (key, def) in partial.resources {
                let Some(resource_type) = ResourceType::ALL.iter().find(|rt| rt.as_str() == key)
                else {
                    panic!("Embedded resource JSON names unknown bucket: {}", key);
                };
                registry.insert(*resource_type, def);
            }
        }

        registry
    })
}

/// Get a resource definition by type
pub fn get_resource(resource_type: ResourceType) -> Option<&'static ResourceDef> {
    get_registry().get(&resource_type)
}
