//! OCI Compartments
//!
//! Loads the compartment tree of a tenancy once per run.

use super::client::{ListRequest, ServiceApi};
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;

/// Fallback name for the tenancy when it is missing from the lookup
pub const ROOT_COMPARTMENT_NAME: &str = "root";

/// Compartment information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compartment {
    pub id: String,
    pub name: String,
}

impl Compartment {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

impl From<&Value> for Compartment {
    fn from(value: &Value) -> Self {
        Self {
            id: value
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string(),
            name: value
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string(),
        }
    }
}

/// Every compartment of a tenancy plus an id→name lookup
#[derive(Debug, Clone, Default)]
pub struct CompartmentIndex {
    compartments: Vec<Compartment>,
    names: HashMap<String, String>,
}

impl CompartmentIndex {
    pub fn new(compartments: Vec<Compartment>) -> Self {
        let names = compartments
            .iter()
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect();
        Self {
            compartments,
            names,
        }
    }

    pub fn compartments(&self) -> &[Compartment] {
        &self.compartments
    }

    pub fn len(&self) -> usize {
        self.compartments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compartments.is_empty()
    }

    /// Name of a compartment by id
    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// The tenancy as a compartment, named from the lookup or `root`
    pub fn root(&self, tenancy_id: &str) -> Compartment {
        Compartment::new(
            tenancy_id,
            self.name_of(tenancy_id).unwrap_or(ROOT_COMPARTMENT_NAME),
        )
    }
}

/// Load all accessible compartments, with the root compartment appended.
///
/// The subtree listing omits the tenancy itself, so it is fetched separately.
pub async fn load_compartments(
    identity: &dyn ServiceApi,
    tenancy_id: &str,
) -> Result<CompartmentIndex> {
    let request = ListRequest::new("/compartments")
        .param("compartmentId", tenancy_id)
        .param("compartmentIdInSubtree", "true")
        .param("accessLevel", "ACCESSIBLE");

    let mut compartments: Vec<Compartment> = identity
        .list(&request)
        .await
        .context("Failed to list compartments")?
        .iter()
        .map(Compartment::from)
        .collect();

    let root = identity
        .get(&format!("/compartments/{}", tenancy_id))
        .await
        .context("Failed to fetch root compartment")?;
    compartments.push(Compartment::from(&root));

    tracing::debug!("Loaded {} compartments", compartments.len());
    Ok(CompartmentIndex::new(compartments))
}

/// Fetch tenancy metadata (used to validate credentials)
pub async fn get_tenancy(identity: &dyn ServiceApi, tenancy_id: &str) -> Result<Value> {
    identity
        .get(&format!("/tenancies/{}", tenancy_id))
        .await
        .context("Failed to fetch tenancy")
}
