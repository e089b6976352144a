//! Error types
//!
//! Fatal errors abort the run; collector errors are logged and dropped.

use crate::resource::ResourceType;
use thiserror::Error;

/// Errors that end a run with a non-zero exit status
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("invalid configuration: {0:#}")]
    Config(anyhow::Error),
    #[error("invalid credentials: {0:#}")]
    Credentials(anyhow::Error),
    #[error("client bootstrap failed: {0:#}")]
    Bootstrap(anyhow::Error),
    #[error("compartment loading failed: {0:#}")]
    CompartmentLoad(anyhow::Error),
}

/// A single failed list call
#[derive(Debug, Error)]
#[error("{resource_type} in {compartment_name}: {message}")]
pub struct CollectorError {
    pub resource_type: ResourceType,
    pub compartment_name: String,
    pub message: String,
}

impl CollectorError {
    pub fn new(resource_type: ResourceType, compartment_name: &str, error: &anyhow::Error) -> Self {
        Self {
            resource_type,
            compartment_name: compartment_name.to_string(),
            message: format!("{:#}", error),
        }
    }
}
