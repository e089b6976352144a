//! Credential validation: a single tenancy fetch, no discovery calls

use crate::oci::client::{Service, ServiceClients};
use crate::oci::compartments::get_tenancy;
use crate::oci::http::format_oci_error;
use serde::Serialize;

/// Output of the `validate` operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Check that the credentials can read tenancy metadata
pub async fn validate_credentials(clients: &ServiceClients, tenancy_id: &str) -> ValidationResult {
    let outcome = match clients.require(Service::Identity) {
        Ok(identity) => get_tenancy(identity.as_ref(), tenancy_id).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(tenancy) => {
            let name = tenancy.get("name").and_then(|v| v.as_str()).unwrap_or("-");
            tracing::info!("Credentials valid for tenancy {}", name);
            ValidationResult {
                success: true,
                message: Some("Credentials validated successfully".to_string()),
                error: None,
            }
        }
        Err(e) => {
            tracing::warn!("Credential validation failed: {:#}", e);
            ValidationResult {
                success: false,
                message: None,
                error: Some(format!(
                    "Credential validation failed: {}",
                    format_oci_error(&e)
                )),
            }
        }
    }
}
