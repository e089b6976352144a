//! ocinv - OCI resource inventory
//!
//! Discovers the resources of a tenancy across every accessible compartment
//! and reports them as one JSON document.

pub mod config;
pub mod discovery;
pub mod error;
pub mod oci;
pub mod resource;

/// Version injected at compile time via OCINV_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("OCINV_VERSION") {
    Some(v) => v,
    None => "dev",
};
