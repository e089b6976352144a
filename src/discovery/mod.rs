//! Discovery pipeline
//!
//! - [`orchestrator`] - Schedules collectors across compartments
//! - [`collectors`] - Per-service list-and-normalize groups
//! - [`summary`] - Result document and counts
//! - [`validate`] - Credential check

pub mod collectors;
pub mod orchestrator;
pub mod summary;
pub mod validate;

pub use orchestrator::Discovery;
pub use summary::{summarize, DiscoveryResult, FailureReport, Metadata, Summary};
pub use validate::{validate_credentials, ValidationResult};
