//! Resource abstraction layer
//!
//! This module describes what a discovery run collects and how provider
//! responses become normalized records.
//!
//! # Architecture
//!
//! - [`taxonomy`] - The fixed set of resource-type buckets
//! - [`registry`] - Loads list definitions from embedded JSON
//! - [`normalize`] - Maps provider JSON objects to normalized records
//! - [`store`] - Concurrent append-only store shared by collectors
//!
//! # Resource Definitions
//!
//! Resources are defined in JSON files under `src/resources/`, one file per
//! collector group (`compute.json`, `storage.json`, `network.json`, ...).

pub mod normalize;
pub mod registry;
pub mod store;
pub mod taxonomy;

pub use normalize::{normalize, ResourceRecord};
pub use registry::{get_resource, ResourceDef};
pub use store::{Buckets, ResourceSet};
pub use taxonomy::{ResourceType, ServiceGroup};
