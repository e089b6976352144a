//! OCI API interaction module
//!
//! This module provides the core functionality for talking to Oracle Cloud
//! Infrastructure APIs: credentials and request signing, the signed HTTP
//! client, per-service API handles, and compartment loading.
//!
//! # Module Structure
//!
//! - [`auth`] - Credential payload, transient key file, request signing
//! - [`client`] - Service endpoints and the [`client::ServiceApi`] handles
//! - [`http`] - Signed HTTP GET with pagination headers
//! - [`compartments`] - Compartment tree loading
//!
//! # Example
//!
//! ```ignore
//! use crate::oci::{auth::*, client::ServiceClients};
//!
//! async fn example(creds: &Credentials, config: &Config) -> anyhow::Result<()> {
//!     let key = KeyFile::materialize(&creds.private_key)?;
//!     let signer = RsaSigner::from_key_file(creds.key_id(), key.path())?;
//!     let clients = ServiceClients::bootstrap(Arc::new(signer), &creds.region, config)?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod compartments;
pub mod http;
