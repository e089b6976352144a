//! OCI Client
//!
//! Per-service API handles. Collectors only see the [`ServiceApi`] trait;
//! the REST implementation signs every request and follows pagination.

use super::auth::RequestSigner;
use super::http::OciHttpClient;
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Safety cap on followed pages per list call
const MAX_PAGES: usize = 1000;

/// Provider APIs used during discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    Identity,
    Compute,
    BlockStorage,
    ObjectStorage,
    VirtualNetwork,
    LoadBalancer,
    Database,
    Functions,
    ContainerInstances,
    ContainerEngine,
    Streaming,
    Notifications,
    Monitoring,
    Budgets,
    Artifacts,
    ApiGateway,
    Certificates,
    Waas,
    Bastion,
    FileStorage,
    Vault,
}

impl Service {
    /// Services every discovery run needs
    pub const REQUIRED: [Service; 7] = [
        Service::Identity,
        Service::Compute,
        Service::BlockStorage,
        Service::ObjectStorage,
        Service::Database,
        Service::LoadBalancer,
        Service::VirtualNetwork,
    ];

    /// Services whose absence only drops their resource types
    pub const OPTIONAL: [Service; 14] = [
        Service::Functions,
        Service::ContainerInstances,
        Service::ContainerEngine,
        Service::Streaming,
        Service::Notifications,
        Service::Monitoring,
        Service::Budgets,
        Service::Artifacts,
        Service::ApiGateway,
        Service::Certificates,
        Service::Waas,
        Service::Bastion,
        Service::FileStorage,
        Service::Vault,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Service::Identity => "identity",
            Service::Compute => "compute",
            Service::BlockStorage => "block_storage",
            Service::ObjectStorage => "object_storage",
            Service::VirtualNetwork => "virtual_network",
            Service::LoadBalancer => "load_balancer",
            Service::Database => "database",
            Service::Functions => "functions",
            Service::ContainerInstances => "container_instances",
            Service::ContainerEngine => "container_engine",
            Service::Streaming => "streaming",
            Service::Notifications => "notifications",
            Service::Monitoring => "monitoring",
            Service::Budgets => "budgets",
            Service::Artifacts => "artifacts",
            Service::ApiGateway => "api_gateway",
            Service::Certificates => "certificates",
            Service::Waas => "waas",
            Service::Bastion => "bastion",
            Service::FileStorage => "file_storage",
            Service::Vault => "vault",
        }
    }

    pub fn is_optional(self) -> bool {
        Self::OPTIONAL.contains(&self)
    }

    /// Regional endpoint including the API version prefix
    pub fn endpoint(self, region: &str) -> String {
        match self {
            Service::Identity => format!("https://identity.{}.oci.oraclecloud.com/20160918", region),
            Service::Compute | Service::BlockStorage | Service::VirtualNetwork => {
                format!("https://iaas.{}.oraclecloud.com/20160918", region)
            }
            Service::ObjectStorage => format!("https://objectstorage.{}.oraclecloud.com", region),
            Service::LoadBalancer => format!("https://iaas.{}.oraclecloud.com/20170115", region),
            Service::Database => format!("https://database.{}.oraclecloud.com/20160918", region),
            Service::Functions => {
                format!("https://functions.{}.oci.oraclecloud.com/20181201", region)
            }
            Service::ContainerInstances => format!(
                "https://compute-containerinstance.{}.oci.oraclecloud.com/20210415",
                region
            ),
            Service::ContainerEngine => {
                format!("https://containerengine.{}.oci.oraclecloud.com/20180222", region)
            }
            Service::Streaming => {
                format!("https://streaming.{}.oci.oraclecloud.com/20180418", region)
            }
            Service::Notifications => {
                format!("https://notification.{}.oci.oraclecloud.com/20181201", region)
            }
            Service::Monitoring => format!("https://telemetry.{}.oraclecloud.com/20180401", region),
            Service::Budgets => format!("https://usage.{}.oci.oraclecloud.com/20190111", region),
            Service::Artifacts => {
                format!("https://artifacts.{}.oci.oraclecloud.com/20160918", region)
            }
            Service::ApiGateway => {
                format!("https://apigateway.{}.oci.oraclecloud.com/20190501", region)
            }
            Service::Certificates => format!(
                "https://certificatesmanagement.{}.oci.oraclecloud.com/20210224",
                region
            ),
            Service::Waas => format!("https://waas.{}.oci.oraclecloud.com/20181116", region),
            Service::Bastion => format!("https://bastion.{}.oci.oraclecloud.com/20210331", region),
            Service::FileStorage => {
                format!("https://filestorage.{}.oraclecloud.com/20171215", region)
            }
            Service::Vault => format!("https://vaults.{}.oci.oraclecloud.com/20180608", region),
        }
    }
}

/// A "list resources" call: path below the service endpoint plus query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Stop after the first page
    pub single_page: bool,
}

impl ListRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            single_page: false,
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn single_page(mut self, single_page: bool) -> Self {
        self.single_page = single_page;
        self
    }

    /// Look up a query parameter
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Opaque handle to one provider API
#[async_trait]
pub trait ServiceApi: Send + Sync {
    /// Fetch a single object
    async fn get(&self, path: &str) -> Result<Value>;

    /// List every item a call returns, following pagination
    async fn list(&self, request: &ListRequest) -> Result<Vec<Value>>;
}

/// REST implementation of [`ServiceApi`]
#[derive(Clone)]
pub struct OciServiceClient {
    service: Service,
    http: OciHttpClient,
    endpoint: Url,
}

impl OciServiceClient {
    pub fn new(service: Service, http: OciHttpClient, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint.trim_end_matches('/'))
            .with_context(|| format!("Invalid {} endpoint: {}", service.as_str(), endpoint))?;
        Ok(Self {
            service,
            http,
            endpoint,
        })
    }

    fn url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{}{}", base, path))
            .with_context(|| format!("Invalid {} path: {}", self.service.as_str(), path))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

#[async_trait]
impl ServiceApi for OciServiceClient {
    async fn get(&self, path: &str) -> Result<Value> {
        let url = self.url(path, &[])?;
        Ok(self.http.get(&url).await?.body)
    }

    async fn list(&self, request: &ListRequest) -> Result<Vec<Value>> {
        let mut all_items = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut query = request.query.clone();
            if let Some(token) = page_token.take() {
                query.push(("page".to_string(), token));
            }

            let page = self.http.get(&self.url(&request.path, &query)?).await?;
            all_items.extend(extract_items(page.body)?);

            match page.next_page {
                Some(token) if !request.single_page => page_token = Some(token),
                _ => return Ok(all_items),
            }
        }

        tracing::warn!(
            "{} {} stopped after {} pages",
            self.service.as_str(),
            request.path,
            MAX_PAGES
        );
        Ok(all_items)
    }
}

/// List bodies are either a bare array or an `{ "items": [...] }` envelope
fn extract_items(body: Value) -> Result<Vec<Value>> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => Ok(items),
            _ => anyhow::bail!("List response has no items array"),
        },
        _ => anyhow::bail!("Unexpected list response shape"),
    }
}

/// Shared handle type for a service API
pub type ApiHandle = Arc<dyn ServiceApi>;

/// Every service client a run uses, resolved once at bootstrap.
///
/// Optional services are `None` when their client could not be built or
/// the service is disabled in the configuration.
#[derive(Clone, Default)]
pub struct ServiceClients {
    clients: HashMap<Service, ApiHandle>,
}

impl ServiceClients {
    /// Build REST clients for every service.
    /// Fails if any required client cannot be constructed.
    pub fn bootstrap(
        signer: Arc<dyn RequestSigner>,
        region: &str,
        config: &Config,
    ) -> Result<Self> {
        let http = OciHttpClient::new(
            signer,
            Duration::from_secs(config.effective_request_timeout_secs()),
        )?;
        let mut clients = ServiceClients::default();

        for service in Service::REQUIRED {
            let endpoint = config.endpoint_for(service, region);
            let client = OciServiceClient::new(service, http.clone(), &endpoint)
                .with_context(|| format!("Failed to initialize {} client", service.as_str()))?;
            clients.insert(service, Arc::new(client));
        }

        for service in Service::OPTIONAL {
            if config.is_disabled(service) {
                tracing::info!("{} client disabled by configuration", service.as_str());
                continue;
            }
            let endpoint = config.endpoint_for(service, region);
            match OciServiceClient::new(service, http.clone(), &endpoint) {
                Ok(client) => clients.insert(service, Arc::new(client)),
                Err(e) => tracing::warn!("{} client unavailable: {:#}", service.as_str(), e),
            }
        }

        Ok(clients)
    }

    /// Register a client for a service
    pub fn insert(&mut self, service: Service, client: ApiHandle) {
        self.clients.insert(service, client);
    }

    /// Builder form of [`ServiceClients::insert`]
    pub fn with(mut self, service: Service, client: ApiHandle) -> Self {
        self.insert(service, client);
        self
    }

    /// Client for a service, if it is available
    pub fn get(&self, service: Service) -> Option<&ApiHandle> {
        self.clients.get(&service)
    }

    /// Client for a required service
    pub fn require(&self, service: Service) -> Result<&ApiHandle> {
        self.get(service)
            .with_context(|| format!("{} client is not available", service.as_str()))
    }
}
