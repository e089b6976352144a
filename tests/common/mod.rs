//! In-memory provider API shared by the discovery tests

#![allow(dead_code)]

use async_trait::async_trait;
use ocinv::oci::client::{ListRequest, Service, ServiceApi, ServiceClients};
use ocinv::oci::http::ApiError;
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TENANCY: &str = "ocid1.tenancy.oc1..t";

/// One recorded call: path and the compartmentId it targeted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub path: String,
    pub compartment: Option<String>,
}

/// Routes calls by `path@compartmentId`, falling back to `path`.
///
/// Unknown lists are empty; unknown gets fail with a 404.
#[derive(Default)]
pub struct FakeApi {
    lists: HashMap<String, Vec<Value>>,
    gets: HashMap<String, Value>,
    failing: HashSet<String>,
    panicking: HashSet<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<Call>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tenancy with the given child compartments
    pub fn with_tenancy(children: &[(&str, &str)]) -> Self {
        let compartments = children
            .iter()
            .map(|(id, name)| serde_json::json!({"id": id, "name": name}))
            .collect();
        Self::new()
            .list("/compartments", compartments)
            .get(
                &format!("/compartments/{TENANCY}"),
                serde_json::json!({"id": TENANCY, "name": "acme"}),
            )
    }

    pub fn list(mut self, key: &str, items: Vec<Value>) -> Self {
        self.lists.insert(key.to_string(), items);
        self
    }

    pub fn get(mut self, key: &str, body: Value) -> Self {
        self.gets.insert(key.to_string(), body);
        self
    }

    pub fn fail(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    pub fn panic_on(mut self, key: &str) -> Self {
        self.panicking.insert(key.to_string());
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.path == path).collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn matches(set: &HashSet<String>, path: &str, compartment: Option<&str>) -> bool {
        compartment.is_some_and(|c| set.contains(&format!("{path}@{c}"))) || set.contains(path)
    }

    fn record(&self, path: &str, compartment: Option<&str>) {
        self.calls.lock().unwrap().push(Call {
            path: path.to_string(),
            compartment: compartment.map(str::to_string),
        });
    }
}

#[async_trait]
impl ServiceApi for FakeApi {
    async fn get(&self, path: &str) -> anyhow::Result<Value> {
        self.record(path, None);
        if self.failing.contains(path) {
            return Err(ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, None).into());
        }
        match self.gets.get(path) {
            Some(body) => Ok(body.clone()),
            None => Err(ApiError::new(StatusCode::NOT_FOUND, Some("NotAuthorizedOrNotFound")).into()),
        }
    }

    async fn list(&self, request: &ListRequest) -> anyhow::Result<Vec<Value>> {
        let path = request.path.as_str();
        let compartment = request.get_param("compartmentId");
        self.record(path, compartment);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if Self::matches(&self.panicking, path, compartment) {
            panic!("fake panic listing {path}");
        }
        if Self::matches(&self.failing, path, compartment) {
            return Err(ApiError::new(StatusCode::FORBIDDEN, Some("NotAuthorized")).into());
        }

        let scoped = compartment.and_then(|c| self.lists.get(&format!("{path}@{c}")));
        Ok(scoped
            .or_else(|| self.lists.get(path))
            .cloned()
            .unwrap_or_default())
    }
}

/// Every required service backed by the same fake
pub fn required_clients(api: &Arc<FakeApi>) -> ServiceClients {
    Service::REQUIRED
        .into_iter()
        .fold(ServiceClients::default(), |clients, service| {
            clients.with(service, api.clone())
        })
}

/// Every service, optional ones included, backed by the same fake
pub fn all_clients(api: &Arc<FakeApi>) -> ServiceClients {
    Service::OPTIONAL
        .into_iter()
        .fold(required_clients(api), |clients, service| {
            clients.with(service, api.clone())
        })
}

/// `n` items with distinct ids
pub fn items(prefix: &str, n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            serde_json::json!({
                "id": format!("{prefix}-{i}"),
                "displayName": format!("{prefix} {i}"),
                "lifecycleState": "AVAILABLE",
                "timeCreated": "2024-03-01T10:00:00.000Z"
            })
        })
        .collect()
}
