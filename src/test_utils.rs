// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses and collaborators.

use crate::error::OutfitterError;
use crate::kubernetes::ClusterClient;
use crate::render::ChartRenderer;
use async_trait::async_trait;
use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

type Responses = HashMap<(String, String), (u16, String)>;

/// A mock HTTP service that returns predefined responses based on request
/// method and path, and records every request it receives.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<Responses>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
        self
    }

    /// (method, path) of every request seen so far, in arrival order
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a kube Client from this mock service, defaulting to the
    /// `default` namespace
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();

        // Try exact match first
        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        // Longest registered prefix wins for nested paths
        responses
            .iter()
            .filter(|((m, p), _)| m == method && path.starts_with(p.as_str()))
            .max_by_key(|((_, p), _)| p.len())
            .map(|(_, resp)| resp.clone())
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let response = self.find_response(&method, &path);
        self.requests.lock().unwrap().push((method, path));

        Box::pin(async move {
            let (status, body) = response.unwrap_or_else(|| {
                // Default 404 for unmatched requests
                (404, not_found_json("resource", "unknown"))
            });
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock namespace JSON response
pub fn namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        }
    })
    .to_string()
}

/// Create a mock secret JSON response
pub fn secret_json(name: &str, namespace: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Secret",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "uid": "test-uid"
        },
        "type": "Opaque"
    })
    .to_string()
}

/// Create a successful Status response, as returned by deletes
pub fn status_success_json() -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Success",
        "code": 200
    })
    .to_string()
}

/// Discovery document for the core v1 group with the kinds tests apply
pub fn core_v1_resources_json() -> String {
    let verbs = ["create", "delete", "get", "list", "patch", "update", "watch"];
    serde_json::json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": "v1",
        "resources": [
            {"name": "configmaps", "singularName": "configmap", "namespaced": true, "kind": "ConfigMap", "verbs": verbs},
            {"name": "namespaces", "singularName": "namespace", "namespaced": false, "kind": "Namespace", "verbs": verbs},
            {"name": "secrets", "singularName": "secret", "namespaced": true, "kind": "Secret", "verbs": verbs}
        ]
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// In-memory [`ClusterClient`] that records every call.
#[derive(Default)]
pub struct RecordingClient {
    events: Mutex<Vec<String>>,
    applied: Mutex<Vec<String>>,
    apply_namespaces: Mutex<Vec<Option<String>>>,
    fail_apply_on: Option<String>,
    never_ready: bool,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any apply whose manifest contains `needle`
    pub fn failing_apply_on(mut self, needle: &str) -> Self {
        self.fail_apply_on = Some(needle.to_string());
        self
    }

    /// Report every workload and CRD as not ready
    pub fn never_ready(mut self) -> Self {
        self.never_ready = true;
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn applied(&self) -> Vec<String> {
        self.applied.lock().unwrap().clone()
    }

    /// Fallback namespace passed with every apply call
    pub fn apply_namespaces(&self) -> Vec<Option<String>> {
        self.apply_namespaces.lock().unwrap().clone()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl ClusterClient for RecordingClient {
    async fn apply(
        &self,
        manifest: &str,
        default_namespace: Option<&str>,
    ) -> crate::error::Result<()> {
        self.record(format!("apply:{}", manifest.trim()));
        self.apply_namespaces
            .lock()
            .unwrap()
            .push(default_namespace.map(str::to_string));
        if let Some(needle) = &self.fail_apply_on {
            if manifest.contains(needle.as_str()) {
                return Err(OutfitterError::Apply {
                    resource: needle.clone(),
                    message: "rejected".to_string(),
                });
            }
        }
        self.applied.lock().unwrap().push(manifest.to_string());
        Ok(())
    }

    async fn create_secret(
        &self,
        namespace: &str,
        name: &str,
        _data: BTreeMap<String, String>,
    ) -> crate::error::Result<()> {
        self.record(format!("create_secret:{}/{}", namespace, name));
        Ok(())
    }

    async fn delete_secret(&self, namespace: &str, name: &str) -> crate::error::Result<()> {
        self.record(format!("delete_secret:{}/{}", namespace, name));
        Ok(())
    }

    async fn workload_ready(
        &self,
        kind: &str,
        namespace: &str,
        name: &str,
    ) -> crate::error::Result<bool> {
        self.record(format!("workload_ready:{}/{}/{}", kind, namespace, name));
        Ok(!self.never_ready)
    }

    async fn crd_available(&self, group: &str, kind: &str) -> crate::error::Result<bool> {
        self.record(format!("crd_available:{}/{}", group, kind));
        Ok(!self.never_ready)
    }
}

/// [`ChartRenderer`] returning canned output per chart
#[derive(Default)]
pub struct StaticRenderer {
    charts: HashMap<String, String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl StaticRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chart(mut self, chart: &str, output: &str) -> Self {
        self.charts.insert(chart.to_string(), output.to_string());
        self
    }

    /// (chart, namespace) of every render call
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChartRenderer for StaticRenderer {
    async fn render(
        &self,
        chart: &str,
        namespace: &str,
        _values: &serde_json::Value,
    ) -> crate::error::Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((chart.to_string(), namespace.to_string()));
        self.charts
            .get(chart)
            .cloned()
            .ok_or_else(|| OutfitterError::Render {
                chart: chart.to_string(),
                message: "chart not found".to_string(),
            })
    }
}
