//! Shared test fixtures
//!
//! An in-memory resource store and builders for the object documents the
//! graph tests use.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use kubegraph::graph::{GraphError, GraphResult, ObjectRecord, ResourceRef, ResourceStore};
use serde_json::{Value, json};

pub const NAMESPACE: &str = "default";

/// Resource store backed by a map of plural resource name to objects
#[derive(Default)]
pub struct InMemoryStore {
    objects: BTreeMap<&'static str, Vec<Value>>,
    calls: Mutex<Vec<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object, keyed by the plural of its `kind`
    pub fn with(mut self, object: Value) -> Self {
        let kind = object["kind"].as_str().unwrap_or_default().to_lowercase();
        let resource = match kind.as_str() {
            "pod" => "pods",
            "service" => "services",
            "ingress" => "ingresses",
            "replicaset" => "replicasets",
            "deployment" => "deployments",
            "daemonset" => "daemonsets",
            "statefulset" => "statefulsets",
            other => panic!("unsupported fixture kind {}", other),
        };
        self.objects.entry(resource).or_default().push(object);
        self
    }

    /// Requests served so far, as `get <resource>/<name>` or `list <resource>`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn in_namespace(&self, resource: &ResourceRef, namespace: &str) -> Vec<&Value> {
        self.objects
            .get(resource.resource)
            .map(|objects| {
                objects
                    .iter()
                    .filter(|o| o["metadata"]["namespace"].as_str().unwrap_or(NAMESPACE) == namespace)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl ResourceStore for InMemoryStore {
    async fn get(
        &self,
        resource: &ResourceRef,
        namespace: &str,
        name: &str,
    ) -> GraphResult<ObjectRecord> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("get {}/{}", resource.resource, name));

        let object = self
            .in_namespace(resource, namespace)
            .into_iter()
            .find(|o| o["metadata"]["name"] == name)
            .ok_or_else(|| GraphError::NotFound {
                kind: resource.kind.to_string(),
                name: name.to_string(),
                namespace: namespace.to_string(),
            })?;
        ObjectRecord::from_value(object.clone())
    }

    async fn list(&self, resource: &ResourceRef, namespace: &str) -> GraphResult<Vec<ObjectRecord>> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("list {}", resource.resource));

        self.in_namespace(resource, namespace)
            .into_iter()
            .map(|o| ObjectRecord::from_value(o.clone()))
            .collect()
    }
}

/// Owner references to the named objects, by the uid fixtures give them
fn owner_refs(owners: &[&str]) -> Value {
    owners
        .iter()
        .map(|owner| json!({"name": owner, "uid": uid(owner)}))
        .collect::<Vec<_>>()
        .into()
}

fn labels(pairs: &[(&str, &str)]) -> Value {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::from(*v)))
        .collect::<serde_json::Map<_, _>>()
        .into()
}

pub fn pod(name: &str, pod_labels: &[(&str, &str)], owners: &[&str]) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {
            "name": name,
            "namespace": NAMESPACE,
            "uid": uid(name),
            "labels": labels(pod_labels),
            "ownerReferences": owner_refs(owners)
        }
    })
}

pub fn service(name: &str, selector: &[(&str, &str)]) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": {"name": name, "namespace": NAMESPACE, "uid": uid(name)},
        "spec": {"selector": labels(selector)}
    })
}

/// Ingress in the `networking.k8s.io/v1` shape
pub fn ingress(name: &str, backends: &[&str]) -> Value {
    let paths: Vec<Value> = backends
        .iter()
        .map(|backend| {
            json!({
                "path": "/",
                "pathType": "Prefix",
                "backend": {"service": {"name": backend, "port": {"number": 80}}}
            })
        })
        .collect();
    json!({
        "apiVersion": "networking.k8s.io/v1",
        "kind": "Ingress",
        "metadata": {"name": name, "namespace": NAMESPACE, "uid": uid(name)},
        "spec": {"rules": [{"host": "example.com", "http": {"paths": paths}}]}
    })
}

/// Any workload kind: ReplicaSet, Deployment, StatefulSet or DaemonSet
pub fn workload(kind: &str, name: &str, owners: &[&str]) -> Value {
    json!({
        "apiVersion": "apps/v1",
        "kind": kind,
        "metadata": {
            "name": name,
            "namespace": NAMESPACE,
            "uid": uid(name),
            "ownerReferences": owner_refs(owners)
        }
    })
}

/// Uid of the fixture object called `name`
pub fn uid(name: &str) -> String {
    format!("{}-uid", name)
}
