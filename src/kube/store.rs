//! Cluster-backed resource store
//!
//! Objects are fetched as `DynamicObject`s and converted to JSON, so one code
//! path serves every kind of the registry.

use async_trait::async_trait;
use kube::api::{ApiResource, ListParams};
use kube::core::{DynamicObject, TypeMeta};
use kube::{Api, Client};

use crate::graph::{GraphError, GraphResult, ObjectRecord, ResourceRef, ResourceStore};

/// [`ResourceStore`] talking to the Kubernetes API server
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, resource: &ResourceRef, namespace: &str) -> Api<DynamicObject> {
        Api::namespaced_with(self.client.clone(), namespace, &api_resource(resource))
    }
}

#[async_trait]
impl ResourceStore for KubeStore {
    async fn get(
        &self,
        resource: &ResourceRef,
        namespace: &str,
        name: &str,
    ) -> GraphResult<ObjectRecord> {
        tracing::debug!("GET {} {}/{}", resource, namespace, name);

        let obj = self
            .api(resource, namespace)
            .get(name)
            .await
            .map_err(|e| get_error(resource, namespace, name, e))?;

        to_record(resource, obj)
    }

    async fn list(&self, resource: &ResourceRef, namespace: &str) -> GraphResult<Vec<ObjectRecord>> {
        tracing::debug!("LIST {} {}", resource, namespace);

        let list = self
            .api(resource, namespace)
            .list(&ListParams::default())
            .await
            .map_err(|e| {
                GraphError::Transport(format!("failed to list {}: {}", resource.resource, e))
            })?;

        tracing::debug!("Listed {} {}", list.items.len(), resource.resource);

        list.items
            .into_iter()
            .map(|obj| to_record(resource, obj))
            .collect()
    }
}

fn api_resource(resource: &ResourceRef) -> ApiResource {
    ApiResource {
        group: resource.group.to_string(),
        version: resource.version.to_string(),
        api_version: resource.api_version(),
        kind: resource.kind.to_string(),
        plural: resource.resource.to_string(),
    }
}

/// A 404 means the object does not exist; anything else is a transport failure
fn get_error(resource: &ResourceRef, namespace: &str, name: &str, err: kube::Error) -> GraphError {
    match err {
        kube::Error::Api(e) if e.code == 404 => GraphError::NotFound {
            kind: resource.kind.to_string(),
            name: name.to_string(),
            namespace: namespace.to_string(),
        },
        e => GraphError::Transport(format!(
            "failed to get {} '{}': {}",
            resource.kind, name, e
        )),
    }
}

/// Convert a fetched object, filling in the type metadata list items lack
fn to_record(resource: &ResourceRef, mut obj: DynamicObject) -> GraphResult<ObjectRecord> {
    if obj.types.is_none() {
        obj.types = Some(TypeMeta {
            api_version: resource.api_version(),
            kind: resource.kind.to_string(),
        });
    }

    let value = serde_json::to_value(&obj)
        .map_err(|e| GraphError::MalformedObject(format!("{}: {}", resource.kind, e)))?;
    ObjectRecord::from_value(value)
}
