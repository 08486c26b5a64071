//! Typed facade over fetched objects
//!
//! Objects come back from the API server as loosely-typed JSON documents.
//! [`ObjectRecord`] keeps the document and exposes validated getters for the
//! handful of fields the graph needs. A field of the wrong shape is reported
//! as [`GraphError::MalformedObject`] rather than silently ignored.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::kind::Kind;
use super::{GraphError, GraphResult};

/// Owner reference entry from `metadata.ownerReferences`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OwnerRef {
    pub kind: String,
    pub name: String,
    pub uid: String,
}

/// A fetched Kubernetes object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRecord {
    kind: String,
    name: String,
    raw: Value,
}

impl ObjectRecord {
    /// Wrap a JSON document, requiring `kind` and `metadata.name`
    pub fn from_value(raw: Value) -> GraphResult<Self> {
        let root = raw
            .as_object()
            .ok_or_else(|| malformed("object", "expected a JSON object"))?;

        let kind = root
            .get("kind")
            .and_then(Value::as_str)
            .filter(|kind| !kind.is_empty())
            .ok_or_else(|| malformed("kind", "missing or not a string"))?
            .to_string();

        let name = root
            .get("metadata")
            .and_then(Value::as_object)
            .and_then(|metadata| metadata.get("name"))
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("metadata.name", "missing or not a string"))?
            .to_string();

        Ok(Self { kind, name, raw })
    }

    /// Build a record from any serializable resource, e.g. a `k8s_openapi` type
    pub fn from_typed<K: Serialize>(obj: &K) -> GraphResult<Self> {
        let raw = serde_json::to_value(obj)
            .map_err(|e| GraphError::MalformedObject(format!("failed to serialize object: {}", e)))?;
        Self::from_value(raw)
    }

    /// Kind exactly as reported by the object (e.g. `StatefulSet`)
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Supported kind of this object, if any
    pub fn kind_tag(&self) -> Option<Kind> {
        Kind::from_str_case_insensitive(&self.kind)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying JSON document
    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    pub fn namespace(&self) -> GraphResult<Option<&str>> {
        self.metadata_str("namespace")
    }

    pub fn uid(&self) -> GraphResult<Option<&str>> {
        self.metadata_str("uid")
    }

    /// `metadata.labels`; absent labels are an empty map
    pub fn labels(&self) -> GraphResult<BTreeMap<String, String>> {
        match self.metadata()?.and_then(|m| present(m.get("labels"))) {
            Some(labels) => string_map(labels, "metadata.labels"),
            None => Ok(BTreeMap::new()),
        }
    }

    /// `metadata.ownerReferences`, in declaration order
    pub fn owner_references(&self) -> GraphResult<Vec<OwnerRef>> {
        let Some(refs) = self
            .metadata()?
            .and_then(|m| present(m.get("ownerReferences")))
        else {
            return Ok(Vec::new());
        };

        let refs = refs
            .as_array()
            .ok_or_else(|| malformed("metadata.ownerReferences", "expected a list"))?;

        refs.iter()
            .enumerate()
            .map(|(i, owner)| {
                let path = format!("metadata.ownerReferences[{}]", i);
                let owner = owner
                    .as_object()
                    .ok_or_else(|| malformed(&path, "expected an object"))?;
                Ok(OwnerRef {
                    kind: optional_string(owner, "kind", &path)?,
                    name: optional_string(owner, "name", &path)?,
                    uid: optional_string(owner, "uid", &path)?,
                })
            })
            .collect()
    }

    /// `spec.selector` of a Service; `None` when the service has no selector
    pub fn service_selector(&self) -> GraphResult<Option<BTreeMap<String, String>>> {
        match self.spec()?.and_then(|spec| present(spec.get("selector"))) {
            Some(selector) => string_map(selector, "spec.selector").map(Some),
            None => Ok(None),
        }
    }

    /// Names of the services an Ingress routes to
    ///
    /// Walks `spec.rules[].http.paths[].backend`, reading either the
    /// `serviceName` field or the `service.name` field. Backends pointing at
    /// a resource instead of a service contribute nothing.
    pub fn ingress_backend_names(&self) -> GraphResult<Vec<String>> {
        let mut names = Vec::new();

        let Some(rules) = self.spec()?.and_then(|spec| present(spec.get("rules"))) else {
            return Ok(names);
        };
        let rules = rules
            .as_array()
            .ok_or_else(|| malformed("spec.rules", "expected a list"))?;

        for (i, rule) in rules.iter().enumerate() {
            let rule = rule
                .as_object()
                .ok_or_else(|| malformed(&format!("spec.rules[{}]", i), "expected an object"))?;

            let Some(http) = present(rule.get("http")) else {
                continue;
            };
            let http = http.as_object().ok_or_else(|| {
                malformed(&format!("spec.rules[{}].http", i), "expected an object")
            })?;

            let Some(paths) = present(http.get("paths")) else {
                continue;
            };
            let paths = paths.as_array().ok_or_else(|| {
                malformed(&format!("spec.rules[{}].http.paths", i), "expected a list")
            })?;

            for (j, path) in paths.iter().enumerate() {
                let field = format!("spec.rules[{}].http.paths[{}].backend", i, j);
                let backend = path
                    .as_object()
                    .and_then(|p| present(p.get("backend")))
                    .and_then(Value::as_object)
                    .ok_or_else(|| malformed(&field, "missing or not an object"))?;

                if let Some(name) = backend_service_name(backend, &field)? {
                    names.push(name);
                }
            }
        }

        Ok(names)
    }

    fn metadata(&self) -> GraphResult<Option<&Map<String, Value>>> {
        self.section("metadata")
    }

    fn spec(&self) -> GraphResult<Option<&Map<String, Value>>> {
        self.section("spec")
    }

    fn section(&self, field: &str) -> GraphResult<Option<&Map<String, Value>>> {
        match present(self.raw.get(field)) {
            Some(section) => section
                .as_object()
                .map(Some)
                .ok_or_else(|| malformed(field, "expected an object")),
            None => Ok(None),
        }
    }

    fn metadata_str(&self, field: &str) -> GraphResult<Option<&str>> {
        let Some(value) = self.metadata()?.and_then(|m| present(m.get(field))) else {
            return Ok(None);
        };
        value
            .as_str()
            .map(Some)
            .ok_or_else(|| malformed(&format!("metadata.{}", field), "expected a string"))
    }
}

impl Serialize for ObjectRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// Treat JSON `null` like a missing field
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn malformed(field: &str, reason: &str) -> GraphError {
    GraphError::MalformedObject(format!("{}: {}", field, reason))
}

fn string_map(value: &Value, field: &str) -> GraphResult<BTreeMap<String, String>> {
    let map = value
        .as_object()
        .ok_or_else(|| malformed(field, "expected a map of strings"))?;

    map.iter()
        .map(|(key, value)| {
            value
                .as_str()
                .map(|v| (key.clone(), v.to_string()))
                .ok_or_else(|| malformed(&format!("{}.{}", field, key), "expected a string"))
        })
        .collect()
}

fn optional_string(map: &Map<String, Value>, key: &str, path: &str) -> GraphResult<String> {
    match present(map.get(key)) {
        Some(value) => value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| malformed(&format!("{}.{}", path, key), "expected a string")),
        None => Ok(String::new()),
    }
}

fn backend_service_name(backend: &Map<String, Value>, field: &str) -> GraphResult<Option<String>> {
    if let Some(name) = present(backend.get("serviceName")) {
        return name
            .as_str()
            .map(|n| Some(n.to_string()))
            .ok_or_else(|| malformed(&format!("{}.serviceName", field), "expected a string"));
    }

    if let Some(service) = present(backend.get("service")) {
        let service = service
            .as_object()
            .ok_or_else(|| malformed(&format!("{}.service", field), "expected an object"))?;
        return present(service.get("name"))
            .and_then(Value::as_str)
            .map(|n| Some(n.to_string()))
            .ok_or_else(|| malformed(&format!("{}.service.name", field), "missing or not a string"));
    }

    Ok(None)
}
