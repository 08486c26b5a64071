//! Relation filter
//!
//! Decides whether two fetched objects are really related. Listing every
//! object of a related kind returns candidates; only the ones passing these
//! rules become part of the graph.
//!
//! Rules are symmetric, the same rule applies whichever side the traversal
//! started from:
//! - pod / service: the service selector matches the pod labels
//! - pod / replicaset, statefulset, daemonset: the pod is owned by the other
//! - service / ingress: the ingress routes to the service
//! - replicaset / deployment: the replicaset is owned by the deployment

use std::collections::BTreeMap;

use super::GraphResult;
use super::kind::Kind;
use super::object::{ObjectRecord, OwnerRef};

/// Returns true if `a` and `b` are related
///
/// Pairs of kinds without a rule are never related. Fails with
/// `MalformedObject` when a field needed by the matching rule has an
/// unexpected shape.
pub fn related(a: &ObjectRecord, b: &ObjectRecord) -> GraphResult<bool> {
    let (Some(kind_a), Some(kind_b)) = (a.kind_tag(), b.kind_tag()) else {
        return Ok(false);
    };

    match (kind_a, kind_b) {
        (Kind::Pod, Kind::Service) => selects(b, a),
        (Kind::Service, Kind::Pod) => selects(a, b),

        (Kind::Pod, Kind::ReplicaSet | Kind::StatefulSet | Kind::DaemonSet) => owned_by(a, b),
        (Kind::ReplicaSet | Kind::StatefulSet | Kind::DaemonSet, Kind::Pod) => owned_by(b, a),

        (Kind::Service, Kind::Ingress) => routes_to(b, a),
        (Kind::Ingress, Kind::Service) => routes_to(a, b),

        (Kind::ReplicaSet, Kind::Deployment) => owned_by(a, b),
        (Kind::Deployment, Kind::ReplicaSet) => owned_by(b, a),

        _ => Ok(false),
    }
}

/// The service selector is set and every pair of it is among the pod labels
fn selects(service: &ObjectRecord, pod: &ObjectRecord) -> GraphResult<bool> {
    match service.service_selector()? {
        Some(selector) => Ok(matches_labels(&selector, &pod.labels()?)),
        None => Ok(false),
    }
}

/// The dependent lists the owner's uid among its owner references
fn owned_by(dependent: &ObjectRecord, owner: &ObjectRecord) -> GraphResult<bool> {
    match owner.uid()? {
        Some(uid) => Ok(has_owner_uid(&dependent.owner_references()?, uid)),
        None => Ok(false),
    }
}

/// The ingress has a backend pointing at the service
fn routes_to(ingress: &ObjectRecord, service: &ObjectRecord) -> GraphResult<bool> {
    let backends = ingress.ingress_backend_names()?;
    Ok(backends.iter().any(|name| name == service.name()))
}

/// Empty selectors select nothing
pub fn matches_labels(selector: &BTreeMap<String, String>, labels: &BTreeMap<String, String>) -> bool {
    !selector.is_empty()
        && selector
            .iter()
            .all(|(key, value)| labels.get(key) == Some(value))
}

pub fn has_owner_uid(owners: &[OwnerRef], uid: &str) -> bool {
    !uid.is_empty() && owners.iter().any(|owner| owner.uid == uid)
}
