//! Kind registry
//!
//! Centralizes the seven resource kinds the graph understands: their aliases,
//! the API resource each one maps to, and the kinds considered "upper"
//! (owners, selectors, routers) and "lower" (dependents) of each one.
//!
//! The registry is a `const` table. To teach the graph a new relationship,
//! add it to [`KIND_REGISTRY`] and give the filter a rule for the pair.

use std::fmt;
use std::str::FromStr;

use super::GraphError;

/// Enumeration of the supported resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Pod,
    Service,
    Ingress,
    ReplicaSet,
    Deployment,
    DaemonSet,
    StatefulSet,
}

impl Kind {
    /// Canonical lower-case name, as used by the relation table
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Pod => "pod",
            Kind::Service => "service",
            Kind::Ingress => "ingress",
            Kind::ReplicaSet => "replicaset",
            Kind::Deployment => "deployment",
            Kind::DaemonSet => "daemonset",
            Kind::StatefulSet => "statefulset",
        }
    }

    /// All supported kinds, in registry order
    pub fn all() -> &'static [Self] {
        &[
            Kind::Pod,
            Kind::Service,
            Kind::Ingress,
            Kind::ReplicaSet,
            Kind::Deployment,
            Kind::DaemonSet,
            Kind::StatefulSet,
        ]
    }

    /// Parse a kind name or alias, ignoring case
    ///
    /// Accepts the canonical names (`pod`, `service`, ...), the API kinds
    /// (`Pod`, `StatefulSet`, ...) and the kubectl short names (`po`, `svc`,
    /// `ing`, `rs`, `deploy`, `ds`, `sts`).
    pub fn from_str_case_insensitive(s: &str) -> Option<Self> {
        let lowered = s.to_lowercase();
        KIND_REGISTRY
            .iter()
            .find(|entry| {
                entry.kind.as_str() == lowered || entry.aliases.iter().any(|alias| *alias == lowered)
            })
            .map(|entry| entry.kind)
    }

    /// Try to parse a string into a Kind, returning None if invalid
    pub fn parse_optional(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// Registry entry for this kind, if one is registered
    pub fn entry(&self) -> Option<&'static KindEntry> {
        KIND_REGISTRY.iter().find(|entry| entry.kind == *self)
    }

    /// API resource this kind is served from
    ///
    /// Fails closed with [`GraphError::UnsupportedKind`] when the kind has no
    /// registry entry.
    pub fn resource_ref(&self) -> Result<ResourceRef, GraphError> {
        self.entry()
            .map(|entry| entry.resource)
            .ok_or_else(|| GraphError::UnsupportedKind(self.as_str().to_string()))
    }

    /// Upper and lower related kinds of this kind
    pub fn related_kinds(&self) -> RelatedKinds {
        self.entry()
            .map(|entry| RelatedKinds {
                upper: entry.upper,
                lower: entry.lower,
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Kind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::from_str_case_insensitive(s).ok_or_else(|| GraphError::UnsupportedKind(s.to_string()))
    }
}

/// Group/version/resource triple identifying an API resource type
///
/// `kind` is the API kind served by the resource. List responses omit it on
/// their items, so stores use it to type what they return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    pub group: &'static str,
    pub version: &'static str,
    pub resource: &'static str,
    pub kind: &'static str,
}

impl ResourceRef {
    /// `apiVersion` string, e.g. `v1` or `apps/v1`
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.to_string()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "core/{}/{}", self.version, self.resource)
        } else {
            write!(f, "{}/{}/{}", self.group, self.version, self.resource)
        }
    }
}

/// Related kinds of one kind, split by hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelatedKinds {
    pub upper: &'static [Kind],
    pub lower: &'static [Kind],
}

/// Registry entry for a supported kind
pub struct KindEntry {
    pub kind: Kind,
    pub aliases: &'static [&'static str],
    pub resource: ResourceRef,
    pub upper: &'static [Kind],
    pub lower: &'static [Kind],
}

/// Registry of all supported kinds
pub const KIND_REGISTRY: &[KindEntry] = &[
    KindEntry {
        kind: Kind::Pod,
        aliases: &["po"],
        resource: ResourceRef {
            group: "",
            version: "v1",
            resource: "pods",
            kind: "Pod",
        },
        upper: &[
            Kind::Service,
            Kind::ReplicaSet,
            Kind::StatefulSet,
            Kind::DaemonSet,
        ],
        lower: &[],
    },
    KindEntry {
        kind: Kind::Service,
        aliases: &["svc"],
        resource: ResourceRef {
            group: "",
            version: "v1",
            resource: "services",
            kind: "Service",
        },
        upper: &[Kind::Ingress],
        lower: &[Kind::Pod],
    },
    KindEntry {
        kind: Kind::Ingress,
        aliases: &["ing"],
        resource: ResourceRef {
            group: "networking.k8s.io",
            version: "v1",
            resource: "ingresses",
            kind: "Ingress",
        },
        upper: &[],
        lower: &[Kind::Service],
    },
    KindEntry {
        kind: Kind::ReplicaSet,
        aliases: &["rs"],
        resource: ResourceRef {
            group: "apps",
            version: "v1",
            resource: "replicasets",
            kind: "ReplicaSet",
        },
        upper: &[Kind::Deployment],
        lower: &[Kind::Pod],
    },
    KindEntry {
        kind: Kind::Deployment,
        aliases: &["deploy"],
        resource: ResourceRef {
            group: "apps",
            version: "v1",
            resource: "deployments",
            kind: "Deployment",
        },
        upper: &[],
        lower: &[Kind::ReplicaSet],
    },
    // No filter rule pairs daemonsets with replicasets, so a daemonset root
    // ends up without children.
    KindEntry {
        kind: Kind::DaemonSet,
        aliases: &["ds"],
        resource: ResourceRef {
            group: "apps",
            version: "v1",
            resource: "daemonsets",
            kind: "DaemonSet",
        },
        upper: &[],
        lower: &[Kind::ReplicaSet],
    },
    KindEntry {
        kind: Kind::StatefulSet,
        aliases: &["sts"],
        resource: ResourceRef {
            group: "apps",
            version: "v1",
            resource: "statefulsets",
            kind: "StatefulSet",
        },
        upper: &[],
        lower: &[Kind::Pod],
    },
];

/// Resolve a kind name or alias to the API resource serving it
pub fn resolve_resource(kind_or_alias: &str) -> Result<ResourceRef, GraphError> {
    kind_or_alias.parse::<Kind>()?.resource_ref()
}

/// Related kinds of a kind name
///
/// Unlike [`resolve_resource`] this never fails: unknown names have no
/// related kinds.
pub fn related_kinds(kind: &str) -> RelatedKinds {
    Kind::parse_optional(kind)
        .map(|kind| kind.related_kinds())
        .unwrap_or_default()
}
