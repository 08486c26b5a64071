//! Relationship graph of Kubernetes objects
//!
//! Starting from one named object, discovers the objects related to it
//! (owners, owned dependents, selector matches, ingress backends) and renders
//! the result as an indented tree or a DOT graph.
//!
//! Data flows one way: the [`kind`] registry says which kinds to look at, the
//! [`filter`] decides which fetched objects are actually related, the
//! [`builder`] walks the cluster through a [`ResourceStore`], and the
//! [`printer`] renders the finished tree.

pub mod builder;
pub mod filter;
pub mod kind;
pub mod models;
pub mod object;
pub mod printer;
pub mod store;

pub use builder::GraphBuilder;
pub use filter::related;
pub use kind::{Kind, RelatedKinds, ResourceRef, related_kinds, resolve_resource};
pub use models::{GraphNode, Hierarchy};
pub use object::{ObjectRecord, OwnerRef};
pub use printer::{OutputFormat, Printer};
pub use store::ResourceStore;

/// Graph errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("kind '{0}' not supported")]
    UnsupportedKind(String),

    #[error("{kind} '{name}' not found in namespace '{namespace}'")]
    NotFound {
        kind: String,
        name: String,
        namespace: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed object: {0}")]
    MalformedObject(String),
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;
