//! kubegraph library
//!
//! Builds the graph of Kubernetes objects related to one object and renders
//! it as a tree or a DOT digraph. The `kubectl-graph` binary is a thin CLI on
//! top of this library.

pub mod config;
pub mod graph;
pub mod kube;

pub use graph::{
    GraphBuilder, GraphError, GraphNode, GraphResult, Hierarchy, Kind, ObjectRecord,
    OutputFormat, Printer, ResourceStore, related, related_kinds, resolve_resource,
};
