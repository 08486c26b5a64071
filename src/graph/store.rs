//! Resource store abstraction
//!
//! The builder never talks to the API server directly; it fetches objects
//! through this trait. [`crate::kube::KubeStore`] is the cluster-backed
//! implementation.

use async_trait::async_trait;

use super::GraphResult;
use super::kind::ResourceRef;
use super::object::ObjectRecord;

/// Fetches objects of a given resource type from one namespace
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Fetch a single object
    ///
    /// Fails with `NotFound` when the object does not exist and `Transport`
    /// for any other failure.
    async fn get(
        &self,
        resource: &ResourceRef,
        namespace: &str,
        name: &str,
    ) -> GraphResult<ObjectRecord>;

    /// List every object of a resource type, in the order the store returns them
    async fn list(&self, resource: &ResourceRef, namespace: &str) -> GraphResult<Vec<ObjectRecord>>;
}
