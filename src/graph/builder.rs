//! Graph builder for discovering object relationships
//!
//! Fetches the requested object, then walks the relation table depth first:
//! for every related kind the current object's kind has, all objects of that
//! kind in the namespace are listed and the ones passing the relation filter
//! become children, expanded in turn.
//!
//! The relation table is cyclic (pod -> service -> ingress -> service -> pod).
//! The walk stays finite because a kind already expanded on the path from the
//! root is never expanded again on that path. The visited set is a `Copy`
//! value handed down by value, so sibling branches never see each other's
//! visits and the same kind can still show up on another branch.

use futures::future::{BoxFuture, FutureExt};

use super::GraphResult;
use super::filter::related;
use super::kind::Kind;
use super::models::{GraphNode, Hierarchy};
use super::object::ObjectRecord;
use super::store::ResourceStore;

/// Builds the relationship tree of one object
pub struct GraphBuilder<'a> {
    store: &'a dyn ResourceStore,
    namespace: String,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(store: &'a dyn ResourceStore, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// Build the tree rooted at the object `name` of kind `kind`
    ///
    /// `kind` may be a canonical kind or one of its aliases. Any fetch or
    /// filter error aborts the build; no partial tree is returned.
    pub async fn build(&self, kind: &str, name: &str) -> GraphResult<GraphNode> {
        let kind: Kind = kind.parse()?;
        let resource = kind.resource_ref()?;

        tracing::info!(
            "Building graph for {} '{}' in namespace '{}'",
            kind,
            name,
            self.namespace
        );

        let object = self.store.get(&resource, &self.namespace, name).await?;
        let children = self
            .expand(kind, &object, VisitedKinds::default())
            .await?;

        let root = GraphNode {
            object,
            hierarchy: Hierarchy::Root,
            children,
        };

        tracing::info!(
            "Graph for {} '{}' has {} related objects",
            kind,
            name,
            root.node_count() - 1
        );
        if tracing::enabled!(tracing::Level::TRACE) {
            match serde_json::to_string(&root) {
                Ok(json) => tracing::trace!("Graph JSON {}", json),
                Err(e) => tracing::trace!("Graph can not be converted to JSON: {}", e),
            }
        }

        Ok(root)
    }

    /// Discover the related objects of `object`, upper kinds first
    fn expand<'b>(
        &'b self,
        kind: Kind,
        object: &'b ObjectRecord,
        visited: VisitedKinds,
    ) -> BoxFuture<'b, GraphResult<Vec<GraphNode>>> {
        async move {
            let visited = visited.with(kind);
            let related_kinds = kind.related_kinds();
            let mut children = Vec::new();

            for (hierarchy, candidates) in [
                (Hierarchy::Upper, related_kinds.upper),
                (Hierarchy::Lower, related_kinds.lower),
            ] {
                for &candidate in candidates {
                    if visited.contains(candidate) {
                        tracing::debug!(
                            "Skipping {} of {} '{}': already expanded on this path",
                            candidate,
                            kind,
                            object.name()
                        );
                        continue;
                    }

                    let resource = candidate.resource_ref()?;
                    tracing::debug!(
                        "Listing {} related to {} '{}' ({:?})",
                        resource,
                        kind,
                        object.name(),
                        hierarchy
                    );
                    let listed = self.store.list(&resource, &self.namespace).await?;

                    for item in listed {
                        if !related(object, &item)? {
                            tracing::trace!("Not related: {} '{}'", item.kind(), item.name());
                            continue;
                        }
                        tracing::trace!("Related: {} '{}'", item.kind(), item.name());

                        let grandchildren = self.expand(candidate, &item, visited).await?;
                        children.push(GraphNode {
                            object: item,
                            hierarchy,
                            children: grandchildren,
                        });
                    }
                }
            }

            Ok(children)
        }
        .boxed()
    }
}

/// Kinds already expanded on the current root-to-node path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct VisitedKinds(u8);

impl VisitedKinds {
    fn with(self, kind: Kind) -> Self {
        Self(self.0 | Self::bit(kind))
    }

    fn contains(self, kind: Kind) -> bool {
        self.0 & Self::bit(kind) != 0
    }

    fn bit(kind: Kind) -> u8 {
        1 << kind as u8
    }
}
