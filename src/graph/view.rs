//! Read-only snapshot view for rank computation
//!
//! `GraphView` borrows the store immutably for the lifetime of one
//! computation: the borrow is the consistent snapshot, acquired when the
//! view is created and released on every exit path when it is dropped.
//! Every query below is answered against that single snapshot.

use super::store::{Edge, GraphError, GraphResult, GraphStore};
use super::types::{EdgeId, EdgeType, Label, NodeId};
use rustc_hash::FxHashSet;

/// Immutable view over a [`GraphStore`] snapshot
pub struct GraphView<'a> {
    store: &'a GraphStore,
}

impl<'a> GraphView<'a> {
    /// Acquire a snapshot view of the store
    pub fn new(store: &'a GraphStore) -> Self {
        GraphView { store }
    }

    /// Nodes carrying at least one of the given labels.
    ///
    /// Set semantics: a node matching several labels appears once. Sorted
    /// by id so downstream iteration order is deterministic.
    pub fn nodes_with_labels(&self, labels: &[Label]) -> Vec<NodeId> {
        let mut seen = FxHashSet::default();
        for label in labels {
            seen.extend(self.store.nodes_with_label(label));
        }
        let mut nodes: Vec<NodeId> = seen.into_iter().collect();
        nodes.sort_unstable();
        nodes
    }

    /// Check that a node still resolves in the snapshot
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.store.has_node(node)
    }

    /// Number of outgoing edges of `node` with the given type
    pub fn out_degree(&self, node: NodeId, edge_type: &EdgeType) -> GraphResult<usize> {
        self.degree(self.store.outgoing_edges(node), edge_type)
    }

    /// Number of incoming edges of `node` with the given type
    pub fn in_degree(&self, node: NodeId, edge_type: &EdgeType) -> GraphResult<usize> {
        self.degree(self.store.incoming_edges(node), edge_type)
    }

    fn degree(&self, adjacency: &[EdgeId], edge_type: &EdgeType) -> GraphResult<usize> {
        let mut count = 0;
        for &edge_id in adjacency {
            let edge = self
                .store
                .get_edge(edge_id)
                .ok_or(GraphError::EdgeNotFound(edge_id))?;
            if edge.edge_type == *edge_type {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Outgoing relationships of `node` restricted to the given types.
    ///
    /// Fails if an adjacency entry no longer resolves in the snapshot.
    pub fn outgoing_of_types(
        &self,
        node: NodeId,
        types: &[EdgeType],
    ) -> GraphResult<Vec<&'a Edge>> {
        let wanted: FxHashSet<&EdgeType> = types.iter().collect();
        let mut edges = Vec::new();
        for &edge_id in self.store.outgoing_edges(node) {
            let edge = self
                .store
                .get_edge(edge_id)
                .ok_or(GraphError::EdgeNotFound(edge_id))?;
            if wanted.contains(&edge.edge_type) {
                edges.push(edge);
            }
        }
        Ok(edges)
    }

    /// All relationships in the snapshot restricted to the given types,
    /// with both endpoints resolved.
    ///
    /// A relationship whose endpoint record no longer resolves is a stale
    /// reference: the whole enumeration fails rather than yield a partial
    /// edge set.
    pub fn relationships_of_types(&self, types: &[EdgeType]) -> GraphResult<Vec<&'a Edge>> {
        let wanted: FxHashSet<&EdgeType> = types.iter().collect();
        let mut edges = Vec::new();
        for edge in self.store.edges() {
            if !wanted.contains(&edge.edge_type) {
                continue;
            }
            if !self.store.has_node(edge.source) {
                return Err(GraphError::NodeNotFound(edge.source));
            }
            if !self.store.has_node(edge.target) {
                return Err(GraphError::NodeNotFound(edge.target));
            }
            edges.push(edge);
        }
        Ok(edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(names: &[&str]) -> Vec<EdgeType> {
        names.iter().map(|n| EdgeType::new(*n)).collect()
    }

    #[test]
    fn test_nodes_with_labels_deduplicates() {
        let mut store = GraphStore::new();
        let a = store.create_node("Profile");
        store.add_label(a, "Project").unwrap();
        let b = store.create_node("Project");
        store.create_node("Other");

        let view = GraphView::new(&store);
        let nodes = view.nodes_with_labels(&[Label::new("Profile"), Label::new("Project")]);
        assert_eq!(nodes, vec![a, b]);
    }

    #[test]
    fn test_degrees_by_type() {
        let mut store = GraphStore::new();
        let a = store.create_node("Profile");
        let b = store.create_node("Profile");
        store.create_edge(a, b, "FOLLOWS").unwrap();
        store.create_edge(a, b, "FOLLOWS").unwrap();
        store.create_edge(b, a, "COMMENTED_ON").unwrap();

        let view = GraphView::new(&store);
        assert_eq!(view.out_degree(a, &EdgeType::new("FOLLOWS")).unwrap(), 2);
        assert_eq!(view.in_degree(b, &EdgeType::new("FOLLOWS")).unwrap(), 2);
        assert_eq!(view.out_degree(a, &EdgeType::new("COMMENTED_ON")).unwrap(), 0);
        assert_eq!(view.in_degree(a, &EdgeType::new("COMMENTED_ON")).unwrap(), 1);
    }

    #[test]
    fn test_relationships_filtered_by_type() {
        let mut store = GraphStore::new();
        let a = store.create_node("Profile");
        let b = store.create_node("Profile");
        store.create_edge(a, b, "FOLLOWS").unwrap();
        store.create_edge(b, a, "IGNORED").unwrap();

        let view = GraphView::new(&store);
        let rels = view.relationships_of_types(&types(&["FOLLOWS"])).unwrap();
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].source, a);
        assert_eq!(rels[0].target, b);
    }

    #[test]
    fn test_stale_endpoint_is_an_error() {
        let mut store = GraphStore::new();
        let a = store.create_node("Profile");
        let b = store.create_node("Profile");
        store.create_edge(a, b, "FOLLOWS").unwrap();
        store.evict_node_record(b);

        let view = GraphView::new(&store);
        let err = view.relationships_of_types(&types(&["FOLLOWS"])).unwrap_err();
        assert_eq!(err, GraphError::NodeNotFound(b));
    }
}
