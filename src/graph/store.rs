//! In-memory graph storage
//!
//! A labeled, directed multigraph: nodes carry one or more labels, edges
//! carry a relationship type, and multiple edges may connect the same pair
//! of nodes. Hash indexes back label and type lookups.

use super::types::{EdgeId, EdgeType, Label, NodeId};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("Invalid edge: source node {0} does not exist")]
    InvalidEdgeSource(NodeId),

    #[error("Invalid edge: target node {0} does not exist")]
    InvalidEdgeTarget(NodeId),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// A node in the graph
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Labels attached to this node (at least one)
    pub labels: Vec<Label>,
}

impl Node {
    pub fn new(id: NodeId, label: impl Into<Label>) -> Self {
        Node {
            id,
            labels: vec![label.into()],
        }
    }

    /// Check whether the node carries a specific label
    pub fn has_label(&self, label: &Label) -> bool {
        self.labels.contains(label)
    }
}

/// A directed edge in the graph
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,

    /// Source node (edge goes FROM this node)
    pub source: NodeId,

    /// Target node (edge goes TO this node)
    pub target: NodeId,

    /// Type of relationship (e.g., "FOLLOWS", "COMMENTED_ON")
    pub edge_type: EdgeType,
}

impl Edge {
    pub fn new(
        id: EdgeId,
        source: NodeId,
        target: NodeId,
        edge_type: impl Into<EdgeType>,
    ) -> Self {
        Edge {
            id,
            source,
            target,
            edge_type: edge_type.into(),
        }
    }
}

/// In-memory graph storage
///
/// Arena storage with O(1) lookup:
/// - nodes/edges: id-indexed slot arenas
/// - outgoing/incoming: NodeId -> Vec<EdgeId> adjacency lists
/// - label_index: Label -> set of NodeId
/// - edge_type_index: EdgeType -> set of EdgeId
#[derive(Debug)]
pub struct GraphStore {
    /// Node storage, slot index = node id
    nodes: Vec<Option<Node>>,

    /// Edge storage, slot index = edge id
    edges: Vec<Option<Edge>>,

    /// Outgoing edges for each node (adjacency list)
    outgoing: Vec<Vec<EdgeId>>,

    /// Incoming edges for each node (adjacency list)
    incoming: Vec<Vec<EdgeId>>,

    /// Label index for fast lookups
    label_index: HashMap<Label, HashSet<NodeId>>,

    /// Edge type index for fast lookups
    edge_type_index: HashMap<EdgeType, HashSet<EdgeId>>,

    /// Next node ID
    next_node_id: u64,

    /// Next edge ID
    next_edge_id: u64,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        GraphStore {
            nodes: Vec::with_capacity(1024),
            edges: Vec::with_capacity(4096),
            outgoing: Vec::with_capacity(1024),
            incoming: Vec::with_capacity(1024),
            label_index: HashMap::new(),
            edge_type_index: HashMap::new(),
            next_node_id: 1,
            next_edge_id: 1,
        }
    }

    /// Create a node with auto-generated ID and a single label
    pub fn create_node(&mut self, label: impl Into<Label>) -> NodeId {
        let node_id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;
        let idx = node_id.as_u64() as usize;

        let label = label.into();
        let node = Node::new(node_id, label.clone());

        self.label_index
            .entry(label)
            .or_insert_with(HashSet::new)
            .insert(node_id);

        if idx >= self.nodes.len() {
            self.nodes.resize(idx + 1, None);
            self.outgoing.resize(idx + 1, Vec::new());
            self.incoming.resize(idx + 1, Vec::new());
        }

        self.nodes[idx] = Some(node);
        node_id
    }

    /// Add a label to an existing node and update the label index
    pub fn add_label(&mut self, node_id: NodeId, label: impl Into<Label>) -> GraphResult<()> {
        let label = label.into();
        let node = self
            .nodes
            .get_mut(node_id.as_u64() as usize)
            .and_then(Option::as_mut)
            .ok_or(GraphError::NodeNotFound(node_id))?;

        if !node.labels.contains(&label) {
            node.labels.push(label.clone());
        }

        self.label_index
            .entry(label)
            .or_insert_with(HashSet::new)
            .insert(node_id);

        Ok(())
    }

    /// Create a directed edge between two existing nodes
    pub fn create_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        edge_type: impl Into<EdgeType>,
    ) -> GraphResult<EdgeId> {
        if !self.has_node(source) {
            return Err(GraphError::InvalidEdgeSource(source));
        }
        if !self.has_node(target) {
            return Err(GraphError::InvalidEdgeTarget(target));
        }

        let edge_id = EdgeId::new(self.next_edge_id);
        self.next_edge_id += 1;
        let idx = edge_id.as_u64() as usize;

        let edge_type = edge_type.into();
        let edge = Edge::new(edge_id, source, target, edge_type.clone());

        self.outgoing[source.as_u64() as usize].push(edge_id);
        self.incoming[target.as_u64() as usize].push(edge_id);

        if idx >= self.edges.len() {
            self.edges.resize(idx + 1, None);
        }

        self.edge_type_index
            .entry(edge_type)
            .or_insert_with(HashSet::new)
            .insert(edge_id);

        self.edges[idx] = Some(edge);
        Ok(edge_id)
    }

    /// Delete an edge
    pub fn delete_edge(&mut self, id: EdgeId) -> GraphResult<Edge> {
        let edge = self
            .edges
            .get_mut(id.as_u64() as usize)
            .and_then(Option::take)
            .ok_or(GraphError::EdgeNotFound(id))?;

        if let Some(edge_set) = self.edge_type_index.get_mut(&edge.edge_type) {
            edge_set.remove(&id);
        }
        if let Some(adj) = self.outgoing.get_mut(edge.source.as_u64() as usize) {
            adj.retain(|&eid| eid != id);
        }
        if let Some(adj) = self.incoming.get_mut(edge.target.as_u64() as usize) {
            adj.retain(|&eid| eid != id);
        }

        Ok(edge)
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.as_u64() as usize).and_then(Option::as_ref)
    }

    /// Check if a node exists
    pub fn has_node(&self, id: NodeId) -> bool {
        self.get_node(id).is_some()
    }

    /// Get an edge by ID
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.as_u64() as usize).and_then(Option::as_ref)
    }

    /// Node IDs carrying a given label
    pub fn nodes_with_label(&self, label: &Label) -> impl Iterator<Item = NodeId> + '_ {
        self.label_index
            .get(label)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Outgoing edge IDs of a node (empty for unknown nodes)
    pub fn outgoing_edges(&self, node: NodeId) -> &[EdgeId] {
        self.outgoing
            .get(node.as_u64() as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Incoming edge IDs of a node (empty for unknown nodes)
    pub fn incoming_edges(&self, node: NodeId) -> &[EdgeId] {
        self.incoming
            .get(node.as_u64() as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate over all live edges
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter_map(Option::as_ref)
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    /// Number of live edges
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|slot| slot.is_some()).count()
    }

    /// Drop a node record without detaching its edges, leaving the
    /// adjacency lists pointing at a vacated slot. Only for exercising the
    /// stale-reference failure path.
    #[cfg(test)]
    pub(crate) fn evict_node_record(&mut self, id: NodeId) {
        if let Some(slot) = self.nodes.get_mut(id.as_u64() as usize) {
            *slot = None;
        }
    }
}
