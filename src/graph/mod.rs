//! Graph data model
//!
//! This module implements the directed, labeled multigraph the rank engine
//! computes over:
//! - Nodes with one or more labels, edges with relationship types
//! - Multiple edges between the same pair of nodes
//! - In-memory storage with hash-based label/type indexes
//! - A read-only snapshot view for algorithm execution

pub mod store;
pub mod types;
pub mod view;

// Re-export main types
pub use store::{Edge, GraphError, GraphResult, GraphStore, Node};
pub use types::{EdgeId, EdgeType, Label, NodeId};
pub use view::GraphView;
