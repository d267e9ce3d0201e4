//! Graphrank
//!
//! Weighted PageRank over labeled, typed property graphs. Nodes are
//! filtered by a set of labels, relationships by a set of types, and each
//! relationship type carries a configurable weight (default 1.0). The
//! power-iteration engine comes in three interchangeable storage
//! strategies: sequential dense, parallel dense fixed-point, and sparse
//! map.
//!
//! ## Example Usage
//!
//! ```rust
//! use graphrank::graph::{GraphStore, GraphView};
//! use graphrank::pagerank::{PageRank, PageRankConfig, Storage};
//!
//! let mut store = GraphStore::new();
//! let alice = store.create_node("Profile");
//! let bob = store.create_node("Profile");
//! store.create_edge(alice, bob, "FOLLOWS").unwrap();
//!
//! let view = GraphView::new(&store);
//! let config = PageRankConfig::new(["Profile"], ["FOLLOWS"]).with_iterations(1);
//!
//! let mut engine = PageRank::new(Storage::SequentialDense);
//! engine.compute(&view, &config).unwrap();
//!
//! assert_eq!(engine.number_of_nodes(), 2);
//! assert!((engine.result(alice) - 0.15).abs() < 1e-12);
//! assert!((engine.result(bob) - 0.2775).abs() < 1e-12);
//! ```

#![warn(clippy::all)]

pub mod graph;
pub mod pagerank;

// Re-export main types for convenience
pub use graph::{
    Edge, EdgeId, EdgeType, GraphError, GraphResult, GraphStore, GraphView, Label, Node, NodeId,
};

pub use pagerank::{
    PageRank, PageRankConfig, PageRankError, PageRankResult, Storage, ABSENT_RANK, DEFAULT_WEIGHT,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
