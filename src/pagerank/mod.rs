//! Weighted PageRank
//!
//! Rank propagation over a label/type-filtered subgraph: configuration,
//! relationship-type weight resolution, outbound-weight normalization, and
//! the power-iteration engine with its three storage strategies.

pub mod config;
pub mod engine;
pub mod norm;
pub mod weights;

// Re-export main types
pub use config::{PageRankConfig, DEFAULT_WEIGHT};
pub use engine::{PageRank, PageRankError, PageRankResult, Storage, ABSENT_RANK, SCALE};
pub use norm::{aggregate_by_degree, aggregate_direct, OutboundWeights};
pub use weights::resolve_type_weights;
