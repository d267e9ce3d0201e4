//! Power-iteration rank engine
//!
//! One algorithm, three interchangeable storage/execution strategies:
//!
//! | [`Storage`]          | index space      | value type         | execution        |
//! |----------------------|------------------|--------------------|------------------|
//! | `SequentialDense`    | dense projection | `f64`              | single thread    |
//! | `ParallelFixedPoint` | dense projection | scaled `i64`       | rayon over edges |
//! | `SparseMap`          | raw node ids     | `f64`              | single thread    |
//!
//! Every iteration runs the same phases in order: sample contributions
//! from the previous iteration's fully settled ranks, reset every rank to
//! `1 - damping`, then add `contribution * weight / total_outbound_weight`
//! along every relevant relationship. Dangling sources never distribute;
//! their mass is dropped, not redistributed. A fixed iteration budget is
//! the only stopping criterion.

use crate::graph::{EdgeType, GraphError, GraphView, Label, NodeId};
use crate::pagerank::config::{PageRankConfig, DEFAULT_WEIGHT};
use crate::pagerank::norm::{aggregate_by_degree, aggregate_direct, OutboundWeights};
use crate::pagerank::weights::resolve_type_weights;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use thiserror::Error;
use tracing::debug;

/// Fixed-point scaling factor for the parallel strategy.
///
/// Atomic fractional addition is unavailable, so ranks are accumulated as
/// `round(rank * SCALE)` in an `AtomicI64`. Larger values trade headroom
/// for precision: quantization error is bounded by `1/SCALE` per addition.
pub const SCALE: f64 = 100_000.0;

/// Sentinel returned by [`PageRank::result`] for nodes that were never
/// part of the computed set, or before `compute` has run
pub const ABSENT_RANK: f64 = -1.0;

/// Dangling marker in the dense normalization tables
const NO_OUTBOUND: f64 = -1.0;

fn to_fixed(x: f64) -> i64 {
    (x * SCALE).round() as i64
}

fn to_float(y: i64) -> f64 {
    y as f64 / SCALE
}

/// Errors that abort a rank computation
///
/// All variants are fatal: the caller observes either a fully populated
/// result or an error with no partial result.
#[derive(Error, Debug, PartialEq)]
pub enum PageRankError {
    /// An entity referenced during iteration no longer resolves in the
    /// snapshot. Skipping it would silently break rank conservation, so
    /// the whole computation is discarded.
    #[error("graph changed during computation: {0}")]
    Stale(#[from] GraphError),
}

pub type PageRankResult<T> = Result<T, PageRankError>;

/// Storage/execution strategy for the rank engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// Contiguous `f64` vectors, single-threaded accumulation
    SequentialDense,
    /// Contiguous fixed-point `AtomicI64` vector, relationship-partitioned
    /// parallel accumulation
    ParallelFixedPoint,
    /// `NodeId`-keyed maps, single-threaded; no dense projection needed
    SparseMap,
}

/// Weighted PageRank over a label/type-filtered subgraph
pub struct PageRank {
    storage: Storage,
    ranks: FxHashMap<NodeId, f64>,
}

impl PageRank {
    /// Create an engine with the given storage strategy
    pub fn new(storage: Storage) -> Self {
        PageRank {
            storage,
            ranks: FxHashMap::default(),
        }
    }

    /// Run the computation against one snapshot.
    ///
    /// Zero matched nodes or zero configured relationship types is a
    /// no-op, not an error: every filtered node keeps the base rank
    /// `1 - damping`. On error the previous result is discarded and no
    /// partial result is observable.
    pub fn compute(
        &mut self,
        view: &GraphView<'_>,
        config: &PageRankConfig,
    ) -> PageRankResult<()> {
        self.ranks.clear();

        let damping = config.damping_factor;
        let base = 1.0 - damping;

        let labels: Vec<Label> = config.labels.iter().map(|l| Label::new(l.as_str())).collect();
        let nodes = view.nodes_with_labels(&labels);
        let types: Vec<EdgeType> = config
            .relationship_types
            .iter()
            .map(|t| EdgeType::new(t.as_str()))
            .collect();

        if nodes.is_empty() {
            debug!("no nodes matched labels {:?}; nothing to compute", config.labels);
            return Ok(());
        }
        if types.is_empty() {
            debug!("no relationship types configured; {} ranks stay at {}", nodes.len(), base);
            self.ranks = nodes.into_iter().map(|n| (n, base)).collect();
            return Ok(());
        }

        let weights = resolve_type_weights(&types, &config.weights, DEFAULT_WEIGHT);

        debug!(
            "computing pagerank: {} nodes, {} relationship types, {} iterations, {:?} storage",
            nodes.len(),
            types.len(),
            config.iterations,
            self.storage
        );

        self.ranks = match self.storage {
            Storage::SequentialDense => {
                dense_sequential(view, &nodes, &types, &weights, damping, config.iterations)?
            }
            Storage::ParallelFixedPoint => {
                dense_parallel(view, &nodes, &types, &weights, damping, config.iterations)?
            }
            Storage::SparseMap => {
                sparse(view, &nodes, &types, &weights, damping, config.iterations)?
            }
        };
        Ok(())
    }

    /// Final settled rank of a node, or [`ABSENT_RANK`] if the node was
    /// not part of the computed set or `compute` has not run
    pub fn result(&self, node: NodeId) -> f64 {
        self.ranks.get(&node).copied().unwrap_or(ABSENT_RANK)
    }

    /// Number of nodes in the computed set
    pub fn number_of_nodes(&self) -> usize {
        self.ranks.len()
    }

    /// The full rank vector
    pub fn ranks(&self) -> &FxHashMap<NodeId, f64> {
        &self.ranks
    }
}

/// Dense projection of the filtered subgraph: node ids mapped to
/// contiguous indices, relationships flattened with their resolved weight
struct Projection {
    nodes: Vec<NodeId>,
    edges: Vec<(usize, usize, f64)>,
}

fn project(
    view: &GraphView<'_>,
    nodes: &[NodeId],
    types: &[EdgeType],
    weights: &FxHashMap<EdgeType, f64>,
) -> PageRankResult<Projection> {
    let mut index_of =
        FxHashMap::with_capacity_and_hasher(nodes.len(), Default::default());
    for (idx, &node) in nodes.iter().enumerate() {
        index_of.insert(node, idx);
    }

    let mut edges = Vec::new();
    for edge in view.relationships_of_types(types)? {
        // An endpoint outside the filtered label set makes the
        // relationship irrelevant, not stale.
        let (Some(&u), Some(&v)) = (index_of.get(&edge.source), index_of.get(&edge.target))
        else {
            continue;
        };
        let w = weights.get(&edge.edge_type).copied().unwrap_or(DEFAULT_WEIGHT);
        edges.push((u, v, w));
    }

    Ok(Projection {
        nodes: nodes.to_vec(),
        edges,
    })
}

fn dense_totals(outbound: &OutboundWeights, nodes: &[NodeId]) -> Vec<f64> {
    nodes
        .iter()
        .map(|&n| outbound.total(n).unwrap_or(NO_OUTBOUND))
        .collect()
}

fn dense_sequential(
    view: &GraphView<'_>,
    nodes: &[NodeId],
    types: &[EdgeType],
    weights: &FxHashMap<EdgeType, f64>,
    damping: f64,
    iterations: usize,
) -> PageRankResult<FxHashMap<NodeId, f64>> {
    let base = 1.0 - damping;
    let proj = project(view, nodes, types, weights)?;
    let totals = dense_totals(&aggregate_by_degree(view, nodes, types, weights)?, nodes);

    let n = nodes.len();
    let mut dst = vec![base; n];
    let mut src = vec![0.0; n];

    for _ in 0..iterations {
        // Contributions come from the previous iteration's settled ranks;
        // the reset below may not start until all of them are sampled.
        for i in 0..n {
            src[i] = damping * dst[i];
        }
        dst.fill(base);
        for &(u, v, w) in &proj.edges {
            let total = totals[u];
            if total > 0.0 {
                dst[v] += src[u] * w / total;
            }
        }
    }

    Ok(proj.nodes.into_iter().zip(dst).collect())
}

fn dense_parallel(
    view: &GraphView<'_>,
    nodes: &[NodeId],
    types: &[EdgeType],
    weights: &FxHashMap<EdgeType, f64>,
    damping: f64,
    iterations: usize,
) -> PageRankResult<FxHashMap<NodeId, f64>> {
    let base = 1.0 - damping;
    let base_fixed = to_fixed(base);
    let proj = project(view, nodes, types, weights)?;
    let totals = dense_totals(&aggregate_by_degree(view, nodes, types, weights)?, nodes);

    let n = nodes.len();
    let dst: Vec<AtomicI64> = (0..n).map(|_| AtomicI64::new(base_fixed)).collect();
    let mut src = vec![0.0; n];

    for _ in 0..iterations {
        // The swap samples the settled rank and seeds the next iteration
        // in one step; each slot is read only by its own node, so no
        // cross-node ordering is needed before the edge pass.
        src.par_iter_mut().zip(dst.par_iter()).for_each(|(s, d)| {
            *s = damping * to_float(d.swap(base_fixed, Ordering::Relaxed));
        });

        // Relationship-partitioned accumulation. The adds are commutative,
        // so Relaxed suffices; the rayon join is the iteration barrier.
        proj.edges.par_iter().for_each(|&(u, v, w)| {
            let total = totals[u];
            if total > 0.0 {
                dst[v].fetch_add(to_fixed(src[u] * w / total), Ordering::Relaxed);
            }
        });
    }

    Ok(proj
        .nodes
        .into_iter()
        .zip(dst.into_iter().map(|d| to_float(d.into_inner())))
        .collect())
}

fn sparse(
    view: &GraphView<'_>,
    nodes: &[NodeId],
    types: &[EdgeType],
    weights: &FxHashMap<EdgeType, f64>,
    damping: f64,
    iterations: usize,
) -> PageRankResult<FxHashMap<NodeId, f64>> {
    let base = 1.0 - damping;
    let totals = aggregate_direct(view, nodes, types, weights)?;
    // Collected once: the snapshot cannot change mid-computation.
    let relationships = view.relationships_of_types(types)?;

    let mut dst: FxHashMap<NodeId, f64> = nodes.iter().map(|&n| (n, base)).collect();
    let mut src: FxHashMap<NodeId, f64> = nodes.iter().map(|&n| (n, 0.0)).collect();

    for _ in 0..iterations {
        for &node in nodes {
            let settled = dst[&node];
            src.insert(node, damping * settled);
            dst.insert(node, base);
        }
        for edge in &relationships {
            // Absent total: dangling source, or source outside the
            // filtered set.
            let Some(total) = totals.total(edge.source) else {
                continue;
            };
            let Some(entry) = dst.get_mut(&edge.target) else {
                continue;
            };
            let w = weights.get(&edge.edge_type).copied().unwrap_or(DEFAULT_WEIGHT);
            *entry += src[&edge.source] * w / total;
        }
    }

    Ok(dst)
}
