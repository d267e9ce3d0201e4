//! Outbound-weight normalization
//!
//! Computes, per node, the total weight of its relevant outgoing
//! relationships. That total is the denominator used to split a node's
//! rank across its outgoing edges. A node whose total is zero is dangling:
//! it never distributes rank, only receives it.

use crate::graph::{EdgeType, GraphResult, GraphView, NodeId};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

/// Per-node total outgoing weight over the relevant relationship set.
///
/// Built once per computation, read-only after. Dangling nodes have no
/// entry.
#[derive(Debug, Default)]
pub struct OutboundWeights {
    totals: FxHashMap<NodeId, f64>,
}

impl OutboundWeights {
    /// Total outgoing weight of a node, or `None` if the node is dangling
    /// (or outside the filtered set)
    pub fn total(&self, node: NodeId) -> Option<f64> {
        self.totals.get(&node).copied()
    }

    /// Whether the node has no relevant outgoing weight
    pub fn is_dangling(&self, node: NodeId) -> bool {
        !self.totals.contains_key(&node)
    }

    /// Number of non-dangling nodes
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    fn from_entries(entries: impl IntoIterator<Item = (NodeId, f64)>) -> Self {
        let totals = entries
            .into_iter()
            .filter(|&(_, total)| total > 0.0)
            .collect();
        OutboundWeights { totals }
    }
}

/// Direct strategy: walk each node's outgoing relationships, filter by
/// type, and sum the per-type weights. Used by the sparse storage engine.
pub fn aggregate_direct(
    view: &GraphView<'_>,
    nodes: &[NodeId],
    types: &[EdgeType],
    weights: &FxHashMap<EdgeType, f64>,
) -> GraphResult<OutboundWeights> {
    let mut entries = Vec::with_capacity(nodes.len());
    for &node in nodes {
        let mut total = 0.0;
        for edge in view.outgoing_of_types(node, types)? {
            if let Some(&w) = weights.get(&edge.edge_type) {
                total += w;
            }
        }
        entries.push((node, total));
    }
    Ok(OutboundWeights::from_entries(entries))
}

/// Degree-based strategy: per (node, type), multiply the directed
/// out-degree by the type weight and sum over the relevant types. Used by
/// the dense storage engines, parallelized over nodes.
///
/// Strictly directed: a node with no relevant outgoing edges is dangling
/// even when it has incoming ones. Agrees with [`aggregate_direct`] on
/// every input, since a type's weight applies uniformly to its edges.
pub fn aggregate_by_degree(
    view: &GraphView<'_>,
    nodes: &[NodeId],
    types: &[EdgeType],
    weights: &FxHashMap<EdgeType, f64>,
) -> GraphResult<OutboundWeights> {
    let entries = nodes
        .par_iter()
        .map(|&node| {
            let mut total = 0.0;
            for ty in types {
                let degree = view.out_degree(node, ty)?;
                if degree > 0 {
                    let w = weights.get(ty).copied().unwrap_or_default();
                    total += degree as f64 * w;
                }
            }
            Ok((node, total))
        })
        .collect::<GraphResult<Vec<_>>>()?;
    Ok(OutboundWeights::from_entries(entries))
}
