//! Relationship-type weight resolution

use crate::graph::EdgeType;
use rustc_hash::FxHashMap;
use std::collections::HashMap;

/// Resolve the weight of every relevant relationship type.
///
/// A type with a configured override gets that weight; every other type
/// gets `default_weight`. Missing configuration is not an error.
pub fn resolve_type_weights(
    types: &[EdgeType],
    overrides: &HashMap<String, f64>,
    default_weight: f64,
) -> FxHashMap<EdgeType, f64> {
    types
        .iter()
        .map(|ty| {
            let weight = overrides.get(ty.as_str()).copied().unwrap_or(default_weight);
            (ty.clone(), weight)
        })
        .collect()
}
