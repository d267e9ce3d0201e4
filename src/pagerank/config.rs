//! PageRank configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Weight used for relationship types with no configured override
pub const DEFAULT_WEIGHT: f64 = 1.0;

fn default_iterations() -> usize {
    200
}

fn default_damping() -> f64 {
    0.85
}

/// PageRank configuration
///
/// Deserializable from the JSON surface callers submit, e.g.
/// `{"labels": ["Profile"], "relationship_types": ["FOLLOWS"],
/// "weights": {"FOLLOWS": 2.0}, "iterations": 20}`. Missing `weights`
/// entries resolve to [`DEFAULT_WEIGHT`]; `iterations` defaults to 200 and
/// `damping_factor` to 0.85.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRankConfig {
    /// Node labels to include
    pub labels: Vec<String>,

    /// Relationship types to include
    pub relationship_types: Vec<String>,

    /// Per-type weight overrides
    #[serde(default)]
    pub weights: HashMap<String, f64>,

    /// Fixed iteration budget; no convergence check is performed
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Damping factor (usually 0.85)
    #[serde(default = "default_damping")]
    pub damping_factor: f64,
}

impl PageRankConfig {
    /// Create a config with default weights, iterations and damping
    pub fn new(
        labels: impl IntoIterator<Item = impl Into<String>>,
        relationship_types: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        PageRankConfig {
            labels: labels.into_iter().map(Into::into).collect(),
            relationship_types: relationship_types.into_iter().map(Into::into).collect(),
            weights: HashMap::new(),
            iterations: default_iterations(),
            damping_factor: default_damping(),
        }
    }

    /// Set a weight override for one relationship type
    pub fn with_weight(mut self, relationship_type: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(relationship_type.into(), weight);
        self
    }

    /// Set the iteration budget
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the damping factor
    pub fn with_damping(mut self, damping_factor: f64) -> Self {
        self.damping_factor = damping_factor;
        self
    }

    /// Parse a config from its JSON representation
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
