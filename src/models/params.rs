//! Hyperparameter set loaded from the tuning-results document

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Hyperparameters for every model that took part in the offline search,
/// keyed by model name. Values are heterogeneous (int, float, string, bool,
/// null) and are passed through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HyperparameterSet(HashMap<String, HashMap<String, Value>>);

impl HyperparameterSet {
    /// Hyperparameters for a single model; an empty mapping if the name is
    /// absent, never an error.
    pub fn for_model(&self, name: &str) -> HashMap<String, Value> {
        self.0.get(name).cloned().unwrap_or_default()
    }

    /// Names of all models present in the document
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of models in the document
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the document holds no models at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
