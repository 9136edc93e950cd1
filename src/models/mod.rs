//! Model artifacts and the prediction capability

pub mod extratrees;
pub mod loader;
pub mod params;

pub use extratrees::{ModelManifest, OnnxExtraTrees};
pub use loader::ModelLoader;
pub use params::HyperparameterSet;

use crate::validate::FeatureMatrix;
use anyhow::Result;
use serde_json::Number;

/// The operations this service actually uses from the trained model.
///
/// Absence of a capability (feature importances) is an explicit `Option`,
/// not a runtime attribute probe. Implementations are loaded once at
/// startup and shared read-only across requests.
pub trait PredictiveModel: Send + Sync + std::fmt::Debug {
    /// Run the model on a validated matrix, producing one output per row in
    /// row order. The matrix width equals `feature_count()`; the validator
    /// guarantees it.
    fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>>;

    /// Concrete estimator type name, e.g. `ExtraTreesRegressor`
    fn model_type(&self) -> &str;

    /// Number of input features the model was trained on
    fn feature_count(&self) -> usize;

    /// Number of trees in the ensemble
    fn estimator_count(&self) -> u32;

    /// Number of outputs per sample, if the model reports one
    fn output_count(&self) -> Option<u32>;

    /// Maximum tree depth; `None` means unbounded
    fn max_depth(&self) -> Option<u32>;

    /// Minimum samples to split an internal node (int count or float fraction)
    fn min_samples_split(&self) -> &Number;

    /// Minimum samples at a leaf node (int count or float fraction)
    fn min_samples_leaf(&self) -> &Number;

    /// Per-feature importance weights, length `feature_count()`, if the
    /// model exposes them
    fn feature_importances(&self) -> Option<&[f64]>;
}
