//! ONNX-backed ExtraTrees model
//!
//! The trained estimator is exported as an ONNX graph plus a sidecar
//! manifest; the graph carries the trees, the manifest carries the metadata
//! (estimator counts, depth limits, feature importances) that the graph
//! format does not.

use crate::models::PredictiveModel;
use crate::validate::FeatureMatrix;
use anyhow::{Context, Result};
use ort::session::Session;
use ort::value::Tensor;
use serde::Deserialize;
use serde_json::Number;
use std::sync::RwLock;
use tracing::debug;

/// Sidecar metadata exported alongside the ONNX graph
#[derive(Debug, Clone, Deserialize)]
pub struct ModelManifest {
    /// Concrete estimator type, e.g. `ExtraTreesRegressor`
    pub model_type: String,
    /// Number of trees in the ensemble
    pub n_estimators: u32,
    /// Number of input features
    pub n_features: usize,
    /// Number of outputs per sample
    #[serde(default)]
    pub n_outputs: Option<u32>,
    /// Maximum tree depth; absent means unbounded
    #[serde(default)]
    pub max_depth: Option<u32>,
    /// Minimum samples to split a node (int count or float fraction)
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: Number,
    /// Minimum samples at a leaf (int count or float fraction)
    #[serde(default = "default_min_samples_leaf")]
    pub min_samples_leaf: Number,
    /// Per-feature importance weights, length `n_features`
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,
}

fn default_min_samples_split() -> Number {
    Number::from(2)
}

fn default_min_samples_leaf() -> Number {
    Number::from(1)
}

/// Loaded ExtraTrees model: ONNX session plus manifest metadata.
///
/// The session needs `&mut` to run, so it sits behind a `RwLock` taken for
/// the duration of a predict call; everything else is immutable after load.
#[derive(Debug)]
pub struct OnnxExtraTrees {
    session: RwLock<Session>,
    input_name: String,
    manifest: ModelManifest,
}

impl OnnxExtraTrees {
    pub fn new(session: Session, input_name: String, manifest: ModelManifest) -> Self {
        Self {
            session: RwLock::new(session),
            input_name,
            manifest,
        }
    }

    pub fn manifest(&self) -> &ModelManifest {
        &self.manifest
    }
}

impl PredictiveModel for OnnxExtraTrees {
    fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>> {
        // Input tensor shape [n_samples, n_features], row-major
        let shape = vec![matrix.n_rows() as i64, matrix.width() as i64];
        let input_tensor = Tensor::from_array((shape, matrix.data().to_vec()))
            .context("Failed to create input tensor")?;

        let mut session = self
            .session
            .write()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let outputs = session.run(ort::inputs![&self.input_name => input_tensor])?;

        // Regression exports name the prediction output "variable"; skip any
        // auxiliary label outputs and take the first numeric tensor.
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }

            if let Ok(tensor) = output.try_extract_tensor::<f32>() {
                let (shape, data) = tensor;
                let dims: Vec<i64> = shape.iter().copied().collect();
                debug!(output = %name, shape = ?dims, "Extracted prediction tensor");
                return predictions_from_dims(&dims, data, matrix.n_rows());
            }
        }

        anyhow::bail!("Model produced no numeric output tensor")
    }

    fn model_type(&self) -> &str {
        &self.manifest.model_type
    }

    fn feature_count(&self) -> usize {
        self.manifest.n_features
    }

    fn estimator_count(&self) -> u32 {
        self.manifest.n_estimators
    }

    fn output_count(&self) -> Option<u32> {
        self.manifest.n_outputs
    }

    fn max_depth(&self) -> Option<u32> {
        self.manifest.max_depth
    }

    fn min_samples_split(&self) -> &Number {
        &self.manifest.min_samples_split
    }

    fn min_samples_leaf(&self) -> &Number {
        &self.manifest.min_samples_leaf
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        self.manifest.feature_importances.as_deref()
    }
}

/// Interpret the output tensor as one prediction per input row.
///
/// Accepts shape `[n]` or `[n, 1]`; anything else is a model/service
/// mismatch reported to the caller.
fn predictions_from_dims(dims: &[i64], data: &[f32], n_rows: usize) -> Result<Vec<f64>> {
    let one_per_row = match dims {
        [n] => *n as usize == n_rows,
        [n, 1] => *n as usize == n_rows,
        _ => false,
    };

    if !one_per_row || data.len() != n_rows {
        anyhow::bail!(
            "Unexpected model output shape {:?} for {} samples",
            dims,
            n_rows
        );
    }

    Ok(data.iter().map(|&v| v as f64).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_manifest_full_deserialization() {
        let manifest: ModelManifest = serde_json::from_value(json!({
            "model_type": "ExtraTreesRegressor",
            "n_estimators": 300,
            "n_features": 9,
            "n_outputs": 1,
            "max_depth": null,
            "min_samples_split": 2,
            "min_samples_leaf": 1,
            "feature_importances": [0.1, 0.2, 0.05, 0.15, 0.1, 0.1, 0.1, 0.1, 0.1]
        }))
        .unwrap();

        assert_eq!(manifest.model_type, "ExtraTreesRegressor");
        assert_eq!(manifest.n_estimators, 300);
        assert_eq!(manifest.n_features, 9);
        assert_eq!(manifest.n_outputs, Some(1));
        assert_eq!(manifest.max_depth, None);
        assert_eq!(manifest.feature_importances.unwrap().len(), 9);
    }

    #[test]
    fn test_manifest_defaults() {
        let manifest: ModelManifest = serde_json::from_value(json!({
            "model_type": "ExtraTreesRegressor",
            "n_estimators": 100,
            "n_features": 9
        }))
        .unwrap();

        assert_eq!(manifest.n_outputs, None);
        assert_eq!(manifest.max_depth, None);
        assert_eq!(manifest.min_samples_split, Number::from(2));
        assert_eq!(manifest.min_samples_leaf, Number::from(1));
        assert!(manifest.feature_importances.is_none());
    }

    #[test]
    fn test_manifest_fractional_min_samples() {
        let manifest: ModelManifest = serde_json::from_value(json!({
            "model_type": "ExtraTreesRegressor",
            "n_estimators": 100,
            "n_features": 9,
            "min_samples_split": 0.1
        }))
        .unwrap();

        assert_eq!(manifest.min_samples_split.as_f64(), Some(0.1));
    }

    #[test]
    fn test_predictions_from_flat_output() {
        let preds = predictions_from_dims(&[3], &[1.0, 2.0, 3.0], 3).unwrap();
        assert_eq!(preds, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_predictions_from_column_output() {
        let preds = predictions_from_dims(&[2, 1], &[4.5, 5.5], 2).unwrap();
        assert_eq!(preds, vec![4.5, 5.5]);
    }

    #[test]
    fn test_multi_column_output_rejected() {
        let err = predictions_from_dims(&[2, 2], &[1.0, 2.0, 3.0, 4.0], 2).unwrap_err();
        assert!(err.to_string().contains("output shape"));
    }

    #[test]
    fn test_row_count_disagreement_rejected() {
        assert!(predictions_from_dims(&[2], &[1.0, 2.0], 3).is_err());
    }
}
