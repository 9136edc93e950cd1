//! Artifact loading
//!
//! Loads the serialized model, its manifest, and the hyperparameter
//! document from disk. Load failures are returned to the caller; the
//! service starts degraded rather than crashing when an artifact is
//! missing or unreadable.

use crate::models::extratrees::{ModelManifest, OnnxExtraTrees};
use crate::models::params::HyperparameterSet;
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Loader for the model and hyperparameter artifacts
pub struct ModelLoader;

impl ModelLoader {
    /// Create a new loader, initializing the ONNX runtime
    pub fn new() -> Result<Self> {
        ort::init().commit()?;
        info!("ONNX Runtime initialized");
        Ok(Self)
    }

    /// Load the model artifact: ONNX session plus sidecar manifest.
    pub fn load_model<P: AsRef<Path>>(
        &self,
        model_path: P,
        manifest_path: P,
    ) -> Result<OnnxExtraTrees> {
        let model_path = model_path.as_ref();

        let manifest = Self::load_manifest(manifest_path.as_ref())?;
        let session = Self::build_session(model_path)?;

        // sklearn-onnx exports name the input "float_input"
        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        if let Some(importances) = &manifest.feature_importances {
            if importances.len() != manifest.n_features {
                warn!(
                    importances = importances.len(),
                    n_features = manifest.n_features,
                    "Manifest importance vector length disagrees with n_features"
                );
            }
        }

        info!(
            model_type = %manifest.model_type,
            n_estimators = manifest.n_estimators,
            n_features = manifest.n_features,
            input = %input_name,
            "Model loaded successfully"
        );

        Ok(OnnxExtraTrees::new(session, input_name, manifest))
    }

    /// Build the ONNX session, trying at most two strategies in fixed
    /// order: full graph optimization first, then a no-optimization
    /// fallback. The first success wins.
    fn build_session(path: &Path) -> Result<Session> {
        match Self::session_with(path, GraphOptimizationLevel::Level3) {
            Ok(session) => {
                info!(path = %path.display(), "Model session loaded (optimized)");
                Ok(session)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Optimized session load failed, retrying without graph optimization");
                let session = Self::session_with(path, GraphOptimizationLevel::Disable)
                    .context(format!("Failed to load model from {:?}", path))?;
                info!(path = %path.display(), "Model session loaded (unoptimized fallback)");
                Ok(session)
            }
        }
    }

    fn session_with(path: &Path, level: GraphOptimizationLevel) -> Result<Session> {
        let session = Session::builder()?
            .with_optimization_level(level)?
            .commit_from_file(path)?;
        Ok(session)
    }

    /// Read and parse the model manifest
    pub fn load_manifest(path: &Path) -> Result<ModelManifest> {
        let raw = fs::read_to_string(path)
            .context(format!("Failed to read model manifest from {:?}", path))?;
        serde_json::from_str(&raw)
            .context(format!("Failed to parse model manifest from {:?}", path))
    }

    /// Read and parse the hyperparameter document
    pub fn load_params<P: AsRef<Path>>(path: P) -> Result<HyperparameterSet> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .context(format!("Failed to read parameters from {:?}", path))?;
        let params: HyperparameterSet = serde_json::from_str(&raw)
            .context(format!("Failed to parse parameters from {:?}", path))?;

        info!(models = params.len(), path = %path.display(), "Parameters loaded successfully");
        Ok(params)
    }
}
