//! Process-wide shared state
//!
//! Both artifacts follow an explicit two-phase lifecycle: `initialize`
//! attempts the load once at startup and records the outcome, after which
//! each artifact is either `Loaded` (immutable, shared read-only) or
//! `Unloaded` for the rest of the process lifetime. There is no reload.

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::{HyperparameterSet, ModelLoader, PredictiveModel};
use std::sync::Arc;
use tracing::{error, info};

/// Shared handle to the loaded artifacts, cloned into every request handler
#[derive(Clone)]
pub struct AppState {
    model: Option<Arc<dyn PredictiveModel>>,
    params: Option<Arc<HyperparameterSet>>,
}

impl AppState {
    /// Attempt to load both artifacts, recording each outcome.
    ///
    /// A failed load leaves that artifact unloaded and the service running
    /// degraded; endpoints depending on it report the failure per request.
    pub fn initialize(config: &AppConfig) -> Self {
        let model = ModelLoader::new()
            .and_then(|loader| {
                loader.load_model(
                    &config.artifacts.model_path,
                    &config.artifacts.manifest_path,
                )
            })
            .map(|model| Arc::new(model) as Arc<dyn PredictiveModel>)
            .map_err(|e| error!(error = %e, "Failed to load model, continuing degraded"))
            .ok();

        let params = ModelLoader::load_params(&config.artifacts.params_path)
            .map(Arc::new)
            .map_err(|e| error!(error = %e, "Failed to load parameters, continuing degraded"))
            .ok();

        info!(
            model_loaded = model.is_some(),
            params_loaded = params.is_some(),
            "Artifact initialization complete"
        );

        Self { model, params }
    }

    /// Build state from already-loaded artifacts
    pub fn with_artifacts(
        model: Option<Arc<dyn PredictiveModel>>,
        params: Option<Arc<HyperparameterSet>>,
    ) -> Self {
        Self { model, params }
    }

    /// The loaded model, or `ModelUnavailable`
    pub fn model(&self) -> Result<&Arc<dyn PredictiveModel>, ApiError> {
        self.model.as_ref().ok_or(ApiError::ModelUnavailable)
    }

    /// The loaded hyperparameter set, or `ParamsUnavailable`
    pub fn params(&self) -> Result<&HyperparameterSet, ApiError> {
        self.params.as_deref().ok_or(ApiError::ParamsUnavailable)
    }

    /// Whether the model artifact loaded
    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Whether the hyperparameter artifact loaded
    pub fn params_loaded(&self) -> bool {
        self.params.is_some()
    }
}
