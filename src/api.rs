//! HTTP surface: router, handlers and transport types
//!
//! Handlers are thin: availability check, validation, then a single call
//! into the model or a field projection. All failure shaping lives in
//! [`ApiError`](crate::error::ApiError).

use crate::error::ApiError;
use crate::state::AppState;
use crate::validate;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Number, Value};
use std::collections::HashMap;
use tracing::{debug, error};

/// Key under which the served model's hyperparameters are stored in the
/// tuning-results document.
const EXTRATREES_KEY: &str = "ExtraTrees";

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/model/info", get(model_info))
        .route("/api/model/params", get(all_params))
        .route("/api/model/params/extratrees", get(extratrees_params))
        .route("/api/model/feature-importances", get(feature_importances))
        .route("/api/predict", post(predict))
        .with_state(state)
}

/// Successful prediction response
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PredictResponse {
    /// One output per input row, in row order
    pub predictions: Vec<f64>,
    /// Number of rows in the submitted matrix
    pub n_samples: usize,
    /// Feature width actually used
    pub features_used: usize,
}

/// Service health report; always returned with status 200
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub params_loaded: bool,
}

/// Read-only projection of model metadata
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub n_estimators: u32,
    pub n_features: usize,
    pub n_outputs: Option<u32>,
    pub max_depth: Option<u32>,
    pub min_samples_split: Number,
    pub min_samples_leaf: Number,
}

/// One feature's importance, in original index order
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeatureImportance {
    pub feature_index: usize,
    pub importance: f64,
    pub percentage: f64,
}

/// One feature's importance with its descending-sort rank
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedImportance {
    pub rank: usize,
    pub feature_index: usize,
    pub importance: f64,
    pub percentage: f64,
}

/// Three parallel views of the importance vector
#[derive(Debug, Clone, Serialize)]
pub struct ImportanceReport {
    pub raw_array: Vec<f64>,
    pub features: Vec<FeatureImportance>,
    pub sorted_by_importance: Vec<RankedImportance>,
    pub total_sum: f64,
}

/// `GET /` — directory of available endpoints
async fn index() -> Json<Value> {
    Json(json!({
        "message": "ExtraTrees Model API",
        "endpoints": {
            "/api/health": "GET - Service health",
            "/api/model/info": "GET - Model metadata",
            "/api/model/params": "GET - All hyperparameters",
            "/api/model/params/extratrees": "GET - ExtraTrees hyperparameters",
            "/api/model/feature-importances": "GET - Feature importances",
            "/api/predict": "POST - Predict (requires features)"
        }
    }))
}

/// `GET /api/health` — 200 regardless of load state; the flags carry the
/// degradation signal
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_loaded: state.model_loaded(),
        params_loaded: state.params_loaded(),
    })
}

/// `GET /api/model/info`
async fn model_info(State(state): State<AppState>) -> Result<Json<ModelInfo>, ApiError> {
    let model = state.model()?;

    Ok(Json(ModelInfo {
        model_type: model.model_type().to_string(),
        n_estimators: model.estimator_count(),
        n_features: model.feature_count(),
        n_outputs: model.output_count(),
        max_depth: model.max_depth(),
        min_samples_split: model.min_samples_split().clone(),
        min_samples_leaf: model.min_samples_leaf().clone(),
    }))
}

/// `GET /api/model/params` — the entire hyperparameter document
async fn all_params(
    State(state): State<AppState>,
) -> Result<Json<crate::models::HyperparameterSet>, ApiError> {
    Ok(Json(state.params()?.clone()))
}

/// `GET /api/model/params/extratrees` — `{}` when the key is absent
async fn extratrees_params(
    State(state): State<AppState>,
) -> Result<Json<HashMap<String, Value>>, ApiError> {
    let params = state.params()?;
    Ok(Json(params.for_model(EXTRATREES_KEY)))
}

/// `GET /api/model/feature-importances`
async fn feature_importances(
    State(state): State<AppState>,
) -> Result<Json<ImportanceReport>, ApiError> {
    let model = state.model()?;
    let importances = model
        .feature_importances()
        .ok_or(ApiError::UnsupportedModel)?;

    Ok(Json(importance_report(importances)))
}

/// `POST /api/predict`
///
/// Availability is checked before validation; validation failures are 400s,
/// predict-time failures are 500s with the underlying message.
async fn predict(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<PredictResponse>, ApiError> {
    let model = state.model()?;

    let matrix = validate::feature_matrix(&body, model.feature_count())?;

    let predictions = model.predict(&matrix).map_err(|e| {
        error!(error = %e, n_samples = matrix.n_rows(), "Prediction failed");
        e
    })?;

    debug!(
        n_samples = matrix.n_rows(),
        features_used = matrix.width(),
        "Prediction served"
    );

    Ok(Json(PredictResponse {
        predictions,
        n_samples: matrix.n_rows(),
        features_used: matrix.width(),
    }))
}

/// Build the three parallel importance views.
///
/// The descending sort is stable, so features with equal importance keep
/// their original relative order; ranks are 1-based sort positions.
fn importance_report(importances: &[f64]) -> ImportanceReport {
    let features: Vec<FeatureImportance> = importances
        .iter()
        .enumerate()
        .map(|(feature_index, &importance)| FeatureImportance {
            feature_index,
            importance,
            percentage: importance * 100.0,
        })
        .collect();

    let mut sorted = features.clone();
    sorted.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let sorted_by_importance: Vec<RankedImportance> = sorted
        .into_iter()
        .enumerate()
        .map(|(position, entry)| RankedImportance {
            rank: position + 1,
            feature_index: entry.feature_index,
            importance: entry.importance,
            percentage: entry.percentage,
        })
        .collect();

    ImportanceReport {
        raw_array: importances.to_vec(),
        features,
        sorted_by_importance,
        total_sum: importances.iter().sum(),
    }
}
