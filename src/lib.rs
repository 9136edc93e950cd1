//! ExtraTrees Model API Library
//!
//! Serves predictions from a pre-trained ExtraTrees model over a small REST
//! surface, with read-only introspection of hyperparameters and feature
//! importances.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod validate;

pub use api::router;
pub use config::AppConfig;
pub use error::ApiError;
pub use models::{HyperparameterSet, ModelLoader, OnnxExtraTrees, PredictiveModel};
pub use state::AppState;
pub use validate::FeatureMatrix;
