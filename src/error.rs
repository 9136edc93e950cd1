//! Error taxonomy for the HTTP surface
//!
//! Every failure a handler can produce maps to one of these variants; the
//! `IntoResponse` impl fixes the status code and JSON body per variant, so
//! handlers just return `Result<Json<T>, ApiError>`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Worked example payload returned alongside a missing-field error.
pub const EXAMPLE_FEATURES: [f64; 9] = [1.2, 3.4, 0.7, 2.1, 5.0, 1.8, 2.3, 4.5, 3.2];

/// Failures surfaced to API clients
#[derive(Debug, Error)]
pub enum ApiError {
    /// Model artifact was not loaded at startup
    #[error("Model not loaded")]
    ModelUnavailable,

    /// Hyperparameter artifact was not loaded at startup
    #[error("Parameters not loaded")]
    ParamsUnavailable,

    /// Request body has no `features` key
    #[error("Missing 'features' in request body")]
    MissingFeatures,

    /// A row's width disagrees with the model's feature count
    #[error("Expected {expected} features, got {received}")]
    ShapeMismatch { expected: usize, received: usize },

    /// Introspection requested for a capability the model does not expose
    #[error("Model doesn't have feature importances")]
    UnsupportedModel,

    /// Malformed numeric data or an unexpected prediction failure; the
    /// underlying message is passed through verbatim
    #[error("{0}")]
    InvalidInput(String),
}

impl ApiError {
    /// HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ModelUnavailable
            | ApiError::ParamsUnavailable
            | ApiError::InvalidInput(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MissingFeatures
            | ApiError::ShapeMismatch { .. }
            | ApiError::UnsupportedModel => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::MissingFeatures => json!({
                "error": self.to_string(),
                "example": { "features": EXAMPLE_FEATURES },
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::ModelUnavailable.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::ParamsUnavailable.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::MissingFeatures.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::ShapeMismatch {
                expected: 9,
                received: 3
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::UnsupportedModel.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidInput("boom".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_shape_mismatch_message_carries_both_widths() {
        let err = ApiError::ShapeMismatch {
            expected: 9,
            received: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains('9'));
        assert!(msg.contains('3'));
        assert_eq!(msg, "Expected 9 features, got 3");
    }

    #[test]
    fn test_invalid_input_passes_message_through() {
        let err = ApiError::InvalidInput("could not convert \"abc\" to a number".to_string());
        assert_eq!(err.to_string(), "could not convert \"abc\" to a number");
    }

    #[test]
    fn test_anyhow_errors_become_invalid_input() {
        let err: ApiError = anyhow::anyhow!("incompatible model state").into();
        match err {
            ApiError::InvalidInput(msg) => assert_eq!(msg, "incompatible model state"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    async fn response_body(err: ApiError) -> serde_json::Value {
        let response = err.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_features_body_carries_example() {
        let response = ApiError::MissingFeatures.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_body(ApiError::MissingFeatures).await;
        assert_eq!(body["error"], "Missing 'features' in request body");

        let example = body["example"]["features"].as_array().unwrap();
        assert_eq!(example.len(), EXAMPLE_FEATURES.len());
        assert_eq!(example[0].as_f64(), Some(1.2));
        assert_eq!(example[8].as_f64(), Some(3.2));
    }

    #[tokio::test]
    async fn test_other_error_bodies_have_no_example() {
        let body = response_body(ApiError::ShapeMismatch {
            expected: 9,
            received: 3,
        })
        .await;

        assert_eq!(body["error"], "Expected 9 features, got 3");
        assert!(body.get("example").is_none());
    }
}
