//! Request validation for the predict endpoint
//!
//! Normalizes an arbitrary JSON body into a rectangular numeric feature
//! matrix, or rejects it with a precise reason. Pure transformation, no side
//! effects; the width invariant enforced here is what lets the dispatcher
//! hand the matrix to the model without further checks.

use crate::error::ApiError;
use serde_json::Value;

/// Rectangular feature matrix of `n_rows` samples by `width` features.
///
/// Stored flat in row-major order, matching the layout the ONNX input
/// tensor expects.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    data: Vec<f32>,
    n_rows: usize,
    width: usize,
}

impl FeatureMatrix {
    /// Number of samples (rows)
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of features per sample
    pub fn width(&self) -> usize {
        self.width
    }

    /// Flat row-major data
    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

/// Build a feature matrix from a request body.
///
/// Accepts `features` as either a flat array of numbers (one sample) or an
/// array of arrays (one sample per inner array). Every row must have exactly
/// `expected_width` entries.
pub fn feature_matrix(body: &Value, expected_width: usize) -> Result<FeatureMatrix, ApiError> {
    let features = body
        .as_object()
        .and_then(|map| map.get("features"))
        .ok_or(ApiError::MissingFeatures)?;

    let items = features.as_array().ok_or_else(|| {
        ApiError::InvalidInput(format!(
            "'features' must be an array of numbers or an array of rows, got {}",
            type_name(features)
        ))
    })?;

    // An array of arrays is a multi-sample request; anything else (including
    // an empty array) is treated as a single flat row.
    let nested = !items.is_empty() && items.iter().all(Value::is_array);

    let mut data = Vec::new();
    let n_rows;

    if nested {
        n_rows = items.len();
        data.reserve(n_rows * expected_width);
        for (row_index, row) in items.iter().enumerate() {
            let row = row.as_array().ok_or_else(|| {
                ApiError::InvalidInput(format!("row {row_index} is not an array"))
            })?;
            push_row(&mut data, row, row_index, expected_width)?;
        }
    } else {
        n_rows = 1;
        push_row(&mut data, items, 0, expected_width)?;
    }

    Ok(FeatureMatrix {
        data,
        n_rows,
        width: expected_width,
    })
}

/// Width-check one row, then convert its entries.
fn push_row(
    data: &mut Vec<f32>,
    row: &[Value],
    row_index: usize,
    expected_width: usize,
) -> Result<(), ApiError> {
    if row.len() != expected_width {
        return Err(ApiError::ShapeMismatch {
            expected: expected_width,
            received: row.len(),
        });
    }

    for (col_index, value) in row.iter().enumerate() {
        let number = value.as_f64().ok_or_else(|| {
            ApiError::InvalidInput(format!(
                "could not convert {value} (row {row_index}, column {col_index}) to a number"
            ))
        })?;
        data.push(number as f32);
    }

    Ok(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_array_becomes_single_row() {
        let body = json!({ "features": [1.0, 2.0, 3.0] });
        let matrix = feature_matrix(&body, 3).unwrap();
        assert_eq!(matrix.n_rows(), 1);
        assert_eq!(matrix.width(), 3);
        assert_eq!(matrix.data(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_nested_arrays_become_rows_in_order() {
        let body = json!({ "features": [[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]] });
        let matrix = feature_matrix(&body, 2).unwrap();
        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.width(), 2);
        assert_eq!(matrix.data(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_missing_features_key() {
        let body = json!({ "inputs": [1.0, 2.0] });
        let err = feature_matrix(&body, 2).unwrap_err();
        assert!(matches!(err, ApiError::MissingFeatures));
    }

    #[test]
    fn test_non_object_body_reported_as_missing_features() {
        let body = json!([1.0, 2.0, 3.0]);
        let err = feature_matrix(&body, 3).unwrap_err();
        assert!(matches!(err, ApiError::MissingFeatures));
    }

    #[test]
    fn test_flat_width_mismatch() {
        let body = json!({ "features": [1.2, 3.4, 0.7] });
        let err = feature_matrix(&body, 9).unwrap_err();
        assert!(matches!(
            err,
            ApiError::ShapeMismatch {
                expected: 9,
                received: 3
            }
        ));
    }

    #[test]
    fn test_nested_width_mismatch_on_any_row() {
        let body = json!({ "features": [[1.0, 2.0, 3.0], [1.0, 2.0]] });
        let err = feature_matrix(&body, 3).unwrap_err();
        assert!(matches!(
            err,
            ApiError::ShapeMismatch {
                expected: 3,
                received: 2
            }
        ));
    }

    #[test]
    fn test_empty_features_is_a_zero_width_row() {
        let body = json!({ "features": [] });
        let err = feature_matrix(&body, 9).unwrap_err();
        assert!(matches!(
            err,
            ApiError::ShapeMismatch {
                expected: 9,
                received: 0
            }
        ));
    }

    #[test]
    fn test_non_numeric_entry() {
        let body = json!({ "features": [1.0, "abc", 3.0] });
        let err = feature_matrix(&body, 3).unwrap_err();
        match err {
            ApiError::InvalidInput(msg) => {
                assert!(msg.contains("abc"));
                assert!(msg.contains("column 1"));
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_null_entry_in_nested_row() {
        let body = json!({ "features": [[1.0, 2.0], [null, 4.0]] });
        let err = feature_matrix(&body, 2).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_features_not_an_array() {
        let body = json!({ "features": "1,2,3" });
        let err = feature_matrix(&body, 3).unwrap_err();
        match err {
            ApiError::InvalidInput(msg) => assert!(msg.contains("a string")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_mixed_scalars_and_rows_rejected() {
        // A scalar mixed in with rows falls into the flat branch and fails
        // numeric conversion on the array element.
        let body = json!({ "features": [[1.0, 2.0], 3.0] });
        let err = feature_matrix(&body, 2).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_integers_accepted_as_numbers() {
        let body = json!({ "features": [1, 2, 3] });
        let matrix = feature_matrix(&body, 3).unwrap();
        assert_eq!(matrix.data(), &[1.0, 2.0, 3.0]);
    }
}
