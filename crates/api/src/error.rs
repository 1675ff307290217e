//! API Error Responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use data_validator::ValidationError;
use feature_engine::FeatureError;
use inference_engine::InferenceError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Errors surfaced by request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl ApiError {
    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::MalformedBody(_) => "malformed_body",
            ApiError::Validation(_) => "validation_error",
            ApiError::Inference(err) => match err {
                InferenceError::Feature(FeatureError::Validation(_)) => "validation_error",
                InferenceError::Feature(_) | InferenceError::InvalidInputShape { .. } => {
                    "schema_mismatch"
                }
                InferenceError::ModelUnavailable(_) => "model_unavailable",
                InferenceError::InferenceFailed(_) => "inference_failed",
            },
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self.kind() {
            "malformed_body" | "validation_error" => StatusCode::BAD_REQUEST,
            "model_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Prediction failed: {}", self);
        } else {
            warn!("Rejected request: {}", self);
        }

        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let missing: ApiError =
            InferenceError::from(FeatureError::from(ValidationError::MissingField("tenure"))).into();
        assert_eq!(missing.kind(), "validation_error");
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let mismatch: ApiError = InferenceError::from(FeatureError::SchemaMismatch {
            expected: 30,
            actual: 29,
        })
        .into();
        assert_eq!(mismatch.kind(), "schema_mismatch");
        assert_eq!(mismatch.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let shape: ApiError = InferenceError::InvalidInputShape {
            expected: 30,
            actual: 3,
        }
        .into();
        assert_eq!(shape.kind(), "schema_mismatch");

        let unavailable: ApiError = InferenceError::ModelUnavailable("gone".into()).into();
        assert_eq!(unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = ApiError::MalformedBody("EOF".into());
        assert_eq!(body.status(), StatusCode::BAD_REQUEST);
    }
}
