//! Churn Inference Engine
//!
//! Holds the artifacts loaded at startup (feature schema, fitted scaler,
//! fitted classifier) and turns customer records into churn predictions.

mod engine;
mod model;

pub use engine::{
    ArtifactPaths, ChurnLabel, ChurnPrediction, InferenceEngine, InferenceResult,
};
pub use model::{Classifier, LogisticModel};

use feature_engine::FeatureError;
use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
}
