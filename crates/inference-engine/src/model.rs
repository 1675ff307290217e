//! Fitted Churn Classifiers

use crate::engine::ChurnLabel;
use crate::InferenceError;
use feature_engine::AlignedVector;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A fitted binary classifier over aligned feature vectors
pub trait Classifier: Send + Sync {
    /// Number of input columns the model was fitted on
    fn n_features(&self) -> usize;

    /// Class probabilities `[p(no churn), p(churn)]`
    fn predict_proba(&self, features: &AlignedVector) -> Result<[f64; 2], InferenceError>;

    /// Decision threshold on `p(churn)`
    fn threshold(&self) -> f64 {
        0.5
    }

    /// Predicted label
    fn predict(&self, features: &AlignedVector) -> Result<ChurnLabel, InferenceError> {
        let [_, churn] = self.predict_proba(features)?;
        Ok(if churn > self.threshold() {
            ChurnLabel::Churn
        } else {
            ChurnLabel::Retained
        })
    }
}

fn default_threshold() -> f64 {
    0.5
}

/// Logistic regression exported as coefficients and intercept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    /// One weight per schema column, in schema order
    pub coefficients: Vec<f64>,
    /// Bias term
    pub intercept: f64,
    /// Decision threshold on `p(churn)`
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticModel {
    /// Create a model with the default 0.5 threshold
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
            threshold: default_threshold(),
        }
    }

    /// Parse a fitted model from its JSON artifact
    pub fn from_json(json: &str) -> Result<Self, InferenceError> {
        let model: Self = serde_json::from_str(json)
            .map_err(|e| InferenceError::ModelUnavailable(format!("model artifact: {}", e)))?;

        let finite = model.intercept.is_finite()
            && model.coefficients.iter().all(|w| w.is_finite());
        if !finite {
            return Err(InferenceError::ModelUnavailable(
                "model parameters must be finite".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&model.threshold) {
            return Err(InferenceError::ModelUnavailable(format!(
                "threshold {} outside [0, 1]",
                model.threshold
            )));
        }

        info!(
            "Loaded logistic model: {} coefficients, threshold {}",
            model.coefficients.len(),
            model.threshold
        );
        Ok(model)
    }

    /// Raw decision value `w·x + b`
    pub fn decision_function(&self, features: &AlignedVector) -> Result<f64, InferenceError> {
        if features.len() != self.coefficients.len() {
            return Err(InferenceError::InvalidInputShape {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }

        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features.values())
            .map(|(w, x)| w * x)
            .sum();
        Ok(dot + self.intercept)
    }
}

impl Classifier for LogisticModel {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_proba(&self, features: &AlignedVector) -> Result<[f64; 2], InferenceError> {
        let z = self.decision_function(features)?;
        let churn = 1.0 / (1.0 + (-z).exp());
        if !churn.is_finite() {
            return Err(InferenceError::InferenceFailed(format!(
                "non-finite probability for decision value {}",
                z
            )));
        }
        Ok([1.0 - churn, churn])
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }
}
