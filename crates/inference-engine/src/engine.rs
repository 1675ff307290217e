//! Inference Engine Implementation

use crate::model::{Classifier, LogisticModel};
use crate::InferenceError;
use data_validator::{Normalizer, Scaler, Validator};
use feature_engine::{AlignedVector, CustomerRecord, FeatureAligner, FeatureSchema};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome predicted by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChurnLabel {
    /// Customer expected to stay
    Retained,
    /// Customer expected to leave
    Churn,
}

impl ChurnLabel {
    /// Numeric label as emitted by the model
    pub fn as_u8(&self) -> u8 {
        match self {
            ChurnLabel::Retained => 0,
            ChurnLabel::Churn => 1,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ChurnLabel::Retained => "retained",
            ChurnLabel::Churn => "churn",
        }
    }

    /// Get recommended action
    pub fn recommended_action(&self) -> &'static str {
        match self {
            ChurnLabel::Retained => {
                "Low churn risk. Recommend maintaining current engagement strategies."
            }
            ChurnLabel::Churn => {
                "High risk of churn. Suggest offering a personalised retention plan."
            }
        }
    }
}

/// Prediction returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnPrediction {
    /// 1 if the customer is predicted to churn
    #[serde(rename = "PredictedChurn")]
    pub predicted_churn: u8,
    /// Probability of churn, rounded to 2 decimals
    #[serde(rename = "ChurnProbability")]
    pub churn_probability: f64,
    #[serde(rename = "SuggestedAction")]
    pub suggested_action: String,
}

impl ChurnPrediction {
    /// Build the caller-facing prediction from a label and raw probability
    pub fn new(label: ChurnLabel, churn_probability: f64) -> Self {
        Self {
            predicted_churn: label.as_u8(),
            churn_probability: round2(churn_probability),
            suggested_action: label.recommended_action().to_string(),
        }
    }
}

/// Two decimals, exact halves to even
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Result of inference operation
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// The prediction
    pub prediction: ChurnPrediction,
    /// Predicted label
    pub label: ChurnLabel,
    /// Inference latency in milliseconds
    pub latency_ms: u64,
}

fn default_columns_path() -> PathBuf {
    PathBuf::from("artifacts/columns.json")
}

fn default_scaler_path() -> PathBuf {
    PathBuf::from("artifacts/scaler.json")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("artifacts/model.json")
}

/// Locations of the artifacts produced at training time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    /// Ordered feature column names
    #[serde(default = "default_columns_path")]
    pub columns: PathBuf,
    /// Fitted numeric scaler
    #[serde(default = "default_scaler_path")]
    pub scaler: PathBuf,
    /// Fitted classifier
    #[serde(default = "default_model_path")]
    pub model: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            columns: default_columns_path(),
            scaler: default_scaler_path(),
            model: default_model_path(),
        }
    }
}

impl ArtifactPaths {
    /// All three artifacts under one directory with their default file names
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            columns: dir.join("columns.json"),
            scaler: dir.join("scaler.json"),
            model: dir.join("model.json"),
        }
    }
}

fn read_artifact(path: &Path) -> Result<String, InferenceError> {
    std::fs::read_to_string(path).map_err(|e| {
        InferenceError::ModelUnavailable(format!("cannot read {}: {}", path.display(), e))
    })
}

/// Immutable prediction context built once at startup
#[derive(Clone)]
pub struct InferenceEngine {
    aligner: FeatureAligner,
    model: Arc<dyn Classifier>,
}

impl InferenceEngine {
    /// Load schema, scaler and model from disk
    pub fn load(paths: &ArtifactPaths) -> Result<Self, InferenceError> {
        info!("Loading churn model artifacts: {:?}", paths);

        let schema = FeatureSchema::from_json(&read_artifact(&paths.columns)?)
            .map_err(|e| InferenceError::ModelUnavailable(e.to_string()))?;
        let scaler = Normalizer::from_json(&read_artifact(&paths.scaler)?)
            .map_err(|e| InferenceError::ModelUnavailable(e.to_string()))?;
        let model = LogisticModel::from_json(&read_artifact(&paths.model)?)?;

        Self::from_parts(schema, Arc::new(scaler), Arc::new(model))
    }

    /// Assemble an engine from already-loaded parts
    pub fn from_parts(
        schema: FeatureSchema,
        scaler: Arc<dyn Scaler>,
        model: Arc<dyn Classifier>,
    ) -> Result<Self, InferenceError> {
        if model.n_features() != schema.len() {
            return Err(InferenceError::ModelUnavailable(format!(
                "model expects {} features, schema has {} columns",
                model.n_features(),
                schema.len()
            )));
        }

        let aligner = FeatureAligner::new(Arc::new(schema), scaler)
            .map_err(|e| InferenceError::ModelUnavailable(e.to_string()))?;

        info!(
            "Inference engine ready with {} feature columns",
            aligner.schema().len()
        );
        Ok(Self { aligner, model })
    }

    /// Replace the numeric range checks applied before alignment
    pub fn with_validator(mut self, validator: Validator) -> Self {
        info!("Numeric field ranges: {:?}", validator.config());
        self.aligner = self.aligner.with_validator(validator);
        self
    }

    /// Align a record without scoring it
    pub fn align(&self, record: &CustomerRecord) -> Result<AlignedVector, InferenceError> {
        Ok(self.aligner.align(record)?)
    }

    /// Align and score one record
    pub fn predict(&self, record: &CustomerRecord) -> Result<InferenceResult, InferenceError> {
        let start = std::time::Instant::now();

        let features = self.align(record)?;
        let label = self.model.predict(&features)?;
        let [_, churn] = self.model.predict_proba(&features)?;
        let prediction = ChurnPrediction::new(label, churn);

        let latency_ms = start.elapsed().as_millis() as u64;
        debug!(
            "Prediction: {} (p={:.2}, latency={}ms)",
            label.as_str(),
            prediction.churn_probability,
            latency_ms
        );

        Ok(InferenceResult {
            prediction,
            label,
            latency_ms,
        })
    }

    /// Get the feature schema
    pub fn schema(&self) -> &FeatureSchema {
        self.aligner.schema()
    }
}
