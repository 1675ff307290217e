//! Fitted Numeric Scaling

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Normalization method with its fitted parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum NormalizationMethod {
    /// Z-score normalization: `(x - mean) / scale`
    ZScore { mean: Vec<f64>, scale: Vec<f64> },
    /// Min-max normalization to [0, 1] over the fitted range
    MinMax { data_min: Vec<f64>, data_max: Vec<f64> },
    /// No normalization
    None,
}

impl NormalizationMethod {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizationMethod::ZScore { .. } => "z_score",
            NormalizationMethod::MinMax { .. } => "min_max",
            NormalizationMethod::None => "none",
        }
    }
}

/// A fitted transform over a fixed, ordered set of numeric columns
pub trait Scaler: Send + Sync {
    /// Columns the scaler was fitted on, in order
    fn columns(&self) -> &[String];

    /// Transform one row of numeric values (same order as `columns`)
    fn transform(&self, values: &[f64]) -> Result<Vec<f64>, ValidationError>;
}

/// Serialized form of a fitted scaler
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NormalizerArtifact {
    columns: Vec<String>,
    #[serde(flatten)]
    method: NormalizationMethod,
}

/// Scaler with parameters fitted at training time
#[derive(Debug, Clone)]
pub struct Normalizer {
    columns: Vec<String>,
    method: NormalizationMethod,
}

impl Normalizer {
    /// Create a normalizer, checking parameter widths against `columns`
    pub fn new(columns: Vec<String>, method: NormalizationMethod) -> Result<Self, ValidationError> {
        let expected = columns.len();
        let widths = match &method {
            NormalizationMethod::ZScore { mean, scale } => vec![mean.len(), scale.len()],
            NormalizationMethod::MinMax { data_min, data_max } => vec![data_min.len(), data_max.len()],
            NormalizationMethod::None => Vec::new(),
        };
        if let Some(&actual) = widths.iter().find(|&&w| w != expected) {
            return Err(ValidationError::DimensionMismatch { expected, actual });
        }

        let params_finite = match &method {
            NormalizationMethod::ZScore { mean, scale } => {
                mean.iter().chain(scale).all(|v| v.is_finite())
            }
            NormalizationMethod::MinMax { data_min, data_max } => {
                data_min.iter().chain(data_max).all(|v| v.is_finite())
            }
            NormalizationMethod::None => true,
        };
        if !params_finite {
            return Err(ValidationError::InvalidFormat(
                "scaler parameters must be finite".to_string(),
            ));
        }

        Ok(Self { columns, method })
    }

    /// Identity scaler over the given columns
    pub fn identity(columns: Vec<String>) -> Self {
        Self {
            columns,
            method: NormalizationMethod::None,
        }
    }

    /// Parse a fitted scaler from its JSON artifact
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let artifact: NormalizerArtifact = serde_json::from_str(json)
            .map_err(|e| ValidationError::InvalidFormat(format!("scaler artifact: {}", e)))?;
        let normalizer = Self::new(artifact.columns, artifact.method)?;
        info!(
            "Loaded {} scaler over {:?}",
            normalizer.method.as_str(),
            normalizer.columns
        );
        Ok(normalizer)
    }

    /// Get the normalization method
    pub fn method(&self) -> &NormalizationMethod {
        &self.method
    }
}

/// Zero-width scales collapse to 1 so constant features pass through centred
fn non_zero(scale: f64) -> f64 {
    if scale == 0.0 {
        1.0
    } else {
        scale
    }
}

impl Scaler for Normalizer {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn transform(&self, values: &[f64]) -> Result<Vec<f64>, ValidationError> {
        if values.len() != self.columns.len() {
            return Err(ValidationError::DimensionMismatch {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }

        let scaled = match &self.method {
            NormalizationMethod::ZScore { mean, scale } => values
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / non_zero(*s))
                .collect(),
            NormalizationMethod::MinMax { data_min, data_max } => values
                .iter()
                .zip(data_min.iter().zip(data_max))
                .map(|(x, (lo, hi))| (x - lo) / non_zero(hi - lo))
                .collect(),
            NormalizationMethod::None => values.to_vec(),
        };

        Ok(scaled)
    }
}
