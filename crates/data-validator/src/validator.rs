//! Field Validator for Customer Records

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Accepted `[min, max]` range for each required numeric field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Tenure valid range (months)
    pub tenure_range: (f64, f64),
    /// Monthly charges valid range
    pub monthly_charges_range: (f64, f64),
    /// Total charges valid range
    pub total_charges_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            tenure_range: (0.0, 1_200.0),
            monthly_charges_range: (0.0, 10_000.0),
            total_charges_range: (0.0, 1_000_000.0),
        }
    }
}

/// Validator for the raw fields of a customer record
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Map a two-valued "Yes"/"No" field to 1/0
    pub fn validate_binary(&self, field: &'static str, value: &str) -> Result<u8, ValidationError> {
        match value {
            "Yes" => Ok(1),
            "No" => Ok(0),
            other => {
                debug!("Rejected {} value {:?}", field, other);
                Err(ValidationError::InvalidValue {
                    field,
                    value: other.to_string(),
                    expected: "\"Yes\" or \"No\"",
                })
            }
        }
    }

    /// Validate a 0/1 indicator field
    pub fn validate_flag(&self, field: &'static str, value: u8) -> Result<u8, ValidationError> {
        if value <= 1 {
            Ok(value)
        } else {
            Err(ValidationError::InvalidValue {
                field,
                value: value.to_string(),
                expected: "0 or 1",
            })
        }
    }

    /// Require a numeric field to be present, finite and in range
    pub fn require_numeric(
        &self,
        field: &'static str,
        value: Option<f64>,
        range: (f64, f64),
    ) -> Result<f64, ValidationError> {
        let value = value.ok_or(ValidationError::MissingField(field))?;
        if !value.is_finite() {
            return Err(ValidationError::NonFinite(field));
        }
        self.validate_range(field, value, range)?;
        Ok(value)
    }

    /// Validate tenure
    pub fn validate_tenure(&self, tenure: Option<f64>) -> Result<f64, ValidationError> {
        self.require_numeric("tenure", tenure, self.config.tenure_range)
    }

    /// Validate monthly charges
    pub fn validate_monthly_charges(&self, charges: Option<f64>) -> Result<f64, ValidationError> {
        self.require_numeric("MonthlyCharges", charges, self.config.monthly_charges_range)
    }

    /// Validate total charges
    pub fn validate_total_charges(&self, charges: Option<f64>) -> Result<f64, ValidationError> {
        self.require_numeric("TotalCharges", charges, self.config.total_charges_range)
    }

    /// Get the active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
