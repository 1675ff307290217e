//! Training-Time Feature Schema

use crate::FeatureError;
use std::collections::HashMap;
use tracing::info;

/// Two-valued fields mapped "Yes"/"No" to 1/0 before expansion
pub const BINARY_FIELDS: [&str; 4] = ["Partner", "Dependents", "PhoneService", "PaperlessBilling"];

/// String fields expanded into `{field}_{value}` indicator columns
pub const CATEGORICAL_FIELDS: [&str; 11] = [
    "gender",
    "MultipleLines",
    "InternetService",
    "OnlineSecurity",
    "OnlineBackup",
    "DeviceProtection",
    "TechSupport",
    "StreamingTV",
    "StreamingMovies",
    "Contract",
    "PaymentMethod",
];

/// The only columns the fitted scaler touches, in scaler order
pub const NUMERIC_COLUMNS: [&str; 3] = ["tenure", "MonthlyCharges", "TotalCharges"];

/// Ordered column set fixed when the model was trained
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    numeric_positions: [usize; 3],
}

impl FeatureSchema {
    /// Build a schema, rejecting empty, duplicated or numeric-less column lists
    pub fn new(columns: Vec<String>) -> Result<Self, FeatureError> {
        if columns.is_empty() {
            return Err(FeatureError::InvalidSchema("no columns".to_string()));
        }

        let mut index = HashMap::with_capacity(columns.len());
        for (position, column) in columns.iter().enumerate() {
            if index.insert(column.clone(), position).is_some() {
                return Err(FeatureError::InvalidSchema(format!(
                    "duplicate column {:?}",
                    column
                )));
            }
        }

        let mut numeric_positions = [0usize; 3];
        for (slot, name) in numeric_positions.iter_mut().zip(NUMERIC_COLUMNS) {
            *slot = *index.get(name).ok_or_else(|| {
                FeatureError::InvalidSchema(format!("missing numeric column {:?}", name))
            })?;
        }

        Ok(Self {
            columns,
            index,
            numeric_positions,
        })
    }

    /// Parse a schema from its JSON artifact (an array of column names)
    pub fn from_json(json: &str) -> Result<Self, FeatureError> {
        let columns: Vec<String> = serde_json::from_str(json)
            .map_err(|e| FeatureError::InvalidSchema(format!("columns artifact: {}", e)))?;
        let schema = Self::new(columns)?;
        info!("Loaded feature schema with {} columns", schema.len());
        Ok(schema)
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false for a constructed schema
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column, if the model knows it
    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    /// Positions of `NUMERIC_COLUMNS` within the row
    pub fn numeric_positions(&self) -> [usize; 3] {
        self.numeric_positions
    }
}
