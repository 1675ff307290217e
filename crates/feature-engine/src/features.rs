//! Feature Vector Alignment

use crate::record::CustomerRecord;
use crate::schema::{FeatureSchema, NUMERIC_COLUMNS};
use crate::FeatureError;
use data_validator::{Scaler, ValidationError, Validator};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A single cell of a record after binary mapping
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Already numeric, passes through expansion untouched
    Number(f64),
    /// Categorical value, expanded into an indicator column
    Text(String),
}

/// Output of stage 1: present fields in wire order
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRow {
    cells: Vec<(&'static str, Cell)>,
}

impl EncodedRow {
    /// Look up a cell by field name
    pub fn get(&self, field: &str) -> Option<&Cell> {
        self.cells.iter().find(|(name, _)| *name == field).map(|(_, cell)| cell)
    }

    /// Iterate over the cells in field order
    pub fn cells(&self) -> impl Iterator<Item = (&'static str, &Cell)> {
        self.cells.iter().map(|(name, cell)| (*name, cell))
    }
}

/// Output of stage 2: every column the record expressed, all numeric
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpandedRow {
    values: HashMap<String, f64>,
}

impl ExpandedRow {
    /// Value of an expanded column
    pub fn get(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }

    /// Number of expanded columns
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was expressed
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Model-ready row in schema column order
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedVector {
    schema: Arc<FeatureSchema>,
    values: Vec<f64>,
}

impl AlignedVector {
    /// Value for a named column
    pub fn get(&self, column: &str) -> Option<f64> {
        self.schema.position(column).map(|i| self.values[i])
    }

    /// Raw values in schema order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        self.schema.columns()
    }

    /// Row width
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no columns
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Stateless transform from `CustomerRecord` to `AlignedVector`
#[derive(Clone)]
pub struct FeatureAligner {
    schema: Arc<FeatureSchema>,
    scaler: Arc<dyn Scaler>,
    validator: Validator,
}

impl FeatureAligner {
    /// Create an aligner over a loaded schema and fitted scaler
    pub fn new(schema: Arc<FeatureSchema>, scaler: Arc<dyn Scaler>) -> Result<Self, FeatureError> {
        if scaler.columns().iter().map(String::as_str).ne(NUMERIC_COLUMNS) {
            return Err(FeatureError::InvalidSchema(format!(
                "scaler fitted on {:?}, expected {:?}",
                scaler.columns(),
                NUMERIC_COLUMNS
            )));
        }

        Ok(Self {
            schema,
            scaler,
            validator: Validator::default(),
        })
    }

    /// Replace the field validator
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Get the schema
    pub fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    /// Run all four stages
    pub fn align(&self, record: &CustomerRecord) -> Result<AlignedVector, FeatureError> {
        let encoded = self.map_binary(record)?;
        let expanded = self.expand(&encoded);
        let aligned = self.reindex(&expanded);
        let scaled = self.scale(aligned)?;
        debug!(
            "Aligned record: {} cells -> {} expanded -> {} columns",
            encoded.cells.len(),
            expanded.len(),
            scaled.len()
        );
        Ok(scaled)
    }

    /// Stage 1: map binary fields to 1/0 and validate numeric fields
    pub fn map_binary(&self, record: &CustomerRecord) -> Result<EncodedRow, FeatureError> {
        let tenure = self.validator.validate_tenure(record.tenure)?;
        let monthly = self.validator.validate_monthly_charges(record.monthly_charges)?;
        let total = self.validator.validate_total_charges(record.total_charges)?;

        let mut cells = Vec::with_capacity(19);

        if let Some(flag) = record.senior_citizen {
            let flag = self.validator.validate_flag("SeniorCitizen", flag)?;
            cells.push(("SeniorCitizen", Cell::Number(f64::from(flag))));
        }

        for (field, value) in record.binary_fields() {
            if let Some(value) = value {
                let bit = self.validator.validate_binary(field, value)?;
                cells.push((field, Cell::Number(f64::from(bit))));
            }
        }

        cells.push(("tenure", Cell::Number(tenure)));
        cells.push(("MonthlyCharges", Cell::Number(monthly)));
        cells.push(("TotalCharges", Cell::Number(total)));

        for (field, value) in record.categorical_fields() {
            if let Some(value) = value {
                cells.push((field, Cell::Text(value.to_string())));
            }
        }

        Ok(EncodedRow { cells })
    }

    /// Stage 2: expand text cells into `{field}_{value}` indicators.
    ///
    /// The reference category of each field has no column in the training
    /// schema, so an indicator for it is dropped at stage 3.
    pub fn expand(&self, row: &EncodedRow) -> ExpandedRow {
        let values = row
            .cells
            .iter()
            .map(|(field, cell)| match cell {
                Cell::Number(value) => (field.to_string(), *value),
                Cell::Text(category) => (format!("{}_{}", field, category), 1.0),
            })
            .collect();

        ExpandedRow { values }
    }

    /// Stage 3: reindex onto the schema, filling absent columns with 0
    pub fn reindex(&self, expanded: &ExpandedRow) -> AlignedVector {
        let values: Vec<f64> = self
            .schema
            .columns()
            .iter()
            .map(|column| expanded.get(column).unwrap_or(0.0))
            .collect();

        for column in expanded.values.keys() {
            if self.schema.position(column).is_none() {
                debug!("Dropping column unknown to the model: {}", column);
            }
        }

        AlignedVector {
            schema: Arc::clone(&self.schema),
            values,
        }
    }

    /// Stage 4: scale the numeric columns in place
    ///
    /// The vector must have been reindexed onto this aligner's schema.
    pub fn scale(&self, mut vector: AlignedVector) -> Result<AlignedVector, FeatureError> {
        if !Arc::ptr_eq(&vector.schema, &self.schema) && *vector.schema != *self.schema {
            return Err(FeatureError::SchemaMismatch {
                expected: self.schema.len(),
                actual: vector.len(),
            });
        }

        let positions = self.schema.numeric_positions();
        let raw: Vec<f64> = positions.iter().map(|&i| vector.values[i]).collect();
        let scaled = self.scaler.transform(&raw)?;

        if scaled.len() != positions.len() {
            return Err(ValidationError::DimensionMismatch {
                expected: positions.len(),
                actual: scaled.len(),
            }
            .into());
        }

        for ((&i, value), name) in positions.iter().zip(scaled).zip(NUMERIC_COLUMNS) {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite(name).into());
            }
            vector.values[i] = value;
        }

        Ok(vector)
    }
}
