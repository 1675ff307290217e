//! Feature Alignment Engine
//!
//! Turns one raw customer record into the fixed-width numeric row the churn
//! model was trained on: binary mapping, categorical expansion, column
//! alignment against the training schema, then numeric scaling.

mod features;
mod record;
mod schema;

pub use features::{AlignedVector, Cell, EncodedRow, ExpandedRow, FeatureAligner};
pub use record::CustomerRecord;
pub use schema::{FeatureSchema, BINARY_FIELDS, CATEGORICAL_FIELDS, NUMERIC_COLUMNS};

use data_validator::ValidationError;
use thiserror::Error;

/// Errors during feature alignment
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Schema mismatch: expected {expected} columns, got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },
    #[error("Invalid feature schema: {0}")]
    InvalidSchema(String),
}
