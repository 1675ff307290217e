//! Data Validation and Normalization
//!
//! Provides field validation, domain checking, and fitted numeric scaling for
//! customer records before they reach the feature aligner.

mod error;
mod normalizer;
mod validator;

pub use error::ValidationError;
pub use normalizer::{NormalizationMethod, Normalizer, Scaler};
pub use validator::{ValidationConfig, Validator};
