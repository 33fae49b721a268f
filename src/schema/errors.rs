//! Validation error types
//!
//! A failed check reports exactly which part of the value and schema
//! disagreed: the path into the value, what the schema expected there, and
//! what was found instead.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Where and how a value diverged from its schema
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDetails {
    /// Path into the value (e.g., "user.address[0].city")
    pub path: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual type or value found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(path, expected, actual)
    }

    pub fn missing_field(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            expected: "field to be present".into(),
            actual: "missing".into(),
        }
    }

    pub fn constraint_failed(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            expected: "value satisfying constraint".into(),
            actual: "constraint violated".into(),
        }
    }

    pub fn length_mismatch(path: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self {
            path: path.into(),
            expected: format!("{} elements", expected),
            actual: format!("{} elements", actual),
        }
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "at '{}': expected {}, got {}",
            self.path, self.expected, self.actual
        )
    }
}

/// Input does not conform to its schema.
///
/// Produced by [`Schema::check`](super::Schema::check); never produced by
/// the filterer, which assumes conformance.
#[derive(Debug, Clone, Error)]
#[error("input validation failed: {details}")]
pub struct ValidationError {
    details: ValidationDetails,
}

impl ValidationError {
    pub fn new(details: ValidationDetails) -> Self {
        Self { details }
    }

    /// Returns the mismatch details
    pub fn details(&self) -> &ValidationDetails {
        &self.details
    }

    /// Returns the path into the value where validation failed
    pub fn path(&self) -> &str {
        &self.details.path
    }
}

impl From<ValidationDetails> for ValidationError {
    fn from(details: ValidationDetails) -> Self {
        Self::new(details)
    }
}
