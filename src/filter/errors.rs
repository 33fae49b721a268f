//! Filter error types
//!
//! Two failure modes exist, both fatal to the whole operation: the schema
//! contains a kind the filterer cannot handle, or the input fails semantic
//! validation. Neither is retried and no partial result is ever returned.

use thiserror::Error;

use crate::schema::ValidationError;

/// Schema graph contains a kind outside the filterable set.
///
/// Raised at pipeline construction (preferred) or from a standalone
/// filter/support call against an unsupported schema.
#[derive(Debug, Clone, Error)]
#[error("type \"{kind}\" is not filterable")]
pub struct UnsupportedSchema {
    kind: &'static str,
}

impl UnsupportedSchema {
    pub(crate) fn new(kind: &'static str) -> Self {
        Self { kind }
    }

    /// Returns the offending kind tag
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

/// Errors from the check-then-filter pipeline
#[derive(Debug, Clone, Error)]
pub enum CheckFilterError {
    /// Schema rejected at construction or during the defensive re-check
    #[error(transparent)]
    UnsupportedSchema(#[from] UnsupportedSchema),
    /// Input rejected by the checker; propagated verbatim
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
