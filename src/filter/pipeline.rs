//! Check-then-filter pipeline
//!
//! Binds a schema to a reusable operation: validate the raw input, then
//! return a pruned copy. Schema support is verified once, at construction;
//! an unsupported schema never yields a usable pipeline.

use serde_json::Value;

use crate::schema::Schema;

use super::errors::{CheckFilterError, UnsupportedSchema};
use super::filterer::{filter, FilterContext};
use super::support::validate_schema;

/// Reusable validate-then-filter operation bound to one schema.
///
/// Construction runs the schema-support validation exactly once; every
/// subsequent `apply` reuses that fact. The pipeline is a pure function of
/// its input and safe to share across threads.
#[derive(Debug, Clone)]
pub struct CheckedFilter {
    schema: Schema,
}

impl CheckedFilter {
    /// Binds the pipeline to a schema.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedSchema` if any kind reachable in the schema
    /// graph is not filterable; no pipeline is produced in that case.
    pub fn new(schema: Schema) -> Result<Self, UnsupportedSchema> {
        validate_schema(&schema)?;
        Ok(Self { schema })
    }

    /// Returns the bound schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validates `input` against the bound schema, then returns a pruned
    /// copy containing only the data the schema declares.
    ///
    /// # Errors
    ///
    /// Returns `CheckFilterError::Validation` verbatim from the checker if
    /// the input does not conform; the filterer is never reached in that
    /// case and no partial result is produced.
    pub fn apply(&self, input: &Value) -> Result<Value, CheckFilterError> {
        self.schema.check(input)?;
        let filtered = filter(&self.schema, input, FilterContext::root())?;
        Ok(filtered)
    }
}
