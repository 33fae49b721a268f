//! Schema description subsystem for valsift
//!
//! Schemas are immutable, possibly cyclic, tagged descriptions of JSON value
//! shapes, with full semantic validation (`check`) against
//! `serde_json::Value`.
//!
//! # Design Principles
//!
//! - Closed kind set with exhaustive dispatch
//! - Cheap shared handles; recursive definitions via lazy indirection
//! - Validation reports the exact path of the first mismatch
//! - Undeclared record keys are tolerated (the filter subsystem strips them)
//! - Deterministic validation, no coercion, no defaults

mod checker;
mod errors;
mod types;

pub use errors::{ValidationDetails, ValidationError, ValidationResult};
pub use types::{Predicate, Schema, SchemaKind};
