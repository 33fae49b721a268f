//! valsift - A strict, deterministic schema filter for JSON values
//!
//! Validate a value against a structural schema, then produce a deep copy
//! containing only the data the schema declares.

pub mod filter;
pub mod schema;
