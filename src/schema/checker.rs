//! Semantic validation of values against schemas
//!
//! `check` walks a value in lock-step with its schema and reports the first
//! mismatch with a full path. Undeclared record keys are accepted: stripping
//! them afterwards is the filterer's job, not the checker's.
//!
//! Recursion follows the concrete value, which is always finite, so checking
//! terminates even against cyclic schema graphs.

use serde_json::Value;

use super::errors::{ValidationDetails, ValidationError, ValidationResult};
use super::types::{Schema, SchemaKind};

impl Schema {
    /// Validates a value against this schema.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` naming the path, expected shape, and actual
    /// content at the first point of disagreement.
    pub fn check(&self, value: &Value) -> ValidationResult<()> {
        check_value(self, value, "")
    }

    /// Conformance as a predicate: true iff `check` would succeed.
    ///
    /// Union alternatives are resolved with this guard.
    pub fn guard(&self, value: &Value) -> bool {
        self.check(value).is_ok()
    }
}

/// Validates a value against a schema at the given path.
fn check_value(schema: &Schema, value: &Value, path: &str) -> ValidationResult<()> {
    match schema.kind() {
        SchemaKind::Literal(expected) => {
            if value == expected {
                Ok(())
            } else {
                Err(ValidationDetails::type_mismatch(
                    at(path),
                    format!("literal {}", expected),
                    value.to_string(),
                )
                .into())
            }
        }
        SchemaKind::Boolean => expect_type(value.is_boolean(), value, "boolean", path),
        SchemaKind::Number => expect_type(value.is_number(), value, "number", path),
        SchemaKind::Integer => {
            expect_type(value.is_i64() || value.is_u64(), value, "integer", path)
        }
        SchemaKind::String => expect_type(value.is_string(), value, "string", path),
        SchemaKind::Null => expect_type(value.is_null(), value, "null", path),
        // No JSON value is a symbol.
        SchemaKind::Symbol => expect_type(false, value, "symbol", path),
        SchemaKind::Never => Err(ValidationDetails::type_mismatch(
            at(path),
            "never",
            json_type_name(value),
        )
        .into()),
        SchemaKind::Unknown => Ok(()),
        SchemaKind::Array { element } => {
            let items = value.as_array().ok_or_else(|| {
                ValidationError::new(ValidationDetails::type_mismatch(
                    at(path),
                    "array",
                    json_type_name(value),
                ))
            })?;

            for (i, item) in items.iter().enumerate() {
                check_value(element, item, &index_path(path, i))?;
            }
            Ok(())
        }
        SchemaKind::Tuple { components } => {
            let items = value.as_array().ok_or_else(|| {
                ValidationError::new(ValidationDetails::type_mismatch(
                    at(path),
                    "tuple",
                    json_type_name(value),
                ))
            })?;

            if items.len() != components.len() {
                return Err(ValidationDetails::length_mismatch(
                    at(path),
                    components.len(),
                    items.len(),
                )
                .into());
            }

            for (i, (component, item)) in components.iter().zip(items).enumerate() {
                check_value(component, item, &index_path(path, i))?;
            }
            Ok(())
        }
        SchemaKind::Dictionary { value: value_schema } => {
            let entries = value.as_object().ok_or_else(|| {
                ValidationError::new(ValidationDetails::type_mismatch(
                    at(path),
                    "object",
                    json_type_name(value),
                ))
            })?;

            for (key, entry) in entries {
                check_value(value_schema, entry, &make_path(path, key))?;
            }
            Ok(())
        }
        SchemaKind::Record { fields, is_partial } => {
            let obj = value.as_object().ok_or_else(|| {
                ValidationError::new(ValidationDetails::type_mismatch(
                    at(path),
                    "object",
                    json_type_name(value),
                ))
            })?;

            // Undeclared keys are accepted here; the filterer strips them.
            for (name, field_schema) in fields {
                let field_path = make_path(path, name);

                match obj.get(name) {
                    Some(field_value) => {
                        // A null field in a partial record is the absent
                        // marker, not a value to validate.
                        if *is_partial && field_value.is_null() {
                            continue;
                        }
                        check_value(field_schema, field_value, &field_path)?;
                    }
                    None => {
                        let optional = *is_partial
                            || matches!(field_schema.kind(), SchemaKind::Optional { .. });
                        if !optional {
                            return Err(ValidationDetails::missing_field(field_path).into());
                        }
                    }
                }
            }
            Ok(())
        }
        SchemaKind::Union { alternatives } => {
            if alternatives.iter().any(|alt| alt.guard(value)) {
                Ok(())
            } else {
                let expected = alternatives
                    .iter()
                    .map(|alt| alt.kind().tag())
                    .collect::<Vec<_>>()
                    .join(" | ");
                Err(ValidationDetails::type_mismatch(at(path), expected, json_type_name(value))
                    .into())
            }
        }
        SchemaKind::Constraint { underlying, predicate } => {
            check_value(underlying, value, path)?;
            if predicate.test(value) {
                Ok(())
            } else {
                Err(ValidationDetails::constraint_failed(at(path)).into())
            }
        }
        SchemaKind::Optional { underlying } => {
            if value.is_null() {
                Ok(())
            } else {
                check_value(underlying, value, path)
            }
        }
        SchemaKind::Brand { entity, .. } => check_value(entity, value, path),
        SchemaKind::InstanceOf { name } => Err(ValidationDetails::type_mismatch(
            at(path),
            format!("instance of {}", name),
            json_type_name(value),
        )
        .into()),
        SchemaKind::Intersect { components } => {
            for component in components {
                check_value(component, value, path)?;
            }
            Ok(())
        }
        SchemaKind::Function => Err(ValidationDetails::type_mismatch(
            at(path),
            "function",
            json_type_name(value),
        )
        .into()),
    }
}

fn expect_type(
    matches: bool,
    value: &Value,
    expected: &'static str,
    path: &str,
) -> ValidationResult<()> {
    if matches {
        Ok(())
    } else {
        Err(ValidationDetails::type_mismatch(at(path), expected, json_type_name(value)).into())
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Creates a field path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

/// Creates an element path from prefix and index.
fn index_path(prefix: &str, index: usize) -> String {
    format!("{}[{}]", prefix, index)
}

/// Display form of a path; the empty prefix is the value root.
fn at(path: &str) -> &str {
    if path.is_empty() {
        "$root"
    } else {
        path
    }
}
