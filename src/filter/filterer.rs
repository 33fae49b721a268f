//! Schema-driven value filtering
//!
//! Walks a value in lock-step with its schema and builds a pruned deep copy
//! containing only the data the schema declares. The input must already
//! conform to the schema; conformance is not re-checked here.
//!
//! # Design Principles
//!
//! - Pure: never mutates the input, always builds fresh containers
//! - Recursion depth is bounded by the concrete value, never by the
//!   (possibly cyclic) schema graph
//! - Only a record changes the context its fields are filtered under;
//!   every other kind threads the enclosing context through unchanged

use serde_json::{Map, Value};

use crate::schema::{Schema, SchemaKind};

use super::errors::UnsupportedSchema;

/// Context threaded through recursive filter calls.
///
/// `is_partial` is true exactly when the current position is a field of a
/// record declared partial; a null value there is the absent marker and is
/// passed through without inspecting the schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterContext {
    /// Whether the current position is a field of a partial record
    pub is_partial: bool,
}

impl FilterContext {
    /// Context for a top-level value (not inside any partial record).
    pub fn root() -> Self {
        Self { is_partial: false }
    }
}

/// Builds a copy of `value` containing only the data `schema` declares.
///
/// Object keys not named by the schema are dropped at every nesting depth;
/// array and tuple element order is preserved; declared record fields
/// missing from the input are omitted from the output entirely.
///
/// # Errors
///
/// Returns `UnsupportedSchema` when the node being filtered is an
/// instanceof, intersect, or function kind. [`validate_schema`] rejects
/// such schemas up front; this is a defensive re-check for standalone
/// filter calls.
///
/// # Panics
///
/// The value is assumed to conform to the schema. Filtering a value that
/// does not (a tuple of the wrong length, an object where an array was
/// declared, a union value matching no alternative) panics; run
/// [`Schema::check`] first, or use [`CheckedFilter`](super::CheckedFilter).
///
/// [`validate_schema`]: super::validate_schema
pub fn filter(
    schema: &Schema,
    value: &Value,
    context: FilterContext,
) -> Result<Value, UnsupportedSchema> {
    if context.is_partial && value.is_null() {
        return Ok(Value::Null);
    }

    match schema.kind() {
        kind @ (SchemaKind::InstanceOf { .. }
        | SchemaKind::Intersect { .. }
        | SchemaKind::Function) => Err(UnsupportedSchema::new(kind.tag())),
        SchemaKind::Literal(_)
        | SchemaKind::Boolean
        | SchemaKind::Number
        | SchemaKind::Integer
        | SchemaKind::String
        | SchemaKind::Null
        | SchemaKind::Symbol
        | SchemaKind::Never
        | SchemaKind::Unknown => Ok(value.clone()),
        SchemaKind::Array { element } => {
            let items = value
                .as_array()
                .expect("array schema applied to non-array value");
            let filtered = items
                .iter()
                .map(|item| filter(element, item, context))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(filtered))
        }
        SchemaKind::Tuple { components } => {
            let items = value
                .as_array()
                .expect("tuple schema applied to non-array value");
            let filtered = components
                .iter()
                .zip(items)
                .map(|(component, item)| filter(component, item, context))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(filtered))
        }
        SchemaKind::Dictionary { value: value_schema } => {
            let entries = value
                .as_object()
                .expect("dictionary schema applied to non-object value");
            let mut out = Map::new();
            for (key, entry) in entries {
                out.insert(key.clone(), filter(value_schema, entry, context)?);
            }
            Ok(Value::Object(out))
        }
        SchemaKind::Record { fields, is_partial } => {
            let obj = value
                .as_object()
                .expect("record schema applied to non-object value");
            let field_context = FilterContext {
                is_partial: *is_partial,
            };

            // Keep a field iff it is declared AND present on the input;
            // declared-but-missing fields are omitted, undeclared keys
            // are dropped.
            let mut out = Map::new();
            for (name, field_schema) in fields {
                if let Some(field_value) = obj.get(name) {
                    out.insert(
                        name.clone(),
                        filter(field_schema, field_value, field_context)?,
                    );
                }
            }
            Ok(Value::Object(out))
        }
        SchemaKind::Union { alternatives } => {
            let alternative = alternatives
                .iter()
                .find(|alt| alt.guard(value))
                .expect("union value matched no alternative; input was not validated");
            filter(alternative, value, context)
        }
        SchemaKind::Constraint { underlying, .. } | SchemaKind::Optional { underlying } => {
            filter(underlying, value, context)
        }
        SchemaKind::Brand { entity, .. } => filter(entity, value, context),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn root() -> FilterContext {
        FilterContext::root()
    }

    #[test]
    fn test_terminal_kinds_pass_value_through() {
        assert_eq!(filter(&Schema::literal("a"), &json!("a"), root()).unwrap(), json!("a"));
        assert_eq!(filter(&Schema::boolean(), &json!(true), root()).unwrap(), json!(true));
        assert_eq!(filter(&Schema::number(), &json!(5.5), root()).unwrap(), json!(5.5));
        assert_eq!(filter(&Schema::integer(), &json!(5), root()).unwrap(), json!(5));
        assert_eq!(filter(&Schema::string(), &json!("a"), root()).unwrap(), json!("a"));
        assert_eq!(filter(&Schema::null(), &json!(null), root()).unwrap(), json!(null));
        assert_eq!(
            filter(&Schema::unknown(), &json!({ "a": "a", "b": 1 }), root()).unwrap(),
            json!({ "a": "a", "b": 1 })
        );
    }

    #[test]
    fn test_record_drops_undeclared_keys() {
        let schema = Schema::record([("name", Schema::string())]);
        let doc = json!({ "name": "Alice", "extra": "x" });

        assert_eq!(filter(&schema, &doc, root()).unwrap(), json!({ "name": "Alice" }));
    }

    #[test]
    fn test_record_omits_missing_declared_fields() {
        let schema = Schema::record([
            ("name", Schema::string()),
            ("age", Schema::optional(Schema::integer())),
        ]);
        let doc = json!({ "name": "Alice" });

        let out = filter(&schema, &doc, root()).unwrap();
        assert_eq!(out, json!({ "name": "Alice" }));
        assert!(out.as_object().unwrap().get("age").is_none());
    }

    #[test]
    fn test_partial_record_keeps_present_drops_rest() {
        let schema = Schema::partial([("a", Schema::string()), ("b", Schema::string())]);
        let doc = json!({ "a": "aaa", "c": "ccc" });

        assert_eq!(filter(&schema, &doc, root()).unwrap(), json!({ "a": "aaa" }));
    }

    #[test]
    fn test_partial_record_null_field_passes_through() {
        // Null is the absent marker: the short-circuit returns it unchanged
        // instead of recursing into the field schema.
        let schema = Schema::partial([
            ("a", Schema::string()),
            ("d", Schema::array(Schema::string())),
            ("e", Schema::tuple([Schema::literal("a")])),
            ("f", Schema::union([Schema::literal("a"), Schema::literal("b")])),
        ]);
        let doc = json!({ "a": "aaa", "d": null, "e": null, "f": null });

        assert_eq!(
            filter(&schema, &doc, root()).unwrap(),
            json!({ "a": "aaa", "d": null, "e": null, "f": null })
        );
    }

    #[test]
    fn test_array_elements_filtered_in_order() {
        let schema = Schema::array(Schema::record([("id", Schema::integer())]));
        let doc = json!([
            { "id": 1, "junk": true },
            { "id": 2 },
            { "id": 3, "junk": false }
        ]);

        assert_eq!(
            filter(&schema, &doc, root()).unwrap(),
            json!([{ "id": 1 }, { "id": 2 }, { "id": 3 }])
        );
    }

    #[test]
    fn test_tuple_positions_filtered() {
        let schema = Schema::tuple([
            Schema::literal("a"),
            Schema::record([("x", Schema::number())]),
        ]);
        let doc = json!(["a", { "x": 1, "y": 2 }]);

        assert_eq!(filter(&schema, &doc, root()).unwrap(), json!(["a", { "x": 1 }]));
    }

    #[test]
    fn test_dictionary_keys_untouched_values_filtered() {
        let schema = Schema::dictionary(Schema::record([("v", Schema::number())]));
        let doc = json!({
            "first": { "v": 1, "noise": "x" },
            "second": { "v": 2 }
        });

        assert_eq!(
            filter(&schema, &doc, root()).unwrap(),
            json!({ "first": { "v": 1 }, "second": { "v": 2 } })
        );
    }

    #[test]
    fn test_union_first_matching_alternative_filters() {
        let schema = Schema::union([
            Schema::record([("kind", Schema::literal("a")), ("a", Schema::string())]),
            Schema::record([("kind", Schema::literal("b")), ("b", Schema::number())]),
        ]);

        let doc = json!({ "kind": "b", "b": 5, "extra": true });
        assert_eq!(
            filter(&schema, &doc, root()).unwrap(),
            json!({ "kind": "b", "b": 5 })
        );
    }

    #[test]
    fn test_wrappers_are_transparent() {
        let constrained = Schema::constraint(
            Schema::record([("n", Schema::number())]),
            |v| v.get("n").is_some(),
        );
        let doc = json!({ "n": 1, "junk": 2 });
        assert_eq!(filter(&constrained, &doc, root()).unwrap(), json!({ "n": 1 }));

        let optional = Schema::optional(Schema::record([("n", Schema::number())]));
        assert_eq!(filter(&optional, &doc, root()).unwrap(), json!({ "n": 1 }));

        let branded = Schema::brand("point", Schema::record([("n", Schema::number())]));
        assert_eq!(filter(&branded, &doc, root()).unwrap(), json!({ "n": 1 }));
    }

    #[test]
    fn test_wrappers_preserve_partial_context() {
        // An optional wrapper inside a partial record must not reset the
        // context before the absence short-circuit fires.
        let schema = Schema::partial([("a", Schema::optional(Schema::string()))]);
        let doc = json!({ "a": null });

        assert_eq!(filter(&schema, &doc, root()).unwrap(), json!({ "a": null }));
    }

    #[test]
    fn test_nested_record_resets_partial_context() {
        let schema = Schema::record([(
            "inner",
            Schema::partial([("a", Schema::string())]),
        )]);
        let doc = json!({ "inner": { "a": "x", "b": "y" } });

        assert_eq!(
            filter(&schema, &doc, root()).unwrap(),
            json!({ "inner": { "a": "x" } })
        );
    }

    #[test]
    fn test_unsupported_kind_rejected() {
        let intersect = Schema::intersect([
            Schema::record([("a", Schema::string())]),
            Schema::record([("b", Schema::string())]),
        ]);

        let err = filter(&intersect, &json!({ "a": "a", "b": "b" }), root()).unwrap_err();
        assert_eq!(err.kind(), "intersect");

        assert!(filter(&Schema::function(), &json!(null), root()).is_err());
        assert!(filter(&Schema::instance_of("Date"), &json!(null), root()).is_err());
    }

    #[test]
    fn test_nested_unsupported_kind_rejected() {
        let schema = Schema::record([("cb", Schema::function())]);
        let err = filter(&schema, &json!({ "cb": {} }), root()).unwrap_err();
        assert_eq!(err.kind(), "function");
    }

    #[test]
    fn test_recursive_schema_strips_at_every_depth() {
        let tree = Schema::recursive(|tree| {
            Schema::record([
                ("name", Schema::string()),
                ("children", Schema::array(tree)),
            ])
        });

        let doc = json!({
            "name": "root",
            "extra": "x",
            "children": [
                { "name": "leaf", "ignore": "y", "children": [] }
            ]
        });

        assert_eq!(
            filter(&tree, &doc, root()).unwrap(),
            json!({
                "name": "root",
                "children": [
                    { "name": "leaf", "children": [] }
                ]
            })
        );
    }

    #[test]
    fn test_input_is_not_mutated() {
        let schema = Schema::record([("a", Schema::string())]);
        let doc = json!({ "a": "x", "b": "y" });
        let before = doc.clone();

        let _ = filter(&schema, &doc, root()).unwrap();
        assert_eq!(doc, before);
    }
}
