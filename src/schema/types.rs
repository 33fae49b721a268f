//! Schema type definitions
//!
//! A schema is an immutable, possibly cyclic, tagged description of a JSON
//! value shape. Handles are cheap to clone and safe to share across threads;
//! recursive definitions go through a lazy node resolved at most once.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use serde_json::Value;

/// Shared handle to an immutable schema node.
///
/// Clones share the underlying node, so identity (used to break cycles
/// during traversal) is preserved across clones.
#[derive(Clone)]
pub struct Schema {
    node: Arc<Node>,
}

struct Node {
    repr: Repr,
}

enum Repr {
    /// Concrete node.
    Ready(SchemaKind),
    /// Recursive indirection: the thunk runs at most once, on first access.
    Lazy {
        thunk: Box<dyn Fn() -> Schema + Send + Sync>,
        resolved: OnceLock<Schema>,
    },
}

/// The closed set of schema kinds.
///
/// Traversals dispatch over this enum exhaustively; adding a kind without
/// updating every traversal is a compile error.
#[derive(Debug)]
pub enum SchemaKind {
    /// Exact JSON value, compared by equality
    Literal(Value),
    /// Boolean
    Boolean,
    /// Any JSON number
    Number,
    /// Integer-valued JSON number (rejects floats)
    Integer,
    /// UTF-8 string
    String,
    /// JSON null
    Null,
    /// Symbol; has no JSON representation, so no value ever validates
    Symbol,
    /// Accepts no value
    Never,
    /// Accepts any value
    Unknown,
    /// Homogeneous array
    Array {
        /// Element schema
        element: Schema,
    },
    /// Fixed-length heterogeneous array
    Tuple {
        /// Positional component schemas
        components: Vec<Schema>,
    },
    /// Homogeneous string-keyed mapping
    Dictionary {
        /// Value schema applied to every entry
        value: Schema,
    },
    /// Object with a fixed, named field set
    Record {
        /// Declared fields in deterministic (key) order
        fields: BTreeMap<String, Schema>,
        /// When true, every declared field may be absent
        is_partial: bool,
    },
    /// First-match-wins alternative set
    Union {
        /// Alternatives in declaration order
        alternatives: Vec<Schema>,
    },
    /// Underlying schema plus a semantic predicate
    Constraint {
        /// Refined schema
        underlying: Schema,
        /// Must hold for the value to conform
        predicate: Predicate,
    },
    /// Underlying schema or the absent marker (null)
    Optional {
        /// Schema for present values
        underlying: Schema,
    },
    /// Named refinement that does not change the value shape
    Brand {
        /// Brand label
        name: String,
        /// Branded schema
        entity: Schema,
    },
    /// Nominal class instance; not representable in JSON, not filterable
    InstanceOf {
        /// Type name, for error messages
        name: String,
    },
    /// Intersection of several schemas; not filterable
    Intersect {
        /// Intersected schemas
        components: Vec<Schema>,
    },
    /// Function-typed value; not representable in JSON, not filterable
    Function,
}

impl SchemaKind {
    /// Returns the kind tag for error messages
    pub fn tag(&self) -> &'static str {
        match self {
            SchemaKind::Literal(_) => "literal",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Number => "number",
            SchemaKind::Integer => "integer",
            SchemaKind::String => "string",
            SchemaKind::Null => "null",
            SchemaKind::Symbol => "symbol",
            SchemaKind::Never => "never",
            SchemaKind::Unknown => "unknown",
            SchemaKind::Array { .. } => "array",
            SchemaKind::Tuple { .. } => "tuple",
            SchemaKind::Dictionary { .. } => "dictionary",
            SchemaKind::Record { .. } => "record",
            SchemaKind::Union { .. } => "union",
            SchemaKind::Constraint { .. } => "constraint",
            SchemaKind::Optional { .. } => "optional",
            SchemaKind::Brand { .. } => "brand",
            SchemaKind::InstanceOf { .. } => "instanceof",
            SchemaKind::Intersect { .. } => "intersect",
            SchemaKind::Function => "function",
        }
    }
}

/// Constraint predicate over a JSON value.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>);

impl Predicate {
    /// Wraps a closure as a constraint predicate.
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(test))
    }

    /// Applies the predicate.
    pub fn test(&self, value: &Value) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

impl Schema {
    fn from_kind(kind: SchemaKind) -> Self {
        Self {
            node: Arc::new(Node {
                repr: Repr::Ready(kind),
            }),
        }
    }

    /// Returns the kind of this schema, resolving lazy indirection.
    pub fn kind(&self) -> &SchemaKind {
        match &self.node.repr {
            Repr::Ready(kind) => kind,
            Repr::Lazy { thunk, resolved } => resolved.get_or_init(|| thunk()).kind(),
        }
    }

    /// Identity of the resolved node.
    ///
    /// Two handles reaching the same node through any mix of clones and
    /// lazy indirection report the same id; traversals key visited sets
    /// on it to terminate on cyclic graphs.
    pub(crate) fn node_id(&self) -> usize {
        match &self.node.repr {
            Repr::Ready(_) => Arc::as_ptr(&self.node) as usize,
            Repr::Lazy { thunk, resolved } => resolved.get_or_init(|| thunk()).node_id(),
        }
    }

    /// Exact literal value
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::from_kind(SchemaKind::Literal(value.into()))
    }

    /// Boolean
    pub fn boolean() -> Self {
        Self::from_kind(SchemaKind::Boolean)
    }

    /// Any JSON number
    pub fn number() -> Self {
        Self::from_kind(SchemaKind::Number)
    }

    /// Integer-valued JSON number
    pub fn integer() -> Self {
        Self::from_kind(SchemaKind::Integer)
    }

    /// UTF-8 string
    pub fn string() -> Self {
        Self::from_kind(SchemaKind::String)
    }

    /// JSON null
    pub fn null() -> Self {
        Self::from_kind(SchemaKind::Null)
    }

    /// Symbol (never satisfied by a JSON value)
    pub fn symbol() -> Self {
        Self::from_kind(SchemaKind::Symbol)
    }

    /// Accepts no value
    pub fn never() -> Self {
        Self::from_kind(SchemaKind::Never)
    }

    /// Accepts any value
    pub fn unknown() -> Self {
        Self::from_kind(SchemaKind::Unknown)
    }

    /// Homogeneous array of `element`
    pub fn array(element: Schema) -> Self {
        Self::from_kind(SchemaKind::Array { element })
    }

    /// Fixed-length tuple
    pub fn tuple(components: impl IntoIterator<Item = Schema>) -> Self {
        Self::from_kind(SchemaKind::Tuple {
            components: components.into_iter().collect(),
        })
    }

    /// String-keyed mapping with homogeneous values
    pub fn dictionary(value: Schema) -> Self {
        Self::from_kind(SchemaKind::Dictionary { value })
    }

    /// Record with all declared fields required
    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Schema)>,
    {
        Self::from_kind(SchemaKind::Record {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            is_partial: false,
        })
    }

    /// Record with every declared field optional
    pub fn partial<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Schema)>,
    {
        Self::from_kind(SchemaKind::Record {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            is_partial: true,
        })
    }

    /// First-match-wins union of alternatives
    pub fn union(alternatives: impl IntoIterator<Item = Schema>) -> Self {
        Self::from_kind(SchemaKind::Union {
            alternatives: alternatives.into_iter().collect(),
        })
    }

    /// Underlying schema refined by a predicate
    pub fn constraint<F>(underlying: Schema, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::from_kind(SchemaKind::Constraint {
            underlying,
            predicate: Predicate::new(test),
        })
    }

    /// Underlying schema or the absent marker (null)
    pub fn optional(underlying: Schema) -> Self {
        Self::from_kind(SchemaKind::Optional { underlying })
    }

    /// Named brand over an entity schema
    pub fn brand(name: impl Into<String>, entity: Schema) -> Self {
        Self::from_kind(SchemaKind::Brand {
            name: name.into(),
            entity,
        })
    }

    /// Nominal class-instance schema (not filterable)
    pub fn instance_of(name: impl Into<String>) -> Self {
        Self::from_kind(SchemaKind::InstanceOf { name: name.into() })
    }

    /// Intersection of component schemas (not filterable)
    pub fn intersect(components: impl IntoIterator<Item = Schema>) -> Self {
        Self::from_kind(SchemaKind::Intersect {
            components: components.into_iter().collect(),
        })
    }

    /// Function-typed schema (not filterable)
    pub fn function() -> Self {
        Self::from_kind(SchemaKind::Function)
    }

    /// Self-referential schema.
    ///
    /// The builder closure receives a handle to the schema being defined
    /// and may embed clones of it anywhere in the structure it returns.
    /// The closure runs at most once, on first access to the schema's kind.
    /// The returned structure must not resolve directly to the handle
    /// itself; there has to be at least one structural layer in between.
    pub fn recursive<F>(build: F) -> Self
    where
        F: Fn(Schema) -> Schema + Send + Sync + 'static,
    {
        Self {
            node: Arc::new_cyclic(|weak: &Weak<Node>| {
                let weak = weak.clone();
                Node {
                    repr: Repr::Lazy {
                        thunk: Box::new(move || {
                            // The thunk only runs through a live handle, so
                            // the upgrade cannot fail.
                            let this = Schema {
                                node: weak.upgrade().expect("schema node dropped"),
                            };
                            build(this)
                        }),
                        resolved: OnceLock::new(),
                    },
                }
            }),
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Schema({})", self.kind().tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_tags() {
        assert_eq!(Schema::literal("a").kind().tag(), "literal");
        assert_eq!(Schema::boolean().kind().tag(), "boolean");
        assert_eq!(Schema::number().kind().tag(), "number");
        assert_eq!(Schema::integer().kind().tag(), "integer");
        assert_eq!(Schema::string().kind().tag(), "string");
        assert_eq!(Schema::null().kind().tag(), "null");
        assert_eq!(Schema::symbol().kind().tag(), "symbol");
        assert_eq!(Schema::never().kind().tag(), "never");
        assert_eq!(Schema::unknown().kind().tag(), "unknown");
        assert_eq!(Schema::array(Schema::string()).kind().tag(), "array");
        assert_eq!(Schema::tuple([Schema::string()]).kind().tag(), "tuple");
        assert_eq!(Schema::dictionary(Schema::boolean()).kind().tag(), "dictionary");
        assert_eq!(Schema::record([("a", Schema::string())]).kind().tag(), "record");
        assert_eq!(Schema::union([Schema::string()]).kind().tag(), "union");
        assert_eq!(Schema::constraint(Schema::number(), |_| true).kind().tag(), "constraint");
        assert_eq!(Schema::optional(Schema::number()).kind().tag(), "optional");
        assert_eq!(Schema::brand("id", Schema::string()).kind().tag(), "brand");
        assert_eq!(Schema::instance_of("Date").kind().tag(), "instanceof");
        assert_eq!(Schema::intersect([Schema::string()]).kind().tag(), "intersect");
        assert_eq!(Schema::function().kind().tag(), "function");
    }

    #[test]
    fn test_literal_holds_value() {
        let schema = Schema::literal(json!("a"));
        match schema.kind() {
            SchemaKind::Literal(v) => assert_eq!(v, &json!("a")),
            other => panic!("expected literal, got {}", other.tag()),
        }
    }

    #[test]
    fn test_record_fields_and_partial_flag() {
        let total = Schema::record([("a", Schema::string()), ("b", Schema::number())]);
        match total.kind() {
            SchemaKind::Record { fields, is_partial } => {
                assert!(!is_partial);
                assert_eq!(fields.len(), 2);
                assert!(fields.contains_key("a"));
                assert!(fields.contains_key("b"));
            }
            other => panic!("expected record, got {}", other.tag()),
        }

        let partial = Schema::partial([("a", Schema::string())]);
        match partial.kind() {
            SchemaKind::Record { is_partial, .. } => assert!(is_partial),
            other => panic!("expected record, got {}", other.tag()),
        }
    }

    #[test]
    fn test_clones_share_identity() {
        let schema = Schema::string();
        let clone = schema.clone();
        assert_eq!(schema.node_id(), clone.node_id());

        let other = Schema::string();
        assert_ne!(schema.node_id(), other.node_id());
    }

    #[test]
    fn test_predicate_wraps_closure() {
        let gt_five = Predicate::new(|v| v.as_f64().map_or(false, |n| n > 5.0));
        assert!(gt_five.test(&json!(10)));
        assert!(!gt_five.test(&json!(3)));
        assert!(!gt_five.test(&json!("a")));
    }

    #[test]
    fn test_recursive_schema_resolves_to_itself() {
        let tree = Schema::recursive(|tree| {
            Schema::record([
                ("name", Schema::string()),
                ("children", Schema::array(tree)),
            ])
        });

        let fields = match tree.kind() {
            SchemaKind::Record { fields, .. } => fields,
            other => panic!("expected record, got {}", other.tag()),
        };

        let element = match fields["children"].kind() {
            SchemaKind::Array { element } => element,
            other => panic!("expected array, got {}", other.tag()),
        };

        // The child element is the schema being defined.
        assert_eq!(element.node_id(), tree.node_id());
    }

    #[test]
    fn test_recursive_thunk_runs_once() {
        let tree = Schema::recursive(|tree| {
            Schema::record([("next", Schema::optional(tree))])
        });

        let first = tree.node_id();
        let second = tree.node_id();
        assert_eq!(first, second);
    }
}
