//! Schema-support validation
//!
//! One-time traversal of a schema graph verifying every reachable kind is
//! one the filterer handles. Runs before any filtering; a schema that passes
//! may be reused for unlimited filter calls without re-validation.

use std::collections::HashSet;

use crate::schema::{Schema, SchemaKind};

use super::errors::UnsupportedSchema;

/// Verifies that every kind reachable from `schema` is filterable.
///
/// The traversal is depth-first with a visited set keyed by node identity,
/// so a node reached through a cycle is checked exactly once and
/// self-referential schema graphs terminate.
///
/// # Errors
///
/// Returns `UnsupportedSchema` naming the first instanceof, intersect, or
/// function kind encountered. Fail-fast: the traversal aborts on the first
/// offender.
pub fn validate_schema(schema: &Schema) -> Result<(), UnsupportedSchema> {
    let mut visited = HashSet::new();
    visit(schema, &mut visited)
}

fn visit(schema: &Schema, visited: &mut HashSet<usize>) -> Result<(), UnsupportedSchema> {
    if !visited.insert(schema.node_id()) {
        return Ok(());
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
        | SchemaKind::Unknown => Ok(()),
        SchemaKind::Array { element } => visit(element, visited),
        SchemaKind::Tuple { components } => {
            components.iter().try_for_each(|c| visit(c, visited))
        }
        SchemaKind::Dictionary { value } => visit(value, visited),
        SchemaKind::Record { fields, .. } => {
            fields.values().try_for_each(|f| visit(f, visited))
        }
        SchemaKind::Union { alternatives } => {
            alternatives.iter().try_for_each(|a| visit(a, visited))
        }
        SchemaKind::Constraint { underlying, .. } | SchemaKind::Optional { underlying } => {
            visit(underlying, visited)
        }
        SchemaKind::Brand { entity, .. } => visit(entity, visited),
    }
}
