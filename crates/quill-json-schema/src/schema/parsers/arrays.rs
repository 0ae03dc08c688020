//! Array constraint parsers

use crate::schema::helpers::{get_bool, get_usize};
use crate::schema::{ArrayConstraints, Compiler, SchemaId};
use serde_json::{Map, Value};

/// Read the array keyword group, compiling schema-valued entries into the
/// arena with `parent` as their enclosing node.
///
/// The `items` keyword sets either the uniform element schema (object shape)
/// or the positional prefix list (array shape), never both. Non-object
/// entries in the array shape are skipped.
pub(in crate::schema) fn array_constraints(
    compiler: &mut Compiler,
    obj: &Map<String, Value>,
    parent: SchemaId,
) -> ArrayConstraints {
    let mut array = ArrayConstraints {
        min_items: get_usize(obj, "minItems"),
        max_items: get_usize(obj, "maxItems"),
        unique_items: get_bool(obj, "uniqueItems").unwrap_or(false),
        min_contains: get_usize(obj, "minContains"),
        max_contains: get_usize(obj, "maxContains"),
        ..ArrayConstraints::default()
    };

    match obj.get("items") {
        Some(items @ Value::Object(_)) => {
            array.items = compiler.compile_nested(items, parent);
        }
        Some(Value::Array(entries)) => {
            for entry in entries {
                if let Some(id) = compiler.compile_nested(entry, parent) {
                    array.prefix_items.push(id);
                }
            }
        }
        _ => {}
    }

    array.additional_items = obj
        .get("additionalItems")
        .and_then(|value| compiler.compile_nested(value, parent));

    array.contains = obj
        .get("contains")
        .and_then(|value| compiler.compile_nested(value, parent));

    array
}
