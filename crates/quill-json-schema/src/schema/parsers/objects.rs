//! Object constraint parsers

use crate::schema::helpers::{get_object, get_string_list};
use crate::schema::{AdditionalProperties, Compiler, ObjectConstraints, SchemaId};
use serde_json::{Map, Value};

/// Read the object keyword group, compiling schema-valued entries into the
/// arena with `parent` as their enclosing node.
pub(in crate::schema) fn object_constraints(
    compiler: &mut Compiler,
    obj: &Map<String, Value>,
    parent: SchemaId,
) -> ObjectConstraints {
    let mut object = ObjectConstraints {
        required: get_string_list(obj, "required").unwrap_or_default(),
        ..ObjectConstraints::default()
    };

    if let Some(properties) = get_object(obj, "properties") {
        for (name, value) in properties {
            if let Some(id) = compiler.compile_nested(value, parent) {
                object.properties.insert(name.clone(), id);
            }
        }
    }

    if let Some(patterns) = get_object(obj, "patternProperties") {
        for (pattern, value) in patterns {
            if let Some(id) = compiler.compile_nested(value, parent) {
                object.pattern_properties.push((pattern.clone(), id));
            }
        }
    }

    object.additional_properties = match obj.get("additionalProperties") {
        Some(Value::Bool(false)) => AdditionalProperties::Forbidden,
        Some(value @ Value::Object(_)) => match compiler.compile_nested(value, parent) {
            Some(id) => AdditionalProperties::Schema(id),
            None => AdditionalProperties::Unconstrained,
        },
        _ => AdditionalProperties::Unconstrained,
    };

    if let Some(dependents) = get_object(obj, "dependentRequired") {
        for (trigger, value) in dependents {
            if let Some(names) = value.as_array() {
                let names = names
                    .iter()
                    .filter_map(|name| name.as_str().map(str::to_string))
                    .collect();
                object.dependent_required.insert(trigger.clone(), names);
            }
        }
    }

    object
}
