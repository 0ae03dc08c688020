//! Primitive constraint parsers
//!
//! These read plain (non-schema-valued) keywords out of a schema object.
//! Parsing is tolerant: a keyword with the wrong JSON shape is skipped.

use crate::schema::helpers::{get_f64, get_str, get_usize};
use crate::schema::{Bound, NumberConstraints, StringConstraints};
use serde_json::{Map, Value};

/// Read `enum` and `const`.
///
/// `const: null` is a real constraint (the value must be null), which is why
/// the result is an `Option` around the value rather than a null sentinel.
pub(in crate::schema) fn enum_and_const(
    obj: &Map<String, Value>,
) -> (Vec<Value>, Option<Value>) {
    let enum_values = obj
        .get("enum")
        .and_then(Value::as_array)
        .map(|values| values.to_vec())
        .unwrap_or_default();
    let const_value = obj.get("const").cloned();
    (enum_values, const_value)
}

/// Read `multipleOf`, `minimum`/`maximum`, and both forms of
/// `exclusiveMinimum`/`exclusiveMaximum`.
///
/// The boolean form (draft 4) marks the corresponding bound exclusive; the
/// numeric form (later drafts) is an exclusive bound of its own and replaces
/// any inclusive one.
pub(in crate::schema) fn number_constraints(obj: &Map<String, Value>) -> NumberConstraints {
    let mut number = NumberConstraints {
        multiple_of: get_f64(obj, "multipleOf"),
        minimum: get_f64(obj, "minimum").map(|value| Bound {
            value,
            exclusive: false,
        }),
        maximum: get_f64(obj, "maximum").map(|value| Bound {
            value,
            exclusive: false,
        }),
    };

    match obj.get("exclusiveMinimum") {
        Some(Value::Bool(flag)) => {
            if let Some(bound) = &mut number.minimum {
                bound.exclusive = *flag;
            }
        }
        Some(value) => {
            if let Some(value) = value.as_f64() {
                number.minimum = Some(Bound {
                    value,
                    exclusive: true,
                });
            }
        }
        None => {}
    }
    match obj.get("exclusiveMaximum") {
        Some(Value::Bool(flag)) => {
            if let Some(bound) = &mut number.maximum {
                bound.exclusive = *flag;
            }
        }
        Some(value) => {
            if let Some(value) = value.as_f64() {
                number.maximum = Some(Bound {
                    value,
                    exclusive: true,
                });
            }
        }
        None => {}
    }

    number
}

/// Read `minLength`, `maxLength`, `pattern`, and `format`
pub(in crate::schema) fn string_constraints(obj: &Map<String, Value>) -> StringConstraints {
    StringConstraints {
        min_length: get_usize(obj, "minLength"),
        max_length: get_usize(obj, "maxLength"),
        pattern: get_str(obj, "pattern").map(str::to_string),
        format: get_str(obj, "format").map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().expect("object literal").clone()
    }

    #[test]
    fn test_enum_requires_array() {
        let (values, _) = enum_and_const(&obj(json!({"enum": [1, "two", null]})));
        assert_eq!(values, vec![json!(1), json!("two"), json!(null)]);

        let (values, _) = enum_and_const(&obj(json!({"enum": "oops"})));
        assert!(values.is_empty());
    }

    #[test]
    fn test_const_null_is_a_constraint() {
        let (_, const_value) = enum_and_const(&obj(json!({"const": null})));
        assert_eq!(const_value, Some(json!(null)));

        let (_, const_value) = enum_and_const(&obj(json!({})));
        assert_eq!(const_value, None);
    }

    #[test]
    fn test_numeric_exclusive_forms() {
        let number = number_constraints(&obj(json!({
            "minimum": 0,
            "exclusiveMinimum": true,
            "exclusiveMaximum": 100
        })));
        assert_eq!(
            number.minimum,
            Some(Bound {
                value: 0.0,
                exclusive: true
            })
        );
        assert_eq!(
            number.maximum,
            Some(Bound {
                value: 100.0,
                exclusive: true
            })
        );
    }

    #[test]
    fn test_exclusive_flag_without_bound_is_inert() {
        let number = number_constraints(&obj(json!({"exclusiveMinimum": true})));
        assert_eq!(number.minimum, None);
    }

    #[test]
    fn test_string_constraints() {
        let string = string_constraints(&obj(json!({
            "minLength": 1,
            "maxLength": 10,
            "pattern": "^[a-z]+$",
            "format": "hostname"
        })));
        assert_eq!(string.min_length, Some(1));
        assert_eq!(string.max_length, Some(10));
        assert_eq!(string.pattern.as_deref(), Some("^[a-z]+$"));
        assert_eq!(string.format.as_deref(), Some("hostname"));
    }

    #[test]
    fn test_negative_lengths_are_skipped() {
        let string = string_constraints(&obj(json!({"minLength": -3})));
        assert_eq!(string.min_length, None);
    }
}
