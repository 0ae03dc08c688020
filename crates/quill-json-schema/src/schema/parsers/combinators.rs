//! Combinator and conditional parsers
//!
//! allOf / anyOf / oneOf compile each object entry of their array value;
//! non-object entries are skipped. `not` and the if / then / else triple
//! each take a single schema object.

use crate::schema::{Compiler, SchemaId};
use serde_json::{Map, Value};

/// Read `allOf`, `anyOf`, `oneOf`, and `not`
pub(in crate::schema) fn combinator_lists(
    compiler: &mut Compiler,
    obj: &Map<String, Value>,
    parent: SchemaId,
) -> (Vec<SchemaId>, Vec<SchemaId>, Vec<SchemaId>, Option<SchemaId>) {
    let all_of = compile_list(compiler, obj, "allOf", parent);
    let any_of = compile_list(compiler, obj, "anyOf", parent);
    let one_of = compile_list(compiler, obj, "oneOf", parent);
    let not_schema = obj
        .get("not")
        .and_then(|value| compiler.compile_nested(value, parent));
    (all_of, any_of, one_of, not_schema)
}

/// Read `if`, `then`, and `else`
pub(in crate::schema) fn conditionals(
    compiler: &mut Compiler,
    obj: &Map<String, Value>,
    parent: SchemaId,
) -> (Option<SchemaId>, Option<SchemaId>, Option<SchemaId>) {
    let mut compile_one = |keyword: &str| {
        obj.get(keyword)
            .and_then(|value| compiler.compile_nested(value, parent))
    };
    let if_schema = compile_one("if");
    let then_schema = compile_one("then");
    let else_schema = compile_one("else");
    (if_schema, then_schema, else_schema)
}

fn compile_list(
    compiler: &mut Compiler,
    obj: &Map<String, Value>,
    keyword: &str,
    parent: SchemaId,
) -> Vec<SchemaId> {
    let Some(entries) = obj.get(keyword).and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| compiler.compile_nested(entry, parent))
        .collect()
}
