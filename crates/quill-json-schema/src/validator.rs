// JSON Schema validation engine

use crate::error::{InstancePath, ValidationError, ValidationErrorKind, ValidationResult};
use crate::format;
use crate::registry::RefResolution;
use crate::schema::{
    AdditionalProperties, Bound, CompiledSchema, SchemaId, SchemaNode, SchemaType,
};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// Tolerance for `multipleOf`: the ratio check absorbs floating-point
/// representation error instead of demanding exact rational arithmetic.
const MULTIPLE_OF_EPSILON: f64 = 1e-12;

/// How many approximate registry hits one `$ref` lookup may chase before the
/// reference is reported unresolvable. Overlapping suffix matches could
/// otherwise cycle between approximate hits.
const REF_RESOLUTION_LIMIT: usize = 16;

/// Validate a JSON value against a compiled schema.
///
/// Also available as [`CompiledSchema::validate`].
pub fn validate(schema: &CompiledSchema, value: &Value) -> ValidationResult<()> {
    let mut context = ValidationContext::new(schema);
    let mut visited = Visited::new();
    context.validate_node(schema.root(), value, &mut visited)
}

type Visited = HashSet<SchemaId>;

/// Per-call validation state.
///
/// The visited set is threaded separately from the context: it is shared
/// along the conjunctive spine (`$ref` delegation, conditionals, `not`,
/// `allOf`) and cloned wherever evaluation branches (`anyOf`/`oneOf`
/// alternatives, properties, array elements), so cycle detection scopes to
/// one evaluation path.
struct ValidationContext<'a> {
    schema: &'a CompiledSchema,
    /// Current position within the instance (e.g., ["servers", "[0]", "port"])
    instance_path: InstancePath,
    /// Property names sanctioned by a matched then/else branch, per node;
    /// reset whenever that node's conditional is re-evaluated
    sanctioned: HashMap<SchemaId, HashSet<String>>,
}

impl<'a> ValidationContext<'a> {
    fn new(schema: &'a CompiledSchema) -> Self {
        Self {
            schema,
            instance_path: InstancePath::new(),
            sanctioned: HashMap::new(),
        }
    }

    fn fail(&self, kind: ValidationErrorKind) -> ValidationResult<()> {
        Err(ValidationError::new(kind, self.instance_path.clone()))
    }

    /// Evaluate a sub-schema purely as a predicate, discarding any error
    fn probe(&mut self, id: SchemaId, value: &Value, visited: &mut Visited) -> bool {
        self.validate_node(id, value, visited).is_ok()
    }

    fn with_key<R>(&mut self, key: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.instance_path.push_key(key);
        let result = f(self);
        self.instance_path.pop();
        result
    }

    fn with_index<R>(&mut self, index: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        self.instance_path.push_index(index);
        let result = f(self);
        self.instance_path.pop();
        result
    }

    fn validate_node(
        &mut self,
        id: SchemaId,
        value: &Value,
        visited: &mut Visited,
    ) -> ValidationResult<()> {
        if !visited.insert(id) {
            return self.fail(ValidationErrorKind::SchemaRecursion);
        }
        let schema = self.schema;
        let node = schema.node(id);

        // A non-"#" $ref defers this node entirely to its target; no other
        // local keyword is evaluated.
        if let Some(reference) = node.ref_target.as_deref()
            && reference != "#"
        {
            let target = self.dereference(reference, node)?;
            return self.validate_node(target, value, visited);
        }

        self.apply_conditional(id, node, value, visited)?;

        if let Some(not_id) = node.not_schema
            && self.probe(not_id, value, visited)
        {
            return self.fail(ValidationErrorKind::NotForbidden);
        }

        self.check_all_of(node, value, visited)?;
        self.check_any_of(node, value, visited)?;
        self.check_one_of(node, value, visited)?;

        if !node.enum_values.is_empty()
            && !node.enum_values.iter().any(|allowed| allowed == value)
        {
            return self.fail(ValidationErrorKind::NotInEnum {
                value: short_value(value),
            });
        }
        if let Some(expected) = &node.const_value
            && expected != value
        {
            return self.fail(ValidationErrorKind::ConstMismatch {
                value: short_value(value),
            });
        }

        if let Some(declared) = node.schema_type
            && !declared.matches(value)
        {
            return self.fail(ValidationErrorKind::TypeMismatch {
                expected: declared.name().to_string(),
                got: json_type_name(value).to_string(),
            });
        }

        match node.schema_type.unwrap_or_else(|| SchemaType::of_value(value)) {
            SchemaType::String => self.validate_string(node, value)?,
            SchemaType::Number | SchemaType::Integer => self.validate_number(node, value)?,
            SchemaType::Object => self.validate_object(id, node, value, visited)?,
            SchemaType::Array => self.validate_array(node, value, visited)?,
            SchemaType::Boolean | SchemaType::Null => {}
        }

        for rule in &node.custom_rules {
            if let Err(message) = rule.check(value) {
                return self.fail(ValidationErrorKind::CustomKeywordFailed {
                    keyword: rule.keyword.clone(),
                    message,
                });
            }
        }

        Ok(())
    }

    /// Chase a `$ref` through the reference directories, starting from the
    /// referring node's base URI. Each approximate hit restarts resolution
    /// from the hit's own base URI, bounded by `REF_RESOLUTION_LIMIT`.
    fn dereference(
        &self,
        reference: &str,
        node: &SchemaNode,
    ) -> Result<SchemaId, ValidationError> {
        let schema = self.schema;
        let mut base_uri = node.base_uri.as_str();
        for _ in 0..REF_RESOLUTION_LIMIT {
            match schema.registries().resolve(reference, base_uri) {
                RefResolution::Exact(target) => return Ok(target),
                RefResolution::Approximate(hit) => base_uri = schema.node(hit).base_uri.as_str(),
                RefResolution::NotFound => break,
            }
        }
        Err(ValidationError::new(
            ValidationErrorKind::UnresolvedReference {
                reference: reference.to_string(),
            },
            self.instance_path.clone(),
        ))
    }

    /// `if`/`then`/`else`: probe `if` silently, then apply the matching
    /// branch with real error reporting. The branch's `required` names are
    /// recorded as sanctioned for the enclosing node's additionalProperties
    /// check during this pass.
    fn apply_conditional(
        &mut self,
        id: SchemaId,
        node: &SchemaNode,
        value: &Value,
        visited: &mut Visited,
    ) -> ValidationResult<()> {
        self.sanctioned.remove(&id);
        let Some(if_id) = node.if_schema else {
            return Ok(());
        };
        let schema = self.schema;
        let branch = if self.probe(if_id, value, visited) {
            node.then_schema
        } else {
            node.else_schema
        };
        if let Some(branch_id) = branch {
            self.validate_node(branch_id, value, visited)?;
            let required = &schema.node(branch_id).object.required;
            self.sanctioned
                .entry(id)
                .or_default()
                .extend(required.iter().cloned());
        }
        Ok(())
    }

    fn check_all_of(
        &mut self,
        node: &SchemaNode,
        value: &Value,
        visited: &mut Visited,
    ) -> ValidationResult<()> {
        for (index, &sub) in node.all_of.iter().enumerate() {
            if let Err(error) = self.validate_node(sub, value, visited) {
                return self.fail(ValidationErrorKind::AllOfBranchFailed {
                    index,
                    message: error.message(),
                });
            }
        }
        Ok(())
    }

    fn check_any_of(
        &mut self,
        node: &SchemaNode,
        value: &Value,
        visited: &Visited,
    ) -> ValidationResult<()> {
        if node.any_of.is_empty() {
            return Ok(());
        }
        for &sub in &node.any_of {
            let mut branch_visited = visited.clone();
            if self.validate_node(sub, value, &mut branch_visited).is_ok() {
                return Ok(());
            }
        }
        self.fail(ValidationErrorKind::AnyOfNoneMatched)
    }

    fn check_one_of(
        &mut self,
        node: &SchemaNode,
        value: &Value,
        visited: &Visited,
    ) -> ValidationResult<()> {
        if node.one_of.is_empty() {
            return Ok(());
        }
        let mut matched = 0;
        let mut last_message = String::new();
        for &sub in &node.one_of {
            let mut branch_visited = visited.clone();
            match self.validate_node(sub, value, &mut branch_visited) {
                Ok(()) => {
                    matched += 1;
                    if matched > 1 {
                        return self.fail(ValidationErrorKind::OneOfMultipleMatched);
                    }
                }
                Err(error) => last_message = error.message(),
            }
        }
        if matched == 1 {
            Ok(())
        } else {
            self.fail(ValidationErrorKind::OneOfNoneMatched { last_message })
        }
    }

    fn validate_string(&self, node: &SchemaNode, value: &Value) -> ValidationResult<()> {
        let Some(s) = value.as_str() else {
            return Ok(());
        };
        // Length bounds count UTF-16 code units, the value model's string
        // length semantics.
        let length = s.encode_utf16().count();
        if let Some(min) = node.string.min_length
            && length < min
        {
            return self.fail(ValidationErrorKind::StringLengthInvalid {
                length,
                min_length: Some(min),
                max_length: None,
            });
        }
        if let Some(max) = node.string.max_length
            && length > max
        {
            return self.fail(ValidationErrorKind::StringLengthInvalid {
                length,
                min_length: None,
                max_length: Some(max),
            });
        }
        if let Some(pattern) = &node.string.pattern {
            // An unparseable pattern matches nothing.
            let matched = Regex::new(pattern).map(|re| re.is_match(s)).unwrap_or(false);
            if !matched {
                return self.fail(ValidationErrorKind::StringPatternMismatch {
                    value: s.to_string(),
                    pattern: pattern.clone(),
                });
            }
        }
        if let Some(format_name) = &node.string.format
            && let Err(message) = format::check_format(s, format_name)
        {
            return self.fail(ValidationErrorKind::FormatInvalid {
                format: format_name.clone(),
                message,
            });
        }
        Ok(())
    }

    fn validate_number(&self, node: &SchemaNode, value: &Value) -> ValidationResult<()> {
        let Some(number) = value.as_f64() else {
            return Ok(());
        };
        if let Some(divisor) = node.number.multiple_of
            && divisor != 0.0
        {
            let ratio = number / divisor;
            let frac = ratio - ratio.floor();
            if frac.abs() > MULTIPLE_OF_EPSILON && (frac - 1.0).abs() > MULTIPLE_OF_EPSILON {
                return self.fail(ValidationErrorKind::NumberNotMultipleOf {
                    value: number,
                    multiple_of: divisor,
                });
            }
        }
        if let Some(Bound { value: min, exclusive }) = node.number.minimum {
            let ok = if exclusive { number > min } else { number >= min };
            if !ok {
                return self.fail(ValidationErrorKind::NumberOutOfRange {
                    value: number,
                    minimum: Some(min),
                    maximum: None,
                    exclusive,
                });
            }
        }
        if let Some(Bound { value: max, exclusive }) = node.number.maximum {
            let ok = if exclusive { number < max } else { number <= max };
            if !ok {
                return self.fail(ValidationErrorKind::NumberOutOfRange {
                    value: number,
                    minimum: None,
                    maximum: Some(max),
                    exclusive,
                });
            }
        }
        Ok(())
    }

    fn validate_object(
        &mut self,
        id: SchemaId,
        node: &SchemaNode,
        value: &Value,
        visited: &mut Visited,
    ) -> ValidationResult<()> {
        let Some(map) = value.as_object() else {
            return self.fail(ValidationErrorKind::TypeMismatch {
                expected: "object".to_string(),
                got: json_type_name(value).to_string(),
            });
        };

        for required in &node.object.required {
            if !map.contains_key(required) {
                return self.fail(ValidationErrorKind::MissingRequiredProperty {
                    property: required.clone(),
                });
            }
        }

        for (trigger, dependents) in &node.object.dependent_required {
            if map.contains_key(trigger) {
                for dependent in dependents {
                    if !map.contains_key(dependent) {
                        return self.fail(ValidationErrorKind::DependentRequiredMissing {
                            trigger: trigger.clone(),
                            missing: dependent.clone(),
                        });
                    }
                }
            }
        }

        self.check_properties(node, map, visited)?;
        self.check_pattern_properties(node, map, visited)?;

        let sanctioned = self.sanctioned.get(&id).cloned();
        self.check_additional_properties(node, map, sanctioned.as_ref(), visited)?;

        // A self-referential document re-applies the root's property rules at
        // this level, accumulating with the checks above.
        if let Some(root_id) = node.recursive_root {
            self.check_recursive_root(root_id, map)?;
        }

        Ok(())
    }

    fn check_properties(
        &mut self,
        node: &SchemaNode,
        map: &Map<String, Value>,
        visited: &Visited,
    ) -> ValidationResult<()> {
        for (name, &sub) in &node.object.properties {
            if let Some(child) = map.get(name) {
                let mut branch_visited = visited.clone();
                let result =
                    self.with_key(name, |ctx| ctx.validate_node(sub, child, &mut branch_visited));
                if let Err(error) = result {
                    return self.fail(ValidationErrorKind::PropertyInvalid {
                        property: name.clone(),
                        message: error.message(),
                    });
                }
            }
        }
        Ok(())
    }

    fn check_pattern_properties(
        &mut self,
        node: &SchemaNode,
        map: &Map<String, Value>,
        visited: &Visited,
    ) -> ValidationResult<()> {
        for (pattern, sub) in &node.object.pattern_properties {
            // An unparseable pattern matches no keys.
            let Ok(re) = Regex::new(pattern) else {
                continue;
            };
            for (name, child) in map {
                if re.is_match(name) {
                    let mut branch_visited = visited.clone();
                    let result = self.with_key(name, |ctx| {
                        ctx.validate_node(*sub, child, &mut branch_visited)
                    });
                    if let Err(error) = result {
                        return self.fail(ValidationErrorKind::PatternPropertyInvalid {
                            property: name.clone(),
                            pattern: pattern.clone(),
                            message: error.message(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn check_additional_properties(
        &mut self,
        node: &SchemaNode,
        map: &Map<String, Value>,
        sanctioned: Option<&HashSet<String>>,
        visited: &Visited,
    ) -> ValidationResult<()> {
        let covered = |name: &str| {
            node.object.properties.contains_key(name)
                || matches_any_pattern(node, name)
                || sanctioned.is_some_and(|set| set.contains(name))
        };
        match node.object.additional_properties {
            AdditionalProperties::Unconstrained => Ok(()),
            AdditionalProperties::Forbidden => {
                for name in map.keys() {
                    if !covered(name) {
                        return self.fail(ValidationErrorKind::UnknownProperty {
                            property: name.clone(),
                        });
                    }
                }
                Ok(())
            }
            AdditionalProperties::Schema(sub) => {
                for (name, child) in map {
                    if !covered(name) {
                        let mut branch_visited = visited.clone();
                        let result = self.with_key(name, |ctx| {
                            ctx.validate_node(sub, child, &mut branch_visited)
                        });
                        if let Err(error) = result {
                            return self.fail(ValidationErrorKind::AdditionalPropertyInvalid {
                                property: name.clone(),
                                message: error.message(),
                            });
                        }
                    }
                }
                Ok(())
            }
        }
    }

    fn check_recursive_root(
        &mut self,
        root_id: SchemaId,
        map: &Map<String, Value>,
    ) -> ValidationResult<()> {
        let schema = self.schema;
        let root = schema.node(root_id);
        for (name, &sub) in &root.object.properties {
            if let Some(child) = map.get(name) {
                // Cycle tracking restarts here: the root's rules re-apply one
                // value level deeper, so reaching the same node again is
                // progress through the value, not a schema cycle.
                let mut fresh_visited = Visited::new();
                let result =
                    self.with_key(name, |ctx| ctx.validate_node(sub, child, &mut fresh_visited));
                if let Err(error) = result {
                    return self.fail(ValidationErrorKind::PropertyInvalid {
                        property: name.clone(),
                        message: error.message(),
                    });
                }
            }
        }

        let sanctioned = self.sanctioned.get(&root_id).cloned();
        let covered = |name: &str| {
            root.object.properties.contains_key(name)
                || matches_any_pattern(root, name)
                || sanctioned.as_ref().is_some_and(|set| set.contains(name))
        };
        match root.object.additional_properties {
            AdditionalProperties::Unconstrained => {}
            AdditionalProperties::Forbidden => {
                for name in map.keys() {
                    if !covered(name) {
                        return self.fail(ValidationErrorKind::UnknownProperty {
                            property: name.clone(),
                        });
                    }
                }
            }
            AdditionalProperties::Schema(sub) => {
                for (name, child) in map {
                    if !covered(name) {
                        let mut fresh_visited = Visited::new();
                        let result = self.with_key(name, |ctx| {
                            ctx.validate_node(sub, child, &mut fresh_visited)
                        });
                        if let Err(error) = result {
                            return self.fail(ValidationErrorKind::AdditionalPropertyInvalid {
                                property: name.clone(),
                                message: error.message(),
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn validate_array(
        &mut self,
        node: &SchemaNode,
        value: &Value,
        visited: &mut Visited,
    ) -> ValidationResult<()> {
        let Some(items) = value.as_array() else {
            return self.fail(ValidationErrorKind::TypeMismatch {
                expected: "array".to_string(),
                got: json_type_name(value).to_string(),
            });
        };

        if let Some(min) = node.array.min_items
            && items.len() < min
        {
            return self.fail(ValidationErrorKind::ArrayLengthInvalid {
                length: items.len(),
                min_items: Some(min),
                max_items: None,
            });
        }
        if let Some(max) = node.array.max_items
            && items.len() > max
        {
            return self.fail(ValidationErrorKind::ArrayLengthInvalid {
                length: items.len(),
                min_items: None,
                max_items: Some(max),
            });
        }

        if node.array.unique_items {
            for i in 0..items.len() {
                for j in (i + 1)..items.len() {
                    if items[i] == items[j] {
                        return self.fail(ValidationErrorKind::ArrayItemsNotUnique);
                    }
                }
            }
        }

        if let Some(sub) = node.array.items {
            for (index, element) in items.iter().enumerate() {
                let mut branch_visited = visited.clone();
                let result = self.with_index(index, |ctx| {
                    ctx.validate_node(sub, element, &mut branch_visited)
                });
                if let Err(error) = result {
                    return self.fail(ValidationErrorKind::ItemInvalid {
                        index,
                        keyword: "items".to_string(),
                        message: error.message(),
                    });
                }
            }
        } else if !node.array.prefix_items.is_empty() {
            let prefix_len = node.array.prefix_items.len().min(items.len());
            for index in 0..prefix_len {
                let sub = node.array.prefix_items[index];
                let mut branch_visited = visited.clone();
                let result = self.with_index(index, |ctx| {
                    ctx.validate_node(sub, &items[index], &mut branch_visited)
                });
                if let Err(error) = result {
                    return self.fail(ValidationErrorKind::ItemInvalid {
                        index,
                        keyword: "prefixItems".to_string(),
                        message: error.message(),
                    });
                }
            }
            if let Some(sub) = node.array.additional_items {
                for (index, element) in items.iter().enumerate().skip(prefix_len) {
                    let mut branch_visited = visited.clone();
                    let result = self.with_index(index, |ctx| {
                        ctx.validate_node(sub, element, &mut branch_visited)
                    });
                    if let Err(error) = result {
                        return self.fail(ValidationErrorKind::ItemInvalid {
                            index,
                            keyword: "additionalItems".to_string(),
                            message: error.message(),
                        });
                    }
                }
            }
            // Elements past the prefix with no additionalItems schema are
            // accepted.
        }

        if let Some(sub) = node.array.contains {
            let mut count = 0;
            for element in items {
                let mut branch_visited = visited.clone();
                if self.probe(sub, element, &mut branch_visited) {
                    count += 1;
                }
            }
            if let Some(min) = node.array.min_contains
                && count < min
            {
                return self.fail(ValidationErrorKind::ContainsCountInvalid {
                    count,
                    min_contains: Some(min),
                    max_contains: None,
                });
            }
            if let Some(max) = node.array.max_contains
                && count > max
            {
                return self.fail(ValidationErrorKind::ContainsCountInvalid {
                    count,
                    min_contains: None,
                    max_contains: Some(max),
                });
            }
            if node.array.min_contains.is_none()
                && node.array.max_contains.is_none()
                && count == 0
            {
                return self.fail(ValidationErrorKind::ContainsCountInvalid {
                    count: 0,
                    min_contains: None,
                    max_contains: None,
                });
            }
        }

        Ok(())
    }
}

fn matches_any_pattern(node: &SchemaNode, name: &str) -> bool {
    node.object.pattern_properties.iter().any(|(pattern, _)| {
        Regex::new(pattern)
            .map(|re| re.is_match(name))
            .unwrap_or(false)
    })
}

/// Human-readable type name of a JSON value; whole numbers read as integers
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) => {
            if number.as_f64().map(|f| f.fract() == 0.0).unwrap_or(false) {
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

/// Compact rendering of a value for diagnostics
fn short_value(value: &Value) -> String {
    let rendered = value.to_string();
    if rendered.chars().count() > 60 {
        let truncated: String = rendered.chars().take(60).collect();
        format!("{truncated}...")
    } else {
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::KeywordRegistry;
    use serde_json::json;

    fn compile(document: Value) -> CompiledSchema {
        CompiledSchema::from_value(&document, &KeywordRegistry::new())
    }

    fn check(document: Value, value: Value) -> ValidationResult<()> {
        compile(document).validate(&value)
    }

    // ==================== Type Tests ====================

    #[test]
    fn test_declared_type() {
        assert!(check(json!({"type": "string"}), json!("hello")).is_ok());
        assert!(check(json!({"type": "string"}), json!(3)).is_err());
        assert!(check(json!({"type": "boolean"}), json!(true)).is_ok());
        assert!(check(json!({"type": "null"}), json!(null)).is_ok());
        assert!(check(json!({"type": "null"}), json!(0)).is_err());
    }

    #[test]
    fn test_integer_requires_zero_fraction() {
        assert!(check(json!({"type": "integer"}), json!(4)).is_ok());
        assert!(check(json!({"type": "integer"}), json!(4.0)).is_ok());
        assert!(check(json!({"type": "integer"}), json!(4.5)).is_err());
    }

    #[test]
    fn test_unconstrained_schema_accepts_anything() {
        let schema = compile(json!({"description": "no constraints"}));
        for value in [json!(null), json!(42), json!("x"), json!([1]), json!({"a": 1})] {
            assert!(schema.validate(&value).is_ok());
        }
    }

    // ==================== Number Tests ====================

    #[test]
    fn test_bounds_inclusive_and_exclusive() {
        let schema = json!({"type": "number", "minimum": 1, "exclusiveMaximum": 10});
        assert!(check(schema.clone(), json!(1)).is_ok());
        assert!(check(schema.clone(), json!(9.99)).is_ok());
        assert!(check(schema.clone(), json!(10)).is_err());
        assert!(check(schema, json!(0.5)).is_err());
    }

    #[test]
    fn test_multiple_of_tolerates_float_error() {
        let schema = json!({"type": "number", "multipleOf": 0.1});
        // 0.3 / 0.1 is not exactly 3.0 in binary floating point
        assert!(check(schema.clone(), json!(0.3)).is_ok());
        assert!(check(schema, json!(0.35)).is_err());
    }

    // ==================== String Tests ====================

    #[test]
    fn test_string_length_counts_utf16_units() {
        let schema = json!({"type": "string", "maxLength": 2});
        assert!(check(schema.clone(), json!("ab")).is_ok());
        // One astral-plane char is two UTF-16 code units
        assert!(check(schema.clone(), json!("𝄞")).is_ok());
        assert!(check(schema, json!("𝄞a")).is_err());
    }

    #[test]
    fn test_pattern_and_format() {
        let schema = json!({"type": "string", "pattern": "^[a-z]+$"});
        assert!(check(schema.clone(), json!("abc")).is_ok());
        assert!(check(schema, json!("Abc")).is_err());

        let schema = json!({"type": "string", "format": "ipv4"});
        assert!(check(schema.clone(), json!("10.0.0.1")).is_ok());
        assert!(check(schema, json!("10.0.0.999")).is_err());
    }

    // ==================== Enum / Const Tests ====================

    #[test]
    fn test_enum_membership() {
        let schema = json!({"enum": ["red", "green", 3]});
        assert!(check(schema.clone(), json!("green")).is_ok());
        assert!(check(schema.clone(), json!(3)).is_ok());
        assert!(check(schema, json!("blue")).is_err());
    }

    #[test]
    fn test_const_equality() {
        let schema = json!({"const": {"a": [1, 2]}});
        assert!(check(schema.clone(), json!({"a": [1, 2]})).is_ok());
        assert!(check(schema, json!({"a": [2, 1]})).is_err());
    }

    // ==================== Combinator Tests ====================

    #[test]
    fn test_empty_combinator_lists_pass() {
        assert!(check(json!({"allOf": []}), json!(1)).is_ok());
        assert!(check(json!({"anyOf": []}), json!(1)).is_ok());
        assert!(check(json!({"oneOf": []}), json!(1)).is_ok());
    }

    #[test]
    fn test_all_of_reports_branch_index() {
        let schema = json!({"allOf": [{"type": "number"}, {"minimum": 10}]});
        let error = check(schema, json!(5)).unwrap_err();
        assert!(error.message().starts_with("allOf[1] failed:"));
    }

    #[test]
    fn test_one_of_exactly_one() {
        let schema = json!({"oneOf": [{"type": "string"}, {"type": "number"}]});
        assert!(check(schema, json!("x")).is_ok());

        let overlapping = json!({"oneOf": [{"minimum": 0}, {"maximum": 100}]});
        let error = check(overlapping, json!(50)).unwrap_err();
        assert_eq!(error.kind, ValidationErrorKind::OneOfMultipleMatched);
    }

    #[test]
    fn test_not_inverts() {
        let schema = json!({"not": {"type": "string"}});
        assert!(check(schema.clone(), json!(1)).is_ok());
        let error = check(schema, json!("nope")).unwrap_err();
        assert_eq!(error.kind, ValidationErrorKind::NotForbidden);
    }

    // ==================== Custom Keyword Tests ====================

    #[test]
    fn test_custom_keyword_runs_after_builtins() {
        let mut keywords = KeywordRegistry::new();
        keywords.register("dividedBy", |rules, value| {
            let divisor = rules.as_i64().unwrap_or(0);
            let number = value.as_f64().ok_or("value is not a number")?;
            if divisor != 0 && number % divisor as f64 == 0.0 {
                Ok(())
            } else {
                Err(format!("value {number} is not a multiple of {divisor}"))
            }
        });
        let schema = CompiledSchema::from_value(
            &json!({"type": "number", "dividedBy": 3}),
            &keywords,
        );
        assert!(schema.validate(&json!(9)).is_ok());
        let error = schema.validate(&json!(7)).unwrap_err();
        assert_eq!(
            error.message(),
            "Validation failed with error: value 7 is not a multiple of 3"
        );
    }

    // ==================== Breadcrumb Tests ====================

    #[test]
    fn test_nested_failures_wrap_context() {
        let schema = json!({
            "type": "object",
            "properties": {"servers": {"type": "array", "items": {"type": "string"}}}
        });
        let error = check(schema, json!({"servers": ["ok", 3]})).unwrap_err();
        // The reported failure wraps the leaf message with property context
        assert!(error.message().contains("property 'servers' is invalid"));
        assert!(error.message().contains("element [1] is invalid (items)"));
    }
}
