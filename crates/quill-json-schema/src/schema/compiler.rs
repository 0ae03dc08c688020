//! Schema document loading and compilation
//!
//! The compiler turns a JSON Schema document into arena nodes, wiring
//! `$id` / `$anchor` / `$ref` / `$defs` into the reference directories as a
//! side effect. Loading is fail-soft: I/O errors, JSON parse errors, and
//! empty or non-object documents produce a node with `is_valid == false`
//! instead of an error, and the cause is reported through `tracing`.

use super::helpers;
use super::parsers;
use super::{CompiledSchema, SchemaId, SchemaNode, SchemaType};
use crate::error::SchemaError;
use crate::keywords::{CustomRule, KeywordRegistry};
use crate::registry::RegistryBook;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use url::Url;

/// Compiles one or more schema documents into a shared arena.
///
/// Most callers use [`CompiledSchema::from_value`] or
/// [`CompiledSchema::from_file`]; the compiler is public for setups that load
/// several documents into one artifact before validating.
pub struct Compiler<'k> {
    nodes: Vec<SchemaNode>,
    registries: RegistryBook,
    keywords: &'k KeywordRegistry,
}

impl<'k> Compiler<'k> {
    /// Create a compiler that binds custom keywords from `keywords`
    pub fn new(keywords: &'k KeywordRegistry) -> Self {
        Self {
            nodes: Vec::new(),
            registries: RegistryBook::new(),
            keywords,
        }
    }

    /// Finish compilation, producing the artifact rooted at `root`
    pub fn finish(self, root: SchemaId) -> CompiledSchema {
        CompiledSchema::from_parts(self.nodes, self.registries, root)
    }

    /// Read and compile a schema document from a file path or `file://` URL
    pub fn compile_file(&mut self, locator: &str, parent: Option<SchemaId>) -> SchemaId {
        match read_document(locator) {
            Ok(document) => self.compile_object(&document, parent, locator),
            Err(error) => {
                tracing::warn!(locator, %error, "failed to load schema document");
                self.push_node(parent, locator)
            }
        }
    }

    /// Compile an already-parsed schema document
    pub fn compile_value(&mut self, document: &Value, parent: Option<SchemaId>) -> SchemaId {
        match document.as_object() {
            Some(obj) => self.compile_object(obj, parent, ""),
            None => {
                tracing::warn!("schema document is not a JSON object");
                self.push_node(parent, "")
            }
        }
    }

    /// Compile a schema-valued keyword entry; non-object values are skipped
    pub(super) fn compile_nested(&mut self, value: &Value, parent: SchemaId) -> Option<SchemaId> {
        value
            .as_object()
            .map(|obj| self.compile_object(obj, Some(parent), ""))
    }

    fn compile_object(
        &mut self,
        obj: &Map<String, Value>,
        parent: Option<SchemaId>,
        locator: &str,
    ) -> SchemaId {
        let id = self.push_node(parent, locator);
        if obj.is_empty() {
            // An empty document is invalid as a root but, nested, behaves as
            // an unconstrained schema.
            return id;
        }
        self.nodes[id.index()].is_valid = true;

        // Identity: $id overrides the path-derived locator, then the result
        // resolves against the parent's base URI. Everything below depends on
        // the base URI being settled first.
        let declared = helpers::get_str(obj, "$id")
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let raw_base = declared.unwrap_or_else(|| locator.trim());
        let parent_base = parent.map(|p| self.nodes[p.index()].base_uri.clone());
        let base_uri = resolve_uri(parent_base.as_deref(), raw_base);
        self.nodes[id.index()].base_uri = base_uri.clone();

        if let Some(anchor) = helpers::get_str(obj, "$anchor") {
            let anchor = anchor.trim();
            if !anchor.is_empty() {
                self.nodes[id.index()].anchor = Some(anchor.to_string());
                let key = format!("{base_uri}#{anchor}");
                self.registries.book_mut(&base_uri).register_anchor(&key, id);
            }
        }

        if let Some(reference) = helpers::get_str(obj, "$ref") {
            let reference = reference.trim().to_string();
            self.nodes[id.index()].ref_target = Some(reference.clone());
            if !reference.contains("$def") {
                if !reference.starts_with('#') {
                    // A reference to a sibling document: derive its path next
                    // to this document and load it now. Resolution back to
                    // the loaded node happens lazily, at validation time.
                    let sibling = sibling_path(&base_uri, &reference);
                    let loaded = self.compile_file(&sibling, Some(id));
                    if self.nodes[loaded.index()].is_valid {
                        self.registries
                            .book_mut(&base_uri)
                            .register_ref(&sibling, loaded);
                    } else {
                        tracing::warn!(
                            reference = %reference,
                            "dropping reference to unloadable document"
                        );
                        self.nodes[id.index()].ref_target = None;
                    }
                } else if reference == "#" {
                    let root = self.document_root(id);
                    self.nodes[id.index()].recursive_root = Some(root);
                }
            }
        }

        // $defs / definitions entries compile as free-standing nodes,
        // reachable only through the reference directory.
        for defs_key in ["$defs", "definitions"] {
            if let Some(defs) = helpers::get_object(obj, defs_key) {
                for (name, value) in defs {
                    if let Some(def_obj) = value.as_object() {
                        let def = self.compile_object(def_obj, Some(id), "");
                        let key = format!("#/{defs_key}/{name}");
                        self.registries.book_mut(&base_uri).register_anchor(&key, def);
                    }
                }
            }
        }

        let schema_type = obj.get("type").and_then(SchemaType::parse);
        let (enum_values, const_value) = parsers::primitive::enum_and_const(obj);
        let number = parsers::primitive::number_constraints(obj);
        let string = parsers::primitive::string_constraints(obj);
        let array = parsers::arrays::array_constraints(self, obj, id);
        let object = parsers::objects::object_constraints(self, obj, id);
        let (all_of, any_of, one_of, not_schema) =
            parsers::combinators::combinator_lists(self, obj, id);
        let (if_schema, then_schema, else_schema) =
            parsers::combinators::conditionals(self, obj, id);

        let mut custom_rules = Vec::new();
        for (key, value) in obj {
            if let Some(check) = self.keywords.get(key) {
                custom_rules.push(CustomRule::new(key.clone(), value.clone(), check.clone()));
            }
        }

        let node = &mut self.nodes[id.index()];
        node.schema_type = schema_type;
        node.enum_values = enum_values;
        node.const_value = const_value;
        node.number = number;
        node.string = string;
        node.array = array;
        node.object = object;
        node.all_of = all_of;
        node.any_of = any_of;
        node.one_of = one_of;
        node.not_schema = not_schema;
        node.if_schema = if_schema;
        node.then_schema = then_schema;
        node.else_schema = else_schema;
        node.custom_rules = custom_rules;

        if node.schema_type.is_none() {
            node.schema_type = infer_type(node);
        }

        id
    }

    /// Reserve an arena slot; the node starts invalid and unconstrained
    fn push_node(&mut self, parent: Option<SchemaId>, locator: &str) -> SchemaId {
        let id = SchemaId::new(self.nodes.len());
        self.nodes.push(SchemaNode {
            base_uri: locator.trim().to_string(),
            parent,
            ..SchemaNode::default()
        });
        id
    }

    /// Walk parent links to the node with no parent
    fn document_root(&self, id: SchemaId) -> SchemaId {
        let mut current = id;
        while let Some(parent) = self.nodes[current.index()].parent {
            current = parent;
        }
        current
    }
}

/// Single-family type inference: when no `type` is declared and exactly one
/// type family has constraints present, adopt that family.
fn infer_type(node: &SchemaNode) -> Option<SchemaType> {
    let string = node.string.min_length.is_some()
        || node.string.max_length.is_some()
        || node.string.pattern.is_some()
        || node.string.format.is_some();
    let number = node.number.minimum.is_some()
        || node.number.maximum.is_some()
        || node.number.multiple_of.is_some();
    let object = !node.object.properties.is_empty()
        || !node.object.pattern_properties.is_empty()
        || !node.object.required.is_empty()
        || node.object.additional_properties != super::AdditionalProperties::Unconstrained;
    let array = !node.array.prefix_items.is_empty()
        || node.array.items.is_some()
        || node.array.min_items.is_some()
        || node.array.max_items.is_some();

    let families = [string, number, object, array]
        .iter()
        .filter(|present| **present)
        .count();
    if families != 1 {
        return None;
    }
    if string {
        Some(SchemaType::String)
    } else if number {
        Some(SchemaType::Number)
    } else if object {
        Some(SchemaType::Object)
    } else {
        Some(SchemaType::Array)
    }
}

/// Resolve an identifier against a parent base URI.
///
/// Uses RFC 3986 joining when the base parses as an absolute URL; bare
/// filesystem paths fall back to a directory join.
fn resolve_uri(parent_base: Option<&str>, id: &str) -> String {
    let id = id.trim();
    let Some(base) = parent_base.filter(|base| !base.is_empty()) else {
        return id.to_string();
    };
    if id.is_empty() {
        return base.to_string();
    }
    match Url::parse(base) {
        Ok(base_url) => base_url
            .join(id)
            .map(|resolved| resolved.to_string())
            .unwrap_or_else(|_| id.to_string()),
        Err(_) => {
            if id.contains("://") || id.starts_with('/') {
                id.to_string()
            } else {
                match base.rsplit_once('/') {
                    Some((dir, _)) => format!("{dir}/{id}"),
                    None => id.to_string(),
                }
            }
        }
    }
}

/// Derive the path of a referenced sibling document: the base URI with its
/// last segment replaced by the reference's path portion.
fn sibling_path(base_uri: &str, reference: &str) -> String {
    let ref_path = reference.split('#').next().unwrap_or("");
    let mut segments: Vec<&str> = base_uri.split('/').collect();
    segments.pop();
    segments.push(ref_path);
    segments.join("/")
}

fn read_document(locator: &str) -> Result<Map<String, Value>, SchemaError> {
    let path = match Url::parse(locator) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .unwrap_or_else(|_| PathBuf::from(locator)),
        _ => PathBuf::from(locator),
    };
    let text = fs::read_to_string(&path).map_err(|source| SchemaError::Io {
        path: locator.to_string(),
        source,
    })?;
    let document: Value = serde_json::from_str(&text).map_err(|source| SchemaError::Json {
        path: locator.to_string(),
        source,
    })?;
    match document {
        Value::Object(obj) if !obj.is_empty() => Ok(obj),
        Value::Object(_) => Err(SchemaError::EmptyDocument {
            path: locator.to_string(),
        }),
        _ => Err(SchemaError::NotAnObject {
            path: locator.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AdditionalProperties, Bound};
    use serde_json::json;

    fn compile(document: Value) -> CompiledSchema {
        CompiledSchema::from_value(&document, &KeywordRegistry::new())
    }

    // ==================== Base URI Tests ====================

    #[test]
    fn test_resolve_uri_against_url_base() {
        assert_eq!(
            resolve_uri(Some("https://example.com/a/root.json"), "child.json"),
            "https://example.com/a/child.json"
        );
        assert_eq!(
            resolve_uri(
                Some("https://example.com/a/root.json"),
                "https://other.org/x.json"
            ),
            "https://other.org/x.json"
        );
    }

    #[test]
    fn test_resolve_uri_against_plain_path() {
        assert_eq!(
            resolve_uri(Some("tests/case_1/main.json"), "extra.json"),
            "tests/case_1/extra.json"
        );
        assert_eq!(resolve_uri(None, " spaced.json "), "spaced.json");
        assert_eq!(
            resolve_uri(Some("tests/case_1/main.json"), ""),
            "tests/case_1/main.json"
        );
    }

    #[test]
    fn test_sibling_path() {
        assert_eq!(
            sibling_path("tests/case_1/main.json", "other.json#node"),
            "tests/case_1/other.json"
        );
        assert_eq!(sibling_path("main.json", "other.json"), "other.json");
    }

    // ==================== Keyword Compilation Tests ====================

    #[test]
    fn test_declared_type_and_bounds() {
        let schema = compile(json!({
            "type": "integer",
            "minimum": 1,
            "exclusiveMaximum": 10
        }));
        let root = schema.node(schema.root());
        assert_eq!(root.schema_type, Some(SchemaType::Integer));
        assert_eq!(
            root.number.minimum,
            Some(Bound {
                value: 1.0,
                exclusive: false
            })
        );
        assert_eq!(
            root.number.maximum,
            Some(Bound {
                value: 10.0,
                exclusive: true
            })
        );
    }

    #[test]
    fn test_draft4_exclusive_flag_form() {
        let schema = compile(json!({
            "minimum": 5,
            "exclusiveMinimum": true
        }));
        let root = schema.node(schema.root());
        assert_eq!(
            root.number.minimum,
            Some(Bound {
                value: 5.0,
                exclusive: true
            })
        );
    }

    #[test]
    fn test_items_object_vs_array_shapes() {
        let object_form = compile(json!({"items": {"type": "number"}}));
        let root = object_form.node(object_form.root());
        assert!(root.array.items.is_some());
        assert!(root.array.prefix_items.is_empty());

        let array_form = compile(json!({
            "items": [{"type": "number"}, {"type": "string"}],
            "additionalItems": {"type": "boolean"}
        }));
        let root = array_form.node(array_form.root());
        assert!(root.array.items.is_none());
        assert_eq!(root.array.prefix_items.len(), 2);
        assert!(root.array.additional_items.is_some());
    }

    #[test]
    fn test_additional_properties_states() {
        let forbidden = compile(json!({"additionalProperties": false}));
        assert_eq!(
            forbidden.node(forbidden.root()).object.additional_properties,
            AdditionalProperties::Forbidden
        );

        let unconstrained = compile(json!({"additionalProperties": true, "minLength": 1}));
        assert_eq!(
            unconstrained
                .node(unconstrained.root())
                .object
                .additional_properties,
            AdditionalProperties::Unconstrained
        );

        let schema = compile(json!({"additionalProperties": {"type": "string"}}));
        assert!(matches!(
            schema.node(schema.root()).object.additional_properties,
            AdditionalProperties::Schema(_)
        ));
    }

    // ==================== Type Inference Tests ====================

    #[test]
    fn test_single_family_inference() {
        let schema = compile(json!({"minLength": 2}));
        assert_eq!(
            schema.node(schema.root()).schema_type,
            Some(SchemaType::String)
        );

        let schema = compile(json!({"properties": {"a": {"type": "null"}}}));
        assert_eq!(
            schema.node(schema.root()).schema_type,
            Some(SchemaType::Object)
        );
    }

    #[test]
    fn test_ambiguous_constraints_stay_unconstrained() {
        let schema = compile(json!({"minLength": 2, "minimum": 1}));
        assert_eq!(schema.node(schema.root()).schema_type, None);

        let schema = compile(json!({"enum": [1, "a"]}));
        assert_eq!(schema.node(schema.root()).schema_type, None);
    }

    // ==================== Fail-Soft Tests ====================

    #[test]
    fn test_non_object_document_is_invalid() {
        let schema = compile(json!([1, 2, 3]));
        assert!(!schema.is_valid());

        let schema = compile(json!({}));
        assert!(!schema.is_valid());
    }

    #[test]
    fn test_missing_file_is_invalid() {
        let schema =
            CompiledSchema::from_file("no/such/schema.json", &KeywordRegistry::new());
        assert!(!schema.is_valid());
    }

    // ==================== $defs / $anchor Wiring Tests ====================

    #[test]
    fn test_defs_nodes_are_registered_not_linked() {
        let schema = compile(json!({
            "type": "object",
            "$defs": {
                "port": {"type": "integer", "minimum": 1}
            }
        }));
        // Root plus the $defs entry
        assert_eq!(schema.len(), 2);
        let root = schema.node(schema.root());
        assert!(root.object.properties.is_empty());
    }

    #[test]
    fn test_custom_keyword_binding() {
        let mut keywords = KeywordRegistry::new();
        keywords.register("alwaysFails", |_, _| Err("no".to_string()));

        let schema = CompiledSchema::from_value(
            &json!({"type": "number", "alwaysFails": {"why": "testing"}}),
            &keywords,
        );
        let root = schema.node(schema.root());
        assert_eq!(root.custom_rules.len(), 1);
        assert_eq!(root.custom_rules[0].keyword, "alwaysFails");

        // Same document, empty registry: the keyword is just an unknown key
        let unbound = compile(json!({"type": "number", "alwaysFails": {"why": "testing"}}));
        assert!(unbound.node(unbound.root()).custom_rules.is_empty());
    }
}
