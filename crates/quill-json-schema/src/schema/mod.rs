//! Compiled schema representation
//!
//! A schema document compiles into an arena of [`SchemaNode`]s addressed by
//! stable [`SchemaId`] indices. Ownership edges (items, properties,
//! combinators, conditionals, `$defs` entries, externally loaded documents)
//! and weak edges (`parent`, `recursive_root`, registry entries) are all plain
//! indices, so the graph has no destruction ordering and cloning the whole
//! [`CompiledSchema`] keeps every internal reference valid.

mod compiler;
mod helpers;
mod parsers;

pub use compiler::Compiler;

use crate::error::ValidationError;
use crate::keywords::{CustomRule, KeywordRegistry};
use crate::registry::RegistryBook;
use crate::validator;
use serde_json::Value;
use std::collections::BTreeMap;

/// Stable index of a schema node within its arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(u32);

impl SchemaId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Declared (or inferred) type of a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

impl SchemaType {
    /// Parse the `type` keyword's value; unknown or non-string values are
    /// treated as absent
    pub(crate) fn parse(value: &Value) -> Option<Self> {
        match value.as_str()?.trim().to_lowercase().as_str() {
            "string" => Some(SchemaType::String),
            "number" => Some(SchemaType::Number),
            "integer" => Some(SchemaType::Integer),
            "boolean" => Some(SchemaType::Boolean),
            "object" => Some(SchemaType::Object),
            "array" => Some(SchemaType::Array),
            "null" => Some(SchemaType::Null),
            _ => None,
        }
    }

    /// Runtime kind of a JSON value, for dispatch when no type is declared
    pub(crate) fn of_value(value: &Value) -> Self {
        match value {
            Value::String(_) => SchemaType::String,
            Value::Number(_) => SchemaType::Number,
            Value::Bool(_) => SchemaType::Boolean,
            Value::Object(_) => SchemaType::Object,
            Value::Array(_) => SchemaType::Array,
            Value::Null => SchemaType::Null,
        }
    }

    /// Does a JSON value satisfy this declared type?
    pub(crate) fn matches(self, value: &Value) -> bool {
        match self {
            SchemaType::String => value.is_string(),
            SchemaType::Number => value.is_number(),
            SchemaType::Integer => match value.as_f64() {
                Some(n) => n.fract() == 0.0,
                None => false,
            },
            SchemaType::Boolean => value.is_boolean(),
            SchemaType::Object => value.is_object(),
            SchemaType::Array => value.is_array(),
            SchemaType::Null => value.is_null(),
        }
    }

    /// Keyword-style name, used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::Null => "null",
        }
    }
}

/// Inclusive or exclusive numeric bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub value: f64,
    pub exclusive: bool,
}

/// Three-way `additionalProperties` state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AdditionalProperties {
    /// Keyword absent or `true`
    #[default]
    Unconstrained,
    /// `additionalProperties: false`
    Forbidden,
    /// `additionalProperties: { ... }`
    Schema(SchemaId),
}

/// Numeric constraints
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumberConstraints {
    pub multiple_of: Option<f64>,
    pub minimum: Option<Bound>,
    pub maximum: Option<Bound>,
}

/// String constraints. Lengths count UTF-16 code units.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StringConstraints {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub format: Option<String>,
}

/// Array constraints.
///
/// `items` and `prefix_items` are mutually exclusive per node, set by
/// whichever shape (object vs array) appeared under the `items` keyword.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrayConstraints {
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub unique_items: bool,
    pub items: Option<SchemaId>,
    pub prefix_items: Vec<SchemaId>,
    pub additional_items: Option<SchemaId>,
    pub contains: Option<SchemaId>,
    pub min_contains: Option<usize>,
    pub max_contains: Option<usize>,
}

/// Object constraints.
///
/// `properties` and `dependent_required` iterate in key order so that which
/// failure gets reported first is deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectConstraints {
    pub properties: BTreeMap<String, SchemaId>,
    pub pattern_properties: Vec<(String, SchemaId)>,
    pub additional_properties: AdditionalProperties,
    pub required: Vec<String>,
    pub dependent_required: BTreeMap<String, Vec<String>>,
}

/// One compiled schema (sub-)document.
///
/// Immutable after compilation; all per-validation state lives in the
/// validator's call context.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaNode {
    /// Resolved absolute identifier, inherited or overridden via `$id`
    pub base_uri: String,
    /// The `$anchor` value, if declared
    pub anchor: Option<String>,
    /// The raw `$ref` string; a non-`"#"` value defers all other local
    /// validation to the resolved target
    pub ref_target: Option<String>,

    /// Declared type, or the single-family inference result; `None` means
    /// unconstrained
    pub schema_type: Option<SchemaType>,
    /// Allowed values under `enum`, in document order
    pub enum_values: Vec<Value>,
    /// Required value under `const`
    pub const_value: Option<Value>,

    pub number: NumberConstraints,
    pub string: StringConstraints,
    pub array: ArrayConstraints,
    pub object: ObjectConstraints,

    pub all_of: Vec<SchemaId>,
    pub any_of: Vec<SchemaId>,
    pub one_of: Vec<SchemaId>,
    pub not_schema: Option<SchemaId>,

    pub if_schema: Option<SchemaId>,
    pub then_schema: Option<SchemaId>,
    pub else_schema: Option<SchemaId>,

    /// Custom keywords bound at compile time, in document order
    pub custom_rules: Vec<CustomRule>,

    /// Enclosing node; used to find the document root for self-references
    pub parent: Option<SchemaId>,
    /// Document root, set when `$ref` is exactly `"#"`
    pub recursive_root: Option<SchemaId>,
    /// Whether the document compiled successfully; callers must check this
    /// before validating
    pub is_valid: bool,
}

/// A fully compiled schema document: node arena plus reference directories.
///
/// Cloning copies the arena and the registries together, so every `SchemaId`
/// inside the clone resolves within the clone. There is no node-local copy
/// operation.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    nodes: Vec<SchemaNode>,
    registries: RegistryBook,
    root: SchemaId,
}

impl CompiledSchema {
    /// Compile an already-parsed schema document.
    ///
    /// Fail-soft: a non-object or empty document yields an artifact whose
    /// root is invalid, not an error.
    pub fn from_value(document: &Value, keywords: &KeywordRegistry) -> Self {
        let mut compiler = Compiler::new(keywords);
        let root = compiler.compile_value(document, None);
        compiler.finish(root)
    }

    /// Read, parse, and compile a schema document from a file path or
    /// `file://` URL. Same fail-soft contract as [`CompiledSchema::from_value`].
    pub fn from_file(locator: &str, keywords: &KeywordRegistry) -> Self {
        let mut compiler = Compiler::new(keywords);
        let root = compiler.compile_file(locator, None);
        compiler.finish(root)
    }

    pub(crate) fn from_parts(
        nodes: Vec<SchemaNode>,
        registries: RegistryBook,
        root: SchemaId,
    ) -> Self {
        Self {
            nodes,
            registries,
            root,
        }
    }

    /// Did the root document compile successfully?
    pub fn is_valid(&self) -> bool {
        self.node(self.root).is_valid
    }

    /// The root node's id
    pub fn root(&self) -> SchemaId {
        self.root
    }

    /// Look up a node by id
    pub fn node(&self, id: SchemaId) -> &SchemaNode {
        &self.nodes[id.index()]
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty (never true for a compiled artifact)
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn registries(&self) -> &RegistryBook {
        &self.registries
    }

    /// Validate a JSON value against this schema
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        validator::validate(self, value)
    }
}
