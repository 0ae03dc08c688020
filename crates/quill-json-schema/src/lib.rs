// JSON Schema validation
//
// This crate compiles a JSON Schema document into an immutable, index-addressed
// schema graph and validates serde_json values against it. Compilation is
// fail-soft: unreadable or malformed documents produce an invalid root node
// rather than an error, and callers check `CompiledSchema::is_valid` before
// validating.

pub mod error;
pub mod format;
pub mod keywords;
pub mod registry;
pub mod schema;
pub mod validator;

pub use error::{
    InstancePath, PathSegment, SchemaError, ValidationError, ValidationErrorKind,
    ValidationResult,
};
pub use keywords::{CustomRule, KeywordCheck, KeywordRegistry};
pub use registry::{RefRegistry, RefResolution, RegistryBook};
pub use schema::{
    AdditionalProperties, Bound, CompiledSchema, Compiler, SchemaId, SchemaNode, SchemaType,
};
pub use validator::validate;
