// Error types for schema compilation and validation

use std::fmt;
use thiserror::Error;

/// Errors that can occur while reading a schema document.
///
/// These never escape the compiler: loading is fail-soft, so every variant is
/// reported through `tracing` and turned into an invalid schema node.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The document could not be read from disk
    #[error("failed to read schema document '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON
    #[error("schema document '{path}' is not valid JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed but is not a JSON object
    #[error("schema document '{path}' is not a JSON object")]
    NotAnObject { path: String },

    /// The document is an empty JSON object
    #[error("schema document '{path}' is empty")]
    EmptyDocument { path: String },
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Structured validation error kinds
///
/// Composite kinds (properties, array elements, combinator branches) carry the
/// nested failure pre-rendered as a message, so a single diagnostic string
/// walks down to the failing leaf.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ValidationErrorKind {
    /// Type mismatch
    TypeMismatch { expected: String, got: String },

    /// Value not listed in `enum`
    NotInEnum { value: String },

    /// Value differs from `const`
    ConstMismatch { value: String },

    /// Number out of range; only the violated bound is set
    NumberOutOfRange {
        value: f64,
        minimum: Option<f64>,
        maximum: Option<f64>,
        exclusive: bool,
    },

    /// Number not a multiple of `multipleOf`
    NumberNotMultipleOf { value: f64, multiple_of: f64 },

    /// String length out of bounds; only the violated bound is set
    StringLengthInvalid {
        length: usize,
        min_length: Option<usize>,
        max_length: Option<usize>,
    },

    /// String does not match `pattern`
    StringPatternMismatch { value: String, pattern: String },

    /// String fails a named `format` check
    FormatInvalid { format: String, message: String },

    /// Array length out of bounds; only the violated bound is set
    ArrayLengthInvalid {
        length: usize,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },

    /// Duplicate element found under `uniqueItems`
    ArrayItemsNotUnique,

    /// Element count matching `contains` out of bounds; both bounds absent
    /// means no element matched at all
    ContainsCountInvalid {
        count: usize,
        min_contains: Option<usize>,
        max_contains: Option<usize>,
    },

    /// An array element failed its item schema; `keyword` names which of
    /// `items` / `prefixItems` / `additionalItems` applied
    ItemInvalid {
        index: usize,
        keyword: String,
        message: String,
    },

    /// Missing required property
    MissingRequiredProperty { property: String },

    /// A property required by `dependentRequired` is missing
    DependentRequiredMissing { trigger: String, missing: String },

    /// A declared property failed its schema
    PropertyInvalid { property: String, message: String },

    /// A property matched a `patternProperties` entry and failed its schema
    PatternPropertyInvalid {
        property: String,
        pattern: String,
        message: String,
    },

    /// Property rejected by `additionalProperties: false`
    UnknownProperty { property: String },

    /// A property failed the `additionalProperties` schema
    AdditionalPropertyInvalid { property: String, message: String },

    /// An `allOf` branch failed
    AllOfBranchFailed { index: usize, message: String },

    /// No `anyOf` branch passed
    AnyOfNoneMatched,

    /// No `oneOf` branch passed; carries the last branch's failure
    OneOfNoneMatched { last_message: String },

    /// More than one `oneOf` branch passed
    OneOfMultipleMatched,

    /// The `not` schema is satisfied
    NotForbidden,

    /// Unresolvable `$ref`
    UnresolvedReference { reference: String },

    /// A schema node was revisited during one validation pass
    SchemaRecursion,

    /// A registered custom keyword rejected the value
    CustomKeywordFailed { keyword: String, message: String },
}

impl ValidationErrorKind {
    /// Format a human-readable message from this error kind
    pub fn message(&self) -> String {
        match self {
            ValidationErrorKind::TypeMismatch { expected, got } => {
                format!("invalid type: expected {}, got {}", expected, got)
            }
            ValidationErrorKind::NotInEnum { value } => {
                format!("value {} is not listed in 'enum'", value)
            }
            ValidationErrorKind::ConstMismatch { value } => {
                format!("value {} differs from 'const'", value)
            }
            ValidationErrorKind::NumberOutOfRange {
                value,
                minimum,
                maximum,
                exclusive,
            } => {
                if let Some(min) = minimum {
                    if *exclusive {
                        format!("{} must be > {} (exclusiveMinimum)", value, min)
                    } else {
                        format!("{} must be >= {}", value, min)
                    }
                } else if let Some(max) = maximum {
                    if *exclusive {
                        format!("{} must be < {} (exclusiveMaximum)", value, max)
                    } else {
                        format!("{} must be <= {}", value, max)
                    }
                } else {
                    format!("{} is out of range", value)
                }
            }
            ValidationErrorKind::NumberNotMultipleOf { value, multiple_of } => {
                format!("{} is not a multiple of {}", value, multiple_of)
            }
            ValidationErrorKind::StringLengthInvalid {
                length,
                min_length,
                max_length,
            } => {
                if let Some(min) = min_length {
                    format!("string length {} is less than minLength {}", length, min)
                } else if let Some(max) = max_length {
                    format!("string length {} is greater than maxLength {}", length, max)
                } else {
                    format!("string length {} is invalid", length)
                }
            }
            ValidationErrorKind::StringPatternMismatch { value, pattern } => {
                format!("'{}' does not match pattern '{}'", value, pattern)
            }
            ValidationErrorKind::FormatInvalid { format, message } => {
                format!("invalid '{}' format: {}", format, message)
            }
            ValidationErrorKind::ArrayLengthInvalid {
                length,
                min_items,
                max_items,
            } => {
                if let Some(min) = min_items {
                    format!("too few elements: {} < {}", length, min)
                } else if let Some(max) = max_items {
                    format!("too many elements: {} > {}", length, max)
                } else {
                    format!("array length {} is invalid", length)
                }
            }
            ValidationErrorKind::ArrayItemsNotUnique => {
                "duplicate element found while uniqueItems is true".to_string()
            }
            ValidationErrorKind::ContainsCountInvalid {
                count,
                min_contains,
                max_contains,
            } => {
                if let Some(min) = min_contains {
                    format!("too few elements matching 'contains': {} < {}", count, min)
                } else if let Some(max) = max_contains {
                    format!("too many elements matching 'contains': {} > {}", count, max)
                } else {
                    "no element satisfies 'contains'".to_string()
                }
            }
            ValidationErrorKind::ItemInvalid {
                index,
                keyword,
                message,
            } => {
                format!("element [{}] is invalid ({}): {}", index, keyword, message)
            }
            ValidationErrorKind::MissingRequiredProperty { property } => {
                format!("required property '{}' is missing", property)
            }
            ValidationErrorKind::DependentRequiredMissing { trigger, missing } => {
                format!(
                    "property '{}' is required because '{}' is present",
                    missing, trigger
                )
            }
            ValidationErrorKind::PropertyInvalid { property, message } => {
                format!("property '{}' is invalid: {}", property, message)
            }
            ValidationErrorKind::PatternPropertyInvalid {
                property,
                pattern,
                message,
            } => {
                format!(
                    "property '{}' is invalid (patternProperties / {}): {}",
                    property, pattern, message
                )
            }
            ValidationErrorKind::UnknownProperty { property } => {
                format!(
                    "property '{}' is not allowed (additionalProperties is false)",
                    property
                )
            }
            ValidationErrorKind::AdditionalPropertyInvalid { property, message } => {
                format!(
                    "property '{}' is invalid (additionalProperties): {}",
                    property, message
                )
            }
            ValidationErrorKind::AllOfBranchFailed { index, message } => {
                format!("allOf[{}] failed: {}", index, message)
            }
            ValidationErrorKind::AnyOfNoneMatched => {
                "no schema in 'anyOf' is satisfied".to_string()
            }
            ValidationErrorKind::OneOfNoneMatched { last_message } => {
                format!(
                    "no schema in 'oneOf' is satisfied; last error: {}",
                    last_message
                )
            }
            ValidationErrorKind::OneOfMultipleMatched => {
                "more than one schema in 'oneOf' is satisfied".to_string()
            }
            ValidationErrorKind::NotForbidden => {
                "the 'not' schema is satisfied, which is forbidden".to_string()
            }
            ValidationErrorKind::UnresolvedReference { reference } => {
                format!("cannot resolve reference '{}'", reference)
            }
            ValidationErrorKind::SchemaRecursion => "schema recursion detected".to_string(),
            ValidationErrorKind::CustomKeywordFailed { keyword: _, message } => {
                format!("Validation failed with error: {}", message)
            }
        }
    }
}

/// Validation error: a structured kind plus the instance position it occurred at
#[derive(Debug, Clone, PartialEq, Error)]
#[error("validation error at {instance_path}: {}", .kind.message())]
pub struct ValidationError {
    /// The structured error kind
    pub kind: ValidationErrorKind,
    /// Instance path where the error occurred (e.g., ["servers", "[0]", "port"])
    pub instance_path: InstancePath,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(kind: ValidationErrorKind, instance_path: InstancePath) -> Self {
        Self {
            kind,
            instance_path,
        }
    }

    /// Get the human-readable message for this error, without the path prefix
    pub fn message(&self) -> String {
        self.kind.message()
    }
}

/// Instance path (e.g., ["servers", "[0]", "port"])
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstancePath {
    segments: Vec<PathSegment>,
}

impl InstancePath {
    /// Create a new empty instance path
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Push a key segment onto the path
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    /// Push an index segment onto the path
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    /// Pop the last segment from the path
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Get the segments as a slice
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Check if the path is empty
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "(root)")
        } else {
            for (i, segment) in self.segments.iter().enumerate() {
                if i > 0 {
                    write!(f, ".")?;
                }
                write!(f, "{}", segment)?;
            }
            Ok(())
        }
    }
}

/// A segment in an instance path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object key
    Key(String),
    /// Array index
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "[{}]", index),
        }
    }
}
