//! Keyword parsers, organized by category:
//! - primitive: type-free value constraints (enum, const) and the numeric
//!   and string constraint groups
//! - arrays: items / prefix items / contains and the array bounds
//! - objects: properties / patternProperties / additionalProperties /
//!   required / dependentRequired
//! - combinators: allOf / anyOf / oneOf / not and if / then / else

pub(super) mod arrays;
pub(super) mod combinators;
pub(super) mod objects;
pub(super) mod primitive;
