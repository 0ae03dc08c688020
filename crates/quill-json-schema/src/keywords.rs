//! Custom keyword registration
//!
//! Callers extend the engine with their own keywords by registering a
//! predicate before compiling. During compilation every document key with a
//! registered name is bound, together with its raw rules value, into the
//! owning schema node; during validation the bound entries run after the
//! built-in checks.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Predicate for a registered custom keyword.
///
/// Receives the keyword's raw JSON rules and the value under test; returns
/// `Err` with a message to fail validation.
pub type KeywordCheck = Arc<dyn Fn(&Value, &Value) -> Result<(), String> + Send + Sync>;

/// Table of custom keyword predicates, consulted at compile time.
///
/// The registry is an explicit value owned by the caller and passed to the
/// compiler; two compilations with different registries are fully isolated.
#[derive(Clone, Default)]
pub struct KeywordRegistry {
    checks: HashMap<String, KeywordCheck>,
}

impl KeywordRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate for a keyword; a later registration under the
    /// same name wins
    pub fn register<F>(&mut self, keyword: impl Into<String>, check: F)
    where
        F: Fn(&Value, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.checks.insert(keyword.into(), Arc::new(check));
    }

    /// Look up the predicate for a keyword
    pub fn get(&self, keyword: &str) -> Option<&KeywordCheck> {
        self.checks.get(keyword)
    }

    /// Check whether a keyword is registered
    pub fn contains(&self, keyword: &str) -> bool {
        self.checks.contains_key(keyword)
    }
}

impl fmt::Debug for KeywordRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeywordRegistry")
            .field("keywords", &self.checks.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A custom keyword bound to the rules found in one schema document
#[derive(Clone)]
pub struct CustomRule {
    /// The keyword name as it appeared in the document
    pub keyword: String,
    /// The keyword's raw JSON rules value
    pub rules: Value,
    check: KeywordCheck,
}

impl CustomRule {
    pub(crate) fn new(keyword: String, rules: Value, check: KeywordCheck) -> Self {
        Self {
            keyword,
            rules,
            check,
        }
    }

    /// Run the bound predicate against a value
    pub fn check(&self, value: &Value) -> Result<(), String> {
        (self.check)(&self.rules, value)
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRule")
            .field("keyword", &self.keyword)
            .field("rules", &self.rules)
            .finish()
    }
}

// Predicates are not comparable; two bound rules are equal when they bind the
// same keyword to the same rules value.
impl PartialEq for CustomRule {
    fn eq(&self, other: &Self) -> bool {
        self.keyword == other.keyword && self.rules == other.rules
    }
}
