//! Reference directories for `$ref` resolution
//!
//! Every distinct base URI gets its own directory of anchors and loaded
//! documents. Resolution is best-effort: `$ref` values appear in several
//! shapes in the wild (absolute URI plus anchor, bare anchor, relative path
//! plus anchor), so the lookup tries increasingly fuzzy matches and reports
//! whether the hit was exact. Callers must treat an approximate hit as a
//! stepping stone and retry resolution from the hit's own base URI.

use crate::schema::SchemaId;
use std::collections::{BTreeMap, HashMap};

/// Outcome of a best-effort `$ref` lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefResolution {
    /// The reference resolved to a registered node
    Exact(SchemaId),
    /// A registered ref-path merely ends with the reference's document part;
    /// resolution should be retried from the hit's own base URI
    Approximate(SchemaId),
    /// Nothing registered matches
    NotFound,
}

/// Anchor and ref-path directory for one base URI
#[derive(Debug, Clone, Default)]
pub struct RefRegistry {
    /// "base#anchor", "#anchor", "#/$defs/name" keys
    by_anchor: HashMap<String, SchemaId>,
    /// Document paths loaded to satisfy external refs.
    /// Ordered so the suffix scan below is deterministic.
    by_ref: BTreeMap<String, SchemaId>,
}

impl RefRegistry {
    /// Register a node under an anchor key; empty keys are ignored, a later
    /// registration under the same key wins
    pub fn register_anchor(&mut self, key: &str, id: SchemaId) {
        if !key.is_empty() {
            self.by_anchor.insert(key.to_string(), id);
        }
    }

    /// Register an externally loaded document under its derived path
    pub fn register_ref(&mut self, path: &str, id: SchemaId) {
        if !path.is_empty() {
            self.by_ref.insert(path.to_string(), id);
        }
    }

    /// Layered best-effort lookup; see the module docs for the contract
    pub fn resolve(&self, reference: &str, base_uri: &str) -> RefResolution {
        // Strip the portions of the reference that duplicate the base URI or
        // its last path segment, then try the remainder as an anchor key.
        let base_segment = base_uri.rsplit('/').next().unwrap_or("");
        let mut local_ref = reference;
        if let Some(rest) = local_ref.strip_prefix(base_uri) {
            local_ref = rest;
        }
        if !base_segment.is_empty()
            && let Some(rest) = local_ref.strip_prefix(base_segment)
        {
            local_ref = rest;
        }
        if let Some(&id) = self.by_anchor.get(local_ref) {
            return RefResolution::Exact(id);
        }

        let (id_part, anchor) = match reference.split_once('#') {
            Some((id_part, anchor)) => (id_part.trim(), anchor.trim()),
            None => (reference, ""),
        };

        // A bare "#anchor" reference may be registered in either short or
        // fully qualified form.
        if id_part.is_empty() {
            if let Some(&id) = self.by_anchor.get(&format!("#{anchor}")) {
                return RefResolution::Exact(id);
            }
            if let Some(&id) = self.by_anchor.get(&format!("{base_uri}#{anchor}")) {
                return RefResolution::Exact(id);
            }
        }

        if let Some(&id) = self.by_anchor.get(&format!("{base_uri}#{anchor}")) {
            return RefResolution::Exact(id);
        }

        // Last resort: a loaded document whose path ends with the reference's
        // document part. Approximate, since the path may belong to another
        // base-URI neighborhood.
        if !id_part.is_empty() {
            for (key, &id) in &self.by_ref {
                if key.ends_with(id_part) {
                    return RefResolution::Approximate(id);
                }
            }
        }

        RefResolution::NotFound
    }
}

/// Per-base-URI collection of reference directories.
///
/// Owned by the compiled schema; there is no process-wide registry state.
/// Base URIs are compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct RegistryBook {
    books: HashMap<String, RefRegistry>,
}

impl RegistryBook {
    /// Create an empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the directory for a base URI
    pub fn book_mut(&mut self, base_uri: &str) -> &mut RefRegistry {
        self.books.entry(base_uri.to_lowercase()).or_default()
    }

    /// Resolve a reference against the directory of a base URI
    pub fn resolve(&self, reference: &str, base_uri: &str) -> RefResolution {
        match self.books.get(&base_uri.to_lowercase()) {
            Some(book) => book.resolve(reference, base_uri),
            None => RefResolution::NotFound,
        }
    }
}
