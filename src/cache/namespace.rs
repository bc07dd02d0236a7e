//! Namespace Module
//!
//! Maps logical cache keys to backend keys.

use crate::cache::pattern::WILDCARD;
use crate::error::{CacheError, Result};

/// Separator between the namespace and the logical key
pub const SEPARATOR: char = ':';

// == Namespace ==
/// A key prefix isolating one logical cache from others sharing a backend.
///
/// Backend keys are `"{namespace}:{logical}"`. An empty namespace leaves keys
/// untouched. Names never contain the separator, so the prefix ends at the
/// first separator of a backend key and two non-empty namespaces never share
/// a backend key, whatever characters the logical keys hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    prefix: String,
}

impl Namespace {
    /// Creates a namespace.
    ///
    /// Fails if the name contains the glob wildcard, which would make
    /// namespaced scan patterns match keys outside the namespace, or the
    /// separator, which would let two namespaces share backend keys.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if let Some(reserved) = name.chars().find(|c| *c == WILDCARD || *c == SEPARATOR) {
            return Err(CacheError::InvalidConfig(format!(
                "Namespace '{}' must not contain '{}'",
                name, reserved
            )));
        }

        let prefix = if name.is_empty() {
            name
        } else {
            format!("{}{}", name, SEPARATOR)
        };
        Ok(Self { prefix })
    }

    /// Returns the namespace name without the separator.
    pub fn name(&self) -> &str {
        self.prefix.strip_suffix(SEPARATOR).unwrap_or(&self.prefix)
    }

    /// Returns the prefix shared by every backend key in this namespace.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Builds the backend key for a logical key.
    pub fn key(&self, logical: &str) -> String {
        format!("{}{}", self.prefix, logical)
    }

    /// Builds the backend scan pattern for a logical glob pattern.
    pub fn pattern(&self, logical_pattern: &str) -> String {
        self.key(logical_pattern)
    }

    /// Recovers the logical key from a backend key, if it belongs here.
    pub fn strip<'a>(&self, backend_key: &'a str) -> Option<&'a str> {
        backend_key.strip_prefix(self.prefix.as_str())
    }
}
