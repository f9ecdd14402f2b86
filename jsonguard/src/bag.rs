//! Path-keyed collection of rule failures.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Rule failures collected during one validation run.
///
/// Keys are dotted paths (`"Child.0.Data"`), values are the messages for that
/// path in the order the rules were declared, each formatted as
/// `"[ruleName]: message"`. Entries are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorBag {
    errors: BTreeMap<String, Vec<String>>,
}

impl ErrorBag {
    /// Create an empty error bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the list at `path`.
    pub fn add_error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(path.into())
            .or_default()
            .push(message.into());
    }

    /// True when no rule failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// True when at least one rule failed.
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Messages recorded for `path`, empty if none.
    pub fn errors_for(&self, path: &str) -> &[String] {
        self.errors.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the rule named `rule` failed at `path`.
    pub fn has_failed(&self, path: &str, rule: &str) -> bool {
        let prefix = format!("[{}]:", rule);
        self.errors_for(path)
            .iter()
            .any(|message| message.starts_with(&prefix))
    }

    /// Paths with at least one failure, in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// Number of distinct failing paths.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Same as [`ErrorBag::is_valid`].
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of messages across all paths.
    pub fn count_errors(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// Iterate over `(path, messages)` pairs.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.errors.iter()
    }

    /// Unwrap into the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.errors
    }
}

impl<'a> IntoIterator for &'a ErrorBag {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for ErrorBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string_pretty(&self.errors).map_err(|_| fmt::Error)?;
        write!(f, "Validation Errors: \n{}", rendered)
    }
}

impl std::error::Error for ErrorBag {}
