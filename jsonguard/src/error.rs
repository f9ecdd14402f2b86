//! Error types for schema building and validation.
//!
//! Two families:
//!
//! * [`ConfigError`] is a fault in the program itself: a rule string naming
//!   an unknown rule, a sibling rule pointing at a field that does not exist,
//!   a numeric rule parameter that does not parse. These never depend on the
//!   payload and should be fixed in code.
//! * [`ValidationError`] is what a validation call returns. It is exactly one
//!   of malformed JSON, an oversized payload, a populated [`ErrorBag`], a
//!   strict-decode failure, or a wrapped [`ConfigError`].

use thiserror::Error;

use crate::bag::ErrorBag;

/// Configuration fault raised while resolving rules or walking a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A rule string references a name registered nowhere.
    #[error("undefined validation rule: {0}")]
    UnknownRule(String),

    /// Aliases point at each other without ever reaching a rule.
    #[error("alias cycle detected starting at: {0}")]
    AliasCycle(String),

    /// Composite templates expand into each other.
    #[error("composite cycle detected: {}", .0.join(" -> "))]
    CompositeCycle(Vec<String>),

    /// A composite template uses `$n` but the invocation has fewer parameters.
    #[error("composite '{composite}' references parameter ${index} which was not supplied")]
    MissingCompositeParameter { composite: String, index: usize },

    /// Schema analysis was asked for a type that is not a record.
    #[error("cannot analyze {type_name}: expected a record, found a {kind}")]
    NotARecord {
        type_name: &'static str,
        kind: &'static str,
    },

    /// A sibling rule names a field that is not declared on the parent.
    #[error("field '{field}' referenced from '{path}' does not exist")]
    UnknownSibling { field: String, path: String },

    /// A rule read a positional parameter that was not supplied.
    #[error("rule '{rule}' requires parameter #{index}")]
    MissingParameter { rule: String, index: usize },

    /// A rule parameter could not be parsed as the expected type.
    #[error("rule '{rule}' parameter #{index} ('{value}') is not a valid {expected}")]
    InvalidParameter {
        rule: String,
        index: usize,
        value: String,
        expected: &'static str,
    },

    /// A `regex` rule was given a pattern that does not compile.
    #[error("rule '{rule}' has an invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        reason: String,
    },
}

/// Error returned from a validation call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// The payload is not syntactically valid JSON.
    #[error("malformed JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    /// The payload exceeds the configured size limit.
    #[error("payload too large: {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    /// One or more rules failed.
    #[error("{0}")]
    Invalid(ErrorBag),

    /// Rules passed but the payload does not decode into the target type.
    #[error("failed to decode payload: {0}")]
    Decode(#[source] serde_json::Error),

    /// A configuration fault surfaced during the run.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ValidationError {
    /// The error bag, if this is a rule failure.
    pub fn error_bag(&self) -> Option<&ErrorBag> {
        match self {
            Self::Invalid(bag) => Some(bag),
            _ => None,
        }
    }

    /// Consume the error and return the error bag, if this is a rule failure.
    pub fn into_error_bag(self) -> Option<ErrorBag> {
        match self {
            Self::Invalid(bag) => Some(bag),
            _ => None,
        }
    }

    /// Returns true if this error is a programming fault rather than bad input.
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<ErrorBag> for ValidationError {
    fn from(bag: ErrorBag) -> Self {
        Self::Invalid(bag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::UnknownRule("nope".to_string()).to_string(),
            "undefined validation rule: nope"
        );
        assert_eq!(
            ConfigError::CompositeCycle(vec!["a".into(), "b".into(), "a".into()]).to_string(),
            "composite cycle detected: a -> b -> a"
        );
        assert_eq!(
            ConfigError::InvalidParameter {
                rule: "lenMin".into(),
                index: 0,
                value: "x".into(),
                expected: "integer",
            }
            .to_string(),
            "rule 'lenMin' parameter #0 ('x') is not a valid integer"
        );
    }

    #[test]
    fn test_validation_error_accessors() {
        let mut bag = ErrorBag::new();
        bag.add_error("Data", "[required]: Is a required non-nullable field");
        let err = ValidationError::from(bag);
        assert!(!err.is_fault());
        assert_eq!(err.error_bag().map(ErrorBag::len), Some(1));

        let fault = ValidationError::from(ConfigError::UnknownRule("x".into()));
        assert!(fault.is_fault());
        assert!(fault.error_bag().is_none());
        assert_eq!(fault.to_string(), "undefined validation rule: x");
    }

    #[test]
    fn test_payload_too_large_display() {
        let err = ValidationError::PayloadTooLarge {
            size: 2048,
            limit: 1024,
        };
        assert_eq!(
            err.to_string(),
            "payload too large: 2048 bytes exceeds limit of 1024 bytes"
        );
    }
}
