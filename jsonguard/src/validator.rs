//! The validator facade.
//!
//! A [`Validator`] owns a rule registry, a schema cache and its
//! configuration. It is `Send + Sync`; share one instance behind an `Arc`
//! and call it from as many threads as needed.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::bag::ErrorBag;
use crate::config::{ConfigValidationError, ValidatorConfig};
use crate::engine::Engine;
use crate::error::{ConfigError, ValidationError};
use crate::registry::RuleRegistry;
use crate::rule::Rule;
use crate::schema::{SchemaCache, SchemaGraph};
use crate::traits::Validate;

/// Validates JSON payloads against the rules declared on record types.
///
/// # Example
///
/// ```rust
/// use jsonguard::{Validate, Validator};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize, Validate)]
/// struct Login {
///     #[validate(rules = "required|string|lenMin:3")]
///     username: String,
/// }
///
/// let validator = Validator::new();
/// let login: Login = validator.validate(br#"{"username": "ada"}"#).unwrap();
/// assert_eq!(login.username, "ada");
///
/// let err = validator.validate::<Login>(br#"{"username": "a"}"#).unwrap_err();
/// assert!(err.error_bag().unwrap().has_failed("username", "lenMin"));
/// ```
#[derive(Debug)]
pub struct Validator {
    registry: RuleRegistry,
    cache: SchemaCache,
    config: ValidatorConfig,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a validator with the built-in rule vocabulary.
    pub fn new() -> Self {
        Self::with_registry(RuleRegistry::with_builtin_rules())
    }

    /// Create a validator over a custom registry.
    pub fn with_registry(registry: RuleRegistry) -> Self {
        Self {
            registry,
            cache: SchemaCache::new(),
            config: ValidatorConfig::default(),
        }
    }

    /// Replace the configuration after checking it.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigValidationError`] reported by
    /// [`ValidatorConfig::validate`]; the validator is dropped in that case.
    pub fn with_config(mut self, config: ValidatorConfig) -> Result<Self, ConfigValidationError> {
        config.validate().inspect_err(|err| {
            warn!(error = %err, "Rejected invalid validator configuration");
        })?;
        self.config = config;
        Ok(self)
    }

    /// Add or replace a rule.
    ///
    /// Cached schemas were resolved against the previous vocabulary and are dropped.
    pub fn register_rule(&mut self, rule: Rule) {
        self.registry.register_rule(rule);
        self.cache.clear();
    }

    /// Add or replace an alias.
    pub fn register_alias(&mut self, alias: impl Into<String>, canonical: impl Into<String>) {
        self.registry.register_alias(alias, canonical);
        self.cache.clear();
    }

    /// Add or replace a composite rule.
    pub fn register_composite(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.registry.register_composite(name, template);
        self.cache.clear();
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Build, or fetch from cache, the schema graph of `T`.
    pub fn analyze<T: Validate>(&self) -> Result<Arc<SchemaGraph>, ConfigError> {
        self.cache.get_or_build(T::target(), &self.registry)
    }

    /// Run the rules of `T` against an already decoded value.
    ///
    /// A non-object root is treated as a record with every field absent.
    pub fn check_value<T: Validate>(&self, value: &Value) -> Result<ErrorBag, ConfigError> {
        let graph = self.analyze::<T>().inspect_err(|err| {
            warn!(type_name = std::any::type_name::<T>(), error = %err, "Schema analysis failed");
        })?;

        Engine::new(&graph)
            .with_debug_logging(self.config.debug_logging)
            .run(value)
            .inspect_err(|err| {
                warn!(type_name = graph.type_name(), error = %err, "Validation aborted by fault");
            })
    }

    /// Run the rules of `T` against raw JSON bytes without decoding into `T`.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::PayloadTooLarge`] above the configured size limit
    /// - [`ValidationError::MalformedJson`] when the bytes are not a JSON object
    /// - [`ValidationError::Invalid`] when any rule failed
    /// - [`ValidationError::Config`] on a misconfigured rule or type
    pub fn check<T: Validate>(&self, bytes: &[u8]) -> Result<(), ValidationError> {
        self.run_rules::<T>(bytes).map(drop)
    }

    /// Run the rules of `T`, then decode the payload into `T`.
    ///
    /// Rule failures take priority; a decode error is only reported when every
    /// rule passed.
    pub fn validate<T>(&self, bytes: &[u8]) -> Result<T, ValidationError>
    where
        T: Validate + DeserializeOwned,
    {
        let value = self.run_rules::<T>(bytes)?;

        serde_json::from_value(value).map_err(|err| {
            warn!(
                type_name = std::any::type_name::<T>(),
                error = %err,
                "Payload passed validation but failed to decode"
            );
            ValidationError::Decode(err)
        })
    }

    /// Size check, decode, rules. Returns the decoded root object.
    fn run_rules<T: Validate>(&self, bytes: &[u8]) -> Result<Value, ValidationError> {
        if bytes.len() > self.config.max_input_size {
            return Err(ValidationError::PayloadTooLarge {
                size: bytes.len(),
                limit: self.config.max_input_size,
            });
        }

        let object: Map<String, Value> =
            serde_json::from_slice(bytes).map_err(ValidationError::MalformedJson)?;
        let value = Value::Object(object);

        let errors = self.check_value::<T>(&value)?;
        if errors.is_invalid() {
            return Err(ValidationError::Invalid(errors));
        }

        debug!(type_name = std::any::type_name::<T>(), "Validation passed");
        Ok(value)
    }
}
