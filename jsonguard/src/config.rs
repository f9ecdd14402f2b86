//! Validator configuration.
//!
//! # Example
//! ```rust
//! use jsonguard::ValidatorConfig;
//!
//! let config = ValidatorConfig::new()
//!     .with_max_input_size(512 * 1024)
//!     .with_debug_logging(true);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error type for configuration validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigValidationError {
    /// max_input_size must be greater than 0
    InvalidMaxInputSize,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMaxInputSize => {
                write!(f, "max_input_size must be greater than 0")
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Settings for a [`Validator`](crate::Validator).
///
/// # Fields
///
/// * `max_input_size` - Maximum payload size in bytes. Larger payloads are
///   rejected with `PayloadTooLarge` before decoding. Default: 1MB (1,048,576 bytes).
///
/// * `debug_logging` - Emit each failed rule at `debug` instead of `trace`.
///   Default: false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Maximum payload size in bytes (default: 1MB)
    pub max_input_size: usize,
    /// Log rule failures at debug level (default: false)
    pub debug_logging: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_input_size: 1024 * 1024, // 1MB
            debug_logging: false,
        }
    }
}

impl ValidatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration and return an error if invalid.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_input_size` is 0.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.max_input_size == 0 {
            return Err(ConfigValidationError::InvalidMaxInputSize);
        }
        Ok(())
    }

    /// Set the maximum payload size in bytes.
    #[must_use = "This method returns a new ValidatorConfig and does not modify self"]
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    /// Enable or disable debug logging of rule failures.
    #[must_use = "This method returns a new ValidatorConfig and does not modify self"]
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }
}
