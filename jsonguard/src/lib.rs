//! # jsonguard
//!
//! Validate JSON payloads against rule strings declared on Rust record types,
//! before decoding them.
//!
//! Every field of a record carries a pipe-separated rule string such as
//! `"required|string|lenBetween:2,10"`. A [`Validator`] walks the decoded JSON
//! alongside the record's schema and collects every failure into an
//! [`ErrorBag`] keyed by dotted path (`items.3.name`). Only when every rule
//! passes is the payload decoded into the target type.
//!
//! ## Quick Start
//!
//! ```rust
//! use jsonguard::{Validate, Validator};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize, Validate)]
//! #[validate(rename_all = "camelCase")]
//! struct CreateUser {
//!     #[validate(rules = "required|string|lenBetween:2,40")]
//!     user_name: String,
//!
//!     #[validate(rules = "nullable|email")]
//!     email_address: Option<String>,
//! }
//!
//! let validator = Validator::new();
//!
//! let user: CreateUser = validator
//!     .validate(br#"{"userName": "ada", "emailAddress": null}"#)
//!     .unwrap();
//! assert_eq!(user.user_name, "ada");
//!
//! let err = validator
//!     .validate::<CreateUser>(br#"{"emailAddress": "nope"}"#)
//!     .unwrap_err();
//! let bag = err.error_bag().unwrap();
//! assert!(bag.has_failed("userName", "required"));
//! assert!(bag.has_failed("emailAddress", "email"));
//! ```
//!
//! ## Evaluation Order
//!
//! For each field:
//!
//! 1. presence rules (`required`, `present`, `requiredWith`, ...) run first;
//!    any failure ends the field;
//! 2. an absent key ends the field;
//! 3. `null` on a `nullable` field ends the field;
//! 4. value rules run in declaration order;
//! 5. records, arrays and maps are descended only when the value is present,
//!    non-null, and every value rule passed.
//!
//! ## Container Attributes
//!
//! | Attribute | Description |
//! |-----------|-------------|
//! | `#[validate(rename_all = "camelCase")]` | Derive JSON keys using a naming convention |
//!
//! ## Field Attributes
//!
//! | Attribute | Description |
//! |-----------|-------------|
//! | `#[validate(rules = "...")]` | Rule string for this field |
//! | `#[validate(rename = "key")]` | JSON key of this field |
//! | `#[validate(skip)]` | Leave the field out of the schema |
//! | `#[validate(flatten)]` | Splice the fields of a nested record into this one |
//!
//! With the `serde-compat` feature of the derive crate (on by default),
//! `#[serde(rename)]`, `#[serde(rename_all)]`, `#[serde(skip)]` and
//! `#[serde(flatten)]` are honoured when no `validate` attribute says otherwise.
//!
//! ## Built-in Rules
//!
//! | Family | Rules |
//! |--------|-------|
//! | Presence | `present`, `required`, `requiredWith[Any\|All]`, `requiredWithout[Any\|All]`, `missingWith[Any\|All]`, `missingWithout[Any\|All]`, `missingIf`, `missingUnless`, `requireOneInGroup` |
//! | Nullability | `nullable` (`nilable`) |
//! | Types | `string`, `int` (`integer`), `float`, `bool` (`boolean`), `array`, `object` |
//! | Length | `len`, `lenMin` (`minLen`), `lenMax` (`maxLen`), `lenBetween`, `maxSize` |
//! | Numbers | `min`, `max`, `between`, `intBetween` |
//! | Sets | `in`, `notIn`, `alpha2Country`, `alpha3Currency` |
//! | Formats | `regex`, `email`, `url`, `ip`, `uuid`, `zeroableUuid`, `date`, `json`, `phoneNumberE164` |
//! | Structure | `objectMissingKeys` |
//!
//! Custom rules, aliases and composites are added through
//! [`Validator::register_rule`], [`Validator::register_alias`] and
//! [`Validator::register_composite`].
//!
//! ## Features
//!
//! | Feature | Description | Default |
//! |---------|-------------|---------|
//! | `derive` | `#[derive(Validate)]` | ✅ |

pub mod bag;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod registry;
pub mod rule;
mod rules;
pub mod schema;
pub mod traits;
pub mod validator;

#[cfg(test)]
mod tests;

pub use bag::ErrorBag;
pub use config::{ConfigValidationError, ValidatorConfig};
pub use context::{Combinator, JsonContext, RuleContext, ValidationContext};
pub use engine::{validate_value, Engine};
pub use error::{ConfigError, ValidationError};
pub use registry::{RuleDefinition, RuleRegistry};
pub use rule::{Predicate, Rule, RuleBinding, RuleOutcome, ValidationTag, Verdict};
pub use schema::{FieldKind, FieldSchema, NodeId, SchemaCache, SchemaGraph, ELEMENT_KEY};
pub use traits::{FieldDescriptor, Shape, TypeRef, Validate};
pub use validator::Validator;

#[cfg(feature = "derive")]
pub use jsonguard_macros::Validate;
