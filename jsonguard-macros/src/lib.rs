//! # jsonguard-macros
//!
//! Procedural macros for describing Rust records to the `jsonguard` validator.
//!
//! This crate provides `#[derive(Validate)]`, which implements
//! `jsonguard::Validate` for structs with named fields. Use it through the
//! re-export in `jsonguard`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jsonguard::Validate;
//!
//! #[derive(Validate)]
//! #[validate(rename_all = "camelCase")]
//! struct CreateUser {
//!     #[validate(rules = "required|string|lenBetween:2,40")]
//!     user_name: String,
//!
//!     #[validate(rules = "requiredWithout:phone|email")]
//!     email: Option<String>,
//!
//!     #[validate(rules = "phoneNumberE164")]
//!     phone: Option<String>,
//! }
//! ```
//!
//! ## Attributes
//!
//! ### Container Attributes
//!
//! - `#[validate(rename_all = "camelCase")]` - Derive JSON keys from field names
//!   (`lowercase`, `UPPERCASE`, `camelCase`, `snake_case`, `PascalCase`,
//!   `SCREAMING_SNAKE_CASE`, `kebab-case`, `SCREAMING-KEBAB-CASE`). Keys match
//!   what serde derives for the same field.
//!
//! ### Field Attributes
//!
//! - `#[validate(rules = "...")]` - Pipe-separated rule string
//! - `#[validate(rename = "key")]` - JSON key of this field
//! - `#[validate(skip)]` - Leave the field out of the schema
//! - `#[validate(flatten)]` - Splice the nested record's fields into this one
//!
//! With the `serde-compat` feature, `#[serde(rename)]`, `#[serde(rename_all)]`,
//! `#[serde(skip)]`, `#[serde(skip_deserializing)]` and `#[serde(flatten)]` are
//! honoured as well. `#[validate]` wins when both are given.

use proc_macro::TokenStream;
use syn::DeriveInput;

mod codegen;
mod ir;
mod parser;

use codegen::ImplBlockGenerator;
use parser::struct_parser::{StructParseError, StructParser};

/// Derive macro implementing `jsonguard::Validate` for a record.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Validate)]
/// struct Login {
///     #[validate(rules = "required|string")]
///     username: String,
/// }
/// ```
#[proc_macro_derive(Validate, attributes(validate, serde))]
pub fn derive_validate(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);

    match derive_validate_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

fn derive_validate_impl(input: &DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    let record = StructParser::parse(input).map_err(|e| convert_parse_error(e, input))?;
    Ok(ImplBlockGenerator::new().generate(&record))
}

/// Convert a StructParseError to a syn::Error spanned on the type name.
fn convert_parse_error(error: StructParseError, input: &DeriveInput) -> syn::Error {
    let message = match error {
        StructParseError::NotARecord(kind) => format!("Validate cannot be derived for {}s", kind),
        other => other.to_string(),
    };
    syn::Error::new_spanned(&input.ident, message)
}
