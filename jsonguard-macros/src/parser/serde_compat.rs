//! Serde attribute compatibility.
//!
//! A payload that passes validation is decoded by serde, so the JSON keys the
//! schema looks up must agree with the keys serde reads. This module picks the
//! relevant bits out of `#[serde(...)]`; `#[validate(...)]` takes precedence
//! when both are present.

use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr, Token};

use super::attributes::RenameRule;

/// Serde container attributes extracted from `#[serde(...)]`.
#[derive(Debug, Clone, Default)]
pub struct SerdeContainerAttrs {
    /// Case convention applied to every field on deserialization
    pub rename_all: Option<RenameRule>,
}

impl SerdeContainerAttrs {
    /// Parse serde attributes from a list of attributes.
    pub fn from_attrs(attrs: &[Attribute]) -> Self {
        let mut result = Self::default();

        for attr in serde_attrs(attrs) {
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    if let Some(value) = deserialize_name(&meta)? {
                        result.rename_all = RenameRule::from_serde(&value);
                    }
                } else {
                    skip_meta(&meta)?;
                }
                Ok(())
            });
        }

        result
    }
}

/// Serde field attributes extracted from `#[serde(...)]`.
#[derive(Debug, Clone, Default)]
pub struct SerdeFieldAttrs {
    /// Key this field is read from
    pub rename: Option<String>,

    /// Skip this field
    pub skip: bool,

    /// Skip deserializing this field
    pub skip_deserializing: bool,

    /// Flatten nested object
    pub flatten: bool,
}

impl SerdeFieldAttrs {
    /// Parse serde attributes from a list of attributes.
    pub fn from_attrs(attrs: &[Attribute]) -> Self {
        let mut result = Self::default();

        for attr in serde_attrs(attrs) {
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if let Some(value) = deserialize_name(&meta)? {
                        result.rename = Some(value);
                    }
                } else if meta.path.is_ident("skip") {
                    result.skip = true;
                } else if meta.path.is_ident("skip_deserializing") {
                    result.skip_deserializing = true;
                } else if meta.path.is_ident("flatten") {
                    result.flatten = true;
                } else {
                    skip_meta(&meta)?;
                }
                Ok(())
            });
        }

        result
    }

    /// A field serde never reads has nothing to validate.
    pub fn should_skip(&self) -> bool {
        self.skip || self.skip_deserializing
    }
}

fn serde_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("serde"))
}

/// Read `name = "value"` or the `deserialize` half of
/// `name(serialize = "a", deserialize = "b")`.
fn deserialize_name(meta: &ParseNestedMeta) -> syn::Result<Option<String>> {
    if meta.input.peek(Token![=]) {
        let value: LitStr = meta.value()?.parse()?;
        return Ok(Some(value.value()));
    }

    let mut found = None;
    meta.parse_nested_meta(|inner| {
        let value: LitStr = inner.value()?.parse()?;
        if inner.path.is_ident("deserialize") {
            found = Some(value.value());
        }
        Ok(())
    })?;
    Ok(found)
}

/// Consume an item we do not care about, such as `default = "path"` or
/// `with = "module"`, so the items after it are still visited.
fn skip_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        let _: proc_macro2::TokenStream = content.parse()?;
    }
    Ok(())
}
