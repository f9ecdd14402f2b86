//! Intermediate representation of a record between parsing and codegen.

use syn::{Generics, Ident, Type};

/// A parsed record type.
#[derive(Debug, Clone)]
pub struct RecordIR {
    /// The type's identifier
    pub ident: Ident,
    /// Generic parameters, copied from the input
    pub generics: Generics,
    /// Fields in declaration order, skipped fields removed
    pub fields: Vec<FieldIR>,
}

/// A single record field.
#[derive(Debug, Clone)]
pub struct FieldIR {
    /// Rust field name; sibling rules refer to fields by this name
    pub struct_key: String,
    /// Key looked up in the JSON object
    pub json_key: String,
    /// Declared field type
    pub ty: Type,
    /// Pipe-separated rule string
    pub rules: Option<String>,
    /// Whether the nested record's fields are spliced into this one
    pub flatten: bool,
}

impl FieldIR {
    pub fn new(struct_key: impl Into<String>, json_key: impl Into<String>, ty: Type) -> Self {
        Self {
            struct_key: struct_key.into(),
            json_key: json_key.into(),
            ty,
            rules: None,
            flatten: false,
        }
    }

    pub fn with_rules(mut self, rules: Option<String>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }
}
