//! Attribute parsing using darling for `#[validate(...)]` attributes on
//! records and their fields.

use darling::{FromDeriveInput, FromField, FromMeta};
use syn::{Generics, Ident, Type};

/// Container-level attributes parsed from `#[validate(...)]` on the struct.
#[derive(Debug, Clone, FromDeriveInput)]
#[darling(attributes(validate), supports(struct_named, struct_unit))]
pub struct ContainerAttrs {
    /// The identifier of the type
    pub ident: Ident,

    /// Generic parameters of the type
    pub generics: Generics,

    /// Derive JSON keys from field names using a case convention
    #[darling(default)]
    pub rename_all: Option<RenameRule>,
}

/// Field-level attributes parsed from `#[validate(...)]` on struct fields.
#[derive(Debug, Clone, FromField)]
#[darling(attributes(validate))]
pub struct FieldAttrs {
    /// Field identifier
    pub ident: Option<Ident>,

    /// Field type
    pub ty: Type,

    /// Pipe-separated rule string
    #[darling(default)]
    pub rules: Option<String>,

    /// JSON key override
    #[darling(default)]
    pub rename: Option<String>,

    /// Leave the field out of the schema
    #[darling(default)]
    pub skip: bool,

    /// Splice the fields of a nested record into the parent
    #[darling(default)]
    pub flatten: bool,
}

impl FieldAttrs {
    /// JSON key of this field: explicit rename, then the container rule,
    /// then the field name itself.
    pub fn json_key(&self, rename_rule: Option<RenameRule>) -> String {
        if let Some(ref name) = self.rename {
            return name.clone();
        }

        let Some(ident) = &self.ident else {
            return String::new();
        };
        let name = ident.to_string();
        match rename_rule {
            Some(rule) => rule.apply(&name),
            None => name,
        }
    }

    /// Rule string with surrounding whitespace removed; blank strings count as none.
    pub fn rule_string(&self) -> Option<String> {
        self.rules
            .as_deref()
            .map(str::trim)
            .filter(|rules| !rules.is_empty())
            .map(str::to_string)
    }
}

/// Rename rule for field name transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromMeta)]
pub enum RenameRule {
    /// lowercase
    #[darling(rename = "lowercase")]
    Lowercase,

    /// UPPERCASE
    #[darling(rename = "UPPERCASE")]
    Uppercase,

    /// camelCase
    #[darling(rename = "camelCase")]
    CamelCase,

    /// snake_case
    #[darling(rename = "snake_case")]
    SnakeCase,

    /// PascalCase
    #[darling(rename = "PascalCase")]
    PascalCase,

    /// SCREAMING_SNAKE_CASE
    #[darling(rename = "SCREAMING_SNAKE_CASE")]
    ScreamingSnakeCase,

    /// kebab-case
    #[darling(rename = "kebab-case")]
    KebabCase,

    /// SCREAMING-KEBAB-CASE
    #[darling(rename = "SCREAMING-KEBAB-CASE")]
    ScreamingKebabCase,
}

impl RenameRule {
    /// Apply the rename rule to a field name.
    ///
    /// Produces the same key serde derives for the field. Words are split on
    /// `_` only, so digits stay attached to their word.
    pub fn apply(&self, name: &str) -> String {
        match self {
            RenameRule::Lowercase | RenameRule::SnakeCase => name.to_string(),
            RenameRule::Uppercase | RenameRule::ScreamingSnakeCase => name.to_ascii_uppercase(),
            RenameRule::PascalCase => {
                let mut pascal = String::with_capacity(name.len());
                let mut capitalize = true;
                for ch in name.chars() {
                    if ch == '_' {
                        capitalize = true;
                    } else if capitalize {
                        pascal.push(ch.to_ascii_uppercase());
                        capitalize = false;
                    } else {
                        pascal.push(ch);
                    }
                }
                pascal
            }
            RenameRule::CamelCase => {
                let pascal = RenameRule::PascalCase.apply(name);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => pascal,
                }
            }
            RenameRule::KebabCase => name.replace('_', "-"),
            RenameRule::ScreamingKebabCase => name.to_ascii_uppercase().replace('_', "-"),
        }
    }

    /// Parse the string form used by serde's `rename_all`.
    pub fn from_serde(value: &str) -> Option<Self> {
        match value {
            "lowercase" => Some(RenameRule::Lowercase),
            "UPPERCASE" => Some(RenameRule::Uppercase),
            "camelCase" => Some(RenameRule::CamelCase),
            "snake_case" => Some(RenameRule::SnakeCase),
            "PascalCase" => Some(RenameRule::PascalCase),
            "SCREAMING_SNAKE_CASE" => Some(RenameRule::ScreamingSnakeCase),
            "kebab-case" => Some(RenameRule::KebabCase),
            "SCREAMING-KEBAB-CASE" => Some(RenameRule::ScreamingKebabCase),
            _ => None,
        }
    }
}
