//! Struct parsing logic.
//!
//! Named structs become records with one field per non-skipped Rust field;
//! unit structs become empty records. Everything else is rejected.

use darling::{FromDeriveInput, FromField};
use syn::{Data, DeriveInput, Fields};

use crate::ir::{FieldIR, RecordIR};
use crate::parser::attributes::{ContainerAttrs, FieldAttrs, RenameRule};

#[cfg(feature = "serde-compat")]
use crate::parser::serde_compat::{SerdeContainerAttrs, SerdeFieldAttrs};

/// Error type for struct parsing failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StructParseError {
    #[error("Invalid container attributes: {0}")]
    ContainerAttrs(String),

    #[error("Invalid field attributes: {0}")]
    FieldAttrs(String),

    #[error("Validate can only be derived for structs with named fields or unit structs, found {0}")]
    NotARecord(&'static str),

    #[error("Field at index {0} has no identifier")]
    MissingFieldIdent(usize),

    #[error("Field '{0}' is flattened; its rules would never run. Put them on the nested record's fields")]
    FlattenWithRules(String),
}

/// Parses Rust struct definitions into a [`RecordIR`].
pub struct StructParser;

impl StructParser {
    /// Parse a DeriveInput into a RecordIR.
    pub fn parse(input: &DeriveInput) -> Result<RecordIR, StructParseError> {
        let data_struct = match &input.data {
            Data::Struct(s) => s,
            Data::Enum(_) => return Err(StructParseError::NotARecord("enum")),
            Data::Union(_) => return Err(StructParseError::NotARecord("union")),
        };
        if let Fields::Unnamed(_) = data_struct.fields {
            return Err(StructParseError::NotARecord("tuple struct"));
        }

        let container_attrs = ContainerAttrs::from_derive_input(input)
            .map_err(|e| StructParseError::ContainerAttrs(e.to_string()))?;

        #[cfg(feature = "serde-compat")]
        let effective_rename_all = container_attrs
            .rename_all
            .or(SerdeContainerAttrs::from_attrs(&input.attrs).rename_all);

        #[cfg(not(feature = "serde-compat"))]
        let effective_rename_all = container_attrs.rename_all;

        let fields = match &data_struct.fields {
            Fields::Named(fields) => Self::parse_named_fields(fields, effective_rename_all)?,
            _ => Vec::new(),
        };

        Ok(RecordIR {
            ident: container_attrs.ident,
            generics: container_attrs.generics,
            fields,
        })
    }

    fn parse_named_fields(
        fields: &syn::FieldsNamed,
        rename_all: Option<RenameRule>,
    ) -> Result<Vec<FieldIR>, StructParseError> {
        let mut field_irs = Vec::with_capacity(fields.named.len());

        for (index, field) in fields.named.iter().enumerate() {
            let field_attrs = FieldAttrs::from_field(field)
                .map_err(|e| StructParseError::FieldAttrs(e.to_string()))?;

            #[cfg(feature = "serde-compat")]
            let serde_field_attrs = SerdeFieldAttrs::from_attrs(&field.attrs);

            #[cfg(feature = "serde-compat")]
            let should_skip = field_attrs.skip || serde_field_attrs.should_skip();

            #[cfg(not(feature = "serde-compat"))]
            let should_skip = field_attrs.skip;

            if should_skip {
                continue;
            }

            let struct_key = field
                .ident
                .as_ref()
                .ok_or(StructParseError::MissingFieldIdent(index))?
                .to_string();

            // validate rename > serde rename > rename_all > field name
            #[cfg(feature = "serde-compat")]
            let json_key = match (&field_attrs.rename, &serde_field_attrs.rename) {
                (None, Some(serde_rename)) => serde_rename.clone(),
                _ => field_attrs.json_key(rename_all),
            };

            #[cfg(not(feature = "serde-compat"))]
            let json_key = field_attrs.json_key(rename_all);

            #[cfg(feature = "serde-compat")]
            let is_flatten = field_attrs.flatten || serde_field_attrs.flatten;

            #[cfg(not(feature = "serde-compat"))]
            let is_flatten = field_attrs.flatten;

            let rules = field_attrs.rule_string();
            if is_flatten && rules.is_some() {
                return Err(StructParseError::FlattenWithRules(struct_key));
            }

            field_irs.push(
                FieldIR::new(struct_key, json_key, field.ty.clone())
                    .with_rules(rules)
                    .with_flatten(is_flatten),
            );
        }

        Ok(field_irs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn keys(record: &RecordIR) -> Vec<(&str, &str)> {
        record
            .fields
            .iter()
            .map(|f| (f.struct_key.as_str(), f.json_key.as_str()))
            .collect()
    }

    #[test]
    fn test_parse_simple_struct() {
        let input: DeriveInput = parse_quote! {
            struct User {
                #[validate(rules = "required|string")]
                name: String,
                age: u32,
            }
        };

        let record = StructParser::parse(&input).unwrap();
        assert_eq!(record.ident, "User");
        assert_eq!(keys(&record), [("name", "name"), ("age", "age")]);
        assert_eq!(record.fields[0].rules.as_deref(), Some("required|string"));
        assert_eq!(record.fields[1].rules, None);
    }

    #[test]
    fn test_parse_unit_struct() {
        let input: DeriveInput = parse_quote! {
            struct Empty;
        };
        assert!(StructParser::parse(&input).unwrap().fields.is_empty());
    }

    #[test]
    fn test_parse_struct_with_rename_all() {
        let input: DeriveInput = parse_quote! {
            #[validate(rename_all = "camelCase")]
            struct User {
                user_name: String,
                #[validate(rename = "mail")]
                email_address: String,
            }
        };

        let record = StructParser::parse(&input).unwrap();
        assert_eq!(
            keys(&record),
            [("user_name", "userName"), ("email_address", "mail")]
        );
    }

    #[test]
    fn test_parse_struct_with_skip() {
        let input: DeriveInput = parse_quote! {
            struct User {
                id: i64,
                #[validate(skip)]
                internal: std::cell::Cell<u8>,
                name: String,
            }
        };

        let record = StructParser::parse(&input).unwrap();
        assert_eq!(keys(&record), [("id", "id"), ("name", "name")]);
    }

    #[test]
    fn test_parse_flatten() {
        let input: DeriveInput = parse_quote! {
            struct Page {
                #[validate(flatten)]
                meta: Meta,
            }
        };

        let record = StructParser::parse(&input).unwrap();
        assert!(record.fields[0].flatten);
    }

    #[test]
    fn test_flatten_with_rules_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Page {
                #[validate(flatten, rules = "required")]
                meta: Meta,
            }
        };

        let err = StructParser::parse(&input).unwrap_err();
        assert!(matches!(err, StructParseError::FlattenWithRules(ref f) if f == "meta"));
    }

    #[test]
    fn test_rejects_enum_and_tuple_struct() {
        let input: DeriveInput = parse_quote! {
            enum Choice { A, B }
        };
        assert!(matches!(
            StructParser::parse(&input),
            Err(StructParseError::NotARecord("enum"))
        ));

        let input: DeriveInput = parse_quote! {
            struct Pair(String, String);
        };
        assert!(matches!(
            StructParser::parse(&input),
            Err(StructParseError::NotARecord("tuple struct"))
        ));
    }

    #[test]
    fn test_unknown_field_attribute_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct User {
                #[validate(rule = "required")]
                name: String,
            }
        };
        assert!(matches!(
            StructParser::parse(&input),
            Err(StructParseError::FieldAttrs(_))
        ));
    }

    #[cfg(feature = "serde-compat")]
    mod serde_compat {
        use super::*;

        #[test]
        fn test_serde_rename_all_and_rename() {
            let input: DeriveInput = parse_quote! {
                #[serde(rename_all = "PascalCase")]
                struct Node {
                    next_node: Option<Box<Node>>,
                    #[serde(rename = "payload")]
                    data: String,
                }
            };

            let record = StructParser::parse(&input).unwrap();
            assert_eq!(
                keys(&record),
                [("next_node", "NextNode"), ("data", "payload")]
            );
        }

        #[test]
        fn test_validate_attributes_take_precedence() {
            let input: DeriveInput = parse_quote! {
                #[serde(rename_all = "PascalCase")]
                #[validate(rename_all = "snake_case")]
                struct Node {
                    #[serde(rename = "Serde")]
                    #[validate(rename = "own")]
                    first: String,
                    second_field: String,
                }
            };

            let record = StructParser::parse(&input).unwrap();
            assert_eq!(keys(&record), [("first", "own"), ("second_field", "second_field")]);
        }

        #[test]
        fn test_serde_rename_beats_validate_rename_all() {
            let input: DeriveInput = parse_quote! {
                #[validate(rename_all = "camelCase")]
                struct Node {
                    #[serde(rename = "ID")]
                    node_id: String,
                }
            };

            let record = StructParser::parse(&input).unwrap();
            assert_eq!(keys(&record), [("node_id", "ID")]);
        }

        #[test]
        fn test_serde_skip_and_flatten() {
            let input: DeriveInput = parse_quote! {
                struct Page {
                    #[serde(skip_deserializing)]
                    cache: Vec<u8>,
                    #[serde(flatten)]
                    meta: Meta,
                }
            };

            let record = StructParser::parse(&input).unwrap();
            assert_eq!(record.fields.len(), 1);
            assert_eq!(record.fields[0].struct_key, "meta");
            assert!(record.fields[0].flatten);
        }
    }
}
