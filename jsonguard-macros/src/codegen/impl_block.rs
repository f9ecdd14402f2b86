//! Impl block generation for the `Validate` trait.

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse_quote;

use crate::ir::{FieldIR, RecordIR};

/// Generates `impl ::jsonguard::Validate for Type` from a [`RecordIR`].
#[derive(Debug, Default)]
pub struct ImplBlockGenerator;

impl ImplBlockGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate the complete impl block for a record.
    pub fn generate(&self, record: &RecordIR) -> TokenStream {
        let name = &record.ident;
        let fields = record.fields.iter().map(|field| self.generate_field(field));

        let mut generics = record.generics.clone();
        let type_params: Vec<_> = generics.type_params().map(|p| p.ident.clone()).collect();
        if !type_params.is_empty() {
            let where_clause = generics.make_where_clause();
            for param in type_params {
                where_clause
                    .predicates
                    .push(parse_quote! { #param: ::jsonguard::Validate });
            }
        }
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

        quote! {
            impl #impl_generics ::jsonguard::Validate for #name #ty_generics #where_clause {
                fn shape() -> ::jsonguard::Shape {
                    ::jsonguard::Shape::Record(::std::vec![#(#fields),*])
                }
            }
        }
    }

    /// One `FieldDescriptor` expression.
    fn generate_field(&self, field: &FieldIR) -> TokenStream {
        let struct_key = &field.struct_key;
        let json_key = &field.json_key;
        let ty = &field.ty;

        let rules = field
            .rules
            .as_ref()
            .map(|rules| quote! { .with_rules(#rules) });
        let embedded = field.flatten.then(|| quote! { .embedded() });

        quote! {
            ::jsonguard::FieldDescriptor::new(
                #struct_key,
                #json_key,
                <#ty as ::jsonguard::Validate>::target(),
            )
            #rules
            #embedded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::struct_parser::StructParser;

    fn expand(input: syn::DeriveInput) -> String {
        let record = StructParser::parse(&input).unwrap();
        ImplBlockGenerator::new().generate(&record).to_string()
    }

    #[test]
    fn test_generates_record_shape() {
        let code = expand(parse_quote! {
            #[validate(rename_all = "camelCase")]
            struct Login {
                #[validate(rules = "required|lenMin:3")]
                user_name: String,
            }
        });

        assert!(code.contains("impl :: jsonguard :: Validate for Login"));
        assert!(code.contains(":: jsonguard :: Shape :: Record"));
        assert!(code.contains("\"user_name\""));
        assert!(code.contains("\"userName\""));
        assert!(code.contains("< String as :: jsonguard :: Validate > :: target ()"));
        assert!(code.contains(". with_rules (\"required|lenMin:3\")"));
        assert!(!code.contains("embedded"));
    }

    #[test]
    fn test_generates_embedded_field() {
        let code = expand(parse_quote! {
            struct Page {
                #[validate(flatten)]
                meta: Meta,
            }
        });

        assert!(code.contains(". embedded ()"));
        assert!(!code.contains("with_rules"));
    }

    #[test]
    fn test_generic_params_are_bounded() {
        let code = expand(parse_quote! {
            struct Envelope<T> where T: Clone {
                data: Vec<T>,
            }
        });

        assert!(code.contains("for Envelope < T >"));
        assert!(code.contains("T : Clone"));
        assert!(code.contains("T : :: jsonguard :: Validate"));
    }

    #[test]
    fn test_unit_struct_is_empty_record() {
        let code = expand(parse_quote! {
            struct Empty;
        });

        assert!(code.contains(":: jsonguard :: Shape :: Record (:: std :: vec ! [])"));
    }
}
