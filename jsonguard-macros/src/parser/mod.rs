//! Parsers turning a `DeriveInput` into [`RecordIR`](crate::ir::RecordIR).

pub mod attributes;
pub mod struct_parser;

#[cfg(feature = "serde-compat")]
pub mod serde_compat;
