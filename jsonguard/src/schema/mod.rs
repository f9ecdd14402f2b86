//! Schema graphs and the per-validator schema cache.

mod cache;
mod graph;

pub use cache::SchemaCache;
pub use graph::{ChildListId, FieldKind, FieldSchema, NodeId, SchemaGraph, ELEMENT_KEY};
