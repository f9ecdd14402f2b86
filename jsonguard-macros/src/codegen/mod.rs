//! Rust code generation for the `Validate` impl.

pub mod impl_block;

pub use impl_block::ImplBlockGenerator;
