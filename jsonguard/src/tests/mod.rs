//! Crate-level tests for the configuration and validator facade.
//!
//! Rule, engine and graph tests live next to their modules. These exercise
//! the public entry points with hand-written `Validate` impls so they run
//! without the derive feature.


#[cfg(test)]
pub mod validator_tests;
