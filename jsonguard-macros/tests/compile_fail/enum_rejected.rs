//! Enums have no fixed set of keys to validate.
#![allow(dead_code)]

use jsonguard_macros::Validate;

#[derive(Validate)]
enum Choice {
    Yes,
    No,
}

fn main() {}
