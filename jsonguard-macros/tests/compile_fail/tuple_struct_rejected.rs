//! Tuple structs have no field names to use as JSON keys.
#![allow(dead_code)]

use jsonguard_macros::Validate;

#[derive(Validate)]
struct Pair(String, String);

fn main() {}
