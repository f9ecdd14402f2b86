//! Rules on a flattened field would never run.
#![allow(dead_code)]

use jsonguard_macros::Validate;

#[derive(Validate)]
struct Page {
    #[validate(flatten, rules = "required")]
    meta: String,
}

fn main() {}
