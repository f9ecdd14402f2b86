//! Built-in rule vocabulary.
//!
//! Each submodule registers one family of rules. [`register_builtins`] wires
//! them all into a registry together with the built-in aliases and composites.

use serde_json::Value;

use crate::registry::RuleRegistry;
use crate::rule::{Rule, Verdict};

#[cfg(test)]
macro_rules! record {
    ($name:ident { $($key:literal => $rules:literal),* $(,)? }) => {
        struct $name;

        impl $crate::traits::Validate for $name {
            fn shape() -> $crate::traits::Shape {
                $crate::traits::Shape::Record(vec![
                    $(
                        $crate::traits::FieldDescriptor::new(
                            $key,
                            $key,
                            <::serde_json::Value as $crate::traits::Validate>::target(),
                        )
                        .with_rules($rules)
                    ),*
                ])
            }
        }
    };
}

mod format;
mod length;
mod numeric;
mod presence;
mod sets;
mod types;

/// Register every built-in rule, alias and composite.
pub(crate) fn register_builtins(registry: &mut RuleRegistry) {
    presence::register(registry);
    types::register(registry);
    length::register(registry);
    numeric::register(registry);
    sets::register(registry);
    format::register(registry);

    registry.register_rule(Rule::new("nullable", |_| Ok(Verdict::Pass)).nullable());

    registry.register_alias("minLen", "lenMin");
    registry.register_alias("maxLen", "lenMax");
    registry.register_alias("integer", "int");
    registry.register_alias("boolean", "bool");
    registry.register_alias("nilable", "nullable");

    registry.register_composite("intBetween", "int|between:$0,$1");
}

/// String form of a scalar JSON value, used for set membership and sibling
/// value comparisons. `None` for null, arrays and objects.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (None, Some(u), _) => u.to_string(),
            (None, None, Some(f)) => f.to_string(),
            (None, None, None) => n.to_string(),
        }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Suffix describing what was given, appended to set-style messages.
pub(crate) fn describe_given(value: Option<&Value>) -> String {
    match value {
        Some(Value::Null) => " - [NULL] given".to_string(),
        Some(Value::Object(_)) => " - Object given".to_string(),
        Some(Value::Array(_)) => " - Array given".to_string(),
        Some(other) => match scalar_to_string(other) {
            Some(scalar) => format!(" - [{}] given", scalar),
            None => " - Incompatible type given".to_string(),
        },
        None => " - Incompatible type given".to_string(),
    }
}
