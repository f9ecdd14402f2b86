//! JSON type checks.

use serde_json::{Number, Value};

use crate::context::RuleContext;
use crate::registry::RuleRegistry;
use crate::rule::{Rule, RuleOutcome, Verdict};

pub(super) fn register(registry: &mut RuleRegistry) {
    registry.register_rule(type_rule("string", "Must be a string", Value::is_string));
    registry.register_rule(type_rule("int", "Must be an integer", is_integer));
    registry.register_rule(type_rule("float", "Must be a float", Value::is_number));
    registry.register_rule(type_rule("bool", "Must be a boolean", Value::is_boolean));
    registry.register_rule(type_rule("array", "Must be an array", Value::is_array));
    registry.register_rule(type_rule("object", "Must be an object", Value::is_object));
    registry.register_rule(Rule::new("objectMissingKeys", object_missing_keys));
}

fn type_rule(name: &'static str, message: &'static str, test: fn(&Value) -> bool) -> Rule {
    Rule::new(name, move |ctx| {
        Ok(Verdict::check(ctx.value().is_some_and(test), || message.to_string()))
    })
}

/// Integers, and floats without a fractional part.
fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => is_integral(n),
        _ => false,
    }
}

fn is_integral(n: &Number) -> bool {
    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}

fn object_missing_keys(ctx: &RuleContext<'_>) -> RuleOutcome {
    ctx.param(0)?;
    let keys = ctx.params();

    let ok = match ctx.value() {
        Some(Value::Object(map)) => keys.iter().all(|key| !map.contains_key(key)),
        _ => false,
    };

    Ok(Verdict::check(ok, || {
        format!("Must be an object without the keys: [{}]", keys.join(", "))
    }))
}
