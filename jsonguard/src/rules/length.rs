//! Length and size rules.

use serde_json::Value;

use crate::context::RuleContext;
use crate::registry::RuleRegistry;
use crate::rule::{Rule, RuleOutcome, Verdict};

pub(super) fn register(registry: &mut RuleRegistry) {
    registry.register_rule(Rule::new("len", |ctx| {
        let exact = ctx.len_param(0)?;
        check_len(ctx, Some(exact), Some(exact))
    }));
    registry.register_rule(Rule::new("lenMin", |ctx| {
        check_len(ctx, Some(ctx.len_param(0)?), None)
    }));
    registry.register_rule(Rule::new("lenMax", |ctx| {
        check_len(ctx, None, Some(ctx.len_param(0)?))
    }));
    registry.register_rule(Rule::new("lenBetween", |ctx| {
        check_len(ctx, Some(ctx.len_param(0)?), Some(ctx.len_param(1)?))
    }));
    registry.register_rule(Rule::new("maxSize", max_size));
}

/// Characters of a string, elements of an array, keys of an object.
fn measure(value: Option<&Value>) -> Option<usize> {
    match value? {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        _ => None,
    }
}

fn check_len(ctx: &RuleContext<'_>, min: Option<usize>, max: Option<usize>) -> RuleOutcome {
    let expectation = match (min, max) {
        (Some(min), Some(max)) if min == max => format!("Length must be exactly {}", min),
        (Some(min), Some(max)) => format!("Length must be between {} and {}", min, max),
        (Some(min), None) => format!("Length must be at least {}", min),
        (None, Some(max)) => format!("Length must be at most {}", max),
        (None, None) => return Ok(Verdict::Pass),
    };

    let Some(actual) = measure(ctx.value()) else {
        return Ok(Verdict::Fail(expectation));
    };

    let ok = min.map_or(true, |min| actual >= min) && max.map_or(true, |max| actual <= max);
    Ok(Verdict::check(ok, || {
        format!("{} - Actual length: {}", expectation, actual)
    }))
}

/// Byte length of the compact JSON serialization.
fn max_size(ctx: &RuleContext<'_>) -> RuleOutcome {
    let limit = ctx.len_param(0)?;
    let size = ctx.value().map_or(0, |value| value.to_string().len());

    Ok(Verdict::check(size <= limit, || {
        format!("Must be at most {} bytes when serialized - Actual size: {}", limit, size)
    }))
}
