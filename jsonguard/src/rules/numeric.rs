//! Numeric range rules. Bounds are inclusive and compared as floats.

use crate::context::RuleContext;
use crate::registry::RuleRegistry;
use crate::rule::{Rule, RuleOutcome, Verdict};

pub(super) fn register(registry: &mut RuleRegistry) {
    registry.register_rule(Rule::new("between", between));
    registry.register_rule(Rule::new("min", min));
    registry.register_rule(Rule::new("max", max));
}

fn number(ctx: &RuleContext<'_>) -> Option<f64> {
    ctx.value().and_then(|value| value.as_f64())
}

/// Bound as written in the rule string.
fn raw<'c>(ctx: &RuleContext<'c>, index: usize) -> &'c str {
    ctx.params().get(index).map_or("", String::as_str)
}

fn between(ctx: &RuleContext<'_>) -> RuleOutcome {
    let (low, high) = (ctx.float_param(0)?, ctx.float_param(1)?);
    let ok = number(ctx).is_some_and(|n| low <= n && n <= high);

    Ok(Verdict::check(ok, || {
        format!("Must be a number between {} and {}", raw(ctx, 0), raw(ctx, 1))
    }))
}

fn min(ctx: &RuleContext<'_>) -> RuleOutcome {
    let low = ctx.float_param(0)?;
    let ok = number(ctx).is_some_and(|n| n >= low);

    Ok(Verdict::check(ok, || {
        format!("Must be a number greater than or equal to {}", raw(ctx, 0))
    }))
}

fn max(ctx: &RuleContext<'_>) -> RuleOutcome {
    let high = ctx.float_param(0)?;
    let ok = number(ctx).is_some_and(|n| n <= high);

    Ok(Verdict::check(ok, || {
        format!("Must be a number less than or equal to {}", raw(ctx, 0))
    }))
}
