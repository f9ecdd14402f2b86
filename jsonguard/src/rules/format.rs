//! String format rules.

use std::net::IpAddr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use dashmap::DashMap;
use regex::Regex;
use serde_json::Value;

use crate::context::RuleContext;
use crate::error::ConfigError;
use crate::registry::RuleRegistry;
use crate::rule::{Rule, RuleOutcome, Verdict};

const UUID_PATTERN: &str = r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$";
const NIL_UUID: &str = "00000000-0000-0000-0000-000000000000";
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$";
const URL_PATTERN: &str = r"^https?://([^/?#:@\[\]\s]+)(?:[/?#]\S*)?$";
const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";
const PHONE_E164_PATTERN: &str = r"^\+[1-9]\d{0,2} \d{1,12}$";

/// Compiled patterns keyed by source, shared by every validator in the process.
static PATTERNS: LazyLock<DashMap<String, Regex>> = LazyLock::new(DashMap::new);

pub(super) fn register(registry: &mut RuleRegistry) {
    registry.register_rule(Rule::new("regex", matches_regex));
    registry.register_rule(Rule::new("email", |ctx| {
        pattern_rule(ctx, EMAIL_PATTERN, "Must be a valid email string")
    }));
    registry.register_rule(Rule::new("phoneNumberE164", |ctx| {
        pattern_rule(ctx, PHONE_E164_PATTERN, "Must be a valid E.164 phone number string")
    }));
    registry.register_rule(Rule::new("uuid", |ctx| {
        if as_str(ctx) == Some(NIL_UUID) {
            return Ok(Verdict::fail("Must be a valid uuid string and not the zero uuid"));
        }
        pattern_rule(ctx, UUID_PATTERN, "Must be a valid uuid string and not the zero uuid")
    }));
    registry.register_rule(Rule::new("zeroableUuid", |ctx| {
        pattern_rule(ctx, UUID_PATTERN, "Must be a valid uuid string")
    }));
    registry.register_rule(Rule::new("url", url));
    registry.register_rule(Rule::new("ip", |ctx| {
        let ok = as_str(ctx).is_some_and(|s| s.parse::<IpAddr>().is_ok());
        Ok(Verdict::check(ok, || "Must be a valid ip string".to_string()))
    }));
    registry.register_rule(Rule::new("json", |ctx| {
        let ok = as_str(ctx)
            .is_some_and(|s| serde_json::from_str::<serde::de::IgnoredAny>(s).is_ok());
        Ok(Verdict::check(ok, || "Must be a valid json string".to_string()))
    }));
    registry.register_rule(Rule::new("date", date));
}

fn as_str<'c>(ctx: &RuleContext<'c>) -> Option<&'c str> {
    match ctx.value() {
        Some(Value::String(s)) => Some(s.as_str()),
        _ => None,
    }
}

/// Compile `source` once per process.
fn compiled(rule: &str, source: &str) -> Result<Regex, ConfigError> {
    if let Some(regex) = PATTERNS.get(source) {
        return Ok(regex.clone());
    }

    let regex = Regex::new(source).map_err(|err| ConfigError::InvalidPattern {
        rule: rule.to_string(),
        pattern: source.to_string(),
        reason: err.to_string(),
    })?;
    PATTERNS.insert(source.to_string(), regex.clone());
    Ok(regex)
}

fn pattern_rule(ctx: &RuleContext<'_>, source: &str, message: &str) -> RuleOutcome {
    let regex = compiled(ctx.rule_name(), source)?;
    let ok = as_str(ctx).is_some_and(|s| regex.is_match(s));
    Ok(Verdict::check(ok, || message.to_string()))
}

/// Parameters are rejoined with `,` so patterns may contain commas.
fn matches_regex(ctx: &RuleContext<'_>) -> RuleOutcome {
    ctx.param(0)?;
    let source = ctx.params().join(",");
    let message = format!("Must be a string matching regex: {}", source);
    pattern_rule(ctx, &source, &message)
}

/// http(s) only, no port, no IP literal, no localhost, and a dotted host whose
/// last label is alphabetic.
fn url(ctx: &RuleContext<'_>) -> RuleOutcome {
    let regex = compiled(ctx.rule_name(), URL_PATTERN)?;
    let ok = as_str(ctx)
        .and_then(|s| regex.captures(s))
        .and_then(|captures| captures.get(1))
        .is_some_and(|host| is_public_hostname(host.as_str()));

    Ok(Verdict::check(ok, || {
        "Must be a valid http/https url string without port (ip and localhost are not allowed)"
            .to_string()
    }))
}

fn is_public_hostname(host: &str) -> bool {
    if host.eq_ignore_ascii_case("localhost") || host.parse::<IpAddr>().is_ok() {
        return false;
    }

    let labels: Vec<&str> = host.split('.').collect();
    let Some((tld, rest)) = labels.split_last() else {
        return false;
    };

    !rest.is_empty()
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
        && labels
            .iter()
            .all(|label| !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'))
}

fn date(ctx: &RuleContext<'_>) -> RuleOutcome {
    const MESSAGE: &str = "Must be a valid YYYY-MM-DD date formatted string";

    let Some(raw) = as_str(ctx) else {
        return Ok(Verdict::Fail(format!("{} - Non string given", MESSAGE)));
    };

    let shaped = compiled(ctx.rule_name(), DATE_PATTERN)?.is_match(raw);
    let ok = shaped && NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok();
    Ok(Verdict::check(ok, || format!("{} - Got: [{}]", MESSAGE, raw)))
}
