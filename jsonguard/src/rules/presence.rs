//! Presence rules. These run before every other rule and halt the field on failure.

use crate::context::{Combinator, RuleContext};
use crate::error::ConfigError;
use crate::registry::RuleRegistry;
use crate::rule::{Rule, RuleOutcome, Verdict};

use super::scalar_to_string;

pub(super) fn register(registry: &mut RuleRegistry) {
    registry.register_rule(Rule::new("present", present).presence());
    registry.register_rule(Rule::new("required", required).presence());
    registry.register_rule(Rule::new("requireOneInGroup", require_one_in_group).presence());
    registry.register_rule(Rule::new("missingIf", missing_if).presence());
    registry.register_rule(Rule::new("missingUnless", missing_unless).presence());

    for (suffix, trigger) in TRIGGERS {
        registry.register_rule(
            Rule::new(format!("required{suffix}"), move |ctx| required_when(ctx, trigger)).presence(),
        );
        registry.register_rule(
            Rule::new(format!("missing{suffix}"), move |ctx| missing_when(ctx, trigger)).presence(),
        );
    }
}

fn present(ctx: &RuleContext<'_>) -> RuleOutcome {
    Ok(Verdict::check(ctx.is_present(), || {
        "Key must be present".to_string()
    }))
}

fn required(ctx: &RuleContext<'_>) -> RuleOutcome {
    Ok(Verdict::check(ctx.has_value(), || {
        "Is a required non-nullable field".to_string()
    }))
}

/// Sibling condition shared by the `required*` and `missing*` families.
#[derive(Debug, Clone, Copy)]
struct Trigger {
    mode: Combinator,
    /// Value of the combinator that activates the rule.
    fires_when: bool,
    quantifier: Option<&'static str>,
    state: &'static str,
}

impl Trigger {
    const fn new(
        mode: Combinator,
        fires_when: bool,
        quantifier: Option<&'static str>,
        state: &'static str,
    ) -> Self {
        Self {
            mode,
            fires_when,
            quantifier,
            state,
        }
    }

    fn describe(&self, keys: &[&str]) -> String {
        match self.quantifier {
            Some(quantifier) => format!("{} of [{}] {}", quantifier, keys.join(","), self.state),
            None => format!("{} {}", keys.first().copied().unwrap_or_default(), self.state),
        }
    }
}

const TRIGGERS: [(&str, Trigger); 6] = [
    ("With", Trigger::new(Combinator::Single, true, None, "is present")),
    ("WithAny", Trigger::new(Combinator::Any, true, Some("any"), "is present")),
    ("WithAll", Trigger::new(Combinator::All, true, Some("all"), "is present")),
    ("Without", Trigger::new(Combinator::Single, false, None, "is not present")),
    ("WithoutAny", Trigger::new(Combinator::All, false, Some("any"), "is not present")),
    ("WithoutAll", Trigger::new(Combinator::Any, false, Some("all"), "is not present")),
];

/// Sibling names the trigger looks at. At least one parameter is required.
fn trigger_names<'c>(ctx: &RuleContext<'c>, trigger: Trigger) -> Result<&'c [String], ConfigError> {
    ctx.param(0)?;
    let params = ctx.params();
    Ok(match trigger.mode {
        Combinator::Single => &params[..1],
        Combinator::Any | Combinator::All => params,
    })
}

fn required_when(ctx: &RuleContext<'_>, trigger: Trigger) -> RuleOutcome {
    let names = trigger_names(ctx, trigger)?;
    let fired = ctx.neighbors_present(names, trigger.mode, false)? == trigger.fires_when;
    if !fired || ctx.has_value() {
        return Ok(Verdict::Pass);
    }

    let keys = ctx.neighbor_keys(names)?;
    Ok(Verdict::Fail(format!("Is required when {}", trigger.describe(&keys))))
}

fn missing_when(ctx: &RuleContext<'_>, trigger: Trigger) -> RuleOutcome {
    let names = trigger_names(ctx, trigger)?;
    let fired = ctx.neighbors_present(names, trigger.mode, true)? == trigger.fires_when;
    if !fired || !ctx.is_present() {
        return Ok(Verdict::Pass);
    }

    let keys = ctx.neighbor_keys(names)?;
    Ok(Verdict::Fail(format!("Must not be present when {}", trigger.describe(&keys))))
}

/// Exactly one member of a group must be present and non-null.
///
/// Members are the fields of the same record carrying this rule with the same
/// group name. A group of one simply requires its only member.
fn require_one_in_group(ctx: &RuleContext<'_>) -> RuleOutcome {
    let group = ctx.param(0)?;
    let members = ctx.group_members(group);
    let any_member = members.iter().any(|member| member.has_value());

    if ctx.has_value() != any_member {
        return Ok(Verdict::Pass);
    }

    let keys: Vec<&str> = members
        .iter()
        .map(|member| member.field().json_key())
        .chain(std::iter::once(ctx.json_key()))
        .collect();

    Ok(Verdict::Fail(format!(
        "Exactly one of [{}] is expected to be present and non-null",
        keys.join(",")
    )))
}

fn missing_if(ctx: &RuleContext<'_>) -> RuleOutcome {
    let field = ctx.param(0)?;
    let expected = ctx.param(1)?;
    let sibling = ctx.neighbor(field)?;

    let matches = sibling
        .value()
        .and_then(scalar_to_string)
        .is_some_and(|actual| actual == expected);

    Ok(Verdict::check(!matches || !ctx.is_present(), || {
        format!(
            "Must not be present when [{}] has value [{}]",
            sibling.field().json_key(),
            expected
        )
    }))
}

fn missing_unless(ctx: &RuleContext<'_>) -> RuleOutcome {
    let field = ctx.param(0)?;
    let expected = ctx.param(1)?;
    let sibling = ctx.neighbor(field)?;

    let matches = sibling
        .value()
        .and_then(scalar_to_string)
        .is_some_and(|actual| actual == expected);

    Ok(Verdict::check(matches || !ctx.is_present(), || {
        format!(
            "Must not be present unless [{}] has value [{}]",
            sibling.field().json_key(),
            expected
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::super::testing::{assert_fails, assert_passes, run};
    use crate::error::ConfigError;
    use serde_json::json;

    record!(Required { "Data" => "required" });
    record!(Present { "Data" => "present" });

    #[test]
    fn test_required() {
        assert_passes::<Required>(json!({"Data": 0}));
        assert_passes::<Required>(json!({"Data": ""}));
        assert_passes::<Required>(json!({"Data": []}));
        assert_fails::<Required>(json!({}), "Data", "required");
        assert_fails::<Required>(json!({"Data": null}), "Data", "required");

        let bag = run::<Required>(json!({})).unwrap();
        assert_eq!(
            bag.errors_for("Data"),
            ["[required]: Is a required non-nullable field".to_string()]
        );
    }

    #[test]
    fn test_present_allows_null() {
        assert_passes::<Present>(json!({"Data": null}));
        assert_passes::<Present>(json!({"Data": false}));
        assert_fails::<Present>(json!({"Other": 1}), "Data", "present");
    }

    record!(RequiredWith { "A" => "requiredWith:B", "B" => "" });
    record!(RequiredWithAll { "A" => "requiredWithAll:B,C", "B" => "", "C" => "" });
    record!(RequiredWithAny { "A" => "requiredWithAny:B,C", "B" => "", "C" => "" });
    record!(RequiredWithout { "A" => "requiredWithout:B", "B" => "" });
    record!(RequiredWithoutAny { "A" => "requiredWithoutAny:B,C", "B" => "", "C" => "" });
    record!(RequiredWithoutAll { "A" => "requiredWithoutAll:B,C", "B" => "", "C" => "" });

    #[test]
    fn test_required_with() {
        assert_passes::<RequiredWith>(json!({}));
        assert_passes::<RequiredWith>(json!({"B": null}));
        assert_passes::<RequiredWith>(json!({"A": 1, "B": 1}));
        assert_fails::<RequiredWith>(json!({"B": 1}), "A", "requiredWith");
        assert_fails::<RequiredWith>(json!({"A": null, "B": 1}), "A", "requiredWith");

        let bag = run::<RequiredWith>(json!({"B": 1})).unwrap();
        assert_eq!(bag.errors_for("A"), ["[requiredWith]: Is required when B is present".to_string()]);
    }

    #[test]
    fn test_required_with_all_and_any() {
        assert_passes::<RequiredWithAll>(json!({"B": 1}));
        assert_fails::<RequiredWithAll>(json!({"B": 1, "C": 1}), "A", "requiredWithAll");

        assert_passes::<RequiredWithAny>(json!({"B": null, "C": null}));
        assert_fails::<RequiredWithAny>(json!({"C": 1}), "A", "requiredWithAny");

        let bag = run::<RequiredWithAll>(json!({"B": 1, "C": 1})).unwrap();
        assert_eq!(
            bag.errors_for("A"),
            ["[requiredWithAll]: Is required when all of [B,C] is present".to_string()]
        );
    }

    #[test]
    fn test_required_without_family() {
        assert_passes::<RequiredWithout>(json!({"B": 1}));
        assert_fails::<RequiredWithout>(json!({"B": null}), "A", "requiredWithout");

        assert_passes::<RequiredWithoutAny>(json!({"B": 1, "C": 1}));
        assert_fails::<RequiredWithoutAny>(json!({"B": 1}), "A", "requiredWithoutAny");
        assert_passes::<RequiredWithoutAny>(json!({"A": 1}));

        assert_passes::<RequiredWithoutAll>(json!({"C": 1}));
        assert_fails::<RequiredWithoutAll>(json!({}), "A", "requiredWithoutAll");

        let bag = run::<RequiredWithoutAll>(json!({})).unwrap();
        assert_eq!(
            bag.errors_for("A"),
            ["[requiredWithoutAll]: Is required when all of [B,C] is not present".to_string()]
        );
    }

    record!(MissingWith { "A" => "missingWith:B", "B" => "" });
    record!(MissingWithAll { "A" => "missingWithAll:B,C", "B" => "", "C" => "" });
    record!(MissingWithout { "A" => "missingWithout:B", "B" => "" });
    record!(MissingWithoutAll { "A" => "missingWithoutAll:B,C", "B" => "", "C" => "" });

    #[test]
    fn test_missing_with_counts_null_siblings() {
        assert_passes::<MissingWith>(json!({"A": 1}));
        assert_passes::<MissingWith>(json!({"B": 1}));
        assert_fails::<MissingWith>(json!({"A": 1, "B": 1}), "A", "missingWith");
        assert_fails::<MissingWith>(json!({"A": null, "B": null}), "A", "missingWith");

        let bag = run::<MissingWith>(json!({"A": 1, "B": 1})).unwrap();
        assert_eq!(bag.errors_for("A"), ["[missingWith]: Must not be present when B is present".to_string()]);
    }

    #[test]
    fn test_missing_with_all_and_without() {
        assert_passes::<MissingWithAll>(json!({"A": 1, "B": 1}));
        assert_fails::<MissingWithAll>(json!({"A": 1, "B": 1, "C": null}), "A", "missingWithAll");

        assert_passes::<MissingWithout>(json!({"A": 1, "B": null}));
        assert_fails::<MissingWithout>(json!({"A": 1}), "A", "missingWithout");

        assert_passes::<MissingWithoutAll>(json!({"A": 1, "C": 1}));
        assert_fails::<MissingWithoutAll>(json!({"A": null}), "A", "missingWithoutAll");

        let bag = run::<MissingWithAll>(json!({"A": 1, "B": 1, "C": null})).unwrap();
        assert_eq!(
            bag.errors_for("A"),
            ["[missingWithAll]: Must not be present when all of [B,C] is present".to_string()]
        );

        let bag = run::<MissingWithoutAll>(json!({"A": null})).unwrap();
        assert_eq!(
            bag.errors_for("A"),
            ["[missingWithoutAll]: Must not be present when all of [B,C] is not present".to_string()]
        );
    }

    record!(Group {
        "A" => "requireOneInGroup:g",
        "B" => "requireOneInGroup:g",
        "C" => "requireOneInGroup:other",
    });

    #[test]
    fn test_require_one_in_group() {
        assert_passes::<Group>(json!({"A": 1, "C": 1}));
        assert_passes::<Group>(json!({"B": 1, "C": 1, "A": null}));

        let bag = run::<Group>(json!({"A": 1, "B": 1, "C": 1})).unwrap();
        assert!(bag.has_failed("A", "requireOneInGroup"));
        assert!(bag.has_failed("B", "requireOneInGroup"));
        assert_eq!(bag.count_errors(), 2);
        assert_eq!(
            bag.errors_for("A"),
            ["[requireOneInGroup]: Exactly one of [B,A] is expected to be present and non-null".to_string()]
        );

        let bag = run::<Group>(json!({"C": 1})).unwrap();
        assert!(bag.has_failed("A", "requireOneInGroup"));
        assert!(bag.has_failed("B", "requireOneInGroup"));
    }

    #[test]
    fn test_group_of_one_requires_its_member() {
        assert_fails::<Group>(json!({"A": 1}), "C", "requireOneInGroup");
        assert_fails::<Group>(json!({"A": 1, "C": null}), "C", "requireOneInGroup");
    }

    record!(MissingIf { "A" => "missingIf:B,yes", "B" => "" });
    record!(MissingUnless { "A" => "missingUnless:B,10", "B" => "" });

    #[test]
    fn test_missing_if() {
        assert_passes::<MissingIf>(json!({"A": 1, "B": "no"}));
        assert_passes::<MissingIf>(json!({"B": "yes"}));
        assert_passes::<MissingIf>(json!({"A": 1}));
        assert_fails::<MissingIf>(json!({"A": null, "B": "yes"}), "A", "missingIf");

        let bag = run::<MissingIf>(json!({"A": 1, "B": "yes"})).unwrap();
        assert_eq!(
            bag.errors_for("A"),
            ["[missingIf]: Must not be present when [B] has value [yes]".to_string()]
        );
    }

    #[test]
    fn test_missing_unless() {
        assert_passes::<MissingUnless>(json!({"A": 1, "B": 10}));
        assert_passes::<MissingUnless>(json!({"A": 1, "B": "10"}));
        assert_passes::<MissingUnless>(json!({"B": 3}));
        assert_fails::<MissingUnless>(json!({"A": 1, "B": 3}), "A", "missingUnless");
        assert_fails::<MissingUnless>(json!({"A": 1, "B": [10]}), "A", "missingUnless");
        assert_fails::<MissingUnless>(json!({"A": 1}), "A", "missingUnless");
    }

    record!(UnknownSibling { "A" => "requiredWith:Nope" });
    record!(NoParams { "A" => "requiredWithAny" });

    #[test]
    fn test_misconfigured_sibling_rules_are_faults() {
        let err = run::<UnknownSibling>(json!({})).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSibling { ref field, .. } if field == "Nope"));

        let err = run::<NoParams>(json!({})).unwrap_err();
        assert!(matches!(err, ConfigError::MissingParameter { index: 0, .. }));
    }
}
