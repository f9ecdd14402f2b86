//! Rule definitions, bound invocations and resolved validation tags.

use std::fmt;
use std::sync::Arc;

use crate::context::RuleContext;
use crate::error::ConfigError;

/// Result of evaluating one rule against one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The rule is satisfied.
    Pass,
    /// The rule failed with a user-facing message.
    Fail(String),
}

impl Verdict {
    /// Shorthand for a failure verdict.
    pub fn fail(message: impl Into<String>) -> Self {
        Verdict::Fail(message.into())
    }

    /// `Pass` when `ok`, otherwise a failure built from `message`.
    pub fn check(ok: bool, message: impl FnOnce() -> String) -> Self {
        if ok {
            Verdict::Pass
        } else {
            Verdict::Fail(message())
        }
    }

    /// Check if the verdict is a pass.
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// What a predicate returns. `Err` aborts the run as a configuration fault.
pub type RuleOutcome = Result<Verdict, ConfigError>;

/// Predicate signature shared by every rule.
pub type Predicate = dyn Fn(&RuleContext<'_>) -> RuleOutcome + Send + Sync;

/// A named rule registered once and shared by every field that uses it.
#[derive(Clone)]
pub struct Rule {
    name: String,
    predicate: Arc<Predicate>,
    presence: bool,
    nullable: bool,
}

impl Rule {
    /// Create a value rule from a predicate.
    ///
    /// # Example
    ///
    /// ```rust
    /// use jsonguard::{Rule, Verdict};
    ///
    /// let even = Rule::new("even", |ctx| {
    ///     let ok = ctx.value().and_then(|v| v.as_i64()).is_some_and(|n| n % 2 == 0);
    ///     Ok(Verdict::check(ok, || "Must be even".to_string()))
    /// });
    /// assert!(!even.is_presence());
    /// ```
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&RuleContext<'_>) -> RuleOutcome + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
            presence: false,
            nullable: false,
        }
    }

    /// Classify the rule as a presence rule.
    pub fn presence(mut self) -> Self {
        self.presence = true;
        self
    }

    /// Mark the rule as making its field explicitly nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Canonical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_presence(&self) -> bool {
        self.presence
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Evaluate the predicate.
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        (self.predicate)(ctx)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("presence", &self.presence)
            .field("nullable", &self.nullable)
            .finish_non_exhaustive()
    }
}

/// A rule bound to the parameters and name it was invoked with.
#[derive(Debug, Clone)]
pub struct RuleBinding {
    name: String,
    params: Vec<String>,
    rule: Arc<Rule>,
}

impl RuleBinding {
    pub(crate) fn new(name: impl Into<String>, params: Vec<String>, rule: Arc<Rule>) -> Self {
        Self {
            name: name.into(),
            params,
            rule,
        }
    }

    /// Invocation name: the alias when invoked through one.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positional parameters as written.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// The canonical rule.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn is_presence(&self) -> bool {
        self.rule.is_presence()
    }

    pub fn is_nullable(&self) -> bool {
        self.rule.is_nullable()
    }
}

/// Resolved rules of one field, split by evaluation phase.
#[derive(Debug, Clone, Default)]
pub struct ValidationTag {
    /// Non-presence rules, in declaration order.
    pub value_rules: Vec<RuleBinding>,
    /// Presence rules, in declaration order.
    pub presence_rules: Vec<RuleBinding>,
    /// Set when any resolved rule is a nullable rule.
    pub explicitly_nullable: bool,
}

impl ValidationTag {
    /// Build a tag from bindings in declaration order.
    pub fn from_bindings(bindings: impl IntoIterator<Item = RuleBinding>) -> Self {
        let mut tag = Self::default();
        for binding in bindings {
            if binding.is_nullable() {
                tag.explicitly_nullable = true;
            }
            if binding.is_presence() {
                tag.presence_rules.push(binding);
            } else {
                tag.value_rules.push(binding);
            }
        }
        tag
    }

    /// True when the field carries no rules at all.
    pub fn is_empty(&self) -> bool {
        self.value_rules.is_empty() && self.presence_rules.is_empty()
    }

    /// Every binding with the given invocation name, presence rules first.
    pub fn rules_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RuleBinding> + 'a {
        self.presence_rules
            .iter()
            .chain(self.value_rules.iter())
            .filter(move |binding| binding.name() == name)
    }
}
