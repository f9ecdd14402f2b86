//! Rule registry and rule-string resolution.
//!
//! The registry owns three namespaces that are consulted in a fixed order
//! when a rule name is looked up:
//!
//! 1. composites: named templates such as `"int|between:$0,$1"`, expanded
//!    with the invocation's parameters and re-resolved;
//! 2. rules: named predicates;
//! 3. aliases: alternative names for a rule or composite, followed
//!    transitively.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::trace;

use crate::error::ConfigError;
use crate::rule::{Rule, RuleBinding, ValidationTag};

/// A single parsed `name[:p0,p1,...]` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDefinition<'a> {
    /// Rule, alias or composite name.
    pub name: &'a str,
    /// Parameters split on `,`. Empty when the token has no `:`.
    pub params: Vec<&'a str>,
}

impl<'a> RuleDefinition<'a> {
    /// Parse one token. Returns `None` for blank tokens.
    pub fn parse(definition: &'a str) -> Option<Self> {
        if definition.trim().is_empty() {
            return None;
        }

        let (name, params) = match definition.split_once(':') {
            Some((name, raw)) => (name, raw.split(',').collect()),
            None => (definition, Vec::new()),
        };

        Some(Self { name, params })
    }
}

/// Holds the vocabulary of rules available to rule strings.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, Arc<Rule>>,
    aliases: HashMap<String, String>,
    composites: HashMap<String, String>,
}

impl RuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry preloaded with the built-in rules, aliases and composites.
    pub fn with_builtin_rules() -> Self {
        let mut registry = Self::new();
        crate::rules::register_builtins(&mut registry);
        registry
    }

    /// Register a rule under its own name. Replaces any previous rule of that name.
    pub fn register_rule(&mut self, rule: Rule) {
        self.rules.insert(rule.name().to_string(), Arc::new(rule));
    }

    /// Register `alias` as another name for `canonical`.
    pub fn register_alias(&mut self, alias: impl Into<String>, canonical: impl Into<String>) {
        self.aliases.insert(alias.into(), canonical.into());
    }

    /// Register a composite template, e.g. `"required|lenMin:$0|lenMax:$1"`.
    pub fn register_composite(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.composites.insert(name.into(), template.into());
    }

    /// Whether `name` is known in any namespace.
    pub fn contains(&self, name: &str) -> bool {
        self.composites.contains_key(name)
            || self.rules.contains_key(name)
            || self.aliases.contains_key(name)
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .rules
            .keys()
            .chain(self.aliases.keys())
            .chain(self.composites.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Resolve a single rule definition into one or more bindings.
    ///
    /// Composites expand recursively. Each binding keeps the name it was
    /// invoked with, so an alias reports failures under the alias.
    pub fn resolve(&self, definition: &str) -> Result<Vec<RuleBinding>, ConfigError> {
        let mut bindings = Vec::new();
        let mut expanding = Vec::new();
        self.resolve_into(definition, &mut expanding, &mut bindings)?;
        Ok(bindings)
    }

    /// Resolve a full pipe-separated rule string into a [`ValidationTag`].
    pub fn resolve_tag(&self, rules: &str) -> Result<ValidationTag, ConfigError> {
        let mut bindings = Vec::new();
        for definition in rules.trim().split('|') {
            bindings.extend(self.resolve(definition)?);
        }
        Ok(ValidationTag::from_bindings(bindings))
    }

    /// Walk the composite reference graph and report the first cycle.
    ///
    /// [`RuleRegistry::resolve`] catches cycles lazily, for the composites a
    /// rule string actually uses. This checks the whole vocabulary up front.
    pub fn check_composites(&self) -> Result<(), ConfigError> {
        let mut names: Vec<&String> = self.composites.keys().collect();
        names.sort_unstable();

        let mut visited = HashSet::new();
        for name in names {
            let mut path = Vec::new();
            if let Some(cycle) = self.find_cycle(name, &mut visited, &mut path) {
                return Err(ConfigError::CompositeCycle(cycle));
            }
        }
        Ok(())
    }

    fn resolve_into(
        &self,
        definition: &str,
        expanding: &mut Vec<String>,
        bindings: &mut Vec<RuleBinding>,
    ) -> Result<(), ConfigError> {
        let Some(parsed) = RuleDefinition::parse(definition) else {
            return Ok(());
        };

        let canonical = self.canonical_name(parsed.name)?;

        if let Some(template) = self.composites.get(canonical) {
            if expanding.iter().any(|name| name == canonical) {
                let mut cycle = expanding.clone();
                cycle.push(canonical.to_string());
                return Err(ConfigError::CompositeCycle(cycle));
            }

            let expanded = substitute_params(canonical, template, &parsed.params)?;
            trace!(composite = canonical, expanded = %expanded, "Expanding composite rule");

            expanding.push(canonical.to_string());
            for part in expanded.split('|') {
                self.resolve_into(part, expanding, bindings)?;
            }
            expanding.pop();
            return Ok(());
        }

        let rule = self
            .rules
            .get(canonical)
            .ok_or_else(|| ConfigError::UnknownRule(parsed.name.to_string()))?;

        bindings.push(RuleBinding::new(
            parsed.name,
            parsed.params.iter().map(|p| p.to_string()).collect(),
            Arc::clone(rule),
        ));
        Ok(())
    }

    /// Follow aliases until reaching a composite or rule name.
    fn canonical_name<'a>(&'a self, name: &'a str) -> Result<&'a str, ConfigError> {
        let mut current = name;
        let mut hops = 0;

        loop {
            if self.composites.contains_key(current) || self.rules.contains_key(current) {
                return Ok(current);
            }

            match self.aliases.get(current) {
                Some(next) => {
                    hops += 1;
                    if hops > self.aliases.len() {
                        return Err(ConfigError::AliasCycle(name.to_string()));
                    }
                    current = next.as_str();
                }
                None => return Err(ConfigError::UnknownRule(name.to_string())),
            }
        }
    }

    fn find_cycle(
        &self,
        name: &str,
        visited: &mut HashSet<String>,
        path: &mut Vec<String>,
    ) -> Option<Vec<String>> {
        if let Some(start) = path.iter().position(|n| n == name) {
            let mut cycle = path[start..].to_vec();
            cycle.push(name.to_string());
            return Some(cycle);
        }

        if visited.contains(name) {
            return None;
        }

        path.push(name.to_string());

        if let Some(template) = self.composites.get(name) {
            for part in template.split('|') {
                let Some(parsed) = RuleDefinition::parse(part) else {
                    continue;
                };
                let Ok(canonical) = self.canonical_name(parsed.name) else {
                    continue;
                };
                if self.composites.contains_key(canonical) {
                    if let Some(cycle) = self.find_cycle(canonical, visited, path) {
                        return Some(cycle);
                    }
                }
            }
        }

        path.pop();
        visited.insert(name.to_string());
        None
    }
}

/// Replace every `$<index>` in `template` with the matching parameter.
fn substitute_params(
    composite: &str,
    template: &str,
    params: &[&str],
) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let mut digits = String::new();
        while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
            digits.push(d);
            chars.next();
        }

        if digits.is_empty() {
            out.push('$');
            continue;
        }

        let index = digits.parse::<usize>().unwrap_or(usize::MAX);
        let value = params
            .get(index)
            .ok_or_else(|| ConfigError::MissingCompositeParameter {
                composite: composite.to_string(),
                index,
            })?;
        out.push_str(value);
    }

    Ok(out)
}
