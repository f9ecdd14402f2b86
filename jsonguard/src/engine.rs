//! The validation walk.
//!
//! For every field the engine runs a fixed sequence of gates:
//!
//! 1. presence rules, all of them; any failure ends the field;
//! 2. an absent key ends the field;
//! 3. `null` on an explicitly nullable field ends the field;
//! 4. value rules, all of them, in declaration order;
//! 5. descent into records, arrays and objects, only when the value is
//!    present, non-null, and every value rule passed.

use serde_json::Value;
use tracing::{debug, trace};

use crate::bag::ErrorBag;
use crate::context::{RuleContext, ValidationContext};
use crate::error::ConfigError;
use crate::rule::{RuleBinding, Verdict};
use crate::schema::{FieldKind, SchemaGraph};

/// Walks one payload against one schema graph, collecting failures.
#[derive(Debug)]
pub struct Engine<'g> {
    graph: &'g SchemaGraph,
    errors: ErrorBag,
    debug_logging: bool,
}

impl<'g> Engine<'g> {
    pub fn new(graph: &'g SchemaGraph) -> Self {
        Self {
            graph,
            errors: ErrorBag::new(),
            debug_logging: false,
        }
    }

    /// Log each failed rule at `debug` instead of `trace`.
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    /// Validate `value` against the root record and return the collected failures.
    ///
    /// A fault raised by any rule aborts the walk.
    pub fn run(mut self, value: &Value) -> Result<ErrorBag, ConfigError> {
        let root = ValidationContext::root(self.graph, value);
        self.validate_record_fields(&root)?;

        if self.errors.is_invalid() {
            debug!(
                type_name = self.graph.type_name(),
                paths = self.errors.len(),
                errors = self.errors.count_errors(),
                "Validation failed"
            );
        }
        Ok(self.errors)
    }

    fn validate_record_fields(&mut self, ctx: &ValidationContext<'_>) -> Result<(), ConfigError> {
        let graph = self.graph;
        for &child in graph.children(ctx.node_id()) {
            let key = graph.node(child).json_key();
            let child_ctx = ctx.child(child, key);
            self.validate_field(&child_ctx)?;
        }
        Ok(())
    }

    fn validate_field(&mut self, ctx: &ValidationContext<'_>) -> Result<(), ConfigError> {
        let tag = ctx.field().tag();

        if self.run_rules(ctx, &tag.presence_rules)? {
            return Ok(());
        }

        if !ctx.is_present() {
            return Ok(());
        }

        if ctx.is_null() && tag.explicitly_nullable {
            return Ok(());
        }

        let value_failed = self.run_rules(ctx, &tag.value_rules)?;
        if value_failed || ctx.is_null() {
            return Ok(());
        }

        self.descend(ctx)
    }

    fn descend(&mut self, ctx: &ValidationContext<'_>) -> Result<(), ConfigError> {
        let graph = self.graph;
        let node = ctx.node_id();

        match ctx.field().kind() {
            FieldKind::Record => self.validate_record_fields(ctx),
            FieldKind::List => {
                let (Some(Value::Array(items)), Some(element)) = (ctx.value(), graph.element(node))
                else {
                    return Ok(());
                };
                for index in 0..items.len() {
                    let entry = ctx.child(element, &index.to_string());
                    self.validate_field(&entry)?;
                }
                Ok(())
            }
            FieldKind::Map => {
                let (Some(Value::Object(entries)), Some(element)) = (ctx.value(), graph.element(node))
                else {
                    return Ok(());
                };
                for key in entries.keys() {
                    let entry = ctx.child(element, key);
                    self.validate_field(&entry)?;
                }
                Ok(())
            }
            FieldKind::Leaf => Ok(()),
        }
    }

    /// Run every binding, recording failures. Returns whether any failed.
    fn run_rules(
        &mut self,
        ctx: &ValidationContext<'_>,
        bindings: &[RuleBinding],
    ) -> Result<bool, ConfigError> {
        let mut failed = false;

        for binding in bindings {
            let rule_ctx = RuleContext::new(ctx, binding);
            if let Verdict::Fail(message) = binding.rule().evaluate(&rule_ctx)? {
                if self.debug_logging {
                    debug!(path = ctx.path(), rule = binding.name(), "Rule failed");
                } else {
                    trace!(path = ctx.path(), rule = binding.name(), "Rule failed");
                }
                self.errors
                    .add_error(ctx.path(), format!("[{}]: {}", binding.name(), message));
                failed = true;
            }
        }

        Ok(failed)
    }
}

/// Validate `value` against `graph` with default settings.
pub fn validate_value(graph: &SchemaGraph, value: &Value) -> Result<ErrorBag, ConfigError> {
    Engine::new(graph).run(value)
}
