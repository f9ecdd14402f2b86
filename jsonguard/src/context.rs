//! Traversal contexts joining schema nodes with live JSON values.

use serde_json::Value;

use crate::error::ConfigError;
use crate::rule::RuleBinding;
use crate::schema::{FieldSchema, NodeId, SchemaGraph, ELEMENT_KEY};

/// Where a field sits in the payload and what was found there.
#[derive(Debug, Clone)]
pub struct JsonContext<'a> {
    path: String,
    key_present: bool,
    value: Option<&'a Value>,
}

impl<'a> JsonContext<'a> {
    /// Context for the payload root. The root is always present.
    pub fn root(value: &'a Value) -> Self {
        Self {
            path: String::new(),
            key_present: true,
            value: Some(value),
        }
    }

    /// Look up record field `key` inside this context's value.
    ///
    /// Only objects have fields. Any other value, including an array or an
    /// absent one, yields an absent child.
    pub fn child(&self, key: &str) -> JsonContext<'a> {
        let value = match self.value {
            Some(Value::Object(map)) => map.get(key),
            _ => None,
        };
        self.descend(key, value)
    }

    /// Look up a collection element: an object entry by key or an array
    /// item by stringified index.
    pub fn element(&self, key: &str) -> JsonContext<'a> {
        let value = match self.value {
            Some(Value::Object(map)) => map.get(key),
            Some(Value::Array(items)) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        self.descend(key, value)
    }

    fn descend(&self, key: &str, value: Option<&'a Value>) -> JsonContext<'a> {
        let path = if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        };

        JsonContext {
            path,
            key_present: value.is_some(),
            value,
        }
    }

    /// Dotted path from the root, empty for the root itself.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the key exists in the enclosing value.
    pub fn is_present(&self) -> bool {
        self.key_present
    }

    /// Whether the key exists and holds JSON `null`.
    pub fn is_null(&self) -> bool {
        matches!(self.value, Some(Value::Null))
    }

    /// The raw value, `None` when the key is absent.
    pub fn value(&self) -> Option<&'a Value> {
        self.value
    }
}

/// One step of a validation walk.
///
/// Contexts form a tree that mirrors the walk, not the schema: a recursive
/// schema node is visited once per level of the payload.
#[derive(Debug, Clone)]
pub struct ValidationContext<'a> {
    json: JsonContext<'a>,
    parent: Option<&'a ValidationContext<'a>>,
    graph: &'a SchemaGraph,
    field: NodeId,
}

impl<'a> ValidationContext<'a> {
    /// Context for the root record of `graph` over `value`.
    pub fn root(graph: &'a SchemaGraph, value: &'a Value) -> Self {
        Self {
            json: JsonContext::root(value),
            parent: None,
            graph,
            field: graph.root(),
        }
    }

    /// Context for schema node `field`, found under `key` in this context's value.
    ///
    /// Element nodes of lists and maps resolve `key` as an index or entry;
    /// record fields only resolve inside objects.
    pub fn child(&'a self, field: NodeId, key: &str) -> ValidationContext<'a> {
        let json = if self.graph.node(field).struct_key() == ELEMENT_KEY {
            self.json.element(key)
        } else {
            self.json.child(key)
        };

        ValidationContext {
            json,
            parent: Some(self),
            graph: self.graph,
            field,
        }
    }

    /// Context for a sibling declared on the same parent record.
    ///
    /// Siblings are looked up by declared Rust name, not by JSON key.
    pub fn neighbor(&self, struct_key: &str) -> Result<ValidationContext<'a>, ConfigError> {
        let unknown = || ConfigError::UnknownSibling {
            field: struct_key.to_string(),
            path: self.json.path.clone(),
        };

        let parent = self.parent.ok_or_else(unknown)?;
        let sibling = self
            .graph
            .child_by_struct_key(parent.field, struct_key)
            .ok_or_else(unknown)?;

        Ok(parent.child(sibling, self.graph.node(sibling).json_key()))
    }

    pub fn json(&self) -> &JsonContext<'a> {
        &self.json
    }

    pub fn path(&self) -> &str {
        self.json.path()
    }

    pub fn is_present(&self) -> bool {
        self.json.is_present()
    }

    pub fn is_null(&self) -> bool {
        self.json.is_null()
    }

    /// Present and not `null`.
    pub fn has_value(&self) -> bool {
        self.is_present() && !self.is_null()
    }

    pub fn value(&self) -> Option<&'a Value> {
        self.json.value()
    }

    pub fn parent(&self) -> Option<&'a ValidationContext<'a>> {
        self.parent
    }

    /// The outermost context of this walk.
    pub fn root_context(&self) -> &ValidationContext<'a> {
        let mut current = self;
        while let Some(parent) = current.parent {
            current = parent;
        }
        current
    }

    pub fn graph(&self) -> &'a SchemaGraph {
        self.graph
    }

    pub fn node_id(&self) -> NodeId {
        self.field
    }

    /// Schema node being validated.
    pub fn field(&self) -> &'a FieldSchema {
        self.graph.node(self.field)
    }
}

/// How a list of sibling presence checks is combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Only the first listed sibling counts.
    Single,
    /// At least one listed sibling.
    Any,
    /// Every listed sibling.
    All,
}

/// What a rule predicate sees: the field under validation plus the binding
/// that invoked the rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'c> {
    field: &'c ValidationContext<'c>,
    binding: &'c RuleBinding,
}

impl<'c> RuleContext<'c> {
    pub fn new(field: &'c ValidationContext<'c>, binding: &'c RuleBinding) -> Self {
        Self { field, binding }
    }

    /// The underlying traversal context.
    pub fn context(&self) -> &'c ValidationContext<'c> {
        self.field
    }

    /// The raw value, `None` when the key is absent.
    pub fn value(&self) -> Option<&'c Value> {
        self.field.value()
    }

    pub fn is_present(&self) -> bool {
        self.field.is_present()
    }

    pub fn is_null(&self) -> bool {
        self.field.is_null()
    }

    /// Present and not `null`.
    pub fn has_value(&self) -> bool {
        self.field.has_value()
    }

    pub fn path(&self) -> &str {
        self.field.path()
    }

    pub fn json_key(&self) -> &'static str {
        self.field.field().json_key()
    }

    pub fn struct_key(&self) -> &'static str {
        self.field.field().struct_key()
    }

    /// Name the rule was invoked with.
    pub fn rule_name(&self) -> &'c str {
        self.binding.name()
    }

    pub fn params(&self) -> &'c [String] {
        self.binding.params()
    }

    /// Parameter at `index`.
    pub fn param(&self, index: usize) -> Result<&'c str, ConfigError> {
        self.binding
            .params()
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingParameter {
                rule: self.binding.name().to_string(),
                index,
            })
    }

    /// Parameter at `index` parsed as an integer.
    pub fn int_param(&self, index: usize) -> Result<i64, ConfigError> {
        let raw = self.param(index)?;
        raw.parse()
            .map_err(|_| self.invalid_param(index, raw, "integer"))
    }

    /// Parameter at `index` parsed as a float.
    pub fn float_param(&self, index: usize) -> Result<f64, ConfigError> {
        let raw = self.param(index)?;
        raw.parse()
            .map_err(|_| self.invalid_param(index, raw, "number"))
    }

    /// Parameter at `index` parsed as a non-negative length.
    pub fn len_param(&self, index: usize) -> Result<usize, ConfigError> {
        let raw = self.param(index)?;
        raw.parse()
            .map_err(|_| self.invalid_param(index, raw, "length"))
    }

    fn invalid_param(&self, index: usize, raw: &str, expected: &'static str) -> ConfigError {
        ConfigError::InvalidParameter {
            rule: self.binding.name().to_string(),
            index,
            value: raw.to_string(),
            expected,
        }
    }

    /// Context of the sibling declared as `struct_key`.
    pub fn neighbor(&self, struct_key: &str) -> Result<ValidationContext<'c>, ConfigError> {
        self.field.neighbor(struct_key)
    }

    /// Evaluate a presence combinator over siblings.
    ///
    /// With `allow_null` a sibling counts when its key is present; otherwise
    /// it must also be non-null.
    pub fn neighbors_present<S: AsRef<str>>(
        &self,
        names: &[S],
        mode: Combinator,
        allow_null: bool,
    ) -> Result<bool, ConfigError> {
        let names = match mode {
            Combinator::Single => &names[..names.len().min(1)],
            Combinator::Any | Combinator::All => names,
        };

        let mut any = false;
        let mut all = true;
        for name in names {
            let sibling = self.neighbor(name.as_ref())?;
            let present = if allow_null {
                sibling.is_present()
            } else {
                sibling.has_value()
            };
            any |= present;
            all &= present;
        }

        Ok(match mode {
            Combinator::Any => any,
            Combinator::Single | Combinator::All => all && !names.is_empty(),
        })
    }

    /// JSON keys of siblings, for messages.
    pub fn neighbor_keys<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&'static str>, ConfigError> {
        names
            .iter()
            .map(|name| {
                self.neighbor(name.as_ref())
                    .map(|sibling| sibling.field().json_key())
            })
            .collect()
    }

    /// Other fields of the same parent that carry this rule with the same
    /// first parameter `group`.
    pub fn group_members(&self, group: &str) -> Vec<ValidationContext<'c>> {
        let Some(parent) = self.field.parent() else {
            return Vec::new();
        };

        let graph = self.field.graph();
        let canonical = self.binding.rule().name();

        graph
            .children(parent.node_id())
            .iter()
            .copied()
            .filter(|&id| id != self.field.node_id())
            .filter(|&id| {
                let tag = graph.node(id).tag();
                tag.presence_rules
                    .iter()
                    .chain(tag.value_rules.iter())
                    .any(|binding| {
                        binding.rule().name() == canonical
                            && binding.params().first().map(String::as_str) == Some(group)
                    })
            })
            .map(|id| parent.child(id, graph.node(id).json_key()))
            .collect()
    }
}
