//! Arena-backed schema graph.
//!
//! Nodes live in one `Vec` and refer to each other by index. Children are
//! stored as separate lists so that a node for a type that was already seen
//! during the same build can point at the first node's list instead of
//! rebuilding it. That shared list is the only way a cycle can appear.

use std::any::TypeId;
use std::collections::HashMap;

use crate::error::ConfigError;
use crate::registry::RuleRegistry;
use crate::rule::ValidationTag;
use crate::traits::{FieldDescriptor, Shape, TypeRef};

/// JSON key and struct key of the synthetic element node under lists and maps.
pub const ELEMENT_KEY: &str = "{index}";

/// Index of a node in a [`SchemaGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a child list in a [`SchemaGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildListId(usize);

/// Structural kind of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Record,
    List,
    Map,
    Leaf,
}

impl FieldKind {
    fn of(shape: &Shape) -> Self {
        match shape {
            Shape::Record(_) => FieldKind::Record,
            Shape::List(_) => FieldKind::List,
            Shape::Map(_) => FieldKind::Map,
            Shape::Leaf => FieldKind::Leaf,
        }
    }
}

/// One node of the schema graph.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    parent: Option<NodeId>,
    children: ChildListId,
    kind: FieldKind,
    struct_key: &'static str,
    json_key: &'static str,
    tag: ValidationTag,
}

impl FieldSchema {
    /// Node that first declared this one. `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Declared Rust field name, or [`ELEMENT_KEY`] for element nodes.
    pub fn struct_key(&self) -> &'static str {
        self.struct_key
    }

    /// JSON key looked up in the parent value.
    pub fn json_key(&self) -> &'static str {
        self.json_key
    }

    /// Resolved rules.
    pub fn tag(&self) -> &ValidationTag {
        &self.tag
    }

    /// Identity of the children list, shared between nodes of the same type.
    pub fn children_id(&self) -> ChildListId {
        self.children
    }
}

/// Schema of one record type, built once and shared read-only.
#[derive(Debug)]
pub struct SchemaGraph {
    type_name: &'static str,
    nodes: Vec<FieldSchema>,
    child_lists: Vec<Vec<NodeId>>,
}

impl SchemaGraph {
    /// Build the graph for a record type, resolving every rule string against `registry`.
    ///
    /// Fails with [`ConfigError::NotARecord`] if `root` is not a record, or with
    /// the first resolution error of any field's rule string.
    pub fn build(root: TypeRef, registry: &RuleRegistry) -> Result<Self, ConfigError> {
        let fields = match root.shape() {
            Shape::Record(fields) => fields,
            other => {
                return Err(ConfigError::NotARecord {
                    type_name: root.name(),
                    kind: other.kind_name(),
                })
            }
        };

        let mut builder = GraphBuilder::new(registry);
        let list = builder.new_child_list();
        builder.memo.insert(root.id(), list);
        let root_id = builder.push_node(FieldSchema {
            parent: None,
            children: list,
            kind: FieldKind::Record,
            struct_key: "",
            json_key: "",
            tag: ValidationTag::default(),
        });
        builder.fill_record(root_id, list, fields)?;

        Ok(Self {
            type_name: root.name(),
            nodes: builder.nodes,
            child_lists: builder.child_lists,
        })
    }

    /// Name of the record type this graph describes.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &FieldSchema {
        &self.nodes[id.0]
    }

    /// Ordered children of a node.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.child_lists[self.nodes[id.0].children.0]
    }

    /// The element node of a list or map node.
    pub fn element(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id).kind {
            FieldKind::List | FieldKind::Map => self.children(id).first().copied(),
            FieldKind::Record | FieldKind::Leaf => None,
        }
    }

    /// Child of `parent` whose declared Rust name is `struct_key`.
    pub fn child_by_struct_key(&self, parent: NodeId, struct_key: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.node(child).struct_key == struct_key)
    }

    /// Number of nodes. Bounded by the number of distinct types reachable from the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

struct GraphBuilder<'r> {
    registry: &'r RuleRegistry,
    nodes: Vec<FieldSchema>,
    child_lists: Vec<Vec<NodeId>>,
    /// Type already built during this build → its children list.
    memo: HashMap<TypeId, ChildListId>,
    /// Record types currently being spliced through embedded fields.
    embedding: Vec<TypeId>,
    empty: ChildListId,
}

impl<'r> GraphBuilder<'r> {
    fn new(registry: &'r RuleRegistry) -> Self {
        let mut builder = Self {
            registry,
            nodes: Vec::new(),
            child_lists: Vec::new(),
            memo: HashMap::new(),
            embedding: Vec::new(),
            empty: ChildListId(0),
        };
        builder.empty = builder.new_child_list();
        builder
    }

    fn new_child_list(&mut self) -> ChildListId {
        self.child_lists.push(Vec::new());
        ChildListId(self.child_lists.len() - 1)
    }

    fn push_node(&mut self, node: FieldSchema) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn fill_record(
        &mut self,
        parent: NodeId,
        list: ChildListId,
        fields: Vec<FieldDescriptor>,
    ) -> Result<(), ConfigError> {
        for field in fields {
            if field.embedded && !self.embedding.contains(&field.ty.id()) {
                if let Shape::Record(inner) = field.ty.shape() {
                    self.embedding.push(field.ty.id());
                    let spliced = self.fill_record(parent, list, inner);
                    self.embedding.pop();
                    spliced?;
                    continue;
                }
            }

            let tag = match field.rules {
                Some(rules) => self.registry.resolve_tag(rules)?,
                None => ValidationTag::default(),
            };
            let child = self.add_node(parent, field.struct_key, field.json_key, tag, field.ty)?;
            self.child_lists[list.0].push(child);
        }
        Ok(())
    }

    fn add_node(
        &mut self,
        parent: NodeId,
        struct_key: &'static str,
        json_key: &'static str,
        tag: ValidationTag,
        ty: TypeRef,
    ) -> Result<NodeId, ConfigError> {
        let shape = ty.shape();
        let kind = FieldKind::of(&shape);

        let mut node = FieldSchema {
            parent: Some(parent),
            children: self.empty,
            kind,
            struct_key,
            json_key,
            tag,
        };

        if kind == FieldKind::Leaf {
            return Ok(self.push_node(node));
        }

        if let Some(&list) = self.memo.get(&ty.id()) {
            node.children = list;
            return Ok(self.push_node(node));
        }

        let list = self.new_child_list();
        self.memo.insert(ty.id(), list);
        node.children = list;
        let id = self.push_node(node);

        match shape {
            Shape::Record(fields) => self.fill_record(id, list, fields)?,
            Shape::List(element) | Shape::Map(element) => {
                let child = self.add_node(
                    id,
                    ELEMENT_KEY,
                    ELEMENT_KEY,
                    ValidationTag::default(),
                    element,
                )?;
                self.child_lists[list.0].push(child);
            }
            Shape::Leaf => {}
        }

        Ok(id)
    }
}
