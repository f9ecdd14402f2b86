//! Core trait describing how a Rust type maps onto a JSON schema shape.
//!
//! The [`Validate`] trait is the compile-time replacement for runtime type
//! introspection: every type that can appear in a validated record reports
//! its [`Shape`], and records additionally report their fields together with
//! the declarative rule string attached to each of them.

use std::any::{type_name, TypeId};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// A type that can be described as a validation schema.
///
/// Implement this trait with `#[derive(Validate)]` for records. Containers,
/// primitives and a handful of common library types are covered by the
/// implementations below.
///
/// # Example
///
/// ```rust
/// use jsonguard::{FieldDescriptor, Shape, Validate};
///
/// struct Login {
///     user: String,
/// }
///
/// impl Validate for Login {
///     fn shape() -> Shape {
///         Shape::Record(vec![
///             FieldDescriptor::new("user", "user", String::target()).with_rules("required|lenMin:3"),
///         ])
///     }
/// }
///
/// assert!(Login::shape().is_record());
/// ```
pub trait Validate: 'static {
    /// Returns the structural shape of this type.
    fn shape() -> Shape;

    /// Returns the normalized handle used when this type appears as a field.
    ///
    /// Indirection wrappers (`Option`, `Box`, `Rc`, `Arc`) forward to their
    /// inner type so that a pointer-to-record is treated as the record itself.
    fn target() -> TypeRef
    where
        Self: Sized,
    {
        TypeRef::of::<Self>()
    }
}

/// Structural kind of a type as seen by the schema builder.
#[derive(Debug, Clone)]
pub enum Shape {
    /// Fixed set of named fields.
    Record(Vec<FieldDescriptor>),
    /// Sequence of elements of one type.
    List(TypeRef),
    /// String-keyed mapping to values of one type.
    Map(TypeRef),
    /// Anything without structure of its own.
    Leaf,
}

impl Shape {
    /// Check if this shape is a record.
    pub fn is_record(&self) -> bool {
        matches!(self, Shape::Record(_))
    }

    /// Short lowercase name of the shape kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Record(_) => "record",
            Shape::List(_) => "list",
            Shape::Map(_) => "map",
            Shape::Leaf => "leaf",
        }
    }
}

/// Lazy handle on a type's shape.
///
/// The shape is produced on demand through a function pointer, so a record
/// that refers to itself can describe its fields without recursing forever.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    name: &'static str,
    shape: fn() -> Shape,
}

impl TypeRef {
    /// Handle on `T` itself, without normalization.
    pub fn of<T: Validate>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            shape: T::shape,
        }
    }

    /// Runtime identity of the type.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Produce the type's shape.
    pub fn shape(&self) -> Shape {
        (self.shape)()
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.name).finish()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

/// Description of one declared record field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Declared Rust field name. Sibling rules refer to fields by this name.
    pub struct_key: &'static str,
    /// Key looked up in the JSON object.
    pub json_key: &'static str,
    /// Declarative rule string, if any.
    pub rules: Option<&'static str>,
    /// Whether the field's own fields are spliced into the parent.
    pub embedded: bool,
    /// Normalized field type.
    pub ty: TypeRef,
}

impl FieldDescriptor {
    /// Create a field descriptor with no rules.
    pub fn new(struct_key: &'static str, json_key: &'static str, ty: TypeRef) -> Self {
        Self {
            struct_key,
            json_key,
            rules: None,
            embedded: false,
            ty,
        }
    }

    /// Attach a declarative rule string.
    pub fn with_rules(mut self, rules: &'static str) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Mark the field as embedded (flattened into its parent).
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }
}

// =============================================================================
// Leaf implementations
// =============================================================================

macro_rules! impl_validate_for_leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Validate for $ty {
                fn shape() -> Shape {
                    Shape::Leaf
                }
            }
        )*
    };
}

impl_validate_for_leaf!(
    String,
    &'static str,
    bool,
    char,
    (),
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    serde_json::Value,
    serde_json::Number,
);

impl_validate_for_leaf!(
    chrono::NaiveDate,
    chrono::NaiveDateTime,
    chrono::NaiveTime,
    chrono::DateTime<chrono::Utc>,
);

// =============================================================================
// Indirection
// =============================================================================

macro_rules! impl_validate_for_indirection {
    ($($wrapper:ident),* $(,)?) => {
        $(
            impl<T: Validate> Validate for $wrapper<T> {
                fn shape() -> Shape {
                    T::shape()
                }

                fn target() -> TypeRef {
                    T::target()
                }
            }
        )*
    };
}

impl_validate_for_indirection!(Option, Box, Rc, Arc);

// =============================================================================
// Collections
// =============================================================================

impl<T: Validate> Validate for Vec<T> {
    fn shape() -> Shape {
        Shape::List(T::target())
    }
}

impl<T: Validate> Validate for VecDeque<T> {
    fn shape() -> Shape {
        Shape::List(T::target())
    }
}

impl<T: Validate, const N: usize> Validate for [T; N] {
    fn shape() -> Shape {
        Shape::List(T::target())
    }
}

impl<T: Validate, S: 'static> Validate for HashSet<T, S> {
    fn shape() -> Shape {
        Shape::List(T::target())
    }
}

impl<T: Validate> Validate for BTreeSet<T> {
    fn shape() -> Shape {
        Shape::List(T::target())
    }
}

impl<K: 'static, V: Validate, S: 'static> Validate for HashMap<K, V, S> {
    fn shape() -> Shape {
        Shape::Map(V::target())
    }
}

impl<K: 'static, V: Validate> Validate for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::Map(V::target())
    }
}

impl Validate for serde_json::Map<String, serde_json::Value> {
    fn shape() -> Shape {
        Shape::Map(serde_json::Value::target())
    }
}
