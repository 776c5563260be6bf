//! Runtime type descriptors.
//!
//! Rust has no reflection over trait implementations, so every [`Node`] describes
//! its own type with a [`TypeInfo`]: a broad [`TypeCategory`] plus the explicit
//! table of `SequenceOf<T>` capabilities the type implements. Each capability
//! carries monomorphized function pointers for its element type, which is how a
//! comparison typed over `T` is reached from an opaque `&dyn Node`.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::enumerable::EnumerableValidator;
use crate::errors::{EquivalencyError, Result};
use crate::node::{Node, SequenceOf};
use crate::scope::AssertionScope;

/// Identity and display name of a Rust type.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Type name with module paths stripped, e.g. `Vec<String>`.
    pub fn name(&self) -> String {
        short_type_name(self.name)
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({})", self.name())
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Broad shape of a type. Only `Object` types are inspected for sequence
/// capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Null,
    Boolean,
    Char,
    Integer,
    Float,
    Text,
    Object,
}

type DispatchFn = fn(
    &EnumerableValidator<'_>,
    &mut AssertionScope,
    &[&dyn Node],
    Option<&dyn Node>,
) -> Result<()>;

type MaterializeFn = fn(&dyn Node) -> Option<Vec<&dyn Node>>;

/// One `SequenceOf<T>` implementation of an owner type `S`.
#[derive(Clone, Copy)]
pub struct SequenceCapability {
    owner: TypeTag,
    element: TypeTag,
    dispatch: DispatchFn,
    materialize: MaterializeFn,
}

impl SequenceCapability {
    pub fn of<S, T>() -> Self
    where
        S: SequenceOf<T> + Node,
        T: Node,
    {
        Self {
            owner: TypeTag::of::<S>(),
            element: TypeTag::of::<T>(),
            dispatch: dispatch_typed::<S, T>,
            materialize: materialize_erased::<S, T>,
        }
    }

    pub fn element_type(&self) -> TypeTag {
        self.element
    }

    /// Name used in diagnostics, e.g. `SequenceOf<Dog>`.
    pub fn name(&self) -> String {
        format!("SequenceOf<{}>", self.element.name())
    }

    /// Views `node` as its elements, provided it is the owner type.
    pub fn materialize<'n>(&self, node: &'n dyn Node) -> Option<Vec<&'n dyn Node>> {
        (self.materialize)(node)
    }

    /// Runs the element-wise comparison typed over this capability's element type.
    pub fn dispatch(
        &self,
        validator: &EnumerableValidator<'_>,
        scope: &mut AssertionScope,
        subject: &[&dyn Node],
        expectation: Option<&dyn Node>,
    ) -> Result<()> {
        (self.dispatch)(validator, scope, subject, expectation)
    }
}

impl fmt::Debug for SequenceCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for {}", self.name(), self.owner.name())
    }
}

fn dispatch_typed<S, T>(
    validator: &EnumerableValidator<'_>,
    scope: &mut AssertionScope,
    subject: &[&dyn Node],
    expectation: Option<&dyn Node>,
) -> Result<()>
where
    S: SequenceOf<T> + Node,
    T: Node,
{
    let expectation = match expectation {
        Some(node) => {
            let sequence = node.as_any().downcast_ref::<S>().ok_or_else(|| {
                EquivalencyError::CapabilityMismatch {
                    capability: format!("SequenceOf<{}>", TypeTag::of::<T>()),
                    found: node.runtime_type().name().to_string(),
                }
            })?;
            Some(sequence.items())
        }
        None => None,
    };
    validator.execute::<T>(scope, subject, expectation.as_deref())
}

fn materialize_erased<S, T>(node: &dyn Node) -> Option<Vec<&dyn Node>>
where
    S: SequenceOf<T> + Node,
    T: Node,
{
    let sequence = node.as_any().downcast_ref::<S>()?;
    Some(
        sequence
            .items()
            .into_iter()
            .map(|item| item as &dyn Node)
            .collect(),
    )
}

/// Describes a type: its name, category and sequence capabilities.
#[derive(Clone)]
pub struct TypeInfo {
    name: String,
    category: TypeCategory,
    capabilities: Vec<SequenceCapability>,
    untyped_elements: bool,
}

impl TypeInfo {
    pub fn of<T: Any>(category: TypeCategory) -> Self {
        Self {
            name: TypeTag::of::<T>().name(),
            category,
            capabilities: Vec::new(),
            untyped_elements: false,
        }
    }

    /// Plain object type without capabilities.
    pub fn object<T: Any>() -> Self {
        Self::of::<T>(TypeCategory::Object)
    }

    /// Declared type of an opaque value whose concrete type is only known at
    /// runtime, like `Box<dyn Node>`.
    pub fn erased(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: TypeCategory::Object,
            capabilities: Vec::new(),
            untyped_elements: false,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_capability(mut self, capability: SequenceCapability) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// Marks the type as iterable through [`Node::elements`].
    pub fn with_untyped_elements(mut self) -> Self {
        self.untyped_elements = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> TypeCategory {
        self.category
    }

    pub fn is_text(&self) -> bool {
        self.category == TypeCategory::Text
    }

    /// Capabilities as declared, duplicates included.
    pub fn declared_capabilities(&self) -> &[SequenceCapability] {
        &self.capabilities
    }

    pub fn has_untyped_elements(&self) -> bool {
        self.untyped_elements
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("capabilities", &self.capabilities)
            .field("untyped_elements", &self.untyped_elements)
            .finish()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Strips module paths from a `std::any::type_name` string.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for c in full.chars() {
        if c == ':' || c == '_' || c.is_alphanumeric() {
            segment.push(c);
            continue;
        }
        out.push_str(segment.rsplit("::").next().unwrap_or(""));
        segment.clear();
        out.push(c);
    }
    out.push_str(segment.rsplit("::").next().unwrap_or(""));
    out
}
