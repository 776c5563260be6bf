//! Sequence capability detection.

use itertools::Itertools;

use crate::errors::{EquivalencyError, Result};
use crate::node::Node;
use crate::types::{SequenceCapability, TypeCategory, TypeInfo, TypeTag};

/// Distinct `SequenceOf<T>` capabilities of `ty`, one per element type.
pub fn find_sequence_capabilities(ty: &TypeInfo) -> Vec<SequenceCapability> {
    // Only object types can be sequences; text is the one scalar that iterates
    // and it never counts.
    if ty.category() != TypeCategory::Object {
        return Vec::new();
    }
    ty.declared_capabilities()
        .iter()
        .copied()
        .unique_by(|capability| capability.element_type())
        .collect()
}

pub fn is_sequence(ty: &TypeInfo) -> bool {
    !ty.is_text() && !find_sequence_capabilities(ty).is_empty()
}

/// Element type of a type with exactly one capability.
pub fn single_element_type(ty: &TypeInfo) -> Result<TypeTag> {
    match find_sequence_capabilities(ty).as_slice() {
        [capability] => Ok(capability.element_type()),
        capabilities => Err(EquivalencyError::NotSingleSequence {
            type_name: ty.name().to_string(),
            count: capabilities.len(),
        }),
    }
}

/// Whether a subject of this type can be compared against a sequence.
pub fn is_collection(ty: &TypeInfo) -> bool {
    !ty.is_text() && (ty.has_untyped_elements() || !find_sequence_capabilities(ty).is_empty())
}

/// Elements of `node` in iteration order, through its untyped view or else its
/// only typed capability. A node iterable as several element types and
/// without an untyped view is not materialized.
pub fn materialize(node: &dyn Node) -> Option<Vec<&dyn Node>> {
    let ty = node.runtime_type();
    if !is_collection(&ty) {
        return None;
    }
    node.elements().or_else(|| match find_sequence_capabilities(&ty).as_slice() {
        [capability] => capability.materialize(node),
        _ => None,
    })
}
