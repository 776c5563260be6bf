//! The value model compared by the equivalency pipeline.

use std::any::Any;
use std::fmt;

use crate::types::{SequenceCapability, TypeCategory, TypeInfo};

/// A value taking part in an equivalency comparison.
///
/// `runtime_type` describes the concrete value; `static_type` describes the
/// declared type a generic caller sees. They differ for opaque carriers such as
/// `Box<dyn Node>` and `serde_json::Value`.
pub trait Node: Any + fmt::Debug {
    fn runtime_type(&self) -> TypeInfo;

    fn static_type() -> TypeInfo
    where
        Self: Sized;

    /// The concrete value, for downcasting. Transparent wrappers return the
    /// wrapped value.
    fn as_any(&self) -> &dyn Any;

    /// Plain equality, used when a comparison is not structural.
    fn is_equal_to(&self, other: &dyn Node) -> bool;

    fn as_text(&self) -> Option<&str> {
        None
    }

    /// Untyped element view, in iteration order.
    fn elements(&self) -> Option<Vec<&dyn Node>> {
        None
    }

    /// Present but null values (JSON `null`) count as absent.
    fn is_null(&self) -> bool {
        false
    }

    fn render(&self) -> String {
        format!("{self:?}")
    }
}

/// A type that can be iterated as a sequence of `T`.
///
/// A type may implement this for several `T`; each implementation is listed
/// as a [`SequenceCapability`] in its [`TypeInfo`].
pub trait SequenceOf<T: Node> {
    fn items(&self) -> Vec<&T>;
}

/// Implements [`Node`] for types compared with `PartialEq`.
///
/// ```
/// use structural_equivalency::node_by_eq;
///
/// #[derive(Debug, PartialEq)]
/// struct Dog { name: String }
///
/// node_by_eq!(Dog);
/// ```
#[macro_export]
macro_rules! node_by_eq {
    (@category $category:expr; $($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Node for $ty {
                fn runtime_type(&self) -> $crate::TypeInfo {
                    <Self as $crate::Node>::static_type()
                }

                fn static_type() -> $crate::TypeInfo {
                    $crate::TypeInfo::of::<Self>($category)
                }

                fn as_any(&self) -> &dyn ::std::any::Any {
                    self
                }

                fn is_equal_to(&self, other: &dyn $crate::Node) -> bool {
                    other
                        .as_any()
                        .downcast_ref::<Self>()
                        .map_or(false, |other| self == other)
                }
            }
        )+
    };
    ($($ty:ty),+ $(,)?) => {
        $crate::node_by_eq!(@category $crate::TypeCategory::Object; $($ty),+);
    };
}

crate::node_by_eq!(@category TypeCategory::Integer;
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
crate::node_by_eq!(@category TypeCategory::Float; f32, f64);
crate::node_by_eq!(@category TypeCategory::Boolean; bool);
crate::node_by_eq!(@category TypeCategory::Char; char);

impl Node for String {
    fn runtime_type(&self) -> TypeInfo {
        Self::static_type()
    }

    fn static_type() -> TypeInfo {
        TypeInfo::of::<Self>(TypeCategory::Text)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn is_equal_to(&self, other: &dyn Node) -> bool {
        other.as_text() == Some(self.as_str())
    }

    fn as_text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl Node for &'static str {
    fn runtime_type(&self) -> TypeInfo {
        Self::static_type()
    }

    fn static_type() -> TypeInfo {
        TypeInfo::of::<Self>(TypeCategory::Text)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn is_equal_to(&self, other: &dyn Node) -> bool {
        other.as_text() == Some(*self)
    }

    fn as_text(&self) -> Option<&str> {
        Some(*self)
    }
}

impl<T: Node> SequenceOf<T> for Vec<T> {
    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<T: Node> Node for Vec<T> {
    fn runtime_type(&self) -> TypeInfo {
        Self::static_type()
    }

    fn static_type() -> TypeInfo {
        TypeInfo::object::<Self>()
            .with_capability(SequenceCapability::of::<Self, T>())
            .with_untyped_elements()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn is_equal_to(&self, other: &dyn Node) -> bool {
        other.as_any().downcast_ref::<Self>().map_or(false, |other| {
            self.len() == other.len()
                && self
                    .iter()
                    .zip(other)
                    .all(|(left, right)| left.is_equal_to(right))
        })
    }

    fn elements(&self) -> Option<Vec<&dyn Node>> {
        Some(self.iter().map(|item| item as &dyn Node).collect())
    }
}

// Box<dyn Node> is transparent at runtime; only its declared type is opaque.
impl Node for Box<dyn Node> {
    fn runtime_type(&self) -> TypeInfo {
        (**self).runtime_type()
    }

    fn static_type() -> TypeInfo {
        TypeInfo::erased("dyn Node")
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }

    fn is_equal_to(&self, other: &dyn Node) -> bool {
        (**self).is_equal_to(other)
    }

    fn as_text(&self) -> Option<&str> {
        (**self).as_text()
    }

    fn elements(&self) -> Option<Vec<&dyn Node>> {
        (**self).elements()
    }

    fn is_null(&self) -> bool {
        (**self).is_null()
    }

    fn render(&self) -> String {
        (**self).render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxed_values_compare_like_their_contents() {
        let boxed: Box<dyn Node> = Box::new(42_i64);
        assert!(boxed.is_equal_to(&42_i64));
        assert!(!boxed.is_equal_to(&41_i64));
        assert_eq!(boxed.runtime_type().name(), "i64");
        assert_eq!(<Box<dyn Node> as Node>::static_type().name(), "dyn Node");
    }

    #[test]
    fn text_compares_across_string_kinds() {
        assert!(String::from("abc").is_equal_to(&"abc"));
        assert!("abc".is_equal_to(&String::from("abc")));
        assert!(!"abc".is_equal_to(&1_i32));
    }

    #[test]
    fn vectors_compare_item_by_item() {
        assert!(vec![1_i32, 2, 3].is_equal_to(&vec![1_i32, 2, 3]));
        assert!(!vec![1_i32, 2, 3].is_equal_to(&vec![3_i32, 2, 1]));
        assert!(!vec![1_i32, 2].is_equal_to(&vec![1_i64, 2]));
    }
}
