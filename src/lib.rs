pub mod errors;
pub mod context;
pub mod options;
pub mod types;
pub mod node;
pub mod capability;
pub mod scope;
pub mod steps;     // pipeline strategies; the collection step lives here
pub mod validator;
pub mod enumerable;
pub mod member;
pub mod text;
mod json;
mod parser;

pub use capability::{find_sequence_capabilities, is_collection, is_sequence, single_element_type};
pub use context::{Context, NodePath};
pub use errors::{EquivalencyError, Failures, Result};
pub use json::json_equals;
pub use member::{resolve_property, Member, Selector};
pub use node::{Node, SequenceOf};
pub use options::{EquivalencyOptions, OrderingMode, OrderingRules, TypeResolution};
pub use scope::{AssertionScope, FailReason, Failure};
pub use steps::{EquivalencyStep, GenericEnumerableStep, SimpleEqualityStep, StepPipeline};
pub use text::{context_window, first_mismatch_index, first_mismatch_index_default, TextComparison};
pub use types::{SequenceCapability, TypeCategory, TypeInfo, TypeTag};
pub use validator::EquivalencyValidator;

/// Compares `subject` with `expectation` using the built-in steps and returns
/// every failure found.
pub fn check_equivalent<S: Node, E: Node>(
    subject: &S,
    expectation: &E,
    options: &EquivalencyOptions,
) -> Result<()> {
    let validator = EquivalencyValidator::new(options.clone());
    let mut scope = AssertionScope::new();
    validator.assert_equality_using(&mut scope, &Context::root(subject, expectation))?;
    scope.into_result()
}

/// Panics with all failures unless `subject` is equivalent to `expectation`.
///
/// ```
/// use structural_equivalency::{assert_equivalent, EquivalencyOptions};
///
/// assert_equivalent!(vec![3, 2, 1], vec![1, 2, 3]);
/// let strict = EquivalencyOptions::default().with_strict_ordering();
/// assert_equivalent!(vec![1, 2, 3], vec![1, 2, 3], &strict);
/// ```
#[macro_export]
macro_rules! assert_equivalent {
    ($subject:expr, $expectation:expr $(,)?) => {
        $crate::assert_equivalent!($subject, $expectation, &$crate::EquivalencyOptions::default())
    };
    ($subject:expr, $expectation:expr, $options:expr $(,)?) => {
        if let Err(error) = $crate::check_equivalent(&$subject, &$expectation, $options) {
            panic!("{}", error);
        }
    };
}
