use itertools::Itertools;
use tracing::{debug, warn};

use crate::capability::{find_sequence_capabilities, is_sequence, materialize, single_element_type};
use crate::context::Context;
use crate::enumerable::EnumerableValidator;
use crate::errors::Result;
use crate::node::Node;
use crate::options::EquivalencyOptions;
use crate::scope::{AssertionScope, FailReason};
use crate::validator::EquivalencyValidator;

use super::EquivalencyStep;

/// Compares an expectation implementing exactly one `SequenceOf<T>` with any
/// subject collection, item by item.
pub struct GenericEnumerableStep;

impl EquivalencyStep for GenericEnumerableStep {
    fn name(&self) -> &'static str { "generic-enumerable" }

    fn can_handle(&self, context: &Context<'_>, config: &EquivalencyOptions) -> bool {
        let expectation_type =
            config.expectation_type(context.runtime_type(), context.compile_time_type());

        context.expectation().is_some() && is_sequence(expectation_type)
    }

    fn handle(
        &self,
        context: &Context<'_>,
        parent: &EquivalencyValidator,
        scope: &mut AssertionScope,
        config: &EquivalencyOptions,
    ) -> Result<bool> {
        // Resolved once; the ambiguity check, the element type and the dispatch
        // all work on this type.
        let expectation_type =
            config.expectation_type(context.runtime_type(), context.compile_time_type());
        let capabilities = find_sequence_capabilities(expectation_type);

        let unambiguous = scope
            .for_condition(capabilities.len() == 1)
            .fail_with_reason(|| {
                FailReason::new(
                    "{context:expectation} implements {0}, so cannot determine which one to use for asserting the equivalency of the collection.",
                    [format!(
                        "[{}]",
                        capabilities.iter().map(|capability| capability.name()).join(", ")
                    )],
                )
            });
        if !unambiguous {
            warn!(
                node = %context.node(),
                expectation = %expectation_type,
                candidates = capabilities.len(),
                "ambiguous sequence capabilities"
            );
            return Ok(true);
        }

        let Some(subject) = assert_subject_is_collection(scope, context.subject()) else {
            return Ok(true);
        };

        let element_type = single_element_type(expectation_type)?;
        debug!(
            node = %context.node(),
            element = %element_type,
            items = subject.len(),
            "dispatching collection comparison"
        );

        let validator = EnumerableValidator::new(parent, context)
            .recursive(context.is_root() || config.recursive)
            .ordering(config.ordering.clone());

        capabilities[0].dispatch(&validator, scope, &subject, context.expectation())?;

        Ok(true)
    }
}

fn assert_subject_is_collection<'n>(
    scope: &mut AssertionScope,
    subject: Option<&'n dyn Node>,
) -> Option<Vec<&'n dyn Node>> {
    let present = scope
        .for_condition(subject.is_some())
        .fail_with("Expected {context:subject} not to be <null>.", Vec::<String>::new());
    let subject = subject.filter(|_| present)?;

    let subject_type = subject.runtime_type();
    let items = materialize(subject);
    scope
        .for_condition(items.is_some())
        .fail_with_reason(|| {
            FailReason::new(
                "Expected {context:subject} to be a collection, but it was a {0}.",
                [subject_type.name()],
            )
        });
    items
}
