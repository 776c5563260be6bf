use crate::context::Context;
use crate::enumerable::render_pair;
use crate::errors::Result;
use crate::options::EquivalencyOptions;
use crate::scope::{AssertionScope, FailReason};
use crate::text::{context_window, first_mismatch_index, TextComparison};
use crate::validator::EquivalencyValidator;

use super::EquivalencyStep;

/// Terminal step: plain equality, with a character diff for text.
pub struct SimpleEqualityStep;

impl EquivalencyStep for SimpleEqualityStep {
    fn name(&self) -> &'static str { "simple-equality" }

    fn can_handle(&self, _context: &Context<'_>, _config: &EquivalencyOptions) -> bool {
        true
    }

    fn handle(
        &self,
        context: &Context<'_>,
        _parent: &EquivalencyValidator,
        scope: &mut AssertionScope,
        config: &EquivalencyOptions,
    ) -> Result<bool> {
        match (context.subject(), context.expectation()) {
            (None, None) => {}
            (Some(subject), None) => {
                scope.for_condition(false).fail_with_reason(|| {
                    FailReason::new(
                        "Expected {context:subject} to be <null>, but found {0}.",
                        [subject.render()],
                    )
                });
            }
            (None, Some(expectation)) => {
                scope.for_condition(false).fail_with_reason(|| {
                    FailReason::new(
                        "Expected {context:subject} to be {0}, but found <null>.",
                        [expectation.render()],
                    )
                });
            }
            (Some(subject), Some(expectation)) => match (subject.as_text(), expectation.as_text()) {
                (Some(actual), Some(expected)) => {
                    assert_text_equal(scope, actual, expected, config.text_comparison);
                }
                _ => {
                    scope
                        .for_condition(subject.is_equal_to(expectation))
                        .fail_with_reason(|| {
                            FailReason::new(
                                "Expected {context:subject} to be {0}, but found {1}.",
                                render_pair(expectation, subject),
                            )
                        });
                }
            },
        }
        Ok(true)
    }
}

fn assert_text_equal(
    scope: &mut AssertionScope,
    actual: &str,
    expected: &str,
    comparison: TextComparison,
) {
    scope
        .for_condition(comparison.equals(actual, expected))
        .fail_with_reason(|| match first_mismatch_index(actual, expected, comparison) {
            Some(index) => FailReason::new(
                "Expected {context:subject} to be {0}, but {1} differs near {2}.",
                [format!("{expected:?}"), format!("{actual:?}"), context_window(actual, index)],
            ),
            None => FailReason::new(
                "Expected {context:subject} to be {0}, but {1} is too short.",
                [format!("{expected:?}"), format!("{actual:?}")],
            ),
        });
}
