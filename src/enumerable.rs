//! Element-wise comparison of two materialized sequences.

use itertools::Itertools;
use tracing::trace;

use crate::context::Context;
use crate::errors::Result;
use crate::node::Node;
use crate::options::OrderingRules;
use crate::scope::{AssertionScope, FailReason};
use crate::validator::EquivalencyValidator;

/// Compares an opaque subject sequence with an expectation typed as `[&T]`.
pub struct EnumerableValidator<'v> {
    parent: &'v EquivalencyValidator,
    context: &'v Context<'v>,
    recursive: bool,
    ordering: OrderingRules,
}

impl<'v> EnumerableValidator<'v> {
    pub fn new(parent: &'v EquivalencyValidator, context: &'v Context<'v>) -> Self {
        Self {
            parent,
            context,
            recursive: false,
            ordering: OrderingRules::default(),
        }
    }

    /// Compare items through the pipeline instead of plain equality.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn ordering(mut self, ordering: OrderingRules) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn execute<T: Node>(
        &self,
        scope: &mut AssertionScope,
        subject: &[&dyn Node],
        expectation: Option<&[&T]>,
    ) -> Result<()> {
        let Some(expectation) = expectation else {
            scope.for_condition(false).fail_with_reason(|| {
                FailReason::new(
                    "Expected {context:subject} to be <null>, but found {0}.",
                    [render_items(subject.iter().copied())],
                )
            });
            return Ok(());
        };

        if !self.assert_same_count(scope, subject, expectation) {
            return Ok(());
        }

        if self.ordering.is_strict_for(self.context.node()) {
            self.strictly_match(scope, subject, expectation)
        } else {
            self.loosely_match(scope, subject, expectation)
        }
    }

    fn assert_same_count<T: Node>(
        &self,
        scope: &mut AssertionScope,
        subject: &[&dyn Node],
        expectation: &[&T],
    ) -> bool {
        scope
            .for_condition(subject.len() == expectation.len())
            .fail_with_reason(|| {
                let (difference, direction) = if subject.len() < expectation.len() {
                    (expectation.len() - subject.len(), "less")
                } else {
                    (subject.len() - expectation.len(), "more")
                };
                FailReason::new(
                    "Expected {context:subject} to be a collection with {0} item(s), but {1} contains {2} item(s) {3} than {4}.",
                    [
                        expectation.len().to_string(),
                        render_items(subject.iter().copied()),
                        difference.to_string(),
                        direction.to_string(),
                        render_items(expectation.iter().map(|item| *item as &dyn Node)),
                    ],
                )
            })
    }

    fn strictly_match<T: Node>(
        &self,
        scope: &mut AssertionScope,
        subject: &[&dyn Node],
        expectation: &[&T],
    ) -> Result<()> {
        for (index, (actual, expected)) in subject.iter().zip(expectation).enumerate() {
            self.compare_item(scope, index, *actual, *expected)?;
        }
        Ok(())
    }

    fn loosely_match<T: Node>(
        &self,
        scope: &mut AssertionScope,
        subject: &[&dyn Node],
        expectation: &[&T],
    ) -> Result<()> {
        let mut unmatched: Vec<usize> = (0..subject.len()).collect();
        for (index, expected) in expectation.iter().enumerate() {
            let mut closest: Option<AssertionScope> = None;
            let mut matched = None;
            for (position, candidate) in unmatched.iter().enumerate() {
                let mut trial = scope.nested();
                self.compare_item(&mut trial, index, subject[*candidate], *expected)?;
                if !trial.has_failures() {
                    matched = Some(position);
                    break;
                }
                if closest
                    .as_ref()
                    .map_or(true, |best| trial.failure_count() < best.failure_count())
                {
                    closest = Some(trial);
                }
            }
            match matched {
                Some(position) => {
                    let candidate = unmatched.remove(position);
                    trace!(expected = index, subject = candidate, "matched item");
                }
                None => {
                    trace!(expected = index, "no equivalent item");
                    if let Some(closest) = closest {
                        scope.absorb(closest);
                    }
                }
            }
        }
        Ok(())
    }

    fn compare_item<T: Node>(
        &self,
        scope: &mut AssertionScope,
        index: usize,
        actual: &dyn Node,
        expected: &T,
    ) -> Result<()> {
        let item = self.context.for_item(index, Some(actual), Some(expected));
        if self.recursive {
            return self.parent.assert_equality_using(scope, &item);
        }
        scope.in_node(item.node(), |scope| {
            scope
                .for_condition(actual.is_equal_to(expected))
                .fail_with_reason(|| {
                    FailReason::new(
                        "Expected {context:subject} to be {0}, but found {1}.",
                        render_pair(expected, actual),
                    )
                });
        });
        Ok(())
    }
}

pub(crate) fn render_items<'n>(items: impl Iterator<Item = &'n dyn Node>) -> String {
    format!("[{}]", items.map(|item| item.render()).join(", "))
}

/// Renders an expected and an actual value, naming their runtime types when
/// they differ.
pub(crate) fn render_pair(expected: &dyn Node, actual: &dyn Node) -> [String; 2] {
    let (expected_type, actual_type) = (expected.runtime_type(), actual.runtime_type());
    if expected_type.name() == actual_type.name() {
        return [expected.render(), actual.render()];
    }
    [
        format!("{} ({expected_type})", expected.render()),
        format!("{} ({actual_type})", actual.render()),
    ]
}
