use tracing::{debug, trace};

use crate::context::Context;
use crate::errors::Result;
use crate::options::EquivalencyOptions;
use crate::scope::{AssertionScope, FailReason};
use crate::steps::StepPipeline;

/// Offers each comparison to the steps in order until one handles it.
pub struct EquivalencyValidator {
    steps: StepPipeline,
    options: EquivalencyOptions,
}

impl EquivalencyValidator {
    pub fn new(options: EquivalencyOptions) -> Self {
        Self::with_steps(StepPipeline::with_builtins(), options)
    }

    pub fn with_steps(steps: StepPipeline, options: EquivalencyOptions) -> Self {
        Self { steps, options }
    }

    pub fn options(&self) -> &EquivalencyOptions {
        &self.options
    }

    pub fn assert_equality_using(
        &self,
        scope: &mut AssertionScope,
        context: &Context<'_>,
    ) -> Result<()> {
        scope.in_node(context.node(), |scope| {
            if let Some(max_depth) = self.options.max_recursion_depth {
                let within_depth = scope
                    .for_condition(context.node().depth() <= max_depth)
                    .fail_with_reason(|| {
                        FailReason::new(
                            "The maximum recursion depth of {0} was reached at {context:subject}.",
                            [max_depth.to_string()],
                        )
                    });
                if !within_depth {
                    return Ok(());
                }
            }

            for step in self.steps.iter() {
                if !step.can_handle(context, &self.options) {
                    trace!(step = step.name(), node = %context.node(), "step declined");
                    continue;
                }
                if step.handle(context, self, scope, &self.options)? {
                    debug!(step = step.name(), node = %context.node(), "comparison handled");
                    return Ok(());
                }
            }
            debug!(node = %context.node(), "no step handled the comparison");
            Ok(())
        })
    }
}
