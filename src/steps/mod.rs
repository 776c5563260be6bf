use std::sync::Arc;

use crate::context::Context;
use crate::errors::Result;
use crate::options::EquivalencyOptions;
use crate::scope::AssertionScope;
use crate::validator::EquivalencyValidator;

mod generic_enumerable;
mod simple_equality;

pub use generic_enumerable::GenericEnumerableStep;
pub use simple_equality::SimpleEqualityStep;

/// One strategy of the equivalency pipeline.
pub trait EquivalencyStep: Send + Sync {
    fn name(&self) -> &'static str;

    fn can_handle(&self, context: &Context<'_>, config: &EquivalencyOptions) -> bool;

    /// Returns `Ok(true)` when no later step should look at the comparison.
    /// Mismatches go to `scope`; `Err` is reserved for faults.
    fn handle(
        &self,
        context: &Context<'_>,
        parent: &EquivalencyValidator,
        scope: &mut AssertionScope,
        config: &EquivalencyOptions,
    ) -> Result<bool>;
}

/// Ordered, shareable list of steps.
#[derive(Clone, Default)]
pub struct StepPipeline {
    inner: Arc<Vec<Arc<dyn EquivalencyStep>>>,
}

impl StepPipeline {
    pub fn with_builtins() -> Self {
        let steps: Vec<Arc<dyn EquivalencyStep>> = vec![
            Arc::new(GenericEnumerableStep),
            Arc::new(SimpleEqualityStep),
        ];
        Self { inner: Arc::new(steps) }
    }

    /// Adds a step ahead of the existing ones.
    pub fn register<S: EquivalencyStep + 'static>(&mut self, step: S) {
        let steps = Arc::make_mut(&mut self.inner);
        steps.insert(0, Arc::new(step));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn EquivalencyStep>> {
        self.inner.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.inner.iter().map(|step| step.name()).collect()
    }
}
