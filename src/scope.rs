//! Call-scoped failure collection.
//!
//! An [`AssertionScope`] is passed down explicitly through every step, so
//! concurrent assertions never share state. Messages are templates expanded only
//! when a condition fails:
//!
//! - `{context:subject}` becomes `subject` followed by the current node path,
//!   e.g. `subject[2]`;
//! - `{0}`, `{1}`, ... become the reason's arguments.

use crate::context::NodePath;
use crate::errors::{EquivalencyError, Failures, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Node path the failure was reported at; empty for the root.
    pub path: String,
    pub message: String,
}

/// A message template with its arguments, not yet expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailReason {
    template: String,
    args: Vec<String>,
}

impl FailReason {
    pub fn new<I, S>(template: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            template: template.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn expand(&self, path: &str) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                out.push_str(&rest[open..]);
                return out;
            };
            let placeholder = &after[..close];
            match self.substitute(placeholder, path) {
                Some(value) => out.push_str(&value),
                None => {
                    out.push('{');
                    out.push_str(placeholder);
                    out.push('}');
                }
            }
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        out
    }

    fn substitute(&self, placeholder: &str, path: &str) -> Option<String> {
        if let Some(name) = placeholder.strip_prefix("context:") {
            return Some(format!("{name}{path}"));
        }
        let index = placeholder.parse::<usize>().ok()?;
        self.args.get(index).cloned()
    }
}

#[derive(Debug, Default)]
pub struct AssertionScope {
    path: String,
    failures: Vec<Failure>,
}

impl AssertionScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_condition(&mut self, condition: bool) -> Condition<'_> {
        Condition {
            scope: self,
            met: condition,
        }
    }

    /// Records a failure at the current node.
    pub fn fail(&mut self, reason: FailReason) {
        let message = reason.expand(&self.path);
        tracing::trace!(path = %self.path, failure = %message, "assertion failed");
        self.failures.push(Failure {
            path: self.path.clone(),
            message,
        });
    }

    /// Runs `f` with `node` as the current node.
    pub fn in_node<R>(&mut self, node: &NodePath, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = std::mem::replace(&mut self.path, node.to_string());
        let result = f(self);
        self.path = previous;
        result
    }

    /// An empty scope at the same node, for trial comparisons.
    pub fn nested(&self) -> AssertionScope {
        AssertionScope {
            path: self.path.clone(),
            failures: Vec::new(),
        }
    }

    /// Takes over the failures of a nested scope.
    pub fn absorb(&mut self, nested: AssertionScope) {
        self.failures.extend(nested.failures);
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<Failure> {
        self.failures
    }

    pub fn into_result(self) -> Result<()> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(EquivalencyError::AssertionFailed(Failures(self.failures)))
        }
    }
}

/// Pending check created by [`AssertionScope::for_condition`].
pub struct Condition<'s> {
    scope: &'s mut AssertionScope,
    met: bool,
}

impl Condition<'_> {
    /// Reports `template` when the condition does not hold; returns the condition.
    pub fn fail_with<I, S>(self, template: &str, args: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.met {
            self.scope.fail(FailReason::new(template, args));
        }
        self.met
    }

    /// Like [`fail_with`](Self::fail_with), building the reason only on failure.
    pub fn fail_with_reason(self, reason: impl FnOnce() -> FailReason) -> bool {
        if !self.met {
            self.scope.fail(reason());
        }
        self.met
    }
}
