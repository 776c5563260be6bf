use itertools::Itertools;
use std::fmt;
use thiserror::Error;

use crate::scope::Failure;

/// Failures collected by an assertion scope, printed one per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failures(pub Vec<Failure>);

impl fmt::Display for Failures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().map(|failure| &failure.message).join("\n"))
    }
}

#[derive(Debug, Error)]
pub enum EquivalencyError {
    // Selector misuse, raised at call time
    #[error("Expected a property expression, but found <null>.")]
    AbsentExpression,

    #[error("Cannot use <{0}> when a property expression is expected.")]
    NotAPropertyExpression(String),

    #[error("parse error: {0}")]
    Parse(String),

    // Caller asked for the element type of a type without exactly one capability
    #[error("type {type_name} exposes {count} sequence capabilities, expected exactly one")]
    NotSingleSequence { type_name: String, count: usize },

    // A capability was asked to reinterpret a value of another type
    #[error("cannot view a {found} as {capability}")]
    CapabilityMismatch { capability: String, found: String },

    #[error("{0}")]
    AssertionFailed(Failures),
}

pub type Result<T> = std::result::Result<T, EquivalencyError>;
