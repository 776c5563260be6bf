use serde::Deserialize;

use crate::context::NodePath;
use crate::text::TextComparison;
use crate::types::TypeInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingMode {
    Strict,
    #[default]
    Any,
}

/// Whether a collection must match in order. Paths use the `[i]` notation of
/// [`NodePath`]; the root collection is `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OrderingRules {
    pub default: OrderingMode,
    pub strict_paths: Vec<String>,
    pub any_order_paths: Vec<String>,
}

impl OrderingRules {
    pub fn strict() -> Self {
        Self {
            default: OrderingMode::Strict,
            ..Self::default()
        }
    }

    pub fn is_strict_for(&self, path: &NodePath) -> bool {
        let path = path.to_string();
        if self.any_order_paths.contains(&path) {
            return false;
        }
        self.strict_paths.contains(&path) || self.default == OrderingMode::Strict
    }
}

/// Which type of the expectation drives step selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeResolution {
    #[default]
    Runtime,
    Declared,
}

/// Options shared by every step of one assertion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EquivalencyOptions {
    /// Compare nested collection items structurally instead of with plain equality.
    pub recursive: bool,
    pub ordering: OrderingRules,
    pub type_resolution: TypeResolution,
    pub text_comparison: TextComparison,
    pub max_recursion_depth: Option<usize>,
}

impl Default for EquivalencyOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            ordering: OrderingRules::default(),
            type_resolution: TypeResolution::default(),
            text_comparison: TextComparison::default(),
            max_recursion_depth: Some(10),
        }
    }
}

impl EquivalencyOptions {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn expectation_type<'t>(
        &self,
        runtime_type: &'t TypeInfo,
        compile_time_type: &'t TypeInfo,
    ) -> &'t TypeInfo {
        match self.type_resolution {
            TypeResolution::Runtime => runtime_type,
            TypeResolution::Declared => compile_time_type,
        }
    }

    pub fn with_strict_ordering(mut self) -> Self {
        self.ordering.default = OrderingMode::Strict;
        self
    }

    pub fn without_strict_ordering(mut self) -> Self {
        self.ordering.default = OrderingMode::Any;
        self
    }

    pub fn with_strict_ordering_for(mut self, path: impl Into<String>) -> Self {
        self.ordering.strict_paths.push(path.into());
        self
    }

    pub fn without_strict_ordering_for(mut self, path: impl Into<String>) -> Self {
        self.ordering.any_order_paths.push(path.into());
        self
    }

    pub fn excluding_nested_objects(mut self) -> Self {
        self.recursive = false;
        self
    }

    pub fn respecting_declared_types(mut self) -> Self {
        self.type_resolution = TypeResolution::Declared;
        self
    }

    pub fn respecting_runtime_types(mut self) -> Self {
        self.type_resolution = TypeResolution::Runtime;
        self
    }

    pub fn with_text_comparison(mut self, comparison: TextComparison) -> Self {
        self.text_comparison = comparison;
        self
    }

    pub fn with_max_recursion_depth(mut self, depth: Option<usize>) -> Self {
        self.max_recursion_depth = depth;
        self
    }
}
