use std::fmt;

use crate::node::Node;
use crate::types::TypeInfo;

/// Location of the compared node below the root, e.g. `[2][0]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn item(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{index}]"));
        Self { segments }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            f.write_str(segment)?;
        }
        Ok(())
    }
}

/// One (subject, expectation) pair offered to the equivalency steps.
#[derive(Debug)]
pub struct Context<'a> {
    subject: Option<&'a dyn Node>,
    expectation: Option<&'a dyn Node>,
    runtime_type: TypeInfo,
    compile_time_type: TypeInfo,
    node: NodePath,
}

impl<'a> Context<'a> {
    pub fn new(
        subject: Option<&'a dyn Node>,
        expectation: Option<&'a dyn Node>,
        compile_time_type: TypeInfo,
        node: NodePath,
    ) -> Self {
        let subject = present(subject);
        let expectation = present(expectation);
        let runtime_type = expectation
            .map(|expectation| expectation.runtime_type())
            .unwrap_or_else(|| compile_time_type.clone());
        Self {
            subject,
            expectation,
            runtime_type,
            compile_time_type,
            node,
        }
    }

    /// Root comparison; the declared type is `E`'s static type.
    pub fn root<S: Node, E: Node>(subject: &'a S, expectation: &'a E) -> Self {
        Self::new(
            Some(subject as &dyn Node),
            Some(expectation as &dyn Node),
            E::static_type(),
            NodePath::root(),
        )
    }

    /// Root comparison of opaque values; the declared type is erased.
    pub fn root_dyn(subject: Option<&'a dyn Node>, expectation: Option<&'a dyn Node>) -> Self {
        Self::new(
            subject,
            expectation,
            TypeInfo::erased("dyn Node"),
            NodePath::root(),
        )
    }

    /// Context for the item at `index` of a collection whose declared element
    /// type is `T`.
    pub fn for_item<'b, T: Node>(
        &self,
        index: usize,
        subject: Option<&'b dyn Node>,
        expectation: Option<&'b T>,
    ) -> Context<'b> {
        Context::new(
            subject,
            expectation.map(|item| item as &dyn Node),
            T::static_type(),
            self.node.item(index),
        )
    }

    pub fn subject(&self) -> Option<&'a dyn Node> {
        self.subject
    }

    pub fn expectation(&self) -> Option<&'a dyn Node> {
        self.expectation
    }

    pub fn runtime_type(&self) -> &TypeInfo {
        &self.runtime_type
    }

    pub fn compile_time_type(&self) -> &TypeInfo {
        &self.compile_time_type
    }

    pub fn node(&self) -> &NodePath {
        &self.node
    }

    pub fn is_root(&self) -> bool {
        self.node.is_root()
    }
}

fn present(node: Option<&dyn Node>) -> Option<&dyn Node> {
    node.filter(|node| !node.is_null())
}
