use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::domain::Identifier;

/// A `SPECIFICATION`: a top-level document made of spec objects.
///
/// The hierarchy is stored flattened: a depth-first, pre-order walk of the
/// `SPEC-HIERARCHY` tree where each node records its own depth. Children of
/// the specification itself are at level 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    /// Unique key of the specification.
    pub identifier: Identifier,
    /// Human-readable name. Some documents leave specifications unnamed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    /// Reference to the `SPECIFICATION-TYPE`, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specification_type: Option<Identifier>,
    /// The flattened hierarchy, in pre-order.
    #[serde(default)]
    pub hierarchy: Vec<SpecHierarchyNode>,
}

impl Specification {
    /// Creates a specification from its flattened hierarchy.
    #[must_use]
    pub const fn new(
        identifier: Identifier,
        long_name: Option<String>,
        hierarchy: Vec<SpecHierarchyNode>,
    ) -> Self {
        Self {
            identifier,
            long_name,
            specification_type: None,
            hierarchy,
        }
    }
}

/// One `SPEC-HIERARCHY` entry of a flattened specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecHierarchyNode {
    /// Depth of the node; children of the specification are at level 1.
    pub level: NonZeroUsize,
    /// Reference to the [`SpecObject`](crate::domain::SpecObject) placed here.
    pub spec_object: Identifier,
}

impl SpecHierarchyNode {
    /// Creates a hierarchy node.
    #[must_use]
    pub const fn new(level: NonZeroUsize, spec_object: Identifier) -> Self {
        Self { level, spec_object }
    }
}
