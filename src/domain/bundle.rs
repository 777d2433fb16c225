use std::{fmt, num::NonZeroUsize};

use serde::{Deserialize, Serialize};

use crate::{
    domain::{DataTypeDefinition, SpecObject, SpecObjectType, SpecRelation, Specification},
    index::ReferenceIndex,
    validate::{ValidationReport, validate},
};

/// What the parser learned from the XML prologue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceInfo {
    /// Whether the document starts with an XML declaration.
    #[serde(default)]
    pub doctype_is_present: bool,
    /// The encoding named by the XML declaration, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

/// A low-level problem reported by the parser.
///
/// These are relayed unchanged by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFinding {
    /// Human-readable description of the problem.
    pub description: String,
    /// Line of the source document the problem was found on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<NonZeroUsize>,
}

impl SchemaFinding {
    /// Creates a finding with no source location.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            line: None,
        }
    }
}

impl fmt::Display for SchemaFinding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.description),
            None => f.write_str(&self.description),
        }
    }
}

/// The authoritative collections of a parsed document.
///
/// This is what the parser produces. Wrap it in a [`DocumentBundle`] to get
/// a matching [`ReferenceIndex`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleContent {
    /// XML prologue information.
    #[serde(default)]
    pub namespace_info: NamespaceInfo,
    /// Top-level specifications, in document order.
    #[serde(default)]
    pub specifications: Vec<Specification>,
    /// Relations between spec objects, in document order.
    #[serde(default)]
    pub spec_relations: Vec<SpecRelation>,
    /// Declared spec object types.
    #[serde(default)]
    pub spec_object_types: Vec<SpecObjectType>,
    /// All spec objects of the document.
    #[serde(default)]
    pub spec_objects: Vec<SpecObject>,
    /// Declared data type definitions.
    #[serde(default)]
    pub data_types: Vec<DataTypeDefinition>,
    /// Problems the parser found while reading the document.
    #[serde(default)]
    pub schema_findings: Vec<SchemaFinding>,
}

/// A parsed document together with its reference index.
///
/// The bundle is read-only. To change the collections, take them back with
/// [`Self::into_content`] and build a new bundle, which rebuilds the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BundleContent", into = "BundleContent")]
pub struct DocumentBundle {
    content: BundleContent,
    index: ReferenceIndex,
}

impl DocumentBundle {
    /// Wraps parsed content and builds its reference index.
    #[must_use]
    pub fn new(content: BundleContent) -> Self {
        let index = ReferenceIndex::build(&content);
        Self { content, index }
    }

    /// The authoritative collections.
    #[must_use]
    pub const fn content(&self) -> &BundleContent {
        &self.content
    }

    /// Gives back the collections, discarding the index.
    #[must_use]
    pub fn into_content(self) -> BundleContent {
        self.content
    }

    /// The reference index built from the collections.
    #[must_use]
    pub const fn index(&self) -> &ReferenceIndex {
        &self.index
    }

    /// XML prologue information.
    #[must_use]
    pub const fn namespace_info(&self) -> &NamespaceInfo {
        &self.content.namespace_info
    }

    /// Top-level specifications, in document order.
    #[must_use]
    pub fn specifications(&self) -> &[Specification] {
        &self.content.specifications
    }

    /// Relations between spec objects, in document order.
    #[must_use]
    pub fn spec_relations(&self) -> &[SpecRelation] {
        &self.content.spec_relations
    }

    /// Declared spec object types.
    #[must_use]
    pub fn spec_object_types(&self) -> &[SpecObjectType] {
        &self.content.spec_object_types
    }

    /// Problems the parser found while reading the document.
    #[must_use]
    pub fn schema_findings(&self) -> &[SchemaFinding] {
        &self.content.schema_findings
    }

    /// Resolves a spec object by identifier.
    #[must_use]
    pub fn spec_object(&self, identifier: &str) -> Option<&SpecObject> {
        self.index
            .spec_object_position(identifier)
            .map(|position| &self.content.spec_objects[position])
    }

    /// Resolves a spec object type by identifier.
    #[must_use]
    pub fn spec_object_type(&self, identifier: &str) -> Option<&SpecObjectType> {
        self.index
            .spec_object_type_position(identifier)
            .map(|position| &self.content.spec_object_types[position])
    }

    /// Resolves a data type definition by identifier.
    #[must_use]
    pub fn data_type(&self, identifier: &str) -> Option<&DataTypeDefinition> {
        self.index
            .data_type_position(identifier)
            .map(|position| &self.content.data_types[position])
    }

    /// Runs the semantic checks against this bundle.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        validate(&self.content, &self.index)
    }
}

impl From<BundleContent> for DocumentBundle {
    fn from(content: BundleContent) -> Self {
        Self::new(content)
    }
}

impl From<DocumentBundle> for BundleContent {
    fn from(bundle: DocumentBundle) -> Self {
        bundle.content
    }
}
