//! Rebuilding nested document trees from flattened specifications.
//!
//! A specification stores its hierarchy as a pre-order sequence of
//! `(level, spec object)` pairs. The [`Reconstructor`] turns that sequence
//! back into a [`DocumentTree`] with an explicit stack of open containers:
//!
//! - content nodes must sit exactly one level below the open container, or
//!   at the same level (which closes the container first);
//! - heading nodes open a new container. A heading at the same level as the
//!   open one replaces it, and a shallower heading closes containers until
//!   one shallower than itself is on top.
//!
//! Any other content placement is a malformed hierarchy.

use std::{fmt, num::NonZeroUsize};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    domain::{DocumentBundle, Identifier, SpecHierarchyNode, Specification},
    schema::{FieldInfo, HeadingClassifier, HeadingRule, Schema},
};

mod fields;
pub use fields::ENUM_SEPARATOR;

mod tree;
pub use tree::{DocumentNode, DocumentTree, Fields, NodeId};

/// Where in a document a reconstruction failure happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// The specification being rebuilt.
    pub specification: Identifier,
    /// The spec object referenced by the offending hierarchy node.
    pub spec_object: Identifier,
    /// Level of the offending hierarchy node.
    pub level: NonZeroUsize,
}

impl Location {
    fn new(specification: &Specification, node: &SpecHierarchyNode) -> Self {
        Self {
            specification: specification.identifier.clone(),
            spec_object: node.spec_object.clone(),
            level: node.level,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "spec object '{}' at level {} in specification '{}'",
            self.spec_object, self.level, self.specification
        )
    }
}

/// A structural failure that aborts rebuilding one specification.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{location}: {kind}")]
pub struct ReconstructError {
    /// Where the failure happened.
    pub location: Location,
    /// What went wrong.
    pub kind: ErrorKind,
}

/// The reasons a specification cannot be rebuilt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ErrorKind {
    /// A content node does not sit directly below, or level with, the open
    /// container.
    #[error("content cannot be placed under a container at level {container_level}")]
    MalformedHierarchy {
        /// Level of the container that was open.
        container_level: usize,
    },
    /// The hierarchy node names a spec object that does not exist.
    #[error("spec object does not exist")]
    UnresolvedSpecObject,
    /// The spec object's type does not exist.
    #[error("spec object type '{0}' does not exist")]
    UnresolvedSpecObjectType(Identifier),
    /// An attribute value refers to an undeclared attribute definition.
    #[error("attribute definition '{0}' does not exist")]
    UnresolvedAttributeDefinition(Identifier),
    /// An attribute definition refers to an undeclared data type.
    #[error("data type '{data_type}' of attribute '{attribute}' does not exist")]
    UnresolvedDataType {
        /// The attribute definition.
        attribute: Identifier,
        /// The missing data type.
        data_type: Identifier,
    },
    /// An enumeration value is not part of its data type.
    #[error("enum value '{enum_value}' is not part of data type '{data_type}'")]
    UnresolvedEnumValue {
        /// The enumeration data type.
        data_type: Identifier,
        /// The unknown value.
        enum_value: Identifier,
    },
    /// The attribute's data type cannot be decoded into a field.
    #[error("attribute '{attribute}' uses data type '{data_type}' of unsupported kind {kind}")]
    UnsupportedDataType {
        /// The attribute definition.
        attribute: Identifier,
        /// The data type.
        data_type: Identifier,
        /// The data type's variant.
        kind: &'static str,
    },
    /// The stored value's shape does not fit the data type (a scalar for an
    /// enumeration, or a list of enum values for anything else).
    #[error("value of attribute '{attribute}' does not fit its {kind} data type")]
    MismatchedValue {
        /// The attribute definition.
        attribute: Identifier,
        /// The data type's variant.
        kind: &'static str,
    },
}

/// Every rebuilt specification of a bundle, together with the field list of
/// the schema, ready for a serializer.
///
/// Specifications that failed to rebuild are kept apart in
/// [`Self::failures`] and are not serialized.
#[derive(Debug, Serialize)]
pub struct Export<'a> {
    /// One tree per rebuilt specification, in document order.
    pub documents: Vec<DocumentTree>,
    /// Name and kind of every attribute definition.
    pub fields: Vec<FieldInfo<'a>>,
    /// One error per specification that could not be rebuilt, in document
    /// order.
    #[serde(skip)]
    pub failures: Vec<ReconstructError>,
}

impl Export<'_> {
    /// Whether every specification was rebuilt.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// An open section on the container stack.
#[derive(Debug, Clone, Copy)]
struct Container {
    /// `None` for the specification itself.
    node: Option<NodeId>,
    level: usize,
}

impl Container {
    const ROOT: Self = Self {
        node: None,
        level: 0,
    };
}

/// The containers opened by headings. The specification itself sits
/// permanently below the stack.
#[derive(Debug, Default)]
struct ContainerStack(Vec<Container>);

impl ContainerStack {
    fn top(&self) -> Container {
        self.0.last().copied().unwrap_or(Container::ROOT)
    }

    fn push(&mut self, node: NodeId, level: usize) {
        self.0.push(Container {
            node: Some(node),
            level,
        });
    }

    fn pop(&mut self) {
        self.0.pop();
    }

    /// Closes containers until the top is shallower than `level`.
    fn close_to(&mut self, level: usize) {
        while self.0.last().is_some_and(|container| container.level >= level) {
            self.0.pop();
        }
    }
}

/// Rebuilds specifications of one bundle as nested trees.
#[derive(Debug)]
pub struct Reconstructor<'a, C = HeadingRule> {
    bundle: &'a DocumentBundle,
    schema: &'a Schema<'a, C>,
}

impl<'a, C> Reconstructor<'a, C>
where
    C: HeadingClassifier,
{
    /// Creates a reconstructor that resolves spec objects in `bundle` and
    /// classifies and names them with `schema`.
    #[must_use]
    pub const fn new(bundle: &'a DocumentBundle, schema: &'a Schema<'a, C>) -> Self {
        Self { bundle, schema }
    }

    /// Rebuilds one specification.
    ///
    /// # Errors
    ///
    /// Returns a [`ReconstructError`] for the first hierarchy node that
    /// cannot be resolved, decoded, or placed. No partial tree is returned.
    #[instrument(level = "debug", skip_all, fields(specification = %specification.identifier))]
    pub fn reconstruct(&self, specification: &Specification) -> Result<DocumentTree, ReconstructError> {
        let mut tree = DocumentTree::new(
            specification.identifier.clone(),
            specification.long_name.clone(),
        );
        let mut stack = ContainerStack::default();

        for node in &specification.hierarchy {
            let fail = |kind| ReconstructError {
                location: Location::new(specification, node),
                kind,
            };

            let (document_node, heading) = self.build_node(node).map_err(fail)?;
            let level = document_node.level;
            let current = stack.top();

            if heading {
                if level == current.level {
                    stack.pop();
                } else if level < current.level {
                    stack.close_to(level);
                }
                let parent = stack.top();
                if level - 1 != parent.level {
                    debug!(
                        spec_object = %node.spec_object,
                        level,
                        parent_level = parent.level,
                        "heading attached across a level gap"
                    );
                }
                let id = tree.attach(parent.node, document_node);
                stack.push(id, level);
            } else {
                // levels are never zero, so `level - 1` cannot underflow
                let parent = if level - 1 == current.level {
                    current
                } else if level == current.level {
                    stack.pop();
                    stack.top()
                } else {
                    return Err(fail(ErrorKind::MalformedHierarchy {
                        container_level: current.level,
                    }));
                };
                tree.attach(parent.node, document_node);
            }
        }

        debug!(nodes = tree.len(), "specification rebuilt");
        Ok(tree)
    }

    /// Rebuilds every specification of the bundle independently.
    ///
    /// A failure in one specification does not affect the others; the
    /// results are in document order.
    #[must_use]
    pub fn reconstruct_all(&self) -> Vec<Result<DocumentTree, ReconstructError>> {
        self.bundle
            .specifications()
            .iter()
            .map(|specification| self.reconstruct(specification))
            .collect()
    }

    /// Rebuilds every specification and pairs the trees with the schema's
    /// field list.
    ///
    /// A specification that fails is recorded in [`Export::failures`]; the
    /// others are exported regardless.
    #[must_use]
    pub fn export(&self) -> Export<'a> {
        let mut documents = Vec::new();
        let mut failures = Vec::new();
        for result in self.reconstruct_all() {
            match result {
                Ok(tree) => documents.push(tree),
                Err(error) => failures.push(error),
            }
        }
        Export {
            documents,
            fields: self.schema.fields(),
            failures,
        }
    }

    /// Resolves and decodes one hierarchy node, and tells whether it is a
    /// heading.
    fn build_node(&self, node: &SpecHierarchyNode) -> Result<(DocumentNode, bool), ErrorKind> {
        let spec_object = self
            .bundle
            .spec_object(&node.spec_object)
            .ok_or(ErrorKind::UnresolvedSpecObject)?;
        let spec_object_type = self
            .bundle
            .spec_object_type(&spec_object.spec_object_type)
            .ok_or_else(|| ErrorKind::UnresolvedSpecObjectType(spec_object.spec_object_type.clone()))?;

        let node_type = self
            .schema
            .type_name(spec_object_type.identifier())
            .unwrap_or_else(|| spec_object_type.long_name());
        let fields = fields::extract_fields(spec_object, self.bundle, self.schema)?;

        Ok((
            DocumentNode::new(node_type.to_string(), node.level.get(), fields),
            self.schema.is_heading(spec_object_type),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AttributeDefinition, AttributeKind, AttributeValue, BundleContent, DataTypeDefinition,
        DataTypeKind, EnumValue, SpecObject, SpecObjectType,
    };

    fn id(s: &str) -> Identifier {
        Identifier::try_from(s).unwrap()
    }

    fn level(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    /// A node of a test specification: level, heading flag, title.
    type Entry<'a> = (usize, bool, &'a str);

    fn spec_object_id(title: &str) -> Identifier {
        id(&format!("SO-{title}"))
    }

    fn spec_object(title: &str, heading: bool) -> SpecObject {
        let spec_object_type = if heading { "SOT-HEADING" } else { "SOT-REQ" };
        SpecObject::new(
            spec_object_id(title),
            id(spec_object_type),
            vec![AttributeValue::scalar(id("AD-TITLE"), title)],
        )
    }

    fn specification(identifier: &str, entries: &[Entry<'_>]) -> Specification {
        Specification::new(
            id(identifier),
            Some(format!("Document {identifier}")),
            entries
                .iter()
                .map(|&(n, _, title)| SpecHierarchyNode::new(level(n), spec_object_id(title)))
                .collect(),
        )
    }

    fn content(specifications: &[(&str, &[Entry<'_>])]) -> BundleContent {
        let title = AttributeDefinition::new(
            id("AD-TITLE"),
            AttributeKind::String,
            id("DT-STRING"),
            Some("Title".to_string()),
        );
        let priority = AttributeDefinition::new(
            id("AD-PRIORITY"),
            AttributeKind::Enumeration,
            id("DT-PRIORITY"),
            Some("Priority".to_string()),
        );

        let mut spec_objects = Vec::new();
        for (_, entries) in specifications {
            for &(_, heading, title) in *entries {
                spec_objects.push(spec_object(title, heading));
            }
        }

        BundleContent {
            specifications: specifications
                .iter()
                .map(|(identifier, entries)| specification(identifier, entries))
                .collect(),
            spec_object_types: vec![
                SpecObjectType::new(id("SOT-HEADING"), "Section Heading", vec![title.clone()]),
                SpecObjectType::new(id("SOT-REQ"), "Requirement", vec![title, priority]),
            ],
            spec_objects,
            data_types: vec![
                DataTypeDefinition::new(id("DT-STRING"), DataTypeKind::String { max_length: None }),
                DataTypeDefinition::new(
                    id("DT-PRIORITY"),
                    DataTypeKind::Enumeration {
                        values: vec![
                            EnumValue::new(id("EV-LOW"), "Low"),
                            EnumValue::new(id("EV-HIGH"), "High"),
                        ],
                    },
                ),
                DataTypeDefinition::new(id("DT-INT"), DataTypeKind::Integer { min: None, max: None }),
            ],
            ..BundleContent::default()
        }
    }

    fn rebuild(entries: &[Entry<'_>]) -> Result<DocumentTree, ReconstructError> {
        let bundle = DocumentBundle::new(content(&[("SPEC-1", entries)]));
        let schema = Schema::new(&bundle).unwrap();
        Reconstructor::new(&bundle, &schema).reconstruct(&bundle.specifications()[0])
    }

    fn title(tree: &DocumentTree, id: NodeId) -> &str {
        tree.node(id).unwrap().fields.get("Title").unwrap()
    }

    /// Renders the tree as `title[child, child]` for compact assertions.
    fn outline(tree: &DocumentTree) -> String {
        fn render(tree: &DocumentTree, ids: &[NodeId]) -> String {
            ids.iter()
                .map(|&id| {
                    let children = tree.node(id).unwrap().children();
                    if children.is_empty() {
                        title(tree, id).to_string()
                    } else {
                        format!("{}[{}]", title(tree, id), render(tree, children))
                    }
                })
                .collect::<Vec<_>>()
                .join(", ")
        }
        render(tree, tree.roots())
    }

    #[test]
    fn chapters_collect_their_requirements() {
        let tree = rebuild(&[
            (1, true, "Chapter 1"),
            (2, false, "Req-1"),
            (2, false, "Req-2"),
            (1, true, "Chapter 2"),
        ])
        .unwrap();

        assert_eq!(outline(&tree), "Chapter 1[Req-1, Req-2], Chapter 2");
        let chapter_2 = tree.node(tree.roots()[1]).unwrap();
        assert!(chapter_2.children().is_empty());
        assert_eq!(chapter_2.node_type, "Section Heading");
        assert_eq!(tree.name(), Some("Document SPEC-1"));
    }

    #[test]
    fn content_cannot_skip_a_level() {
        let error = rebuild(&[(1, true, "Chapter 1"), (3, false, "Req-1")]).unwrap_err();

        assert_eq!(
            error,
            ReconstructError {
                location: Location {
                    specification: id("SPEC-1"),
                    spec_object: id("SO-Req-1"),
                    level: level(3),
                },
                kind: ErrorKind::MalformedHierarchy { container_level: 1 },
            }
        );
    }

    #[test]
    fn content_cannot_close_more_than_one_level() {
        let error = rebuild(&[
            (1, true, "Chapter 1"),
            (2, true, "Section 1.1"),
            (3, false, "Req-1"),
            (1, false, "Req-2"),
        ])
        .unwrap_err();

        assert_eq!(error.kind, ErrorKind::MalformedHierarchy { container_level: 2 });
        assert_eq!(error.location.spec_object, id("SO-Req-2"));
    }

    #[test]
    fn content_level_with_heading_closes_it() {
        let tree = rebuild(&[
            (1, true, "Chapter 1"),
            (2, false, "Req-1"),
            (1, false, "Req-2"),
            (1, false, "Req-3"),
        ])
        .unwrap();

        assert_eq!(outline(&tree), "Chapter 1[Req-1], Req-2, Req-3");
    }

    #[test]
    fn content_at_top_level_without_headings() {
        let tree = rebuild(&[(1, false, "Req-1"), (1, false, "Req-2")]).unwrap();
        assert_eq!(outline(&tree), "Req-1, Req-2");
    }

    #[test]
    fn first_content_node_must_be_at_level_one() {
        let error = rebuild(&[(2, false, "Req-1")]).unwrap_err();
        assert_eq!(error.kind, ErrorKind::MalformedHierarchy { container_level: 0 });
    }

    #[test]
    fn shallower_heading_closes_several_sections() {
        let tree = rebuild(&[
            (1, true, "Chapter 1"),
            (2, false, "Req-1"),
            (2, true, "Section 1.1"),
            (3, true, "Section 1.1.1"),
            (4, false, "Req-2"),
            (1, true, "Chapter 2"),
            (2, false, "Req-3"),
        ])
        .unwrap();

        assert_eq!(
            outline(&tree),
            "Chapter 1[Req-1, Section 1.1[Section 1.1.1[Req-2]]], Chapter 2[Req-3]"
        );
    }

    #[test]
    fn heading_may_skip_levels() {
        let tree = rebuild(&[
            (1, true, "Chapter 1"),
            (3, true, "Deep"),
            (4, false, "Req-1"),
            (2, true, "Section"),
            (3, false, "Req-2"),
        ])
        .unwrap();

        assert_eq!(outline(&tree), "Chapter 1[Deep[Req-1], Section[Req-2]]");
    }

    #[test]
    fn sibling_heading_replaces_open_section() {
        let tree = rebuild(&[
            (1, true, "Chapter 1"),
            (2, true, "Section 1.1"),
            (2, true, "Section 1.2"),
            (3, false, "Req-1"),
        ])
        .unwrap();

        assert_eq!(outline(&tree), "Chapter 1[Section 1.1, Section 1.2[Req-1]]");
    }

    #[test]
    fn well_formed_tree_flattens_back_to_input() {
        let entries: &[Entry<'_>] = &[
            (1, true, "Chapter 1"),
            (2, false, "Req-1"),
            (2, true, "Section 1.1"),
            (3, false, "Req-2"),
            (3, false, "Req-3"),
            (2, false, "Req-4"),
            (1, true, "Chapter 2"),
            (2, true, "Section 2.1"),
            (3, false, "Req-5"),
            (2, false, "Req-6"),
        ];
        let tree = rebuild(entries).unwrap();

        assert_eq!(tree.len(), entries.len());
        let expected: Vec<(&str, usize)> = entries
            .iter()
            .map(|&(n, heading, _)| (if heading { "Section Heading" } else { "Requirement" }, n))
            .collect();
        assert_eq!(tree.flatten(), expected);
    }

    #[test]
    fn reconstruction_is_idempotent() {
        let bundle = DocumentBundle::new(content(&[(
            "SPEC-1",
            &[(1, true, "Chapter 1"), (2, false, "Req-1"), (1, true, "Chapter 2")],
        )]));
        let schema = Schema::new(&bundle).unwrap();
        let reconstructor = Reconstructor::new(&bundle, &schema);
        let specification = &bundle.specifications()[0];

        assert_eq!(
            reconstructor.reconstruct(specification).unwrap(),
            reconstructor.reconstruct(specification).unwrap()
        );
    }

    #[test]
    fn enumeration_fields_are_decoded() {
        let mut content = content(&[("SPEC-1", &[(1, false, "Req-1")])]);
        content.spec_objects[0].attributes.push(AttributeValue::enumeration(
            id("AD-PRIORITY"),
            vec![id("EV-LOW"), id("EV-HIGH")],
        ));
        let bundle = DocumentBundle::new(content);
        let schema = Schema::new(&bundle).unwrap();

        let tree = Reconstructor::new(&bundle, &schema)
            .reconstruct(&bundle.specifications()[0])
            .unwrap();

        let node = tree.node(tree.roots()[0]).unwrap();
        assert_eq!(node.fields.get("Priority"), Some("Low, High"));
        assert_eq!(node.fields.get("Title"), Some("Req-1"));
        let names: Vec<_> = node.fields.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Title", "Priority"]);
    }

    #[test]
    fn unknown_enum_value_aborts() {
        let mut content = content(&[("SPEC-1", &[(1, false, "Req-1")])]);
        content.spec_objects[0].attributes.push(AttributeValue::enumeration(
            id("AD-PRIORITY"),
            vec![id("EV-MEDIUM")],
        ));
        let bundle = DocumentBundle::new(content);
        let schema = Schema::new(&bundle).unwrap();

        let error = Reconstructor::new(&bundle, &schema)
            .reconstruct(&bundle.specifications()[0])
            .unwrap_err();

        assert_eq!(
            error.kind,
            ErrorKind::UnresolvedEnumValue {
                data_type: id("DT-PRIORITY"),
                enum_value: id("EV-MEDIUM"),
            }
        );
    }

    #[test]
    fn unsupported_data_type_aborts() {
        let mut content = content(&[("SPEC-1", &[(1, false, "Req-1")])]);
        content.spec_object_types[1] = SpecObjectType::new(
            id("SOT-REQ"),
            "Requirement",
            vec![AttributeDefinition::new(
                id("AD-COUNT"),
                AttributeKind::Integer,
                id("DT-INT"),
                Some("Count".to_string()),
            )],
        );
        content.spec_objects[0].attributes = vec![AttributeValue::scalar(id("AD-COUNT"), "3")];
        let bundle = DocumentBundle::new(content);
        let schema = Schema::new(&bundle).unwrap();

        let error = Reconstructor::new(&bundle, &schema)
            .reconstruct(&bundle.specifications()[0])
            .unwrap_err();

        assert_eq!(
            error.kind,
            ErrorKind::UnsupportedDataType {
                attribute: id("AD-COUNT"),
                data_type: id("DT-INT"),
                kind: "INTEGER",
            }
        );
    }

    #[test]
    fn missing_spec_object_aborts() {
        let mut content = content(&[("SPEC-1", &[(1, true, "Chapter 1"), (2, false, "Req-1")])]);
        content.spec_objects.truncate(1);
        let bundle = DocumentBundle::new(content);
        let schema = Schema::new(&bundle).unwrap();

        let error = Reconstructor::new(&bundle, &schema)
            .reconstruct(&bundle.specifications()[0])
            .unwrap_err();

        assert_eq!(error.kind, ErrorKind::UnresolvedSpecObject);
        assert_eq!(
            error.to_string(),
            "spec object 'SO-Req-1' at level 2 in specification 'SPEC-1': spec object does not exist"
        );
    }

    #[test]
    fn extreme_levels_do_not_overflow() {
        let error = rebuild(&[(usize::MAX, true, "Deep"), (1, false, "Req-1")]).unwrap_err();
        assert_eq!(
            error.kind,
            ErrorKind::MalformedHierarchy {
                container_level: usize::MAX
            }
        );

        let tree = rebuild(&[
            (usize::MAX - 1, true, "Deep"),
            (usize::MAX, false, "Req-1"),
            (usize::MAX, true, "Deeper"),
        ])
        .unwrap();
        assert_eq!(outline(&tree), "Deep[Req-1, Deeper]");
    }

    /// Rebuilds a single top-level requirement after `corrupt` has broken
    /// one of its cross references.
    fn rebuild_corrupted(corrupt: impl FnOnce(&mut BundleContent)) -> ReconstructError {
        let mut content = content(&[("SPEC-1", &[(1, false, "Req-1")])]);
        corrupt(&mut content);
        let bundle = DocumentBundle::new(content);
        let schema = Schema::new(&bundle).unwrap();

        Reconstructor::new(&bundle, &schema)
            .reconstruct(&bundle.specifications()[0])
            .unwrap_err()
    }

    fn req_1_location() -> Location {
        Location {
            specification: id("SPEC-1"),
            spec_object: id("SO-Req-1"),
            level: level(1),
        }
    }

    #[test]
    fn missing_spec_object_type_aborts() {
        let error = rebuild_corrupted(|content| {
            content.spec_objects[0].spec_object_type = id("SOT-GONE");
        });

        assert_eq!(
            error,
            ReconstructError {
                location: req_1_location(),
                kind: ErrorKind::UnresolvedSpecObjectType(id("SOT-GONE")),
            }
        );
    }

    #[test]
    fn missing_attribute_definition_aborts() {
        let error = rebuild_corrupted(|content| {
            content.spec_objects[0]
                .attributes
                .push(AttributeValue::scalar(id("AD-GONE"), "orphan"));
        });

        assert_eq!(
            error,
            ReconstructError {
                location: req_1_location(),
                kind: ErrorKind::UnresolvedAttributeDefinition(id("AD-GONE")),
            }
        );
    }

    #[test]
    fn missing_data_type_aborts() {
        let error = rebuild_corrupted(|content| {
            content
                .data_types
                .retain(|data_type| data_type.identifier.as_str() != "DT-STRING");
        });

        assert_eq!(
            error,
            ReconstructError {
                location: req_1_location(),
                kind: ErrorKind::UnresolvedDataType {
                    attribute: id("AD-TITLE"),
                    data_type: id("DT-STRING"),
                },
            }
        );
    }

    #[test]
    fn failing_specification_does_not_block_others() {
        let bundle = DocumentBundle::new(content(&[
            ("SPEC-BAD", &[(1, true, "Chapter 1"), (3, false, "Req-1")]),
            ("SPEC-GOOD", &[(1, true, "Chapter 2"), (2, false, "Req-2")]),
        ]));
        let schema = Schema::new(&bundle).unwrap();
        let reconstructor = Reconstructor::new(&bundle, &schema);

        let results = reconstructor.reconstruct_all();

        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        let good = results[1].as_ref().unwrap();
        assert_eq!(outline(good), "Chapter 2[Req-2]");

        let export = reconstructor.export();
        assert!(!export.is_complete());
        assert_eq!(export.documents.len(), 1);
        assert_eq!(export.documents[0].identifier().as_str(), "SPEC-GOOD");
        assert_eq!(export.failures.len(), 1);
        assert_eq!(export.failures[0].location.specification, id("SPEC-BAD"));

        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["documents"].as_array().unwrap().len(), 1);
        assert!(json.get("failures").is_none());
    }

    #[test]
    fn export_lists_documents_and_fields() {
        let bundle = DocumentBundle::new(content(&[(
            "SPEC-1",
            &[(1, true, "Chapter 1"), (2, false, "Req-1")],
        )]));
        let schema = Schema::new(&bundle).unwrap();

        let export = Reconstructor::new(&bundle, &schema).export();
        assert!(export.is_complete());
        let json = serde_json::to_value(&export).unwrap();

        assert_eq!(
            json["fields"],
            serde_json::json!([
                {"name": "Title", "type": "STRING"},
                {"name": "Priority", "type": "ENUMERATION"},
            ])
        );
        assert_eq!(json["documents"][0]["name"], "Document SPEC-1");
        assert_eq!(
            json["documents"][0]["nodes"][0]["nodes"][0]["fields"]["Title"],
            "Req-1"
        );
    }

    #[test]
    fn custom_classifier_changes_nesting() {
        let bundle = DocumentBundle::new(content(&[(
            "SPEC-1",
            &[(1, true, "Chapter 1"), (2, false, "Req-1"), (3, false, "Req-2")],
        )]));
        // treat every type as a heading
        let schema = Schema::with_classifier(&bundle, |_: &SpecObjectType| true).unwrap();

        let tree = Reconstructor::new(&bundle, &schema)
            .reconstruct(&bundle.specifications()[0])
            .unwrap();

        assert_eq!(outline(&tree), "Chapter 1[Req-1[Req-2]]");
    }
}
