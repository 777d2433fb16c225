//! Semantic checks that go beyond what an XML schema parse catches.
//!
//! The checks never fail and never modify the bundle: every problem found
//! becomes a [`SemanticFinding`] in the returned [`ValidationReport`],
//! alongside the parser's own findings which are relayed unchanged.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    domain::{BundleContent, Identifier, NamespaceInfo, SchemaFinding, SpecRelation},
    index::ReferenceIndex,
};

const EXPECTED_ENCODING: &str = "UTF-8";
const DECLARATION_HINT: &str = "Every ReqIF document should have the following line: \
                                <?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Which end of a spec relation a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Endpoint {
    /// The relation's `SOURCE`.
    Source,
    /// The relation's `TARGET`.
    Target,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Source => "SOURCE",
            Self::Target => "TARGET",
        })
    }
}

/// The kind of a [`SemanticFinding`], without its details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FindingKind {
    /// See [`SemanticFinding::MissingDeclaration`].
    MissingDeclaration,
    /// See [`SemanticFinding::NonStandardEncoding`].
    NonStandardEncoding,
    /// See [`SemanticFinding::DanglingReference`].
    DanglingReference,
}

/// A recoverable problem with the content of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum SemanticFinding {
    /// The document has no XML declaration.
    MissingDeclaration,
    /// The declared encoding is not exactly `UTF-8`.
    NonStandardEncoding {
        /// The declared encoding.
        encoding: String,
    },
    /// A spec relation endpoint names a spec object that does not exist.
    DanglingReference {
        /// Identifier of the relation.
        relation: Identifier,
        /// The endpoint that failed to resolve.
        endpoint: Endpoint,
        /// The unresolved spec object identifier.
        spec_object: Identifier,
    },
}

impl SemanticFinding {
    /// The kind of this finding.
    #[must_use]
    pub const fn kind(&self) -> FindingKind {
        match self {
            Self::MissingDeclaration => FindingKind::MissingDeclaration,
            Self::NonStandardEncoding { .. } => FindingKind::NonStandardEncoding,
            Self::DanglingReference { .. } => FindingKind::DanglingReference,
        }
    }
}

impl fmt::Display for SemanticFinding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MissingDeclaration => write!(
                f,
                "Document is missing a valid XML declaration. {DECLARATION_HINT}"
            ),
            Self::NonStandardEncoding { encoding } => write!(
                f,
                "ReqIF Implementation Guide recommends using UTF-8 encoding for ReqIF \
                 files, found '{encoding}'. {DECLARATION_HINT}"
            ),
            Self::DanglingReference {
                relation,
                endpoint,
                spec_object,
            } => write!(
                f,
                "spec relation '{relation}' {endpoint} refers to spec object \
                 '{spec_object}' which does not exist"
            ),
        }
    }
}

/// Everything found while validating one bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Parser findings, relayed in their original order.
    pub schema_findings: Vec<SchemaFinding>,
    /// Findings of the semantic checks, in check order.
    pub semantic_findings: Vec<SemanticFinding>,
}

impl ValidationReport {
    /// Total number of findings of both categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schema_findings.len() + self.semantic_findings.len()
    }

    /// Whether nothing at all was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of semantic findings of each kind.
    #[must_use]
    pub fn counts_by_kind(&self) -> BTreeMap<FindingKind, usize> {
        let mut counts = BTreeMap::new();
        for finding in &self.semantic_findings {
            *counts.entry(finding.kind()).or_default() += 1;
        }
        counts
    }
}

/// Validates a bundle's content against its reference index.
///
/// Checks run in a fixed order: the XML declaration, the declared encoding,
/// then every spec relation in document order (source before target). The
/// output is fully determined by the input.
#[must_use]
#[instrument(level = "debug", skip_all, fields(relations = content.spec_relations.len()))]
pub fn validate(content: &BundleContent, index: &ReferenceIndex) -> ValidationReport {
    let mut semantic_findings = Vec::new();

    check_namespace(&content.namespace_info, &mut semantic_findings);
    check_spec_relations(&content.spec_relations, index, &mut semantic_findings);

    debug!(
        schema = content.schema_findings.len(),
        semantic = semantic_findings.len(),
        "validation complete"
    );

    ValidationReport {
        schema_findings: content.schema_findings.clone(),
        semantic_findings,
    }
}

fn check_namespace(namespace_info: &NamespaceInfo, findings: &mut Vec<SemanticFinding>) {
    if !namespace_info.doctype_is_present {
        findings.push(SemanticFinding::MissingDeclaration);
    }
    match &namespace_info.encoding {
        Some(encoding) if encoding != EXPECTED_ENCODING => {
            findings.push(SemanticFinding::NonStandardEncoding {
                encoding: encoding.clone(),
            });
        }
        _ => {}
    }
}

fn check_spec_relations(
    spec_relations: &[SpecRelation],
    index: &ReferenceIndex,
    findings: &mut Vec<SemanticFinding>,
) {
    for relation in spec_relations {
        for (endpoint, spec_object) in [
            (Endpoint::Source, &relation.source),
            (Endpoint::Target, &relation.target),
        ] {
            if !index.spec_object_exists(spec_object) {
                findings.push(SemanticFinding::DanglingReference {
                    relation: relation.identifier.clone(),
                    endpoint,
                    spec_object: spec_object.clone(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::{DocumentBundle, SpecObject};

    fn id(s: &str) -> Identifier {
        Identifier::try_from(s).unwrap()
    }

    fn well_declared() -> NamespaceInfo {
        NamespaceInfo {
            doctype_is_present: true,
            encoding: Some("UTF-8".to_string()),
        }
    }

    fn relation(identifier: &str, source: &str, target: &str) -> SpecRelation {
        SpecRelation::new(id(identifier), id(source), id(target))
    }

    fn bundle(namespace_info: NamespaceInfo, spec_relations: Vec<SpecRelation>) -> DocumentBundle {
        DocumentBundle::new(BundleContent {
            namespace_info,
            spec_relations,
            spec_objects: vec![
                SpecObject::new(id("SO-1"), id("SOT-1"), Vec::new()),
                SpecObject::new(id("SO-2"), id("SOT-1"), Vec::new()),
            ],
            ..BundleContent::default()
        })
    }

    #[test]
    fn clean_document_has_no_findings() {
        let report = bundle(well_declared(), vec![relation("R-1", "SO-1", "SO-2")]).validate();
        assert!(report.is_empty());
    }

    #[test_case(Some("UTF-8"), false; "exact match")]
    #[test_case(Some("utf-8"), true; "lower case")]
    #[test_case(Some("ISO-8859-1"), true; "latin 1")]
    #[test_case(None, false; "not declared")]
    fn encoding_must_be_exactly_utf8(encoding: Option<&str>, expected: bool) {
        let namespace_info = NamespaceInfo {
            doctype_is_present: true,
            encoding: encoding.map(str::to_string),
        };
        let report = bundle(namespace_info, Vec::new()).validate();
        let fired = report
            .semantic_findings
            .iter()
            .any(|f| f.kind() == FindingKind::NonStandardEncoding);
        assert_eq!(fired, expected);
    }

    #[test]
    fn declaration_and_encoding_checks_are_independent() {
        let namespace_info = NamespaceInfo {
            doctype_is_present: false,
            encoding: Some("utf-8".to_string()),
        };
        let report = bundle(namespace_info, Vec::new()).validate();
        assert_eq!(
            report.semantic_findings,
            vec![
                SemanticFinding::MissingDeclaration,
                SemanticFinding::NonStandardEncoding {
                    encoding: "utf-8".to_string()
                },
            ]
        );
    }

    #[test]
    fn dangling_endpoints_are_reported_in_order() {
        let report = bundle(
            NamespaceInfo::default(),
            vec![
                relation("R-1", "SO-1", "SO-MISSING"),
                relation("R-2", "SO-GONE", "SO-LOST"),
                relation("R-3", "SO-2", "SO-1"),
            ],
        )
        .validate();

        assert_eq!(
            report.semantic_findings,
            vec![
                SemanticFinding::MissingDeclaration,
                SemanticFinding::DanglingReference {
                    relation: id("R-1"),
                    endpoint: Endpoint::Target,
                    spec_object: id("SO-MISSING"),
                },
                SemanticFinding::DanglingReference {
                    relation: id("R-2"),
                    endpoint: Endpoint::Source,
                    spec_object: id("SO-GONE"),
                },
                SemanticFinding::DanglingReference {
                    relation: id("R-2"),
                    endpoint: Endpoint::Target,
                    spec_object: id("SO-LOST"),
                },
            ]
        );

        let counts = report.counts_by_kind();
        assert_eq!(counts.get(&FindingKind::DanglingReference), Some(&3));
        assert_eq!(counts.get(&FindingKind::MissingDeclaration), Some(&1));
        assert_eq!(counts.get(&FindingKind::NonStandardEncoding), None);
    }

    #[test]
    fn schema_findings_are_passed_through() {
        let content = BundleContent {
            namespace_info: well_declared(),
            schema_findings: vec![SchemaFinding::new("first"), SchemaFinding::new("second")],
            ..BundleContent::default()
        };
        let index = ReferenceIndex::build(&content);

        let report = validate(&content, &index);

        assert_eq!(report.schema_findings, content.schema_findings);
        assert!(report.semantic_findings.is_empty());
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn validation_is_deterministic() {
        let bundle = bundle(
            NamespaceInfo::default(),
            vec![relation("R-1", "SO-X", "SO-Y"), relation("R-2", "SO-1", "SO-Z")],
        );
        let first = serde_json::to_string(&bundle.validate()).unwrap();
        let second = serde_json::to_string(&bundle.validate()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn dangling_reference_message_names_endpoint() {
        let finding = SemanticFinding::DanglingReference {
            relation: id("R-1"),
            endpoint: Endpoint::Source,
            spec_object: id("SO-9"),
        };
        assert_eq!(
            finding.to_string(),
            "spec relation 'R-1' SOURCE refers to spec object 'SO-9' which does not exist"
        );
    }
}
