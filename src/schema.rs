//! Derived views over a bundle's spec object types.
//!
//! The [`Schema`] flattens every spec object type's attribute definitions
//! into one map, names each spec object type, and decides which types are
//! headings (sections that hold further nodes) as opposed to content.

use std::collections::HashMap;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::{AttributeDefinition, AttributeKind, DocumentBundle, Identifier, SpecObjectType};

/// Decides whether a spec object type is a heading.
///
/// Implemented by [`HeadingRule`] and by any `Fn(&SpecObjectType) -> bool`,
/// so callers can replace the default rule with their own predicate.
pub trait HeadingClassifier {
    /// Returns `true` if objects of this type are headings.
    fn is_heading(&self, spec_object_type: &SpecObjectType) -> bool;
}

impl<F> HeadingClassifier for F
where
    F: Fn(&SpecObjectType) -> bool,
{
    fn is_heading(&self, spec_object_type: &SpecObjectType) -> bool {
        self(spec_object_type)
    }
}

/// Classifies headings by the long name of their spec object type.
#[derive(Debug, Clone)]
pub enum HeadingRule {
    /// The long name contains this token, ignoring case.
    Token(String),
    /// The long name matches this regular expression.
    Pattern(Regex),
}

impl HeadingRule {
    /// The token used when nothing else is configured.
    pub const DEFAULT_TOKEN: &'static str = "heading";

    /// Builds a pattern rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid regular expression.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self::Pattern)
    }

    /// Whether a spec object type long name denotes a heading.
    #[must_use]
    pub fn matches(&self, long_name: &str) -> bool {
        match self {
            Self::Token(token) => long_name
                .to_lowercase()
                .contains(&token.to_lowercase()),
            Self::Pattern(pattern) => pattern.is_match(long_name),
        }
    }
}

impl Default for HeadingRule {
    fn default() -> Self {
        Self::Token(Self::DEFAULT_TOKEN.to_string())
    }
}

impl PartialEq for HeadingRule {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Token(a), Self::Token(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl Eq for HeadingRule {}

impl HeadingClassifier for HeadingRule {
    fn is_heading(&self, spec_object_type: &SpecObjectType) -> bool {
        self.matches(spec_object_type.long_name())
    }
}

/// Errors raised while deriving a [`Schema`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// Two spec object types declare the same attribute definition
    /// identifier with different kinds.
    #[error(
        "attribute definition '{identifier}' is {first_kind} in spec object type \
         '{first_type}' but {second_kind} in '{second_type}'"
    )]
    ConflictingAttributeDefinition {
        /// The shared attribute definition identifier.
        identifier: Identifier,
        /// Spec object type holding the first declaration.
        first_type: Identifier,
        /// Kind of the first declaration.
        first_kind: AttributeKind,
        /// Spec object type holding the conflicting declaration.
        second_type: Identifier,
        /// Kind of the conflicting declaration.
        second_kind: AttributeKind,
    },
}

/// A column of the export: one attribute definition's name and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldInfo<'a> {
    /// Field name, as used in exported node fields.
    pub name: &'a str,
    /// Kind of the attribute definition.
    #[serde(rename = "type")]
    pub kind: AttributeKind,
}

#[derive(Debug, Clone, Copy)]
struct Declared<'a> {
    definition: &'a AttributeDefinition,
    owner: &'a Identifier,
}

/// Convenience views derived from a bundle's spec object types.
#[derive(Debug)]
pub struct Schema<'a, C = HeadingRule> {
    attribute_definitions: Vec<Declared<'a>>,
    attribute_positions: HashMap<&'a str, usize>,
    type_names: HashMap<&'a str, &'a str>,
    classifier: C,
}

impl<'a> Schema<'a> {
    /// Derives the schema using the default [`HeadingRule`].
    ///
    /// # Errors
    ///
    /// See [`Self::with_classifier`].
    pub fn new(bundle: &'a DocumentBundle) -> Result<Self, SchemaError> {
        Self::with_classifier(bundle, HeadingRule::default())
    }
}

impl<'a, C> Schema<'a, C>
where
    C: HeadingClassifier,
{
    /// Derives the schema with a caller-supplied heading classifier.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ConflictingAttributeDefinition`] if two spec
    /// object types declare the same attribute definition identifier with
    /// different kinds. Declarations with matching kinds are merged, keeping
    /// the first.
    pub fn with_classifier(bundle: &'a DocumentBundle, classifier: C) -> Result<Self, SchemaError> {
        let mut attribute_definitions: Vec<Declared<'a>> = Vec::new();
        let mut attribute_positions: HashMap<&'a str, usize> = HashMap::new();
        let mut type_names = HashMap::with_capacity(bundle.spec_object_types().len());

        for spec_object_type in bundle.spec_object_types() {
            type_names
                .entry(spec_object_type.identifier().as_str())
                .or_insert_with(|| spec_object_type.long_name());

            for definition in spec_object_type.attribute_definitions() {
                let owner = spec_object_type.identifier();
                if let Some(&position) = attribute_positions.get(definition.identifier.as_str()) {
                    let first = attribute_definitions[position];
                    if first.definition.kind != definition.kind {
                        return Err(SchemaError::ConflictingAttributeDefinition {
                            identifier: definition.identifier.clone(),
                            first_type: first.owner.clone(),
                            first_kind: first.definition.kind,
                            second_type: owner.clone(),
                            second_kind: definition.kind,
                        });
                    }
                    if first.definition != definition {
                        debug!(
                            attribute = %definition.identifier,
                            "attribute definition redeclared by '{owner}' with different details, keeping the one from '{}'",
                            first.owner
                        );
                    }
                    continue;
                }

                attribute_positions.insert(definition.identifier.as_str(), attribute_definitions.len());
                attribute_definitions.push(Declared { definition, owner });
            }
        }

        Ok(Self {
            attribute_definitions,
            attribute_positions,
            type_names,
            classifier,
        })
    }

    /// Looks up an attribute definition declared by any spec object type.
    #[must_use]
    pub fn attribute_definition(&self, identifier: &str) -> Option<&'a AttributeDefinition> {
        self.attribute_positions
            .get(identifier)
            .map(|&position| self.attribute_definitions[position].definition)
    }

    /// All attribute definitions, in order of first declaration.
    pub fn attribute_definitions(&self) -> impl Iterator<Item = &'a AttributeDefinition> + '_ {
        self.attribute_definitions.iter().map(|declared| declared.definition)
    }

    /// The export columns: name and kind of every attribute definition, in
    /// order of first declaration.
    #[must_use]
    pub fn fields(&self) -> Vec<FieldInfo<'a>> {
        self.attribute_definitions()
            .map(|definition| FieldInfo {
                name: definition.field_name(),
                kind: definition.kind,
            })
            .collect()
    }

    /// The long name of a spec object type.
    #[must_use]
    pub fn type_name(&self, spec_object_type: &str) -> Option<&'a str> {
        self.type_names.get(spec_object_type).copied()
    }

    /// Whether objects of this spec object type are headings.
    #[must_use]
    pub fn is_heading(&self, spec_object_type: &SpecObjectType) -> bool {
        self.classifier.is_heading(spec_object_type)
    }
}
