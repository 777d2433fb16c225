use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::domain::{AttributeDefinition, AttributeValue, Identifier};

/// A `SPEC-OBJECT-TYPE`: the schema shared by a class of spec objects.
///
/// The attribute definitions are kept in declaration order, together with a
/// map from definition identifier to position that is derived from them on
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SpecObjectTypeFields", into = "SpecObjectTypeFields")]
pub struct SpecObjectType {
    identifier: Identifier,
    long_name: String,
    description: Option<String>,
    last_change: Option<DateTime<FixedOffset>>,
    attribute_definitions: Vec<AttributeDefinition>,
    attribute_map: HashMap<Identifier, usize>,
}

impl SpecObjectType {
    /// Creates a spec object type from its ordered attribute definitions.
    ///
    /// If the list declares the same identifier more than once, the first
    /// declaration is the one returned by [`Self::attribute_definition`].
    #[must_use]
    pub fn new(
        identifier: Identifier,
        long_name: impl Into<String>,
        attribute_definitions: Vec<AttributeDefinition>,
    ) -> Self {
        let mut attribute_map = HashMap::with_capacity(attribute_definitions.len());
        for (position, definition) in attribute_definitions.iter().enumerate() {
            attribute_map
                .entry(definition.identifier.clone())
                .or_insert(position);
        }

        Self {
            identifier,
            long_name: long_name.into(),
            description: None,
            last_change: None,
            attribute_definitions,
            attribute_map,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the last-change timestamp.
    #[must_use]
    pub fn with_last_change(mut self, last_change: DateTime<FixedOffset>) -> Self {
        self.last_change = Some(last_change);
        self
    }

    /// Unique key of the type.
    #[must_use]
    pub const fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Human-readable name of the type.
    #[must_use]
    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    /// Free-text description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Timestamp of the last modification.
    #[must_use]
    pub const fn last_change(&self) -> Option<&DateTime<FixedOffset>> {
        self.last_change.as_ref()
    }

    /// The attribute definitions, in declaration order.
    #[must_use]
    pub fn attribute_definitions(&self) -> &[AttributeDefinition] {
        &self.attribute_definitions
    }

    /// Looks up one of this type's attribute definitions by identifier.
    #[must_use]
    pub fn attribute_definition(&self, identifier: &str) -> Option<&AttributeDefinition> {
        self.attribute_map
            .get(identifier)
            .map(|&position| &self.attribute_definitions[position])
    }
}

/// Serialized form of [`SpecObjectType`]; the attribute map is rebuilt on
/// load.
#[derive(Debug, Serialize, Deserialize)]
struct SpecObjectTypeFields {
    identifier: Identifier,
    long_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_change: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    attribute_definitions: Vec<AttributeDefinition>,
}

impl From<SpecObjectTypeFields> for SpecObjectType {
    fn from(fields: SpecObjectTypeFields) -> Self {
        let mut spec_object_type = Self::new(
            fields.identifier,
            fields.long_name,
            fields.attribute_definitions,
        );
        spec_object_type.description = fields.description;
        spec_object_type.last_change = fields.last_change;
        spec_object_type
    }
}

impl From<SpecObjectType> for SpecObjectTypeFields {
    fn from(spec_object_type: SpecObjectType) -> Self {
        Self {
            identifier: spec_object_type.identifier,
            long_name: spec_object_type.long_name,
            description: spec_object_type.description,
            last_change: spec_object_type.last_change,
            attribute_definitions: spec_object_type.attribute_definitions,
        }
    }
}

/// A `SPEC-OBJECT`: a single requirement or section record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecObject {
    /// Unique key of the object.
    pub identifier: Identifier,
    /// Reference to the object's [`SpecObjectType`].
    pub spec_object_type: Identifier,
    /// The stored attribute values, in document order.
    #[serde(default)]
    pub attributes: Vec<AttributeValue>,
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    /// Timestamp of the last modification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_change: Option<DateTime<FixedOffset>>,
}

impl SpecObject {
    /// Creates a spec object with the given attribute values.
    #[must_use]
    pub const fn new(
        identifier: Identifier,
        spec_object_type: Identifier,
        attributes: Vec<AttributeValue>,
    ) -> Self {
        Self {
            identifier,
            spec_object_type,
            attributes,
            long_name: None,
            last_change: None,
        }
    }
}

/// A `SPEC-RELATION`: a directed link between two spec objects.
///
/// Nothing guarantees that either endpoint exists; the validator reports
/// dangling endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecRelation {
    /// Unique key of the relation.
    pub identifier: Identifier,
    /// Reference to the `SPEC-RELATION-TYPE`, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_type: Option<Identifier>,
    /// The spec object the relation starts from.
    pub source: Identifier,
    /// The spec object the relation points at.
    pub target: Identifier,
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    /// Timestamp of the last modification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_change: Option<DateTime<FixedOffset>>,
}

impl SpecRelation {
    /// Creates a relation between two spec objects.
    #[must_use]
    pub const fn new(identifier: Identifier, source: Identifier, target: Identifier) -> Self {
        Self {
            identifier,
            relation_type: None,
            source,
            target,
            long_name: None,
            last_change: None,
        }
    }
}
