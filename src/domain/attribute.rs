use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::domain::Identifier;

/// The kind of an `ATTRIBUTE-DEFINITION-*` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeKind {
    /// `ATTRIBUTE-DEFINITION-STRING`
    String,
    /// `ATTRIBUTE-DEFINITION-XHTML`
    Xhtml,
    /// `ATTRIBUTE-DEFINITION-ENUMERATION`
    Enumeration,
    /// `ATTRIBUTE-DEFINITION-DATE`
    Date,
    /// `ATTRIBUTE-DEFINITION-BOOLEAN`
    Boolean,
    /// `ATTRIBUTE-DEFINITION-INTEGER`
    Integer,
    /// `ATTRIBUTE-DEFINITION-REAL`
    Real,
}

impl AttributeKind {
    /// The ReqIF name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Xhtml => "XHTML",
            Self::Enumeration => "ENUMERATION",
            Self::Date => "DATE",
            Self::Boolean => "BOOLEAN",
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The `DEFAULT-VALUE` of an attribute definition, when one is declared.
///
/// An absent default is modelled as `Option::None` on the definition. A
/// self-closed `<DEFAULT-VALUE/>` tag is an explicit empty default and is
/// kept distinct from both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    /// The default value tag is present but empty.
    EmptyTag,
    /// The default value as stored in the document.
    Value(String),
}

/// An attribute definition owned by a spec object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    /// Unique key of the definition.
    pub identifier: Identifier,
    /// Which `ATTRIBUTE-DEFINITION-*` element this is.
    pub kind: AttributeKind,
    /// Reference to the [`DataTypeDefinition`](crate::domain::DataTypeDefinition)
    /// of the values.
    pub datatype_definition: Identifier,
    /// Human-readable name, used as the field name on export.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Timestamp of the last modification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_change: Option<DateTime<FixedOffset>>,
    /// `IS-EDITABLE`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    /// Default value applied to objects that do not set the attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
    /// `MULTI-VALUED` (enumerations only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_valued: Option<bool>,
}

impl AttributeDefinition {
    /// Creates a definition with all optional fields left unset.
    #[must_use]
    pub const fn new(
        identifier: Identifier,
        kind: AttributeKind,
        datatype_definition: Identifier,
        long_name: Option<String>,
    ) -> Self {
        Self {
            identifier,
            kind,
            datatype_definition,
            long_name,
            description: None,
            last_change: None,
            editable: None,
            default_value: None,
            multi_valued: None,
        }
    }

    /// The name used for this attribute on export.
    ///
    /// Falls back to the identifier when the definition has no long name.
    #[must_use]
    pub fn field_name(&self) -> &str {
        self.long_name.as_deref().unwrap_or(self.identifier.as_str())
    }
}

/// A value stored on a spec object for one attribute definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValue {
    /// Reference to the [`AttributeDefinition`].
    pub definition: Identifier,
    /// The stored value.
    pub value: Value,
}

impl AttributeValue {
    /// Creates a scalar attribute value.
    #[must_use]
    pub fn scalar(definition: Identifier, value: impl Into<String>) -> Self {
        Self {
            definition,
            value: Value::Scalar(value.into()),
        }
    }

    /// Creates an enumeration attribute value.
    #[must_use]
    pub const fn enumeration(definition: Identifier, values: Vec<Identifier>) -> Self {
        Self {
            definition,
            value: Value::Enumeration(values),
        }
    }
}

/// The shape of a stored attribute value.
///
/// String, date, XHTML and the other single-valued kinds store one scalar;
/// enumerations store references to enum values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A single value, stored verbatim.
    Scalar(String),
    /// Identifiers of [`EnumValue`](crate::domain::EnumValue)s, in stored
    /// order.
    Enumeration(Vec<Identifier>),
}
