use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::domain::Identifier;

/// A `DATATYPE-DEFINITION-*` element.
///
/// Attribute definitions refer to a data type by identifier; the data type
/// decides how the stored attribute values are decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTypeDefinition {
    /// Unique key of the definition.
    pub identifier: Identifier,
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    /// Timestamp of the last modification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_change: Option<DateTime<FixedOffset>>,
    /// The variant of the data type, with its variant-specific fields.
    pub kind: DataTypeKind,
}

impl DataTypeDefinition {
    /// Creates a data type definition with no long name or timestamp.
    #[must_use]
    pub const fn new(identifier: Identifier, kind: DataTypeKind) -> Self {
        Self {
            identifier,
            long_name: None,
            last_change: None,
            kind,
        }
    }
}

/// The closed set of data type variants defined by the ReqIF standard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataTypeKind {
    /// Plain text.
    String {
        /// Maximum permitted length of values.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
    /// Formatted text as an XHTML fragment.
    Xhtml,
    /// An `xsd:dateTime` timestamp.
    Date,
    /// A choice from a fixed list of values.
    Enumeration {
        /// The permitted values, in declaration order.
        values: Vec<EnumValue>,
    },
    /// `true` or `false`.
    Boolean,
    /// A whole number in an optional range.
    Integer {
        /// Smallest permitted value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        /// Largest permitted value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    /// A floating point number in an optional range.
    Real {
        /// Number of significant decimal digits.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accuracy: Option<u32>,
        /// Smallest permitted value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Largest permitted value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
}

impl DataTypeKind {
    /// The ReqIF name of this variant.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::String { .. } => "STRING",
            Self::Xhtml => "XHTML",
            Self::Date => "DATE",
            Self::Enumeration { .. } => "ENUMERATION",
            Self::Boolean => "BOOLEAN",
            Self::Integer { .. } => "INTEGER",
            Self::Real { .. } => "REAL",
        }
    }
}

impl fmt::Display for DataTypeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One `ENUM-VALUE` of an enumeration data type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    /// Key referenced by attribute values.
    pub identifier: Identifier,
    /// Display name of the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
}

impl EnumValue {
    /// Creates an enumeration value.
    #[must_use]
    pub fn new(identifier: Identifier, long_name: impl Into<String>) -> Self {
        Self {
            identifier,
            long_name: Some(long_name.into()),
        }
    }

    /// The long name, or the identifier when the value is unnamed.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.long_name.as_deref().unwrap_or(self.identifier.as_str())
    }
}
