//! Domain model for pre-parsed ReqIF content.
//!
//! This module contains the typed entities of a ReqIF document: data type
//! definitions, spec object types and their attribute definitions, spec
//! objects, relations, specifications, and the bundle that owns them.

/// Validated identifiers used as cross-reference keys.
pub mod identifier;
pub use identifier::{Identifier, InvalidIdentifier};

/// Data type definitions and their variant-specific payloads.
pub mod data_type;
pub use data_type::{DataTypeDefinition, DataTypeKind, EnumValue};

/// Attribute definitions and the values stored against them.
pub mod attribute;
pub use attribute::{AttributeDefinition, AttributeKind, AttributeValue, DefaultValue, Value};

/// Spec object types, spec objects and the relations between them.
pub mod spec_object;
pub use spec_object::{SpecObject, SpecObjectType, SpecRelation};

/// Specifications and their flattened hierarchy.
pub mod specification;
pub use specification::{SpecHierarchyNode, Specification};

/// The root container handed over by the parser.
pub mod bundle;
pub use bundle::{BundleContent, DocumentBundle, NamespaceInfo, SchemaFinding};

mod config;
pub use config::Config;
