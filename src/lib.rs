//! Semantic analysis of ReqIF documents
//!
//! A pre-parsed [`DocumentBundle`] is checked for defects that a plain XML
//! schema parse does not catch, and each of its specifications can be
//! rebuilt into a nested [`DocumentTree`] for export.

pub mod domain;
pub use domain::{Config, DocumentBundle, Identifier};

/// Identifier lookup tables built once per bundle.
pub mod index;
pub use index::ReferenceIndex;

/// Convenience views derived from a bundle's type declarations.
pub mod schema;
pub use schema::{HeadingClassifier, HeadingRule, Schema, SchemaError};

/// Semantic checks over a parsed bundle.
pub mod validate;
pub use validate::{SemanticFinding, ValidationReport, validate};

/// Nested document trees rebuilt from level-annotated hierarchies.
pub mod hierarchy;
pub use hierarchy::{DocumentTree, Export, ReconstructError, Reconstructor};
