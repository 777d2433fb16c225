//! Identifier lookup tables for a parsed document.
//!
//! The [`ReferenceIndex`] is derived from a [`BundleContent`] and is never a
//! second source of truth: it stores positions into the bundle's
//! collections, and is rebuilt whenever a new bundle is built.

use std::{collections::HashMap, fmt};

use tracing::{instrument, warn};

use crate::domain::{BundleContent, Identifier};

/// Lookup tables from identifier to position for spec objects, spec object
/// types and data type definitions.
///
/// Construction is linear in the number of entities and every query is a
/// single hash lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceIndex {
    spec_objects: HashMap<Identifier, usize>,
    spec_object_types: HashMap<Identifier, usize>,
    data_types: HashMap<Identifier, usize>,
    duplicates: Vec<DuplicateIdentifier>,
}

/// The collection an indexed identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// `SPEC-OBJECTS`
    SpecObjects,
    /// `SPEC-OBJECT-TYPE` elements of `SPEC-TYPES`
    SpecObjectTypes,
    /// `DATATYPES`
    DataTypes,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::SpecObjects => "spec object",
            Self::SpecObjectTypes => "spec object type",
            Self::DataTypes => "data type definition",
        })
    }
}

/// An identifier declared more than once within one collection.
///
/// The first declaration is the one the index resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateIdentifier {
    /// Where the identifier was declared.
    pub collection: Collection,
    /// The repeated identifier.
    pub identifier: Identifier,
    /// Position of the declaration the index keeps.
    pub first: usize,
    /// Position of the ignored declaration.
    pub duplicate: usize,
}

impl fmt::Display for DuplicateIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "duplicate {} identifier '{}' (entry {} ignored, entry {} kept)",
            self.collection, self.identifier, self.duplicate, self.first
        )
    }
}

impl ReferenceIndex {
    /// Builds the index for a bundle's collections.
    ///
    /// Duplicate identifiers keep their first occurrence; later ones are
    /// recorded in [`Self::duplicates`].
    #[must_use]
    #[instrument(level = "debug", skip_all)]
    pub fn build(content: &BundleContent) -> Self {
        let mut duplicates = Vec::new();

        let spec_objects = index_collection(
            content.spec_objects.iter().map(|o| &o.identifier),
            Collection::SpecObjects,
            &mut duplicates,
        );
        let spec_object_types = index_collection(
            content.spec_object_types.iter().map(|t| t.identifier()),
            Collection::SpecObjectTypes,
            &mut duplicates,
        );
        let data_types = index_collection(
            content.data_types.iter().map(|d| &d.identifier),
            Collection::DataTypes,
            &mut duplicates,
        );

        for duplicate in &duplicates {
            warn!("{duplicate}");
        }

        Self {
            spec_objects,
            spec_object_types,
            data_types,
            duplicates,
        }
    }

    /// Whether a spec object with this identifier exists.
    #[must_use]
    pub fn spec_object_exists(&self, identifier: &str) -> bool {
        self.spec_objects.contains_key(identifier)
    }

    /// Whether a spec object type with this identifier exists.
    #[must_use]
    pub fn spec_object_type_exists(&self, identifier: &str) -> bool {
        self.spec_object_types.contains_key(identifier)
    }

    /// Whether a data type definition with this identifier exists.
    #[must_use]
    pub fn data_type_exists(&self, identifier: &str) -> bool {
        self.data_types.contains_key(identifier)
    }

    /// Position of a spec object in [`BundleContent::spec_objects`].
    #[must_use]
    pub fn spec_object_position(&self, identifier: &str) -> Option<usize> {
        self.spec_objects.get(identifier).copied()
    }

    /// Position of a spec object type in [`BundleContent::spec_object_types`].
    #[must_use]
    pub fn spec_object_type_position(&self, identifier: &str) -> Option<usize> {
        self.spec_object_types.get(identifier).copied()
    }

    /// Position of a data type in [`BundleContent::data_types`].
    #[must_use]
    pub fn data_type_position(&self, identifier: &str) -> Option<usize> {
        self.data_types.get(identifier).copied()
    }

    /// Identifiers that were declared more than once, in discovery order.
    #[must_use]
    pub fn duplicates(&self) -> &[DuplicateIdentifier] {
        &self.duplicates
    }
}

fn index_collection<'a>(
    identifiers: impl Iterator<Item = &'a Identifier>,
    collection: Collection,
    duplicates: &mut Vec<DuplicateIdentifier>,
) -> HashMap<Identifier, usize> {
    let mut map: HashMap<Identifier, usize> = HashMap::new();
    for (position, identifier) in identifiers.enumerate() {
        if let Some(&first) = map.get(identifier) {
            duplicates.push(DuplicateIdentifier {
                collection,
                identifier: identifier.clone(),
                first,
                duplicate: position,
            });
        } else {
            map.insert(identifier.clone(), position);
        }
    }
    map
}
