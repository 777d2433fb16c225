use std::{
    borrow::Borrow,
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
    str::FromStr,
};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

/// The `IDENTIFIER` of a ReqIF element.
///
/// Identifiers are the keys used for every cross reference in a document
/// (spec object to type, attribute value to definition, relation to
/// endpoints, ...). The format only requires them to be non-empty.
///
/// `Identifier` borrows as `str`, so maps keyed by identifiers can be queried
/// with plain string slices.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(NonEmptyString);

impl Identifier {
    /// Creates a new `Identifier` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidIdentifier`] if the string is empty.
    pub fn new(s: String) -> Result<Self, InvalidIdentifier> {
        NonEmptyString::new(s)
            .map(Self)
            .map_err(|_| InvalidIdentifier)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // must agree with `str` for the `Borrow<str>` impl
        self.as_str().hash(state);
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for Identifier {
    type Error = InvalidIdentifier;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Identifier {
    type Error = InvalidIdentifier;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl From<Identifier> for String {
    fn from(identifier: Identifier) -> Self {
        identifier.as_str().to_owned()
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Identifier {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Identifier {
    type Err = InvalidIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

/// Error returned when an identifier is empty.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid identifier: must be non-empty")]
pub struct InvalidIdentifier;

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn empty_identifier_is_rejected() {
        assert_eq!(Identifier::try_from(""), Err(InvalidIdentifier));
    }

    #[test]
    fn identifier_displays_verbatim() {
        let id: Identifier = "_a1b2-c3".parse().unwrap();
        assert_eq!(id.to_string(), "_a1b2-c3");
    }

    #[test]
    fn map_can_be_queried_with_str() {
        let mut map = HashMap::new();
        map.insert(Identifier::try_from("SO-1").unwrap(), 7);
        assert_eq!(map.get("SO-1"), Some(&7));
        assert_eq!(map.get("SO-2"), None);
    }

    #[test]
    fn deserializing_empty_string_fails() {
        assert!(serde_json::from_str::<Identifier>("\"\"").is_err());
        let id: Identifier = serde_json::from_str("\"X\"").unwrap();
        assert_eq!(id.as_str(), "X");
    }
}
