//! Entity identifiers: `domain.object_id` strings and their grammars.
//!
//! Two grammars coexist:
//!
//! - the **slug grammar** (`[a-z0-9_]+`) every object id *derived* from
//!   configuration must satisfy, and
//! - the **reference shape** (`[a-z][a-z0-9_]*\.[A-Za-z0-9_]+`) used by the
//!   scanner to spot identifier-looking scalars.
//!
//! Identifiers read from the entity registry are trusted verbatim and are not
//! re-checked against either grammar.

use std::borrow::Borrow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::EntityIdError;

static DOMAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("domain grammar is valid"));

static OBJECT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_]+$").expect("object id grammar is valid"));

static REFERENCE_SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z0-9_]*\.[A-Za-z0-9_]+$").expect("reference shape grammar is valid")
});

/// Whether `domain` is a non-empty lowercase domain token.
#[must_use]
pub fn is_valid_domain(domain: &str) -> bool {
    DOMAIN_RE.is_match(domain)
}

/// Whether `object_id` satisfies the slug grammar (lowercase letters, digits, underscore).
///
/// An empty string is never a valid object id.
#[must_use]
pub fn is_valid_object_id(object_id: &str) -> bool {
    OBJECT_ID_RE.is_match(object_id)
}

/// Whether the whole of `text` looks like an entity identifier.
///
/// The match is anchored on both ends, so identifiers embedded inside a
/// larger expression (e.g. a template) do not qualify.
#[must_use]
pub fn looks_like_entity_id(text: &str) -> bool {
    REFERENCE_SHAPE_RE.is_match(text)
}

/// Split an identifier-ish string on its first dot.
#[must_use]
pub fn split_domain(text: &str) -> Option<(&str, &str)> {
    text.split_once('.')
}

/// A `domain.object_id` entity identifier.
///
/// Ordering, equality and hashing are those of the full string, which makes
/// `EntityId` usable in sets looked up by `&str`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Build an identifier from a domain and an object id, enforcing both grammars.
    ///
    /// # Errors
    ///
    /// Returns [`EntityIdError::InvalidDomain`] when `domain` is not a lowercase
    /// token, [`EntityIdError::EmptyObjectId`] when `object_id` is empty, and
    /// [`EntityIdError::InvalidObjectId`] when it fails the slug grammar.
    pub fn derive(domain: &str, object_id: &str) -> Result<Self, EntityIdError> {
        if !is_valid_domain(domain) {
            return Err(EntityIdError::InvalidDomain(domain.to_string()));
        }
        if object_id.is_empty() {
            return Err(EntityIdError::EmptyObjectId {
                domain: domain.to_string(),
            });
        }
        if !is_valid_object_id(object_id) {
            return Err(EntityIdError::InvalidObjectId {
                domain: domain.to_string(),
                object_id: object_id.to_string(),
            });
        }
        Ok(Self(format!("{domain}.{object_id}")))
    }

    /// Wrap an identifier taken from an authoritative store without
    /// re-validating its object id.
    ///
    /// # Errors
    ///
    /// Returns [`EntityIdError::MissingDot`] when `raw` has no domain separator.
    pub fn trusted(raw: impl Into<String>) -> Result<Self, EntityIdError> {
        let raw = raw.into();
        match split_domain(&raw) {
            Some((domain, _)) if !domain.is_empty() => Ok(Self(raw)),
            _ => Err(EntityIdError::MissingDot(raw)),
        }
    }

    /// The domain prefix (`sensor` in `sensor.kitchen`).
    #[must_use]
    pub fn domain(&self) -> &str {
        split_domain(&self.0).map_or(self.0.as_str(), |(domain, _)| domain)
    }

    /// The object id suffix (`kitchen` in `sensor.kitchen`).
    #[must_use]
    pub fn object_id(&self) -> &str {
        split_domain(&self.0).map_or("", |(_, object_id)| object_id)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
