//! Known-entity set: the authoritative identifiers references are checked against.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::builtin::BUILTIN_ENTITIES;
use crate::entity_id::EntityId;

/// Where a known identifier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Part of the builtin catalog.
    Builtin,
    /// Persisted entity registry.
    Registry,
    /// Persisted zone storage.
    StorageZone,
    /// Derived from a configuration construct.
    Config,
}

/// Immutable set of identifiers that references may resolve to.
///
/// Built once per validation run through [`KnownEntitySetBuilder`].
#[derive(Debug, Clone, Default)]
pub struct KnownEntitySet {
    entities: BTreeSet<EntityId>,
    builtin: usize,
    registry: usize,
    storage_zone: usize,
    config: usize,
}

impl KnownEntitySet {
    /// Create a builder seeded with the builtin catalog.
    #[must_use]
    pub fn builder() -> KnownEntitySetBuilder {
        KnownEntitySetBuilder::default()
    }

    #[must_use]
    pub fn contains(&self, entity_id: &str) -> bool {
        self.entities.contains(entity_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All identifiers, sorted.
    #[must_use]
    pub fn entities(&self) -> &BTreeSet<EntityId> {
        &self.entities
    }

    /// Number of insertions contributed by `origin`, duplicates included.
    #[must_use]
    pub fn count_from(&self, origin: Origin) -> usize {
        match origin {
            Origin::Builtin => self.builtin,
            Origin::Registry => self.registry,
            Origin::StorageZone => self.storage_zone,
            Origin::Config => self.config,
        }
    }
}

/// Accumulates identifiers before freezing them into a [`KnownEntitySet`].
#[derive(Debug)]
pub struct KnownEntitySetBuilder {
    inner: KnownEntitySet,
}

impl Default for KnownEntitySetBuilder {
    fn default() -> Self {
        let mut builder = Self {
            inner: KnownEntitySet::default(),
        };
        for raw in BUILTIN_ENTITIES {
            if let Ok(id) = EntityId::trusted(*raw) {
                builder.insert(id, Origin::Builtin);
            }
        }
        builder
    }
}

impl KnownEntitySetBuilder {
    /// Record an identifier coming from `origin`.
    pub fn insert(&mut self, entity_id: EntityId, origin: Origin) {
        match origin {
            Origin::Builtin => self.inner.builtin += 1,
            Origin::Registry => self.inner.registry += 1,
            Origin::StorageZone => self.inner.storage_zone += 1,
            Origin::Config => self.inner.config += 1,
        }
        self.inner.entities.insert(entity_id);
    }

    #[must_use]
    pub fn with(mut self, entities: impl IntoIterator<Item = EntityId>, origin: Origin) -> Self {
        for entity_id in entities {
            self.insert(entity_id, origin);
        }
        self
    }

    /// Freeze the set.
    #[must_use]
    pub fn build(self) -> KnownEntitySet {
        self.inner
    }
}
