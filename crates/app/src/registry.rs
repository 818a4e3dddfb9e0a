//! Entity registry loader: identifiers persisted in storage snapshots.
//!
//! Snapshots share the `{"version": .., "data": ..}` envelope. Rows are
//! decoded one by one so a malformed row only drops itself.

use std::collections::BTreeSet;

use refcheck_domain::entity_id::EntityId;
use serde::Deserialize;
use serde_json::Value;

use crate::deriver::from_label;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct RegistryData {
    #[serde(default)]
    entities: Vec<Value>,
}

/// A registry row. The row's own `id` is internal and deliberately absent.
#[derive(Debug, Deserialize)]
struct RegistryRow {
    entity_id: String,
}

#[derive(Debug, Deserialize)]
struct ZoneData {
    #[serde(default)]
    items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ZoneItem {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RestoreEntry {
    state: RestoreState,
}

#[derive(Debug, Deserialize)]
struct RestoreState {
    entity_id: String,
}

fn envelope<'de, T: Deserialize<'de>>(tree: &'de Value, snapshot: &'static str) -> Option<T> {
    match Envelope::<T>::deserialize(tree) {
        Ok(envelope) => Some(envelope.data),
        Err(err) => {
            tracing::warn!(%err, snapshot, "unexpected snapshot layout, ignoring");
            None
        }
    }
}

/// Identifiers listed in the entity registry, taken verbatim.
#[must_use]
pub fn registry_entities(tree: &Value) -> Vec<EntityId> {
    let Some(data) = envelope::<RegistryData>(tree, "entity_registry") else {
        return Vec::new();
    };
    data.entities
        .iter()
        .filter_map(|row| RegistryRow::deserialize(row).ok())
        .filter_map(|row| EntityId::trusted(row.entity_id).ok())
        .collect()
}

/// Zones created through storage, named by slugifying their display name.
#[must_use]
pub fn storage_zone_entities(tree: &Value) -> Vec<EntityId> {
    let Some(data) = envelope::<ZoneData>(tree, "zone") else {
        return Vec::new();
    };
    data.items
        .iter()
        .filter_map(|item| ZoneItem::deserialize(item).ok())
        .filter_map(|item| from_label("zone", &item.name))
        .collect()
}

/// Identifiers mentioned by the restore-state snapshot.
///
/// Only used to annotate unresolved references; never a definition.
#[must_use]
pub fn restore_state_entities(tree: &Value) -> BTreeSet<String> {
    let Some(entries) = envelope::<Vec<Value>>(tree, "restore_state") else {
        return BTreeSet::new();
    };
    entries
        .iter()
        .filter_map(|entry| RestoreEntry::deserialize(entry).ok())
        .map(|entry| entry.state.entity_id)
        .collect()
}
