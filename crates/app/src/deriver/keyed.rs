//! Mapping-keyed constructs: scripts, groups, helpers and legacy template platforms.
//!
//! The mapping key *is* the object id. It is accepted only when it already
//! satisfies the slug grammar.

use refcheck_domain::entity_id::EntityId;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{blocks, from_key, one_or_many};

/// Helper domains declared as `domain: {object_id: {...}}` in the general configuration.
pub const HELPER_DOMAINS: &[&str] = &[
    "input_boolean",
    "input_button",
    "input_datetime",
    "input_number",
    "input_select",
    "input_text",
    "counter",
    "schedule",
    "timer",
];

/// Legacy `platform: template` platforms and the mapping key holding their entities.
pub const LEGACY_TEMPLATE_PLATFORMS: &[(&str, &str)] = &[
    ("sensor", "sensors"),
    ("binary_sensor", "sensors"),
    ("switch", "switches"),
    ("cover", "covers"),
    ("light", "lights"),
    ("fan", "fans"),
    ("vacuum", "vacuums"),
];

/// Object ids taken from the keys of a `{object_id: {...}}` mapping.
pub(crate) fn keyed_entities(domain: &str, tree: &Value) -> Vec<EntityId> {
    let Some(mapping) = tree.as_object() else {
        return Vec::new();
    };
    mapping
        .keys()
        .filter_map(|key| from_key(domain, key))
        .collect()
}

pub(crate) fn helper_entities(config: &Map<String, Value>) -> Vec<EntityId> {
    HELPER_DOMAINS
        .iter()
        .flat_map(|&domain| {
            blocks(config, domain).flat_map(move |block| keyed_entities(domain, block))
        })
        .collect()
}

/// One entry of a legacy platform list, e.g. `sensor: [{platform: template, sensors: {...}}]`.
#[derive(Debug, Deserialize)]
struct PlatformEntry {
    platform: Option<String>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

pub(crate) fn legacy_template_entities(config: &Map<String, Value>) -> Vec<EntityId> {
    let mut entities = Vec::new();
    for (domain, entities_key) in LEGACY_TEMPLATE_PLATFORMS {
        for block in blocks(config, domain) {
            for entry in one_or_many(block) {
                let Ok(entry) = PlatformEntry::deserialize(entry) else {
                    continue;
                };
                if entry.platform.as_deref() != Some("template") {
                    continue;
                }
                if let Some(defined) = entry.rest.get(*entities_key) {
                    entities.extend(keyed_entities(domain, defined));
                }
            }
        }
    }
    entities
}
