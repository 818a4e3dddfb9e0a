//! Constructs named by a human-readable label: automations, scenes, zones.

use refcheck_domain::entity_id::EntityId;
use serde::Deserialize;
use serde_json::Value;

use super::{from_label, one_or_many};

/// An automation is named by its alias; its `id` never names it.
#[derive(Debug, Deserialize)]
struct Automation {
    alias: Option<String>,
}

/// Scenes and zones are named by `name`; a scene `id` never names it.
#[derive(Debug, Deserialize)]
struct Named {
    name: Option<String>,
}

fn labeled<'de, T: Deserialize<'de>>(
    domain: &'static str,
    tree: &'de Value,
    label: impl Fn(T) -> Option<String>,
) -> Vec<EntityId> {
    one_or_many(tree)
        .filter_map(|item| T::deserialize(item).ok())
        .filter_map(label)
        .filter_map(|text| from_label(domain, &text))
        .collect()
}

pub(crate) fn automation_entities(tree: &Value) -> Vec<EntityId> {
    labeled("automation", tree, |automation: Automation| automation.alias)
}

pub(crate) fn scene_entities(tree: &Value) -> Vec<EntityId> {
    labeled("scene", tree, |scene: Named| scene.name)
}

pub(crate) fn zone_entities(tree: &Value) -> Vec<EntityId> {
    labeled("zone", tree, |zone: Named| zone.name)
}
