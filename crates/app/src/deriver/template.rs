//! Modern `template:` integration entities.

use refcheck_domain::entity_id::{EntityId, split_domain};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{blocks, from_key, from_label, one_or_many};

/// Domains a `template:` block can define entities for.
///
/// Other keys in a block (`trigger`, `action`, `condition`, `variables`, ...)
/// configure the block itself and never define entities.
pub const TEMPLATE_DOMAINS: &[&str] = &[
    "alarm_control_panel",
    "binary_sensor",
    "button",
    "cover",
    "event",
    "fan",
    "image",
    "light",
    "lock",
    "number",
    "select",
    "sensor",
    "switch",
    "update",
    "vacuum",
    "weather",
];

/// The naming-relevant view of a template entity.
///
/// `unique_id` is not declared here on purpose: it never names the entity.
#[derive(Debug, Deserialize)]
struct TemplateEntity {
    default_entity_id: Option<String>,
    object_id: Option<String>,
    name: Option<String>,
}

impl TemplateEntity {
    fn derive(&self, domain: &str) -> Option<EntityId> {
        if let Some(requested) = self.default_entity_id.as_deref() {
            let object_id = match split_domain(requested) {
                Some((requested_domain, object_id)) if requested_domain == domain => object_id,
                Some(_) => {
                    tracing::debug!(domain, requested, "default_entity_id targets another domain");
                    return None;
                }
                None => requested,
            };
            return from_key(domain, object_id);
        }
        if let Some(object_id) = self.object_id.as_deref() {
            return from_key(domain, object_id);
        }
        self.name.as_deref().and_then(|name| from_label(domain, name))
    }
}

pub(crate) fn template_entities(config: &Map<String, Value>) -> Vec<EntityId> {
    let mut entities = Vec::new();
    for section in blocks(config, "template") {
        for block in one_or_many(section) {
            let Some(block) = block.as_object() else {
                continue;
            };
            for domain in TEMPLATE_DOMAINS {
                let Some(defined) = block.get(*domain) else {
                    continue;
                };
                for item in one_or_many(defined) {
                    if let Ok(entity) = TemplateEntity::deserialize(item) {
                        entities.extend(entity.derive(domain));
                    }
                }
            }
        }
    }
    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn derive(config: &Value) -> Vec<String> {
        template_entities(config.as_object().unwrap())
            .into_iter()
            .map(|id| id.to_string())
            .collect()
    }

    #[test]
    fn should_slugify_name_and_ignore_unique_id() {
        let config = json!({
            "template": [{
                "sensor": [{
                    "name": "My Sensor",
                    "unique_id": "my_unique_sensor_id",
                    "state": "{{ 42 }}",
                }],
            }],
        });
        assert_eq!(derive(&config), vec!["sensor.my_sensor"]);
    }

    #[test]
    fn should_prefer_default_entity_id_over_name_and_unique_id() {
        let config = json!({
            "template": [{
                "sensor": [{
                    "name": "My Sensor",
                    "default_entity_id": "custom_sensor_name",
                    "unique_id": "my_unique_id",
                }],
            }],
        });
        assert_eq!(derive(&config), vec!["sensor.custom_sensor_name"]);
    }

    #[test]
    fn should_accept_fully_qualified_default_entity_id_of_same_domain() {
        let config = json!({
            "template": {"binary_sensor": {"name": "x", "default_entity_id": "binary_sensor.door_open"}},
        });
        assert_eq!(derive(&config), vec!["binary_sensor.door_open"]);
    }

    #[test]
    fn should_reject_default_entity_id_of_other_domain() {
        let config = json!({
            "template": [{"sensor": [{"name": "x", "default_entity_id": "light.kitchen"}]}],
        });
        assert!(derive(&config).is_empty());
    }

    #[test]
    fn should_not_coerce_invalid_override() {
        let config = json!({
            "template": [{"sensor": [{"name": "Fine Name", "default_entity_id": "Not Valid"}]}],
        });
        assert!(derive(&config).is_empty());
    }

    #[test]
    fn should_fall_back_to_legacy_object_id() {
        let config = json!({
            "template": [{"switch": [{"name": "Porch", "object_id": "porch_light"}]}],
        });
        assert_eq!(derive(&config), vec!["switch.porch_light"]);
    }

    #[test]
    fn should_skip_trigger_and_action_keys() {
        let config = json!({
            "template": [{
                "trigger": [{"platform": "time_pattern", "name": "Trigger Name"}],
                "action": [{"name": "Not An Entity"}],
                "sensor": {"name": "Living Room Temperature", "state": "{{ 72 }}"},
            }],
        });
        assert_eq!(derive(&config), vec!["sensor.living_room_temperature"]);
    }

    #[test]
    fn should_derive_nothing_without_name_or_override() {
        let config = json!({
            "template": [{"sensor": [{"unique_id": "abc", "state": "{{ 1 }}"}]}],
        });
        assert!(derive(&config).is_empty());
    }
}
