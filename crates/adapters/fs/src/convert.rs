//! YAML documents to the generic tree model used by the core.
//!
//! Tagged nodes (`!include`, `!secret`, `!env_var`, `!input`, ...) are not
//! resolved: they become null so they neither define nor reference anything.
//! Merge keys (`<<`) whose value cannot be merged are dropped before merging.

use serde_json::{Map, Number, Value};
use serde_yaml::Value as Yaml;

/// The YAML merge key.
const MERGE_KEY: &str = "<<";

/// Remove every merge key that does not point at a mapping or a list of mappings.
///
/// Unresolved tags (`<<: !include common.yaml`), nulls and scalars are
/// dropped, as are non-mapping items of a merge list.
pub fn drop_unmergeable(value: &mut Yaml) {
    match value {
        Yaml::Mapping(mapping) => {
            let mergeable = match mapping.get_mut(MERGE_KEY) {
                None | Some(Yaml::Mapping(_)) => true,
                Some(Yaml::Sequence(items)) => {
                    items.retain(Yaml::is_mapping);
                    !items.is_empty()
                }
                Some(_) => false,
            };
            if !mergeable {
                tracing::trace!("dropping merge key without a mapping to merge");
                mapping.remove(MERGE_KEY);
            }
            for (_, child) in mapping.iter_mut() {
                drop_unmergeable(child);
            }
        }
        Yaml::Sequence(items) => items.iter_mut().for_each(drop_unmergeable),
        Yaml::Tagged(tagged) => drop_unmergeable(&mut tagged.value),
        Yaml::Null | Yaml::Bool(_) | Yaml::Number(_) | Yaml::String(_) => {}
    }
}

/// Convert a parsed YAML value into a JSON-shaped tree.
///
/// Non-string keys are stringified and non-finite floats become null.
#[must_use]
pub fn yaml_to_tree(value: Yaml) -> Value {
    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(flag) => Value::Bool(flag),
        Yaml::Number(number) => number_to_tree(&number),
        Yaml::String(text) => Value::String(text),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_tree).collect()),
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(key, value)| (key_to_string(key), yaml_to_tree(value)))
                .collect::<Map<_, _>>(),
        ),
        Yaml::Tagged(tagged) => {
            tracing::trace!(tag = %tagged.tag, "leaving tagged node unresolved");
            Value::Null
        }
    }
}

fn number_to_tree(number: &serde_yaml::Number) -> Value {
    if let Some(int) = number.as_i64() {
        return Value::from(int);
    }
    if let Some(uint) = number.as_u64() {
        return Value::from(uint);
    }
    number
        .as_f64()
        .and_then(Number::from_f64)
        .map_or(Value::Null, Value::Number)
}

fn key_to_string(key: Yaml) -> String {
    match key {
        Yaml::String(text) => text,
        Yaml::Bool(flag) => flag.to_string(),
        Yaml::Number(number) => number.to_string(),
        Yaml::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn convert(text: &str) -> Value {
        yaml_to_tree(serde_yaml::from_str(text).unwrap())
    }

    #[test]
    fn should_convert_nested_structures() {
        let tree = convert(
            "
automation:
  - alias: Turn On Lights
    trigger:
      platform: state
      entity_id: light.kitchen
    enabled: true
    delay: 5
",
        );
        assert_eq!(
            tree,
            json!({
                "automation": [{
                    "alias": "Turn On Lights",
                    "trigger": {"platform": "state", "entity_id": "light.kitchen"},
                    "enabled": true,
                    "delay": 5,
                }],
            })
        );
    }

    #[test]
    fn should_null_out_include_and_secret_tags() {
        let tree = convert(
            "
automation: !include automations.yaml
api_password: !secret http_password
name: Home
",
        );
        assert_eq!(
            tree,
            json!({"automation": null, "api_password": null, "name": "Home"})
        );
    }

    #[test]
    fn should_stringify_non_string_keys() {
        let tree = convert("1: one\ntrue: yes\n");
        assert_eq!(tree, json!({"1": "one", "true": "yes"}));
    }

    #[test]
    fn should_keep_on_and_off_as_string_keys() {
        let tree = convert("on: light.a\noff: light.b\n");
        assert_eq!(tree, json!({"on": "light.a", "off": "light.b"}));
    }

    #[test]
    fn should_turn_non_finite_floats_into_null() {
        let tree = convert("a: .nan\nb: 1.5\n");
        assert_eq!(tree, json!({"a": null, "b": 1.5}));
    }

    #[test]
    fn should_drop_merge_key_pointing_at_tag() {
        let mut document: Yaml = serde_yaml::from_str(
            "
homeassistant:
  <<: !include common.yaml
  name: Home
",
        )
        .unwrap();
        drop_unmergeable(&mut document);
        document.apply_merge().unwrap();
        assert_eq!(
            yaml_to_tree(document),
            json!({"homeassistant": {"name": "Home"}})
        );
    }

    #[test]
    fn should_keep_mapping_items_of_merge_list() {
        let mut document: Yaml = serde_yaml::from_str(
            "
base: &base
  icon: mdi:lamp
light:
  <<: [*base, !secret extra, 3]
  entity_id: light.desk
",
        )
        .unwrap();
        drop_unmergeable(&mut document);
        document.apply_merge().unwrap();
        let tree = yaml_to_tree(document);
        assert_eq!(tree["light"], json!({"icon": "mdi:lamp", "entity_id": "light.desk"}));
    }

    #[test]
    fn should_drop_null_and_scalar_merge_values() {
        let mut document: Yaml = serde_yaml::from_str(
            "
a:
  <<:
  x: 1
b:
  <<: text
",
        )
        .unwrap();
        drop_unmergeable(&mut document);
        document.apply_merge().unwrap();
        assert_eq!(yaml_to_tree(document), json!({"a": {"x": 1}, "b": {}}));
    }

    #[test]
    fn should_convert_empty_document_to_null() {
        assert_eq!(convert(""), Value::Null);
    }
}
