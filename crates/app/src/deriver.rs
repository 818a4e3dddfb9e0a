//! Config-defined entity deriver.
//!
//! Each configuration construct implies at most one entity identifier. The
//! per-construct rules live in the submodules; this module owns the two
//! shared ways of turning raw text into an object id and the orchestration
//! across every [`SourceKind`].
//!
//! No rule ever reads a construct's own `id` / `unique_id` field. The typed
//! views each rule deserializes simply do not declare those fields, so the
//! value never reaches the derivation code.

mod keyed;
mod labeled;
mod template;

use refcheck_domain::entity_id::EntityId;
use refcheck_domain::error::RefCheckError;
use refcheck_domain::known::{KnownEntitySet, Origin};
use refcheck_domain::slug::slugify;
use refcheck_domain::source::SourceKind;
use serde_json::{Map, Value};

use crate::ports::ConfigSource;
use crate::registry;

pub use keyed::{HELPER_DOMAINS, LEGACY_TEMPLATE_PLATFORMS};
pub use template::TEMPLATE_DOMAINS;

/// Accept `key` as an object id only if it already satisfies the slug grammar.
///
/// Keys are never coerced: `"Kitchen Lights"` defines nothing.
pub(crate) fn from_key(domain: &str, key: &str) -> Option<EntityId> {
    match EntityId::derive(domain, key) {
        Ok(id) => Some(id),
        Err(err) => {
            tracing::debug!(%err, domain, key, "dropping construct with invalid object id");
            None
        }
    }
}

/// Slugify a display label into an object id.
pub(crate) fn from_label(domain: &str, label: &str) -> Option<EntityId> {
    match EntityId::derive(domain, &slugify(label)) {
        Ok(id) => Some(id),
        Err(err) => {
            tracing::debug!(%err, domain, label, "dropping construct with underivable name");
            None
        }
    }
}

/// Iterate the values of `domain` blocks in the general configuration.
///
/// Matches both `domain:` and the labelled `domain <label>:` form.
pub(crate) fn blocks<'a>(
    config: &'a Map<String, Value>,
    domain: &'a str,
) -> impl Iterator<Item = &'a Value> + 'a {
    config.iter().filter_map(move |(key, value)| {
        let matches = key == domain
            || key
                .strip_prefix(domain)
                .is_some_and(|rest| rest.starts_with(' '));
        matches.then_some(value)
    })
}

/// Iterate a value that may be a single mapping or a sequence of them.
pub(crate) fn one_or_many(value: &Value) -> impl Iterator<Item = &Value> {
    let items: &[Value] = match value {
        Value::Array(items) => items,
        other => std::slice::from_ref(other),
    };
    items.iter().filter(|item| item.is_object())
}

/// Identifiers defined by the general configuration source.
#[must_use]
pub fn configuration_entities(config: &Value) -> Vec<EntityId> {
    let Some(config) = config.as_object() else {
        tracing::warn!("general configuration is not a mapping, nothing derived");
        return Vec::new();
    };

    let mut entities = Vec::new();
    entities.extend(template::template_entities(config));
    entities.extend(keyed::legacy_template_entities(config));
    entities.extend(keyed::helper_entities(config));
    for block in blocks(config, "group") {
        entities.extend(keyed::keyed_entities("group", block));
    }
    for block in blocks(config, "script") {
        entities.extend(keyed::keyed_entities("script", block));
    }
    for block in blocks(config, "automation") {
        entities.extend(labeled::automation_entities(block));
    }
    for block in blocks(config, "scene") {
        entities.extend(labeled::scene_entities(block));
    }
    for block in blocks(config, "zone") {
        entities.extend(labeled::zone_entities(block));
    }
    entities
}

/// Identifiers defined by one logical source.
#[must_use]
pub fn source_entities(kind: SourceKind, tree: &Value) -> Vec<EntityId> {
    match kind {
        SourceKind::Configuration => configuration_entities(tree),
        SourceKind::Automations => labeled::automation_entities(tree),
        SourceKind::Scenes => labeled::scene_entities(tree),
        SourceKind::Scripts => keyed::keyed_entities("script", tree),
        SourceKind::Groups => keyed::keyed_entities("group", tree),
        SourceKind::EntityRegistry => registry::registry_entities(tree),
        SourceKind::ZoneStorage => registry::storage_zone_entities(tree),
        SourceKind::RestoreState => Vec::new(),
    }
}

fn origin_of(kind: SourceKind) -> Origin {
    match kind {
        SourceKind::EntityRegistry => Origin::Registry,
        SourceKind::ZoneStorage => Origin::StorageZone,
        _ => Origin::Config,
    }
}

/// Build the known-entity set for a configuration root.
///
/// Builtins, registry rows, stored zones and every config-derived
/// identifier. Restore state is never consulted.
///
/// # Errors
///
/// Returns [`RefCheckError::Source`] when a source exists but cannot be loaded.
pub fn derive_known_entities(
    source: &impl ConfigSource,
) -> Result<KnownEntitySet, RefCheckError> {
    let mut builder = KnownEntitySet::builder();
    for kind in SourceKind::ALL {
        if kind == SourceKind::RestoreState {
            continue;
        }
        let Some(tree) = source.load_source(kind)? else {
            tracing::trace!(source = %kind, "source not present");
            continue;
        };
        let derived = source_entities(kind, &tree);
        tracing::debug!(source = %kind, count = derived.len(), "derived entities");
        builder = builder.with(derived, origin_of(kind));
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::InMemorySource;
    use serde_json::json;

    fn ids(entities: &[EntityId]) -> Vec<&str> {
        entities.iter().map(EntityId::as_str).collect()
    }

    #[test]
    fn should_accept_valid_key_verbatim() {
        assert_eq!(
            from_key("script", "good_script").map(|id| id.to_string()),
            Some("script.good_script".to_string())
        );
    }

    #[test]
    fn should_drop_invalid_key_instead_of_coercing() {
        assert!(from_key("script", "Bad Script").is_none());
        assert!(from_key("group", "UPPERCASE_GROUP").is_none());
    }

    #[test]
    fn should_drop_label_that_slugifies_to_nothing() {
        assert!(from_label("zone", "!!!").is_none());
    }

    #[test]
    fn should_match_labelled_blocks() {
        let config = json!({
            "automation": [],
            "automation manual": [],
            "automations": [],
            "automation_x": [],
        });
        let matched = blocks(config.as_object().unwrap(), "automation").count();
        assert_eq!(matched, 2);
    }

    #[test]
    fn should_treat_single_mapping_as_one_item() {
        let single = json!({"name": "Work"});
        let many = json!([{"name": "A"}, "not a mapping", {"name": "B"}]);
        assert_eq!(one_or_many(&single).count(), 1);
        assert_eq!(one_or_many(&many).count(), 2);
    }

    #[test]
    fn should_derive_inline_constructs_from_configuration() {
        let config = json!({
            "automation": [{"id": "1", "alias": "Wake Up"}],
            "automation old": [{"alias": "Legacy Rule"}],
            "scene": [{"id": "99", "name": "Movie Time!"}],
            "script": {"good_script": {"sequence": []}, "Bad Script": {}},
            "zone": [{"name": "Work", "latitude": 40.0}],
            "group": {"kitchen_lights": {"name": "Kitchen Lights"}},
        });
        let entities = configuration_entities(&config);
        let ids = ids(&entities);
        assert!(ids.contains(&"automation.wake_up"));
        assert!(ids.contains(&"automation.legacy_rule"));
        assert!(ids.contains(&"scene.movie_time"));
        assert!(ids.contains(&"script.good_script"));
        assert!(ids.contains(&"zone.work"));
        assert!(ids.contains(&"group.kitchen_lights"));
        assert!(!ids.contains(&"automation.1"));
        assert!(!ids.contains(&"scene.99"));
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn should_ignore_unresolved_include_blocks() {
        let config = json!({"automation": null, "script": "scripts.yaml"});
        assert!(configuration_entities(&config).is_empty());
    }

    #[test]
    fn should_derive_nothing_from_non_mapping_configuration() {
        assert!(configuration_entities(&json!(["a", "b"])).is_empty());
    }

    #[test]
    fn should_build_known_set_from_all_sources_except_restore_state() {
        let source = InMemorySource::default()
            .with_source(
                SourceKind::EntityRegistry,
                json!({"data": {"entities": [{"entity_id": "light.living_room", "id": "abc123"}]}}),
            )
            .with_source(
                SourceKind::ZoneStorage,
                json!({"data": {"items": [{"name": "Office"}]}}),
            )
            .with_source(
                SourceKind::Groups,
                json!({"valid_group": {}, "Invalid Group": {}}),
            )
            .with_source(
                SourceKind::RestoreState,
                json!({"data": [{"state": {"entity_id": "sensor.restored_entity"}}]}),
            );

        let known = derive_known_entities(&source).unwrap();

        assert!(known.contains("zone.home"));
        assert!(known.contains("sun.sun"));
        assert!(known.contains("light.living_room"));
        assert!(known.contains("zone.office"));
        assert!(known.contains("group.valid_group"));
        assert!(!known.contains("group.Invalid Group"));
        assert!(!known.contains("sensor.restored_entity"));
        assert!(!known.contains("light.abc123"));
        assert_eq!(known.count_from(Origin::Registry), 1);
        assert_eq!(known.count_from(Origin::StorageZone), 1);
        assert_eq!(known.count_from(Origin::Config), 1);
    }

    #[test]
    fn should_propagate_source_failures() {
        let source = InMemorySource::default().failing(SourceKind::Scripts);
        assert!(derive_known_entities(&source).is_err());
    }
}
