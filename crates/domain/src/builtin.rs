//! Builtin entity catalog.
//!
//! Entities that exist in every installation, even with an empty
//! configuration, plus the (empty) set of domains exempt from checking.

use crate::entity_id::split_domain;

/// Entities that are always valid reference targets.
pub const BUILTIN_ENTITIES: &[&str] = &["zone.home", "sun.sun"];

/// Domains whose references are accepted without lookup.
///
/// Deliberately empty. Every reference, including `zone.*`, `weather.*` and
/// `persistent_notification.*`, must resolve through the known-entity set.
/// Adding a domain here turns off reference checking for that whole domain;
/// revisit the validation policy before doing so.
pub const BUILTIN_DOMAINS: &[&str] = &[];

/// Whether the domain of `entity_id` is exempt from reference checking.
///
/// Always `false` while [`BUILTIN_DOMAINS`] is empty.
#[must_use]
pub fn is_builtin_domain(entity_id: &str) -> bool {
    let domain = split_domain(entity_id).map_or(entity_id, |(domain, _)| domain);
    BUILTIN_DOMAINS.contains(&domain)
}
