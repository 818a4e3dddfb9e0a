//! Logical configuration sources.

use std::fmt;

/// A logical source the deriver reads from.
///
/// How each source maps onto files is the adapter's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// The general configuration (`configuration.yaml`).
    Configuration,
    /// Dedicated automation list.
    Automations,
    /// Dedicated script mapping.
    Scripts,
    /// Dedicated scene list.
    Scenes,
    /// Dedicated group mapping.
    Groups,
    /// Persisted entity registry snapshot.
    EntityRegistry,
    /// Persisted zone snapshot.
    ZoneStorage,
    /// Persisted restore-state snapshot. Never authoritative.
    RestoreState,
}

impl SourceKind {
    pub const ALL: [Self; 8] = [
        Self::Configuration,
        Self::Automations,
        Self::Scripts,
        Self::Scenes,
        Self::Groups,
        Self::EntityRegistry,
        Self::ZoneStorage,
        Self::RestoreState,
    ];

    /// Whether this source is a persisted storage snapshot rather than YAML configuration.
    #[must_use]
    pub fn is_storage(self) -> bool {
        matches!(
            self,
            Self::EntityRegistry | Self::ZoneStorage | Self::RestoreState
        )
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => f.write_str("configuration"),
            Self::Automations => f.write_str("automations"),
            Self::Scripts => f.write_str("scripts"),
            Self::Scenes => f.write_str("scenes"),
            Self::Groups => f.write_str("groups"),
            Self::EntityRegistry => f.write_str("entity_registry"),
            Self::ZoneStorage => f.write_str("zone_storage"),
            Self::RestoreState => f.write_str("restore_state"),
        }
    }
}
