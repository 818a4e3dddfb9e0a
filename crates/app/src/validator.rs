//! Reference validator: resolves every reference in a file against the known-entity set.
//!
//! Construction loads every source once and freezes the [`KnownEntitySet`];
//! the validator is then ready and [`validate_file_references`] may be called
//! any number of times. Diagnostics accumulate for the lifetime of the
//! instance and are never cleared or deduplicated.
//!
//! [`validate_file_references`]: ReferenceValidator::validate_file_references

use std::collections::BTreeSet;
use std::path::Path;

use refcheck_domain::builtin;
use refcheck_domain::diagnostic::Diagnostic;
use refcheck_domain::entity_id::EntityId;
use refcheck_domain::error::RefCheckError;
use refcheck_domain::known::{KnownEntitySet, Origin};
use refcheck_domain::source::SourceKind;
use serde_json::Value;

use crate::deriver::derive_known_entities;
use crate::ports::ConfigSource;
use crate::registry::restore_state_entities;
use crate::scanner::{ScanPolicy, scan};

/// Checks entity references of configuration files against one configuration root.
///
/// Single-owner: diagnostics are appended without synchronisation. Use one
/// instance per thread when validating in parallel.
#[derive(Debug)]
pub struct ReferenceValidator<S> {
    source: S,
    policy: ScanPolicy,
    known: KnownEntitySet,
    restore_state: BTreeSet<String>,
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl<S: ConfigSource> ReferenceValidator<S> {
    /// Build a validator with the baseline scan policy.
    ///
    /// # Errors
    ///
    /// Returns [`RefCheckError::Source`] if any existing source cannot be loaded.
    pub fn new(source: S) -> Result<Self, RefCheckError> {
        Self::with_policy(source, ScanPolicy::default())
    }

    /// Build a validator with an explicit scan policy.
    ///
    /// # Errors
    ///
    /// Returns [`RefCheckError::Source`] if any existing source cannot be loaded.
    #[tracing::instrument(skip_all)]
    pub fn with_policy(source: S, policy: ScanPolicy) -> Result<Self, RefCheckError> {
        let known = derive_known_entities(&source)?;
        let restore_state = source
            .load_source(SourceKind::RestoreState)?
            .as_ref()
            .map(restore_state_entities)
            .unwrap_or_default();

        tracing::info!(
            known = known.len(),
            builtin = known.count_from(Origin::Builtin),
            registry = known.count_from(Origin::Registry),
            storage_zones = known.count_from(Origin::StorageZone),
            config = known.count_from(Origin::Config),
            restore_state = restore_state.len(),
            "known entity set ready"
        );

        Ok(Self {
            source,
            policy,
            known,
            restore_state,
            errors: Vec::new(),
            warnings: Vec::new(),
        })
    }

    /// Parse `file` and check every reference in it.
    ///
    /// Returns `Ok(true)` when this call recorded no error.
    ///
    /// # Errors
    ///
    /// Returns [`RefCheckError::Source`] when the file cannot be read or parsed;
    /// no diagnostic is recorded in that case.
    #[tracing::instrument(skip(self), fields(file = %file.display()))]
    pub fn validate_file_references(&mut self, file: &Path) -> Result<bool, RefCheckError> {
        let tree = self.source.load_file(file)?;
        Ok(self.validate_tree(file, &tree))
    }
}

impl<S> ReferenceValidator<S> {
    /// Check every reference in an already-parsed tree attributed to `file`.
    ///
    /// Returns `true` when this call recorded no error.
    pub fn validate_tree(&mut self, file: &Path, tree: &Value) -> bool {
        let errors_before = self.errors.len();
        let mut checked = 0usize;

        for reference in scan(tree, file, &self.policy) {
            checked += 1;
            if self.resolves(&reference.entity_id) {
                continue;
            }
            self.errors.push(Diagnostic::unresolved(&reference));
            if self.restore_state.contains(&reference.entity_id) {
                self.warnings.push(Diagnostic::restore_state_only(&reference));
            }
        }

        let new_errors = self.errors.len() - errors_before;
        tracing::debug!(checked, errors = new_errors, "references checked");
        new_errors == 0
    }

    fn resolves(&self, entity_id: &str) -> bool {
        self.known.contains(entity_id) || builtin::is_builtin_domain(entity_id)
    }

    /// Builtins, registry, stored zones and config-derived identifiers.
    #[must_use]
    pub fn get_config_defined_entities(&self) -> &BTreeSet<EntityId> {
        self.known.entities()
    }

    /// Whether `entity_id`'s domain is exempt from checking. Always `false`.
    #[must_use]
    pub fn is_builtin_domain(&self, entity_id: &str) -> bool {
        builtin::is_builtin_domain(entity_id)
    }

    /// Unresolved references recorded so far, in discovery order.
    #[must_use]
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    /// Supplementary findings recorded so far, in discovery order.
    #[must_use]
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Whether no error has been recorded on this instance yet.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
