//! Diagnostics produced while validating references.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::reference::{Location, Reference};

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// A single validation finding tied to one reference occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub file: PathBuf,
    pub location: Location,
    pub entity_id: String,
    pub message: String,
}

impl Diagnostic {
    /// The reference does not resolve to any known entity.
    #[must_use]
    pub fn unresolved(reference: &Reference) -> Self {
        Self {
            severity: Severity::Error,
            file: reference.file.clone(),
            location: reference.location.clone(),
            entity_id: reference.entity_id.clone(),
            message: "references an entity that is not defined".to_string(),
        }
    }

    /// The reference target only shows up in volatile restore-state data.
    #[must_use]
    pub fn restore_state_only(reference: &Reference) -> Self {
        Self {
            severity: Severity::Warning,
            file: reference.file.clone(),
            location: reference.location.clone(),
            entity_id: reference.entity_id.clone(),
            message: "is present in restore state only, which records last-known state and does not define entities"
                .to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: `{}` {}",
            self.file.display(),
            self.location,
            self.entity_id,
            self.message
        )
    }
}
