//! In-memory [`ConfigSource`] used by unit tests.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use refcheck_domain::error::RefCheckError;
use refcheck_domain::source::SourceKind;
use serde_json::Value;

use crate::ports::ConfigSource;

#[derive(Debug, Default)]
pub(crate) struct InMemorySource {
    sources: HashMap<SourceKind, Value>,
    files: HashMap<PathBuf, Value>,
    failing: Option<SourceKind>,
}

impl InMemorySource {
    pub(crate) fn with_source(mut self, kind: SourceKind, tree: Value) -> Self {
        self.sources.insert(kind, tree);
        self
    }

    pub(crate) fn with_file(mut self, path: impl Into<PathBuf>, tree: Value) -> Self {
        self.files.insert(path.into(), tree);
        self
    }

    pub(crate) fn failing(mut self, kind: SourceKind) -> Self {
        self.failing = Some(kind);
        self
    }
}

fn not_found(what: String) -> RefCheckError {
    RefCheckError::Source(Box::new(io::Error::new(io::ErrorKind::NotFound, what)))
}

impl ConfigSource for InMemorySource {
    fn load_source(&self, kind: SourceKind) -> Result<Option<Value>, RefCheckError> {
        if self.failing == Some(kind) {
            return Err(not_found(format!("{kind} is unreadable")));
        }
        Ok(self.sources.get(&kind).cloned())
    }

    fn load_file(&self, path: &Path) -> Result<Value, RefCheckError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path.display().to_string()))
    }
}
