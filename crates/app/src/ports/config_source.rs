//! Config source port: read access to a configuration root.
//!
//! Adapters decide which files back each [`SourceKind`] and how they are
//! decoded. The core only ever sees generic trees: nested mappings,
//! sequences and scalars, modelled as [`serde_json::Value`].

use std::path::Path;

use refcheck_domain::error::RefCheckError;
use refcheck_domain::source::SourceKind;
use serde_json::Value;

/// Read-only access to the parsed sources of one configuration root.
pub trait ConfigSource {
    /// Load the tree backing a logical source.
    ///
    /// Returns `Ok(None)` when the source does not exist in this root.
    ///
    /// # Errors
    ///
    /// Returns [`RefCheckError::Source`] when the source exists but cannot
    /// be read or decoded.
    fn load_source(&self, kind: SourceKind) -> Result<Option<Value>, RefCheckError>;

    /// Load and decode an arbitrary file whose references should be checked.
    ///
    /// # Errors
    ///
    /// Returns [`RefCheckError::Source`] when the file cannot be read or decoded.
    fn load_file(&self, path: &Path) -> Result<Value, RefCheckError>;
}

impl<T: ConfigSource + ?Sized> ConfigSource for &T {
    fn load_source(&self, kind: SourceKind) -> Result<Option<Value>, RefCheckError> {
        (**self).load_source(kind)
    }

    fn load_file(&self, path: &Path) -> Result<Value, RefCheckError> {
        (**self).load_file(path)
    }
}
