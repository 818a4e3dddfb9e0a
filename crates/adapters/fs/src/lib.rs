//! # refcheck-adapter-fs
//!
//! Filesystem implementation of the [`ConfigSource`] port.
//!
//! ## Layout
//!
//! | Source | Default path | Format |
//! |--------|--------------|--------|
//! | General configuration | `configuration.yaml` | YAML |
//! | Automations | `automations.yaml` | YAML |
//! | Scripts | `scripts.yaml` | YAML |
//! | Scenes | `scenes.yaml` | YAML |
//! | Groups | `groups.yaml` | YAML |
//! | Entity registry | `.storage/core.entity_registry` | JSON |
//! | Zones | `.storage/core.zone` | JSON |
//! | Restore state | `.storage/core.restore_state` | JSON |
//!
//! File names can be changed through `refcheck.toml` (see [`config`]).
//! Missing sources are simply absent; `!include` and friends are not followed.
//!
//! ## Dependency rule
//!
//! Depends on `refcheck-app` (port traits) and `refcheck-domain` only.

pub mod config;
pub mod convert;
pub mod error;

use std::path::{Path, PathBuf};

use refcheck_app::ReferenceValidator;
use refcheck_app::ports::ConfigSource;
use refcheck_domain::error::RefCheckError;
use refcheck_domain::source::SourceKind;
use serde_json::Value;

use crate::config::{Config, LayoutConfig};
use crate::convert::{drop_unmergeable, yaml_to_tree};
use crate::error::FsError;

/// Storage snapshot holding the entity registry.
pub const ENTITY_REGISTRY_FILE: &str = "core.entity_registry";
/// Storage snapshot holding UI-created zones.
pub const ZONE_FILE: &str = "core.zone";
/// Storage snapshot holding last-known entity states.
pub const RESTORE_STATE_FILE: &str = "core.restore_state";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// A configuration root on disk.
#[derive(Debug, Clone)]
pub struct FsConfigRoot {
    root: PathBuf,
    layout: LayoutConfig,
}

impl FsConfigRoot {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, layout: LayoutConfig) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    /// Where `kind` lives under this root.
    #[must_use]
    pub fn path_of(&self, kind: SourceKind) -> PathBuf {
        let storage = self.root.join(&self.layout.storage_dir);
        match kind {
            SourceKind::Configuration => self.root.join(&self.layout.configuration),
            SourceKind::Automations => self.root.join(&self.layout.automations),
            SourceKind::Scripts => self.root.join(&self.layout.scripts),
            SourceKind::Scenes => self.root.join(&self.layout.scenes),
            SourceKind::Groups => self.root.join(&self.layout.groups),
            SourceKind::EntityRegistry => storage.join(ENTITY_REGISTRY_FILE),
            SourceKind::ZoneStorage => storage.join(ZONE_FILE),
            SourceKind::RestoreState => storage.join(RESTORE_STATE_FILE),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn read(path: &Path) -> Result<Option<String>, FsError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FsError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn parse(path: &Path, text: &str, format: Format) -> Result<Value, FsError> {
        match format {
            Format::Json => serde_json::from_str(text).map_err(|source| FsError::Json {
                path: path.to_path_buf(),
                source,
            }),
            Format::Yaml => {
                let yaml_err = |source| FsError::Yaml {
                    path: path.to_path_buf(),
                    source,
                };
                let mut document: serde_yaml::Value =
                    serde_yaml::from_str(text).map_err(yaml_err)?;
                drop_unmergeable(&mut document);
                document.apply_merge().map_err(yaml_err)?;
                Ok(yaml_to_tree(document))
            }
        }
    }
}

impl ConfigSource for FsConfigRoot {
    fn load_source(&self, kind: SourceKind) -> Result<Option<Value>, RefCheckError> {
        let path = self.path_of(kind);
        let Some(text) = Self::read(&path)? else {
            return Ok(None);
        };
        let format = if kind.is_storage() {
            Format::Json
        } else {
            Format::Yaml
        };
        tracing::trace!(source = %kind, path = %path.display(), "loading source");
        Ok(Some(Self::parse(&path, &text, format)?))
    }

    fn load_file(&self, path: &Path) -> Result<Value, RefCheckError> {
        let path = self.resolve(path);
        let text = std::fs::read_to_string(&path).map_err(|source| FsError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Self::parse(&path, &text, Format::of(&path))?)
    }
}

/// Open the configuration root at `root` and build a ready validator.
///
/// Reads `refcheck.toml` (if any), then every logical source.
///
/// # Errors
///
/// Returns [`RefCheckError::Source`] when the settings are invalid or any
/// existing source cannot be read or parsed.
pub fn open(
    root: impl Into<PathBuf>,
) -> Result<ReferenceValidator<FsConfigRoot>, RefCheckError> {
    let root = root.into();
    let config = Config::load(&root).map_err(FsError::from)?;
    let policy = config.scan_policy();
    ReferenceValidator::with_policy(FsConfigRoot::new(root, config.layout), policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fs_root() -> FsConfigRoot {
        FsConfigRoot::new("/config", LayoutConfig::default())
    }

    #[test]
    fn should_map_sources_to_default_paths() {
        let root = fs_root();
        assert_eq!(
            root.path_of(SourceKind::Configuration),
            Path::new("/config/configuration.yaml")
        );
        assert_eq!(
            root.path_of(SourceKind::EntityRegistry),
            Path::new("/config/.storage/core.entity_registry")
        );
        assert_eq!(
            root.path_of(SourceKind::RestoreState),
            Path::new("/config/.storage/core.restore_state")
        );
    }

    #[test]
    fn should_resolve_relative_file_against_root() {
        let root = fs_root();
        assert_eq!(
            root.resolve(Path::new("packages/lights.yaml")),
            Path::new("/config/packages/lights.yaml")
        );
        assert_eq!(root.resolve(Path::new("/tmp/x.yaml")), Path::new("/tmp/x.yaml"));
    }

    #[test]
    fn should_pick_format_from_extension() {
        assert_eq!(Format::of(Path::new("a.json")), Format::Json);
        assert_eq!(Format::of(Path::new("a.yaml")), Format::Yaml);
        assert_eq!(Format::of(Path::new("a.yml")), Format::Yaml);
    }

    #[test]
    fn should_apply_yaml_merge_keys() {
        let text = "
base: &base
  entity_id: light.kitchen
derived:
  <<: *base
  brightness: 10
";
        let tree = FsConfigRoot::parse(Path::new("x.yaml"), text, Format::Yaml).unwrap();
        assert_eq!(tree["derived"]["entity_id"], "light.kitchen");
    }

    #[test]
    fn should_parse_document_when_merge_key_is_unresolved_include() {
        let text = "
homeassistant:
  <<: !include common.yaml
input_boolean:
  guest_mode: {}
";
        let tree =
            FsConfigRoot::parse(Path::new("configuration.yaml"), text, Format::Yaml).unwrap();
        assert_eq!(tree["homeassistant"], serde_json::json!({}));
        assert!(tree["input_boolean"]["guest_mode"].is_object());
    }

    #[test]
    fn should_report_yaml_error_with_path() {
        let err =
            FsConfigRoot::parse(Path::new("broken.yaml"), "a: [1, 2", Format::Yaml).unwrap_err();
        assert!(matches!(err, FsError::Yaml { .. }));
        assert!(err.to_string().contains("broken.yaml"));
    }
}
