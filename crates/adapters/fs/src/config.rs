//! Configuration loading: optional `refcheck.toml` with environment variable overrides.
//!
//! Looks for `refcheck.toml` in the configuration root. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::Path;

use refcheck_app::scanner::ScanPolicy;
use serde::Deserialize;

/// Name of the optional settings file inside a configuration root.
pub const FILE_NAME: &str = "refcheck.toml";

/// Top-level settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where each logical source lives under the root.
    pub layout: LayoutConfig,
    /// Reference scanning policy.
    pub scan: ScanConfig,
}

/// File names of the logical sources, relative to the configuration root.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub configuration: String,
    pub automations: String,
    pub scripts: String,
    pub scenes: String,
    pub groups: String,
    /// Directory holding the JSON storage snapshots.
    pub storage_dir: String,
}

/// Scan policy settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Mapping keys whose scalar values are never shape-matched.
    pub ignore_keys: Vec<String>,
}

impl Config {
    /// Load settings from `<root>/refcheck.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting layout is invalid.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(&root.join(FILE_NAME))?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("REFCHECK_STORAGE_DIR") {
            self.layout.storage_dir = val;
        }
        if let Some(val) = lookup("REFCHECK_IGNORE_KEYS") {
            self.scan.ignore_keys = val
                .split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        for (field, value) in [
            ("configuration", &layout.configuration),
            ("automations", &layout.automations),
            ("scripts", &layout.scripts),
            ("scenes", &layout.scenes),
            ("groups", &layout.groups),
            ("storage_dir", &layout.storage_dir),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Validation(format!("layout.{field} must not be empty")));
            }
            if Path::new(value).is_absolute() {
                return Err(ConfigError::Validation(format!(
                    "layout.{field} must be relative to the configuration root"
                )));
            }
        }
        Ok(())
    }

    /// The scan policy these settings describe.
    #[must_use]
    pub fn scan_policy(&self) -> ScanPolicy {
        ScanPolicy::ignoring(self.scan.ignore_keys.iter().cloned())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            configuration: "configuration.yaml".to_string(),
            automations: "automations.yaml".to_string(),
            scripts: "scripts.yaml".to_string(),
            scenes: "scenes.yaml".to_string(),
            groups: "groups.yaml".to_string(),
            storage_dir: ".storage".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
