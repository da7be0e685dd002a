use crate::settings::{ConfigRegistry, ConfigSource, ConfigValue};
use std::collections::BTreeMap;
use std::path::Path;

/// Errors from loading a [`MemoryConfig`].
#[derive(Debug, thiserror::Error)]
pub enum MemoryConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// In-memory configuration store with registered defaults and user values.
///
/// User values win over defaults. The YAML form is a flat map from full
/// option name to value:
///
/// ```yaml
/// "plugin:hyprlens:background": /home/me/lens.png
/// "plugin:hyprlens:tiled": true
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    defaults: BTreeMap<String, ConfigValue>,
    values: BTreeMap<String, ConfigValue>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse user values from a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, MemoryConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let values: Option<BTreeMap<String, ConfigValue>> = serde_yaml::from_str(text)?;
        Ok(Self {
            defaults: BTreeMap::new(),
            values: values.unwrap_or_default(),
        })
    }

    /// Load user values from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MemoryConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            values = config.values.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Set a user value, shadowing any default.
    pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Drop a user value, falling back to the default if one is registered.
    pub fn unset(&mut self, key: &str) -> Option<ConfigValue> {
        self.values.remove(key)
    }

    /// Replace all user values, keeping registered defaults.
    pub fn replace_values(&mut self, other: MemoryConfig) {
        self.values = other.values;
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.defaults.contains_key(key)
    }

    /// Number of distinct keys with either a default or a user value.
    pub fn len(&self) -> usize {
        self.defaults
            .keys()
            .chain(self.values.keys().filter(|k| !self.defaults.contains_key(*k)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty() && self.values.is_empty()
    }
}

impl ConfigSource for MemoryConfig {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        self.values
            .get(key)
            .or_else(|| self.defaults.get(key))
            .cloned()
    }
}

impl ConfigRegistry for MemoryConfig {
    fn add_config_value(&mut self, key: &str, default: ConfigValue) {
        tracing::trace!(key, %default, "registering config value");
        self.defaults.insert(key.to_string(), default);
    }
}
