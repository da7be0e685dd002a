use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;

/// Path of the image drawn into the blur framebuffer.
pub const IMAGE_PATH_KEY: &str = "plugin:hyprlens:background";
/// Non-zero selects nearest-neighbor sampling instead of linear.
pub const NEAREST_KEY: &str = "plugin:hyprlens:nearest";
/// Non-zero repeats the image across the monitor instead of stretching it.
pub const TILED_KEY: &str = "plugin:hyprlens:tiled";

/// String the host stores for an unset string option.
pub const EMPTY_SENTINEL: &str = "[[EMPTY]]";

/// A single host configuration value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ConfigValue {
    /// Booleans are int-backed on the host side; any non-zero int counts as true.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(i) => Some(*i != 0),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

/// Errors from resolving a setting.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("config value {key} is not registered")]
    Missing { key: String },
    #[error("config value {key} has type {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Read access to host-owned configuration values.
pub trait ConfigSource {
    /// Current value for `key`, or `None` if the host does not know it.
    fn get(&self, key: &str) -> Option<ConfigValue>;
}

/// Host-side registration of plugin settings.
pub trait ConfigRegistry {
    /// Declare `key` with a default. Existing user values are kept.
    fn add_config_value(&mut self, key: &str, default: ConfigValue);
}

impl<T: ConfigSource + ?Sized> ConfigSource for RefCell<T> {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        self.borrow().get(key)
    }
}

/// Register the plugin's settings with their defaults.
pub fn register_defaults<R: ConfigRegistry + ?Sized>(registry: &mut R) {
    registry.add_config_value(IMAGE_PATH_KEY, ConfigValue::from(EMPTY_SENTINEL));
    registry.add_config_value(NEAREST_KEY, ConfigValue::Int(0));
    registry.add_config_value(TILED_KEY, ConfigValue::Int(0));
}

/// Typed view over the plugin's settings.
///
/// Every accessor goes back to the source, so a host reload is visible on
/// the next read.
#[derive(Clone, Copy)]
pub struct Settings<'a> {
    source: &'a dyn ConfigSource,
}

impl<'a> Settings<'a> {
    pub fn new(source: &'a dyn ConfigSource) -> Self {
        Self { source }
    }

    /// The configured image, or `None` when the path is empty or the sentinel.
    pub fn image_path(&self) -> Result<Option<PathBuf>, ConfigError> {
        let value = self.lookup(IMAGE_PATH_KEY)?;
        let path = value.as_str().ok_or_else(|| ConfigError::TypeMismatch {
            key: IMAGE_PATH_KEY.to_string(),
            expected: "string",
            found: value.kind(),
        })?;
        let path = path.trim();
        if path.is_empty() || path == EMPTY_SENTINEL {
            return Ok(None);
        }
        Ok(Some(PathBuf::from(path)))
    }

    pub fn nearest(&self) -> Result<bool, ConfigError> {
        self.flag(NEAREST_KEY)
    }

    pub fn tiled(&self) -> Result<bool, ConfigError> {
        self.flag(TILED_KEY)
    }

    fn flag(&self, key: &str) -> Result<bool, ConfigError> {
        let value = self.lookup(key)?;
        value.as_bool().ok_or_else(|| ConfigError::TypeMismatch {
            key: key.to_string(),
            expected: "bool",
            found: value.kind(),
        })
    }

    fn lookup(&self, key: &str) -> Result<ConfigValue, ConfigError> {
        self.source.get(key).ok_or_else(|| ConfigError::Missing {
            key: key.to_string(),
        })
    }
}
