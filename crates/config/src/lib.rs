//! The plugin's host-managed settings, read fresh on every access.

mod memory;
mod settings;

pub use memory::{MemoryConfig, MemoryConfigError};
pub use settings::{
    register_defaults, ConfigError, ConfigRegistry, ConfigSource, ConfigValue, Settings,
    EMPTY_SENTINEL, IMAGE_PATH_KEY, NEAREST_KEY, TILED_KEY,
};

pub fn crate_info() -> &'static str {
    "hyprlens-config v0.1.0"
}
