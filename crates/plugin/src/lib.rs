//! Render-pass interception: draw a configured image where the compositor
//! would have prepared its blur background.
//!
//! # Invariants
//! - Past the "blur requested" check, every exit path rebinds the primary
//!   framebuffer, clears the blur dirty flag and restores the render modifier.
//! - The hook is only installed when the target resolves to exactly one
//!   function; otherwise the plugin runs with interception disabled.
//! - Nothing here panics or aborts the host on bad configuration.

mod install;
mod interceptor;
mod plugin;

pub use install::{install_pass_hook, InstallError};
pub use interceptor::{tile_count, Interceptor, PassOutcome, PassStats, FALLBACK_COLOR};
pub use plugin::{Plugin, PluginInfo, NOTIFICATION_DURATION, PLUGIN_COLOR};

pub fn crate_info() -> &'static str {
    "hyprlens-plugin v0.1.0"
}
