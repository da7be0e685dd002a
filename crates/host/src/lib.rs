//! Host capabilities: what the compositor offers a plugin.
//!
//! # Invariants
//! - Everything here runs on the compositor's render thread; nothing is
//!   `Send` and nothing locks.
//! - A hook replaces its target outright. The host never runs the original
//!   function while a hook is installed on it.
//!
//! [`SimHost`] is an in-process compositor with one hookable pre-blur pass
//! per monitor, a software graphics context and an in-memory config store.

mod capability;
mod hook;
mod sim;

pub use capability::{Host, HostEvents, Notification, Notifier};
pub use hook::{FunctionAddress, HookError, HookFacility, HookHandle, PassHook};
pub use sim::{PassKind, SimHost, PRE_BLUR_SYMBOL};

pub fn crate_info() -> &'static str {
    "hyprlens-host v0.1.0"
}
