use crate::install::{install_pass_hook, InstallError};
use crate::interceptor::{Interceptor, PassStats};
use hyprlens_assets::{ImageDecoder, LoadOutcome};
use hyprlens_common::Color;
use hyprlens_config::register_defaults;
use hyprlens_host::{Host, HookHandle, PassHook, PRE_BLUR_SYMBOL};
use hyprlens_render::Frame;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Accent used for the plugin's host notifications (#6428fc).
pub const PLUGIN_COLOR: Color = Color::rgba(100.0 / 255.0, 40.0 / 255.0, 252.0 / 255.0, 1.0);

pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(5);

/// Static description reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PluginInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub author: &'static str,
    pub version: &'static str,
}

/// A loaded plugin instance.
///
/// The interceptor is shared between the installed hook and the config
/// reload listener. Everything runs on the host's render thread.
pub struct Plugin {
    interceptor: Rc<RefCell<Interceptor>>,
    hook: Option<HookHandle>,
    install_error: Option<InstallError>,
}

impl Plugin {
    pub fn info() -> PluginInfo {
        PluginInfo {
            name: "hyprlens",
            description: "Customizable background for transparent windows, separate from the desktop background.",
            author: "Duckonaut",
            version: "1.0",
        }
    }

    /// Register configuration, subscribe to reloads and hook the pre-blur pass.
    ///
    /// A failed hook install is logged and leaves the plugin loaded but inert.
    pub fn init<H: Host + ?Sized>(host: &mut H, decoder: Box<dyn ImageDecoder>) -> Self {
        let _span = tracing::info_span!("plugin_init").entered();
        register_defaults(host);
        host.reload_config();

        let interceptor = Rc::new(RefCell::new(Interceptor::new(host.config(), decoder)));

        let listener = Rc::downgrade(&interceptor);
        host.on_config_reloaded(Box::new(move || {
            let Some(interceptor) = listener.upgrade() else {
                return;
            };
            match interceptor.try_borrow_mut() {
                Ok(mut interceptor) => interceptor.invalidate(),
                Err(_) => tracing::warn!("config reloaded during a pass, invalidation skipped"),
            }
        }));

        let target = interceptor.clone();
        let hook: PassHook = Box::new(move |frame: &mut Frame<'_>| {
            match target.try_borrow_mut() {
                Ok(mut interceptor) => {
                    interceptor.on_pre_blur(frame);
                }
                Err(_) => tracing::warn!("re-entrant pre-blur pass skipped"),
            }
        });

        let (hook, install_error) = match install_pass_hook(host, PRE_BLUR_SYMBOL, hook) {
            Ok(handle) => (Some(handle), None),
            Err(e) => {
                tracing::error!(error = %e, "interception disabled");
                (None, Some(e))
            }
        };

        host.notify(
            "[hyprlens] Initialized successfully!",
            PLUGIN_COLOR,
            NOTIFICATION_DURATION,
        );

        Self {
            interceptor,
            hook,
            install_error,
        }
    }

    pub fn is_intercepting(&self) -> bool {
        self.hook.is_some()
    }

    /// Why the hook was not installed, if it wasn't.
    pub fn install_error(&self) -> Option<&InstallError> {
        self.install_error.as_ref()
    }

    pub fn stats(&self) -> PassStats {
        self.interceptor.borrow().stats().clone()
    }

    pub fn last_load(&self) -> Option<LoadOutcome> {
        self.interceptor.borrow().last_load().cloned()
    }

    /// Unhook the pass and free the texture.
    pub fn exit<H: Host + ?Sized>(self, host: &mut H) {
        if let Some(handle) = self.hook {
            if let Err(e) = host.uninstall(handle) {
                tracing::warn!(error = %e, "failed to remove pre-blur hook");
            }
        }
        self.interceptor.borrow_mut().release(host.graphics());
        host.notify(
            "[hyprlens] Unloaded successfully!",
            PLUGIN_COLOR,
            NOTIFICATION_DURATION,
        );
        tracing::info!("plugin unloaded");
    }
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("hook", &self.hook)
            .field("install_error", &self.install_error)
            .finish_non_exhaustive()
    }
}
