use crate::hook::HookFacility;
use hyprlens_common::Color;
use hyprlens_config::{ConfigRegistry, ConfigSource};
use hyprlens_render::GraphicsApi;
use std::rc::Rc;
use std::time::Duration;

/// A user-visible toast.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub color: Color,
    pub duration: Duration,
}

/// Fire-and-forget user notifications.
pub trait Notifier {
    fn notify(&mut self, message: &str, color: Color, duration: Duration);
}

/// Host events a plugin can subscribe to.
pub trait HostEvents {
    /// Called after every configuration reload.
    fn on_config_reloaded(&mut self, listener: Box<dyn FnMut()>);
}

/// Everything a plugin gets from the compositor.
pub trait Host: HookFacility + Notifier + HostEvents + ConfigRegistry {
    /// Live view of the host configuration.
    fn config(&self) -> Rc<dyn ConfigSource>;

    /// Re-parse configuration so newly registered values pick up user settings.
    fn reload_config(&mut self);

    fn graphics(&mut self) -> &mut dyn GraphicsApi;
}
