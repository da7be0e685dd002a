use crate::capability::{Host, HostEvents, Notification, Notifier};
use crate::hook::{FunctionAddress, HookError, HookFacility, HookHandle, PassHook};
use hyprlens_common::{Color, UVec2};
use hyprlens_config::{ConfigRegistry, ConfigSource, ConfigValue, MemoryConfig};
use hyprlens_render::{
    Frame, GfxError, GraphicsApi, MonitorInfo, MonitorRenderData, RenderData, SoftwareGraphics,
};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

/// Name of the compositor's per-monitor blur preparation pass.
pub const PRE_BLUR_SYMBOL: &str = "preBlurForCurrentMonitor";

const PRE_BLUR_BASE: usize = 0x5a_0000;

/// Which body ran for a monitor's pre-blur pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    Original,
    Hooked,
}

struct InstalledHook {
    address: FunctionAddress,
    replacement: PassHook,
}

/// Single-threaded stand-in for the compositor.
///
/// Each [`SimHost::render_frame`] walks the monitors in order, binds the
/// monitor's primary framebuffer and runs the pre-blur pass, either the
/// built-in one or whatever hook is installed on it.
pub struct SimHost {
    symbols: BTreeMap<String, Vec<FunctionAddress>>,
    hooks: BTreeMap<HookHandle, InstalledHook>,
    next_hook: u64,
    config: Rc<RefCell<MemoryConfig>>,
    reload_listeners: Vec<Box<dyn FnMut()>>,
    notifications: Vec<Notification>,
    gfx: SoftwareGraphics,
    monitors: Vec<RenderData>,
    /// Color the built-in pass fills the blur framebuffer with.
    desktop_color: Color,
    original_runs: u64,
    hooked_runs: u64,
}

impl SimHost {
    pub fn new() -> Self {
        Self::with_config(MemoryConfig::new())
    }

    pub fn with_config(config: MemoryConfig) -> Self {
        let mut symbols = BTreeMap::new();
        symbols.insert(
            PRE_BLUR_SYMBOL.to_string(),
            vec![FunctionAddress(PRE_BLUR_BASE)],
        );
        Self {
            symbols,
            hooks: BTreeMap::new(),
            next_hook: 1,
            config: Rc::new(RefCell::new(config)),
            reload_listeners: Vec::new(),
            notifications: Vec::new(),
            gfx: SoftwareGraphics::new(),
            monitors: Vec::new(),
            desktop_color: Color::from_rgb8(0x20, 0x24, 0x30),
            original_runs: 0,
            hooked_runs: 0,
        }
    }

    /// Make `name` resolve to `count` distinct functions.
    pub fn set_symbol_matches(&mut self, name: &str, count: usize) {
        let base = self
            .symbols
            .get(name)
            .and_then(|addrs| addrs.first().copied())
            .map_or(PRE_BLUR_BASE + 0x1_0000 * (self.symbols.len() + 1), |a| a.0);
        let addrs = (0..count).map(|i| FunctionAddress(base + i * 0x40)).collect();
        self.symbols.insert(name.to_string(), addrs);
    }

    /// Add an output and allocate its primary framebuffer.
    pub fn add_monitor(&mut self, monitor: MonitorInfo) -> Result<usize, GfxError> {
        let primary = self.gfx.create_framebuffer();
        let blur = self.gfx.create_framebuffer();
        self.gfx.alloc_framebuffer(primary, pixel_extent(&monitor))?;
        tracing::debug!(name = %monitor.name, size = ?monitor.pixel_size, "monitor added");
        self.monitors
            .push(RenderData::new(monitor, MonitorRenderData::new(primary, blur)));
        Ok(self.monitors.len() - 1)
    }

    pub fn monitor(&self, index: usize) -> Option<&RenderData> {
        self.monitors.get(index)
    }

    pub fn monitor_mut(&mut self, index: usize) -> Option<&mut RenderData> {
        self.monitors.get_mut(index)
    }

    pub fn monitor_count(&self) -> usize {
        self.monitors.len()
    }

    /// Flag a monitor as having blurred surfaces that need a fresh background.
    pub fn request_blur(&mut self, index: usize) {
        if let Some(render) = self.monitors.get_mut(index) {
            render.monitor_data.blur_fb_should_render = true;
            render.monitor_data.blur_fb_dirty = true;
        }
    }

    pub fn set_desktop_color(&mut self, color: Color) {
        self.desktop_color = color;
    }

    /// Run one frame across every monitor.
    pub fn render_frame(&mut self) -> Result<Vec<PassKind>, GfxError> {
        let _span = tracing::debug_span!("render_frame").entered();
        (0..self.monitors.len())
            .map(|index| self.render_monitor(index))
            .collect()
    }

    fn render_monitor(&mut self, index: usize) -> Result<PassKind, GfxError> {
        let target = self.pre_blur_address();
        let Self {
            hooks,
            gfx,
            monitors,
            desktop_color,
            ..
        } = self;
        let render = &mut monitors[index];
        gfx.bind_framebuffer(render.monitor_data.primary_fb)?;

        let hook = target.and_then(|addr| hooks.values_mut().find(|h| h.address == addr));
        let kind = match hook {
            Some(hook) => {
                let mut frame = Frame::new(render, gfx);
                (hook.replacement)(&mut frame);
                PassKind::Hooked
            }
            None => {
                builtin_pre_blur(render, gfx, *desktop_color)?;
                PassKind::Original
            }
        };
        match kind {
            PassKind::Hooked => self.hooked_runs += 1,
            PassKind::Original => self.original_runs += 1,
        }
        Ok(kind)
    }

    /// The function the host actually calls for the pass: the first match.
    fn pre_blur_address(&self) -> Option<FunctionAddress> {
        self.symbols
            .get(PRE_BLUR_SYMBOL)
            .and_then(|addrs| addrs.first().copied())
    }

    pub fn original_runs(&self) -> u64 {
        self.original_runs
    }

    pub fn hooked_runs(&self) -> u64 {
        self.hooked_runs
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn software(&self) -> &SoftwareGraphics {
        &self.gfx
    }

    pub fn software_mut(&mut self) -> &mut SoftwareGraphics {
        &mut self.gfx
    }

    /// Shared handle on the live configuration store.
    pub fn config_store(&self) -> Rc<RefCell<MemoryConfig>> {
        self.config.clone()
    }

    /// Swap in new user values and reload.
    pub fn reload_with(&mut self, values: MemoryConfig) {
        self.config.borrow_mut().replace_values(values);
        self.reload_config();
    }
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new()
    }
}

fn pixel_extent(monitor: &MonitorInfo) -> UVec2 {
    monitor.pixel_size.max(hyprlens_common::DVec2::ONE).as_uvec2()
}

/// What the compositor does when nobody has hooked the pass.
fn builtin_pre_blur(
    render: &mut RenderData,
    gfx: &mut SoftwareGraphics,
    desktop: Color,
) -> Result<(), GfxError> {
    let data = &mut render.monitor_data;
    if !data.blur_requested() {
        return Ok(());
    }
    gfx.alloc_framebuffer(data.blur_fb, pixel_extent(&render.monitor))?;
    gfx.bind_framebuffer(data.blur_fb)?;
    gfx.clear(desktop)?;
    gfx.bind_framebuffer(data.primary_fb)?;
    data.blur_fb_dirty = false;
    Ok(())
}

impl HookFacility for SimHost {
    fn resolve(&self, name: &str) -> Vec<FunctionAddress> {
        self.symbols.get(name).cloned().unwrap_or_default()
    }

    fn install(
        &mut self,
        address: FunctionAddress,
        replacement: PassHook,
    ) -> Result<HookHandle, HookError> {
        if !self.symbols.values().flatten().any(|a| *a == address) {
            return Err(HookError::UnknownAddress(address));
        }
        if self.hooks.values().any(|h| h.address == address) {
            return Err(HookError::AlreadyHooked(address));
        }
        let handle = HookHandle(self.next_hook);
        self.next_hook += 1;
        self.hooks.insert(
            handle,
            InstalledHook {
                address,
                replacement,
            },
        );
        tracing::debug!(%address, ?handle, "hook installed");
        Ok(handle)
    }

    fn uninstall(&mut self, handle: HookHandle) -> Result<(), HookError> {
        let hook = self
            .hooks
            .remove(&handle)
            .ok_or(HookError::UnknownHandle(handle))?;
        tracing::debug!(address = %hook.address, ?handle, "hook removed");
        Ok(())
    }
}

impl Notifier for SimHost {
    fn notify(&mut self, message: &str, color: Color, duration: Duration) {
        tracing::info!(text = message, ?duration, "notification");
        self.notifications.push(Notification {
            message: message.to_string(),
            color,
            duration,
        });
    }
}

impl HostEvents for SimHost {
    fn on_config_reloaded(&mut self, listener: Box<dyn FnMut()>) {
        self.reload_listeners.push(listener);
    }
}

impl ConfigRegistry for SimHost {
    fn add_config_value(&mut self, key: &str, default: ConfigValue) {
        self.config.borrow_mut().add_config_value(key, default);
    }
}

impl Host for SimHost {
    fn config(&self) -> Rc<dyn ConfigSource> {
        self.config.clone()
    }

    fn reload_config(&mut self) {
        tracing::debug!(listeners = self.reload_listeners.len(), "config reloaded");
        for listener in &mut self.reload_listeners {
            listener();
        }
    }

    fn graphics(&mut self) -> &mut dyn GraphicsApi {
        &mut self.gfx
    }
}
