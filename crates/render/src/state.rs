use crate::gfx::{FramebufferId, GfxError, GraphicsApi, Texture};
use glam::DVec2;
use hyprlens_common::{Rect, UvRect};

/// One step of a render modifier, applied to draw destinations in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modification {
    Translate(DVec2),
    /// Scale about the origin.
    Scale(f64),
    ScaleAround { center: DVec2, factor: f64 },
}

/// Transform the host applies to every draw in the current frame.
///
/// The identity modifier is enabled with no modifications.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderModifier {
    pub modifications: Vec<Modification>,
    pub enabled: bool,
}

impl RenderModifier {
    pub fn identity() -> Self {
        Self {
            modifications: Vec::new(),
            enabled: true,
        }
    }

    pub fn new(modifications: Vec<Modification>) -> Self {
        Self {
            modifications,
            enabled: true,
        }
    }

    pub fn is_identity(&self) -> bool {
        !self.enabled || self.modifications.is_empty()
    }

    /// Transform a destination rectangle.
    pub fn apply(&self, rect: Rect) -> Rect {
        if !self.enabled {
            return rect;
        }
        self.modifications
            .iter()
            .fold(rect, |r, m| match *m {
                Modification::Translate(offset) => Rect::new(r.pos + offset, r.size),
                Modification::Scale(factor) => Rect::new(r.pos * factor, r.size * factor),
                Modification::ScaleAround { center, factor } => {
                    Rect::new(center + (r.pos - center) * factor, r.size * factor)
                }
            })
    }
}

impl Default for RenderModifier {
    fn default() -> Self {
        Self::identity()
    }
}

/// Output the current pass is rendering for.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorInfo {
    pub name: String,
    /// Physical size in pixels.
    pub pixel_size: DVec2,
    /// Logical size after the output transform.
    pub transformed_size: DVec2,
}

impl MonitorInfo {
    pub fn new(name: impl Into<String>, pixel_size: DVec2) -> Self {
        Self {
            name: name.into(),
            pixel_size,
            transformed_size: pixel_size,
        }
    }

    pub fn with_transformed_size(mut self, size: DVec2) -> Self {
        self.transformed_size = size;
        self
    }

    /// Rectangle covering the whole output.
    pub fn full_rect(&self) -> Rect {
        Rect::from_size(self.transformed_size)
    }
}

/// Per-monitor render targets and blur bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorRenderData {
    pub primary_fb: FramebufferId,
    pub blur_fb: FramebufferId,
    /// Something on this monitor wants a blurred background this frame.
    pub blur_fb_should_render: bool,
    /// The cached blur framebuffer is stale.
    pub blur_fb_dirty: bool,
}

impl MonitorRenderData {
    pub fn new(primary_fb: FramebufferId, blur_fb: FramebufferId) -> Self {
        Self {
            primary_fb,
            blur_fb,
            blur_fb_should_render: false,
            blur_fb_dirty: true,
        }
    }

    /// Whether the host has asked for the blur framebuffer to be redrawn.
    pub fn blur_requested(&self) -> bool {
        self.blur_fb_should_render && self.blur_fb_dirty
    }
}

/// Host render state for the monitor currently being drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderData {
    pub monitor: MonitorInfo,
    pub monitor_data: MonitorRenderData,
    pub modifier: RenderModifier,
}

impl RenderData {
    pub fn new(monitor: MonitorInfo, monitor_data: MonitorRenderData) -> Self {
        Self {
            monitor,
            monitor_data,
            modifier: RenderModifier::identity(),
        }
    }
}

/// Everything a render-pass hook is handed: the host's render state and
/// the graphics context it draws with.
pub struct Frame<'a> {
    pub render: &'a mut RenderData,
    pub gfx: &'a mut dyn GraphicsApi,
}

impl<'a> Frame<'a> {
    pub fn new(render: &'a mut RenderData, gfx: &'a mut dyn GraphicsApi) -> Self {
        Self { render, gfx }
    }

    /// Draw through the host's current render modifier.
    pub fn draw_texture(
        &mut self,
        texture: &Texture,
        dest: Rect,
        uv: UvRect,
    ) -> Result<(), GfxError> {
        let dest = self.render.modifier.apply(dest);
        self.gfx.draw_texture(texture, dest, uv)
    }
}
