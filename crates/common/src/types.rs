use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Linear RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        )
    }

    /// Quantize to 8-bit RGBA, clamping out-of-range components.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

/// Axis-aligned rectangle in host pixels. `pos` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: DVec2,
    pub size: DVec2,
}

impl Rect {
    pub fn new(pos: DVec2, size: DVec2) -> Self {
        Self { pos, size }
    }

    /// Rectangle anchored at the origin.
    pub fn from_size(size: DVec2) -> Self {
        Self {
            pos: DVec2::ZERO,
            size,
        }
    }

    pub fn center(&self) -> DVec2 {
        self.pos + self.size * 0.5
    }

    pub fn bottom_right(&self) -> DVec2 {
        self.pos + self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }
}

/// Texture-space coordinates sampled across a destination rectangle.
///
/// Values above 1.0 are meaningful: with repeat wrapping they tile the
/// texture that many times per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvRect {
    pub top_left: DVec2,
    pub bottom_right: DVec2,
}

impl UvRect {
    /// The whole texture, once.
    pub const FULL: Self = Self {
        top_left: DVec2::ZERO,
        bottom_right: DVec2::ONE,
    };

    pub fn new(top_left: DVec2, bottom_right: DVec2) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Map a normalized position inside the destination (0..1 per axis) to UV space.
    pub fn lerp(&self, t: DVec2) -> DVec2 {
        self.top_left + (self.bottom_right - self.top_left) * t
    }
}

impl Default for UvRect {
    fn default() -> Self {
        Self::FULL
    }
}
