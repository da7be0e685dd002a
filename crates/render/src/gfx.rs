use glam::{DVec2, UVec2};
use hyprlens_common::{Color, Rect, UvRect};
use std::fmt;

/// Opaque GPU texture name. `0` means "not allocated".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    pub const NONE: Self = Self(0);

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tex#{}", self.0)
    }
}

/// Host-owned render target name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FramebufferId(pub u32);

impl fmt::Display for FramebufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fb#{}", self.0)
    }
}

/// Magnification and minification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    Linear,
    Nearest,
}

/// Behaviour for UVs outside `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    #[default]
    ClampToEdge,
    Repeat,
}

/// Byte order of a four-channel, 8-bit pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgba,
    Bgra,
}

/// Channel remapping applied when a texture is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Swizzle {
    #[default]
    Identity,
    /// Read red from the blue slot and blue from the red slot.
    SwapRedBlue,
}

impl Swizzle {
    /// The swizzle that makes `source` bytes display correctly when uploaded as `upload`.
    pub fn between(source: ChannelOrder, upload: ChannelOrder) -> Self {
        if source == upload {
            Self::Identity
        } else {
            Self::SwapRedBlue
        }
    }
}

/// Errors reported by a graphics backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GfxError {
    #[error("unknown texture {0}")]
    UnknownTexture(TextureHandle),
    #[error("texture {0} has no pixel data")]
    EmptyTexture(TextureHandle),
    #[error("unknown framebuffer {0}")]
    UnknownFramebuffer(FramebufferId),
    #[error("framebuffer {0} is not allocated")]
    Unallocated(FramebufferId),
    #[error("no framebuffer is bound")]
    NoTarget,
    #[error("invalid size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("pixel data is {actual} bytes, expected {expected}")]
    DataLength { expected: usize, actual: usize },
    #[error("out of texture names")]
    Exhausted,
}

/// An owned GPU texture plus the pixel size of the image it was loaded from.
///
/// A texture whose load failed keeps its handle but has a zero size; it is
/// valid to hold and release, never to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Texture {
    pub handle: TextureHandle,
    pub size: DVec2,
}

impl Texture {
    /// A freshly allocated texture with no content yet.
    pub fn empty(handle: TextureHandle) -> Self {
        Self {
            handle,
            size: DVec2::ZERO,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.handle.is_valid()
    }

    /// True when the texture holds real image content.
    pub fn is_drawable(&self) -> bool {
        self.is_valid() && self.size.x > 0.0 && self.size.y > 0.0
    }
}

/// The subset of the compositor's graphics API the plugin uses.
///
/// Texture parameters apply to the named texture. Framebuffer allocation
/// is resize-on-demand: allocating a framebuffer at its current size is a
/// no-op.
pub trait GraphicsApi {
    fn create_texture(&mut self) -> Result<TextureHandle, GfxError>;

    /// Release a texture. Unknown handles are ignored.
    fn destroy_texture(&mut self, handle: TextureHandle);

    fn set_filter(&mut self, handle: TextureHandle, filter: FilterMode) -> Result<(), GfxError>;

    fn set_wrap(&mut self, handle: TextureHandle, wrap: WrapMode) -> Result<(), GfxError>;

    fn set_swizzle(&mut self, handle: TextureHandle, swizzle: Swizzle) -> Result<(), GfxError>;

    /// Channel order the backend assumes for [`GraphicsApi::upload_rgba8`] data.
    fn upload_channel_order(&self) -> ChannelOrder;

    /// Upload tightly packed 4-channel, 8-bit pixels.
    fn upload_rgba8(
        &mut self,
        handle: TextureHandle,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<(), GfxError>;

    fn alloc_framebuffer(&mut self, fb: FramebufferId, size: UVec2) -> Result<(), GfxError>;

    fn bind_framebuffer(&mut self, fb: FramebufferId) -> Result<(), GfxError>;

    /// Fill the bound framebuffer.
    fn clear(&mut self, color: Color) -> Result<(), GfxError>;

    /// Draw `texture` into `dest` of the bound framebuffer, sampling `uv`.
    fn draw_texture(&mut self, texture: &Texture, dest: Rect, uv: UvRect) -> Result<(), GfxError>;
}
