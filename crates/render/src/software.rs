use crate::gfx::{
    ChannelOrder, FilterMode, FramebufferId, GfxError, GraphicsApi, Swizzle, Texture,
    TextureHandle, WrapMode,
};
use glam::{DVec2, UVec2};
use hyprlens_common::{Color, Rect, UvRect};
use image::RgbaImage;
use std::collections::BTreeMap;

/// A call made against [`SoftwareGraphics`], in issue order.
#[derive(Debug, Clone, PartialEq)]
pub enum GfxCommand {
    CreateTexture(TextureHandle),
    DestroyTexture(TextureHandle),
    SetFilter(TextureHandle, FilterMode),
    SetWrap(TextureHandle, WrapMode),
    SetSwizzle(TextureHandle, Swizzle),
    Upload {
        handle: TextureHandle,
        width: u32,
        height: u32,
    },
    AllocFramebuffer {
        fb: FramebufferId,
        size: UVec2,
        reallocated: bool,
    },
    BindFramebuffer(FramebufferId),
    Clear(FramebufferId, Color),
    Draw {
        fb: FramebufferId,
        texture: TextureHandle,
        dest: Rect,
        uv: UvRect,
    },
}

/// Sampling state of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextureParams {
    pub filter: FilterMode,
    pub wrap: WrapMode,
    pub swizzle: Swizzle,
}

#[derive(Debug, Default)]
struct SoftTexture {
    params: TextureParams,
    pixels: Option<RgbaImage>,
}

/// CPU implementation of [`GraphicsApi`].
///
/// Keeps a log of every call so tests can assert on exactly what a pass
/// did, and rasterizes draws so the result can be inspected or saved.
/// Draws replace destination pixels; there is no blending.
#[derive(Debug)]
pub struct SoftwareGraphics {
    textures: BTreeMap<TextureHandle, SoftTexture>,
    framebuffers: BTreeMap<FramebufferId, Option<RgbaImage>>,
    bound: Option<FramebufferId>,
    next_texture: u32,
    next_framebuffer: u32,
    upload_order: ChannelOrder,
    commands: Vec<GfxCommand>,
}

impl SoftwareGraphics {
    pub fn new() -> Self {
        Self::with_upload_order(ChannelOrder::Rgba)
    }

    /// A backend whose uploads are interpreted in `order`.
    pub fn with_upload_order(upload_order: ChannelOrder) -> Self {
        Self {
            textures: BTreeMap::new(),
            framebuffers: BTreeMap::new(),
            bound: None,
            next_texture: 1,
            next_framebuffer: 1,
            upload_order,
            commands: Vec::new(),
        }
    }

    /// Reserve a framebuffer name. Storage is allocated by `alloc_framebuffer`.
    pub fn create_framebuffer(&mut self) -> FramebufferId {
        let id = FramebufferId(self.next_framebuffer);
        self.next_framebuffer += 1;
        self.framebuffers.insert(id, None);
        id
    }

    pub fn framebuffer(&self, fb: FramebufferId) -> Option<&RgbaImage> {
        self.framebuffers.get(&fb).and_then(Option::as_ref)
    }

    pub fn bound_framebuffer(&self) -> Option<FramebufferId> {
        self.bound
    }

    pub fn texture_params(&self, handle: TextureHandle) -> Option<TextureParams> {
        self.textures.get(&handle).map(|t| t.params)
    }

    pub fn texture_has_pixels(&self, handle: TextureHandle) -> bool {
        self.textures
            .get(&handle)
            .is_some_and(|t| t.pixels.is_some())
    }

    /// Number of live textures.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn commands(&self) -> &[GfxCommand] {
        &self.commands
    }

    /// Drain the command log.
    pub fn take_commands(&mut self) -> Vec<GfxCommand> {
        std::mem::take(&mut self.commands)
    }

    fn texture_mut(&mut self, handle: TextureHandle) -> Result<&mut SoftTexture, GfxError> {
        self.textures
            .get_mut(&handle)
            .ok_or(GfxError::UnknownTexture(handle))
    }

    fn target(&mut self) -> Result<(FramebufferId, &mut RgbaImage), GfxError> {
        let fb = self.bound.ok_or(GfxError::NoTarget)?;
        let image = self
            .framebuffers
            .get_mut(&fb)
            .ok_or(GfxError::UnknownFramebuffer(fb))?
            .as_mut()
            .ok_or(GfxError::Unallocated(fb))?;
        Ok((fb, image))
    }
}

impl Default for SoftwareGraphics {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsApi for SoftwareGraphics {
    fn create_texture(&mut self) -> Result<TextureHandle, GfxError> {
        let handle = TextureHandle(self.next_texture);
        self.next_texture = self.next_texture.checked_add(1).ok_or(GfxError::Exhausted)?;
        self.textures.insert(handle, SoftTexture::default());
        self.commands.push(GfxCommand::CreateTexture(handle));
        Ok(handle)
    }

    fn destroy_texture(&mut self, handle: TextureHandle) {
        if self.textures.remove(&handle).is_some() {
            self.commands.push(GfxCommand::DestroyTexture(handle));
        } else {
            tracing::trace!(%handle, "destroy of unknown texture ignored");
        }
    }

    fn set_filter(&mut self, handle: TextureHandle, filter: FilterMode) -> Result<(), GfxError> {
        self.texture_mut(handle)?.params.filter = filter;
        self.commands.push(GfxCommand::SetFilter(handle, filter));
        Ok(())
    }

    fn set_wrap(&mut self, handle: TextureHandle, wrap: WrapMode) -> Result<(), GfxError> {
        self.texture_mut(handle)?.params.wrap = wrap;
        self.commands.push(GfxCommand::SetWrap(handle, wrap));
        Ok(())
    }

    fn set_swizzle(&mut self, handle: TextureHandle, swizzle: Swizzle) -> Result<(), GfxError> {
        self.texture_mut(handle)?.params.swizzle = swizzle;
        self.commands.push(GfxCommand::SetSwizzle(handle, swizzle));
        Ok(())
    }

    fn upload_channel_order(&self) -> ChannelOrder {
        self.upload_order
    }

    fn upload_rgba8(
        &mut self,
        handle: TextureHandle,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<(), GfxError> {
        if width == 0 || height == 0 {
            return Err(GfxError::InvalidSize { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(GfxError::DataLength {
                expected,
                actual: pixels.len(),
            });
        }
        let image = RgbaImage::from_raw(width, height, pixels.to_vec()).ok_or(
            GfxError::DataLength {
                expected,
                actual: pixels.len(),
            },
        )?;
        self.texture_mut(handle)?.pixels = Some(image);
        self.commands.push(GfxCommand::Upload {
            handle,
            width,
            height,
        });
        Ok(())
    }

    fn alloc_framebuffer(&mut self, fb: FramebufferId, size: UVec2) -> Result<(), GfxError> {
        if size.x == 0 || size.y == 0 {
            return Err(GfxError::InvalidSize {
                width: size.x,
                height: size.y,
            });
        }
        let slot = self
            .framebuffers
            .get_mut(&fb)
            .ok_or(GfxError::UnknownFramebuffer(fb))?;
        let reallocated = match slot {
            Some(image) if image.dimensions() == (size.x, size.y) => false,
            _ => {
                *slot = Some(RgbaImage::new(size.x, size.y));
                true
            }
        };
        if reallocated {
            tracing::debug!(%fb, width = size.x, height = size.y, "framebuffer allocated");
        }
        self.commands.push(GfxCommand::AllocFramebuffer {
            fb,
            size,
            reallocated,
        });
        Ok(())
    }

    fn bind_framebuffer(&mut self, fb: FramebufferId) -> Result<(), GfxError> {
        if !self.framebuffers.contains_key(&fb) {
            return Err(GfxError::UnknownFramebuffer(fb));
        }
        self.bound = Some(fb);
        self.commands.push(GfxCommand::BindFramebuffer(fb));
        Ok(())
    }

    fn clear(&mut self, color: Color) -> Result<(), GfxError> {
        let (fb, image) = self.target()?;
        let px = image::Rgba(color.to_rgba8());
        for p in image.pixels_mut() {
            *p = px;
        }
        self.commands.push(GfxCommand::Clear(fb, color));
        Ok(())
    }

    fn draw_texture(&mut self, texture: &Texture, dest: Rect, uv: UvRect) -> Result<(), GfxError> {
        let handle = texture.handle;
        // Split the borrow: the texture is read while the target is written.
        let source = self
            .textures
            .get(&handle)
            .ok_or(GfxError::UnknownTexture(handle))?;
        let params = source.params;
        let pixels = source
            .pixels
            .as_ref()
            .ok_or(GfxError::EmptyTexture(handle))?;

        let fb = self.bound.ok_or(GfxError::NoTarget)?;
        let target = self
            .framebuffers
            .get_mut(&fb)
            .ok_or(GfxError::UnknownFramebuffer(fb))?
            .as_mut()
            .ok_or(GfxError::Unallocated(fb))?;

        if !dest.is_empty() {
            rasterize(target, pixels, params, dest, uv);
        }

        self.commands.push(GfxCommand::Draw {
            fb,
            texture: handle,
            dest,
            uv,
        });
        Ok(())
    }
}

fn rasterize(target: &mut RgbaImage, source: &RgbaImage, params: TextureParams, dest: Rect, uv: UvRect) {
    let (tw, th) = target.dimensions();
    let end = dest.bottom_right();
    let x0 = dest.pos.x.max(0.0).floor() as u32;
    let y0 = dest.pos.y.max(0.0).floor() as u32;
    let x1 = (end.x.min(f64::from(tw)).ceil().max(0.0) as u32).min(tw);
    let y1 = (end.y.min(f64::from(th)).ceil().max(0.0) as u32).min(th);

    for y in y0..y1 {
        for x in x0..x1 {
            let center = DVec2::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if center.x < dest.pos.x || center.y < dest.pos.y || center.x >= end.x || center.y >= end.y
            {
                continue;
            }
            let t = (center - dest.pos) / dest.size;
            let texel = sample(source, params, uv.lerp(t));
            target.put_pixel(x, y, image::Rgba(texel));
        }
    }
}

fn sample(source: &RgbaImage, params: TextureParams, uv: DVec2) -> [u8; 4] {
    let (w, h) = source.dimensions();
    let fetch = |x: i64, y: i64| -> [f64; 4] {
        let px = source.get_pixel(wrap(x, w, params.wrap), wrap(y, h, params.wrap)).0;
        px.map(f64::from)
    };

    let rgba = match params.filter {
        FilterMode::Nearest => {
            let x = (uv.x * f64::from(w)).floor() as i64;
            let y = (uv.y * f64::from(h)).floor() as i64;
            fetch(x, y)
        }
        FilterMode::Linear => {
            let fx = uv.x * f64::from(w) - 0.5;
            let fy = uv.y * f64::from(h) - 0.5;
            let (bx, by) = (fx.floor(), fy.floor());
            let (tx, ty) = (fx - bx, fy - by);
            let (bx, by) = (bx as i64, by as i64);
            let (a, b) = (fetch(bx, by), fetch(bx + 1, by));
            let (c, d) = (fetch(bx, by + 1), fetch(bx + 1, by + 1));
            std::array::from_fn(|i| {
                let top = a[i] + (b[i] - a[i]) * tx;
                let bottom = c[i] + (d[i] - c[i]) * tx;
                top + (bottom - top) * ty
            })
        }
    };

    let mut out = rgba.map(|c| c.round().clamp(0.0, 255.0) as u8);
    if params.swizzle == Swizzle::SwapRedBlue {
        out.swap(0, 2);
    }
    out
}

fn wrap(i: i64, n: u32, mode: WrapMode) -> u32 {
    let n = i64::from(n);
    let wrapped = match mode {
        WrapMode::Repeat => i.rem_euclid(n),
        WrapMode::ClampToEdge => i.clamp(0, n - 1),
    };
    wrapped as u32
}
