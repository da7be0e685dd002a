use hyprlens_assets::{ImageDecoder, LoadOutcome, TextureCache};
use hyprlens_common::{Color, DVec2, UvRect};
use hyprlens_config::ConfigSource;
use hyprlens_render::{Frame, GfxError, GraphicsApi, RenderSnapshot, Texture};
use serde::Serialize;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

/// Solid color the blur framebuffer is cleared to before the image is drawn.
/// Shows through when the texture failed to load.
pub const FALLBACK_COLOR: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);

/// What a single intercepted pre-blur pass did.
#[derive(Debug, Clone, PartialEq)]
pub enum PassOutcome {
    /// No texture is allocated; the pass returned without touching host state.
    TextureUnavailable,
    /// The monitor did not ask for a blur background this frame.
    NotRequested,
    /// The blur target was cleared but the texture had no pixels to draw.
    Cleared,
    Drawn { tiled: bool },
    /// A graphics call failed part way; host state was still restored.
    Failed(GfxError),
}

/// Running totals over intercepted passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    pub invocations: u64,
    pub texture_unavailable: u64,
    pub not_requested: u64,
    pub cleared: u64,
    pub drawn: u64,
    pub failed: u64,
}

impl PassStats {
    fn record(&mut self, outcome: &PassOutcome) {
        self.invocations += 1;
        let slot = match outcome {
            PassOutcome::TextureUnavailable => &mut self.texture_unavailable,
            PassOutcome::NotRequested => &mut self.not_requested,
            PassOutcome::Cleared => &mut self.cleared,
            PassOutcome::Drawn { .. } => &mut self.drawn,
            PassOutcome::Failed(_) => &mut self.failed,
        };
        *slot += 1;
    }
}

/// How many copies of a texture fit across a monitor, per axis.
pub fn tile_count(monitor_px: DVec2, texture_px: DVec2) -> DVec2 {
    monitor_px / texture_px
}

/// Replacement body for the compositor's pre-blur pass.
///
/// Owns the texture cache and reloads from the live configuration whenever
/// the cache has been invalidated.
pub struct Interceptor {
    cache: TextureCache,
    config: Rc<dyn ConfigSource>,
    fallback: Color,
    stats: PassStats,
    /// Set once the solid-fill fallback has been logged for the current load.
    fill_reported: bool,
}

impl Interceptor {
    pub fn new(config: Rc<dyn ConfigSource>, decoder: Box<dyn ImageDecoder>) -> Self {
        Self {
            cache: TextureCache::new(decoder),
            config,
            fallback: FALLBACK_COLOR,
            stats: PassStats::default(),
            fill_reported: false,
        }
    }

    pub fn with_fallback(mut self, color: Color) -> Self {
        self.fallback = color;
        self
    }

    pub fn cache(&self) -> &TextureCache {
        &self.cache
    }

    pub fn stats(&self) -> &PassStats {
        &self.stats
    }

    pub fn last_load(&self) -> Option<&LoadOutcome> {
        self.cache.last_outcome()
    }

    /// Drop the cached load so the next pass re-reads the configuration.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
        self.fill_reported = false;
    }

    pub fn release(&mut self, gfx: &mut dyn GraphicsApi) {
        self.cache.release(gfx);
        self.fill_reported = false;
    }

    /// Run one pre-blur pass in place of the host's.
    pub fn on_pre_blur(&mut self, frame: &mut Frame<'_>) -> PassOutcome {
        let _span =
            tracing::debug_span!("pre_blur", monitor = %frame.render.monitor.name).entered();
        let outcome = self.run(frame);
        tracing::trace!(?outcome, "pre-blur pass finished");
        self.stats.record(&outcome);
        outcome
    }

    fn run(&mut self, frame: &mut Frame<'_>) -> PassOutcome {
        if !self.cache.is_loaded() {
            let load = self.cache.ensure_loaded(&*self.config, &mut *frame.gfx);
            tracing::trace!(?load, "texture cache checked");
        }

        let texture = match self.cache.texture() {
            Some(texture) if texture.is_valid() => *texture,
            _ => return PassOutcome::TextureUnavailable,
        };

        if !frame.render.monitor_data.blur_requested() {
            return PassOutcome::NotRequested;
        }

        // UVs must agree with the wrap mode the texture was uploaded with.
        let tiled = self.cache.tiled();

        let mut pass = BlurPass::begin(frame);
        let outcome = match draw_background(&mut pass, &texture, tiled, self.fallback) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "pre-blur pass failed");
                PassOutcome::Failed(e)
            }
        };
        if outcome == PassOutcome::Cleared && !self.fill_reported {
            tracing::warn!(handle = %texture.handle, "texture has no pixels, leaving solid fill");
            self.fill_reported = true;
        }
        outcome
    }
}

impl std::fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptor")
            .field("cache", &self.cache)
            .field("fallback", &self.fallback)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Scope of a redirected blur pass.
///
/// Dropping rebinds the primary framebuffer and marks the blur framebuffer
/// fresh, then the inner snapshot restores the render modifier.
struct BlurPass<'f, 'a> {
    snapshot: RenderSnapshot<'f, 'a>,
}

impl<'f, 'a> BlurPass<'f, 'a> {
    fn begin(frame: &'f mut Frame<'a>) -> Self {
        Self {
            snapshot: RenderSnapshot::capture(frame),
        }
    }
}

impl<'a> Deref for BlurPass<'_, 'a> {
    type Target = Frame<'a>;

    fn deref(&self) -> &Frame<'a> {
        &self.snapshot
    }
}

impl<'a> DerefMut for BlurPass<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Frame<'a> {
        &mut self.snapshot
    }
}

impl Drop for BlurPass<'_, '_> {
    fn drop(&mut self) {
        let primary = self.snapshot.render.monitor_data.primary_fb;
        if let Err(e) = self.snapshot.gfx.bind_framebuffer(primary) {
            tracing::error!(error = %e, fb = %primary, "failed to rebind primary framebuffer");
        }
        self.snapshot.render.monitor_data.blur_fb_dirty = false;
    }
}

fn draw_background(
    frame: &mut Frame<'_>,
    texture: &Texture,
    tiled: bool,
    fallback: Color,
) -> Result<PassOutcome, GfxError> {
    let pixel_size = frame.render.monitor.pixel_size;
    let blur_fb = frame.render.monitor_data.blur_fb;

    frame
        .gfx
        .alloc_framebuffer(blur_fb, pixel_size.max(DVec2::ONE).as_uvec2())?;
    frame.gfx.bind_framebuffer(blur_fb)?;
    frame.gfx.clear(fallback)?;

    if !texture.is_drawable() {
        return Ok(PassOutcome::Cleared);
    }

    let dest = frame.render.monitor.full_rect();
    let uv = if tiled {
        let tiles = tile_count(pixel_size, texture.size);
        tracing::trace!(?tiles, "tiling background");
        UvRect::new(DVec2::ZERO, tiles)
    } else {
        UvRect::FULL
    };
    frame.draw_texture(texture, dest, uv)?;
    Ok(PassOutcome::Drawn { tiled })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyprlens_assets::{ImageFileDecoder, LoadFailure};
    use hyprlens_common::{Rect, UVec2};
    use hyprlens_config::{
        register_defaults, MemoryConfig, IMAGE_PATH_KEY, NEAREST_KEY, TILED_KEY,
    };
    use hyprlens_render::{
        ChannelOrder, FilterMode, FramebufferId, GfxCommand, Modification, MonitorInfo,
        MonitorRenderData, RenderData, RenderModifier, SoftwareGraphics, Swizzle, TextureHandle,
        WrapMode,
    };
    use std::cell::RefCell;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    const GREEN: [u8; 4] = [0, 255, 0, 255];
    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn write_png(path: &Path, w: u32, h: u32, px: [u8; 4]) {
        image::RgbaImage::from_pixel(w, h, image::Rgba(px))
            .save(path)
            .unwrap();
    }

    fn config(path: Option<&Path>, tiled: bool) -> Rc<RefCell<MemoryConfig>> {
        let mut cfg = MemoryConfig::new();
        register_defaults(&mut cfg);
        if let Some(path) = path {
            cfg.set(IMAGE_PATH_KEY, path.to_str().unwrap());
        }
        cfg.set(NEAREST_KEY, true);
        cfg.set(TILED_KEY, tiled);
        Rc::new(RefCell::new(cfg))
    }

    fn interceptor(cfg: &Rc<RefCell<MemoryConfig>>) -> Interceptor {
        Interceptor::new(cfg.clone(), Box::new(ImageFileDecoder::new()))
    }

    struct Setup {
        gfx: SoftwareGraphics,
        render: RenderData,
    }

    impl Setup {
        fn new(pixel_size: DVec2) -> Self {
            let mut gfx = SoftwareGraphics::new();
            let primary = gfx.create_framebuffer();
            let blur = gfx.create_framebuffer();
            gfx.alloc_framebuffer(primary, pixel_size.as_uvec2()).unwrap();
            gfx.bind_framebuffer(primary).unwrap();
            let mut render = RenderData::new(
                MonitorInfo::new("DP-1", pixel_size),
                MonitorRenderData::new(primary, blur),
            );
            render.monitor_data.blur_fb_should_render = true;
            Self { gfx, render }
        }

        fn pass(&mut self, icpt: &mut Interceptor) -> PassOutcome {
            let mut frame = Frame::new(&mut self.render, &mut self.gfx);
            icpt.on_pre_blur(&mut frame)
        }

        fn blur_pixels(&self) -> Vec<[u8; 4]> {
            self.gfx
                .framebuffer(self.render.monitor_data.blur_fb)
                .unwrap()
                .pixels()
                .map(|p| p.0)
                .collect()
        }

        fn draws(&self) -> Vec<(Rect, UvRect)> {
            self.gfx
                .commands()
                .iter()
                .filter_map(|c| match c {
                    GfxCommand::Draw { dest, uv, .. } => Some((*dest, *uv)),
                    _ => None,
                })
                .collect()
        }
    }

    #[test]
    fn tile_count_divides_per_axis() {
        assert_eq!(
            tile_count(DVec2::new(1920.0, 1080.0), DVec2::new(64.0, 64.0)),
            DVec2::new(30.0, 16.875)
        );
    }

    #[test]
    fn disabled_background_leaves_host_untouched() {
        let cfg = config(None, false);
        let mut icpt = interceptor(&cfg);
        let mut s = Setup::new(DVec2::new(4.0, 4.0));
        s.gfx.take_commands();
        let before = s.render.clone();

        assert_eq!(s.pass(&mut icpt), PassOutcome::TextureUnavailable);
        assert_eq!(s.render, before);
        assert!(s.gfx.commands().is_empty());
        assert_eq!(icpt.stats().texture_unavailable, 1);
    }

    #[test]
    fn not_requested_skips_redirect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        write_png(&path, 2, 2, GREEN);
        let cfg = config(Some(&path), false);
        let mut icpt = interceptor(&cfg);
        let mut s = Setup::new(DVec2::new(4.0, 4.0));
        s.render.monitor_data.blur_fb_should_render = false;

        assert_eq!(s.pass(&mut icpt), PassOutcome::NotRequested);
        assert!(s.render.monitor_data.blur_fb_dirty);
        assert!(icpt.cache().is_loaded());
        assert!(s.draws().is_empty());
    }

    #[test]
    fn stretched_draw_fills_blur_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        write_png(&path, 2, 2, GREEN);
        let cfg = config(Some(&path), false);
        let mut icpt = interceptor(&cfg);
        let mut s = Setup::new(DVec2::new(4.0, 4.0));

        assert_eq!(s.pass(&mut icpt), PassOutcome::Drawn { tiled: false });
        assert!(s.blur_pixels().iter().all(|p| *p == GREEN));
        assert_eq!(
            s.draws(),
            vec![(Rect::from_size(DVec2::new(4.0, 4.0)), UvRect::FULL)]
        );
        assert_eq!(s.gfx.bound_framebuffer(), Some(s.render.monitor_data.primary_fb));
        assert!(!s.render.monitor_data.blur_fb_dirty);
    }

    #[test]
    fn tiled_uv_spans_tile_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        write_png(&path, 2, 2, GREEN);
        let cfg = config(Some(&path), true);
        let mut icpt = interceptor(&cfg);
        let mut s = Setup::new(DVec2::new(8.0, 4.0));

        assert_eq!(s.pass(&mut icpt), PassOutcome::Drawn { tiled: true });
        let (_, uv) = s.draws()[0];
        assert_eq!(uv, UvRect::new(DVec2::ZERO, DVec2::new(4.0, 2.0)));
        assert!(s.blur_pixels().iter().all(|p| *p == GREEN));
    }

    #[test]
    fn destination_uses_transformed_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        write_png(&path, 1, 1, GREEN);
        let cfg = config(Some(&path), false);
        let mut icpt = interceptor(&cfg);
        let mut s = Setup::new(DVec2::new(8.0, 4.0));
        s.render.monitor = s
            .render
            .monitor
            .clone()
            .with_transformed_size(DVec2::new(4.0, 8.0));

        s.pass(&mut icpt);
        let (dest, _) = s.draws()[0];
        assert_eq!(dest.size, DVec2::new(4.0, 8.0));
    }

    #[test]
    fn modifier_is_suspended_and_restored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        write_png(&path, 2, 2, GREEN);
        let cfg = config(Some(&path), false);
        let mut icpt = interceptor(&cfg);
        let mut s = Setup::new(DVec2::new(4.0, 4.0));
        let modifier = RenderModifier::new(vec![
            Modification::Translate(DVec2::new(100.0, 100.0)),
            Modification::Scale(3.0),
        ]);
        s.render.modifier = modifier.clone();

        s.pass(&mut icpt);
        let (dest, _) = s.draws()[0];
        assert_eq!(dest, Rect::from_size(DVec2::new(4.0, 4.0)));
        assert_eq!(s.render.modifier, modifier);
    }

    #[test]
    fn missing_file_clears_to_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(Some(&dir.path().join("gone.png")), false);
        let mut icpt = interceptor(&cfg);
        let mut s = Setup::new(DVec2::new(3.0, 3.0));

        assert_eq!(s.pass(&mut icpt), PassOutcome::Cleared);
        assert!(s.blur_pixels().iter().all(|p| *p == RED));
        assert!(s.draws().is_empty());
        assert!(matches!(
            icpt.last_load(),
            Some(LoadOutcome::Failed(LoadFailure::FileNotFound { .. }))
        ));
        assert!(!s.render.monitor_data.blur_fb_dirty);
    }

    #[test]
    fn custom_fallback_color() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(Some(&dir.path().join("gone.png")), false);
        let mut icpt = interceptor(&cfg).with_fallback(Color::from_rgb8(0, 0, 255));
        let mut s = Setup::new(DVec2::new(2.0, 2.0));
        s.pass(&mut icpt);
        assert!(s.blur_pixels().iter().all(|p| *p == [0, 0, 255, 255]));
    }

    #[test]
    fn loads_once_across_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        write_png(&path, 2, 2, GREEN);
        let cfg = config(Some(&path), false);
        let mut icpt = interceptor(&cfg);
        let mut s = Setup::new(DVec2::new(4.0, 4.0));

        for _ in 0..3 {
            s.render.monitor_data.blur_fb_dirty = true;
            assert_eq!(s.pass(&mut icpt), PassOutcome::Drawn { tiled: false });
        }
        assert_eq!(icpt.cache().decode_count(), 1);
        assert_eq!(icpt.stats().drawn, 3);
        assert_eq!(icpt.stats().invocations, 3);
    }

    #[test]
    fn invalidate_picks_up_new_path() {
        let dir = tempfile::tempdir().unwrap();
        let green = dir.path().join("green.png");
        let blue = dir.path().join("blue.png");
        write_png(&green, 1, 1, GREEN);
        write_png(&blue, 1, 1, [0, 0, 255, 255]);
        let cfg = config(Some(&green), false);
        let mut icpt = interceptor(&cfg);
        let mut s = Setup::new(DVec2::new(2.0, 2.0));
        s.pass(&mut icpt);

        cfg.borrow_mut().set(IMAGE_PATH_KEY, blue.to_str().unwrap());
        s.render.monitor_data.blur_fb_dirty = true;
        s.pass(&mut icpt);
        assert!(s.blur_pixels().iter().all(|p| *p == GREEN));

        icpt.invalidate();
        s.render.monitor_data.blur_fb_dirty = true;
        s.pass(&mut icpt);
        assert!(s.blur_pixels().iter().all(|p| *p == [0, 0, 255, 255]));
        assert_eq!(s.gfx.texture_count(), 1);
    }

    #[test]
    fn blur_target_follows_monitor_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        write_png(&path, 1, 1, GREEN);
        let cfg = config(Some(&path), false);
        let mut icpt = interceptor(&cfg);
        let mut s = Setup::new(DVec2::new(4.0, 4.0));
        s.pass(&mut icpt);

        s.render.monitor.pixel_size = DVec2::new(6.0, 2.0);
        s.render.monitor.transformed_size = DVec2::new(6.0, 2.0);
        s.render.monitor_data.blur_fb_dirty = true;
        s.pass(&mut icpt);
        let fb = s.gfx.framebuffer(s.render.monitor_data.blur_fb).unwrap();
        assert_eq!(fb.dimensions(), (6, 2));
    }

    #[test]
    fn release_destroys_texture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        write_png(&path, 1, 1, GREEN);
        let cfg = config(Some(&path), false);
        let mut icpt = interceptor(&cfg);
        let mut s = Setup::new(DVec2::new(2.0, 2.0));
        s.pass(&mut icpt);
        assert_eq!(s.gfx.texture_count(), 1);

        icpt.release(&mut s.gfx);
        assert_eq!(s.gfx.texture_count(), 0);
        assert!(!icpt.cache().is_loaded());
    }

    /// Delegates to a software backend but refuses every draw.
    struct FailingDraw(SoftwareGraphics);

    impl GraphicsApi for FailingDraw {
        fn create_texture(&mut self) -> Result<TextureHandle, GfxError> {
            self.0.create_texture()
        }

        fn destroy_texture(&mut self, handle: TextureHandle) {
            self.0.destroy_texture(handle)
        }

        fn set_filter(&mut self, handle: TextureHandle, filter: FilterMode) -> Result<(), GfxError> {
            self.0.set_filter(handle, filter)
        }

        fn set_wrap(&mut self, handle: TextureHandle, wrap: WrapMode) -> Result<(), GfxError> {
            self.0.set_wrap(handle, wrap)
        }

        fn set_swizzle(&mut self, handle: TextureHandle, swizzle: Swizzle) -> Result<(), GfxError> {
            self.0.set_swizzle(handle, swizzle)
        }

        fn upload_channel_order(&self) -> ChannelOrder {
            self.0.upload_channel_order()
        }

        fn upload_rgba8(
            &mut self,
            handle: TextureHandle,
            width: u32,
            height: u32,
            pixels: &[u8],
        ) -> Result<(), GfxError> {
            self.0.upload_rgba8(handle, width, height, pixels)
        }

        fn alloc_framebuffer(&mut self, fb: FramebufferId, size: UVec2) -> Result<(), GfxError> {
            self.0.alloc_framebuffer(fb, size)
        }

        fn bind_framebuffer(&mut self, fb: FramebufferId) -> Result<(), GfxError> {
            self.0.bind_framebuffer(fb)
        }

        fn clear(&mut self, color: Color) -> Result<(), GfxError> {
            self.0.clear(color)
        }

        fn draw_texture(&mut self, _: &Texture, _: Rect, _: UvRect) -> Result<(), GfxError> {
            Err(GfxError::NoTarget)
        }
    }

    #[test]
    fn failed_draw_still_restores_host_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        write_png(&path, 2, 2, GREEN);
        let cfg = config(Some(&path), false);
        let mut icpt = interceptor(&cfg);
        let Setup { gfx, mut render } = Setup::new(DVec2::new(4.0, 4.0));
        let mut gfx = FailingDraw(gfx);
        let modifier = RenderModifier::new(vec![Modification::Scale(2.0)]);
        render.modifier = modifier.clone();

        let outcome = icpt.on_pre_blur(&mut Frame::new(&mut render, &mut gfx));
        assert_eq!(outcome, PassOutcome::Failed(GfxError::NoTarget));
        assert_eq!(gfx.0.bound_framebuffer(), Some(render.monitor_data.primary_fb));
        assert!(!render.monitor_data.blur_fb_dirty);
        assert_eq!(render.modifier, modifier);
        assert_eq!(icpt.stats().failed, 1);
    }

    #[test]
    fn identity_modifier_survives_pass() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        write_png(&path, 2, 2, GREEN);
        let cfg = config(Some(&path), false);
        let mut icpt = interceptor(&cfg);
        let mut s = Setup::new(DVec2::new(4.0, 4.0));
        assert!(s.render.modifier.is_identity());

        assert_eq!(s.pass(&mut icpt), PassOutcome::Drawn { tiled: false });
        assert_eq!(s.render.modifier, RenderModifier::identity());
        assert_eq!(s.draws()[0].0, Rect::from_size(DVec2::new(4.0, 4.0)));
        assert_eq!(s.gfx.bound_framebuffer(), Some(s.render.monitor_data.primary_fb));
    }

    fn write_red_blue(path: &Path) {
        image::RgbaImage::from_fn(2, 1, |x, _| image::Rgba(if x == 0 { RED } else { BLUE }))
            .save(path)
            .unwrap();
    }

    #[test]
    fn tiling_follows_uploaded_wrap_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rb.png");
        write_red_blue(&path);
        let cfg = config(Some(&path), false);
        let mut icpt = interceptor(&cfg);
        let mut s = Setup::new(DVec2::new(4.0, 1.0));

        assert_eq!(s.pass(&mut icpt), PassOutcome::Drawn { tiled: false });
        assert_eq!(s.blur_pixels(), vec![RED, RED, BLUE, BLUE]);

        // Clamped texture: the new setting waits for a reload.
        cfg.borrow_mut().set(TILED_KEY, true);
        s.render.monitor_data.blur_fb_dirty = true;
        assert_eq!(s.pass(&mut icpt), PassOutcome::Drawn { tiled: false });
        assert_eq!(s.blur_pixels(), vec![RED, RED, BLUE, BLUE]);

        icpt.invalidate();
        s.render.monitor_data.blur_fb_dirty = true;
        assert_eq!(s.pass(&mut icpt), PassOutcome::Drawn { tiled: true });
        assert_eq!(s.blur_pixels(), vec![RED, BLUE, RED, BLUE]);
    }

    /// Collects formatted log output.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn count(&self, needle: &str) -> usize {
            String::from_utf8_lossy(&self.0.lock().unwrap())
                .matches(needle)
                .count()
        }
    }

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn solid_fill_warning_once_per_load() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let dir = tempfile::tempdir().unwrap();
            let cfg = config(Some(&dir.path().join("gone.png")), false);
            let mut icpt = interceptor(&cfg);
            let mut s = Setup::new(DVec2::new(2.0, 2.0));

            for _ in 0..5 {
                s.render.monitor_data.blur_fb_dirty = true;
                assert_eq!(s.pass(&mut icpt), PassOutcome::Cleared);
            }
            assert_eq!(logs.count("texture has no pixels"), 1);
            assert_eq!(logs.count("background path does not exist"), 1);

            icpt.invalidate();
            for _ in 0..3 {
                s.render.monitor_data.blur_fb_dirty = true;
                s.pass(&mut icpt);
            }
            assert_eq!(logs.count("texture has no pixels"), 2);
        });
    }
}
