use crate::decode::{DecodeError, DecodedImage, ImageDecoder};
use hyprlens_common::DVec2;
use hyprlens_config::{ConfigError, ConfigSource, Settings};
use hyprlens_render::{
    FilterMode, GfxError, GraphicsApi, Swizzle, Texture, TextureHandle, WrapMode,
};
use std::path::PathBuf;

/// Why a load did not produce a usable texture.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadFailure {
    /// The image path setting could not be read.
    Config(ConfigError),
    FileNotFound { path: PathBuf },
    Decode { path: PathBuf, reason: String },
    Gfx(GfxError),
}

/// Result of [`TextureCache::ensure_loaded`].
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The image is resident at this pixel size.
    Loaded { size: DVec2 },
    /// No image is configured.
    Disabled,
    Failed(LoadFailure),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Owns the background texture and loads it on demand.
///
/// The `loaded` flag is the only change detection: once set, nothing is
/// re-read until [`TextureCache::invalidate`] clears it.
pub struct TextureCache {
    decoder: Box<dyn ImageDecoder>,
    texture: Option<Texture>,
    loaded: bool,
    last_outcome: Option<LoadOutcome>,
    decode_count: u64,
    config_error_reported: bool,
    tiled: bool,
}

impl TextureCache {
    pub fn new(decoder: Box<dyn ImageDecoder>) -> Self {
        Self {
            decoder,
            texture: None,
            loaded: false,
            last_outcome: None,
            decode_count: 0,
            config_error_reported: false,
            tiled: false,
        }
    }

    /// Whether a load has been attempted since the last invalidation.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    /// Outcome of the attempt that set the loaded flag, if any.
    pub fn last_outcome(&self) -> Option<&LoadOutcome> {
        self.last_outcome.as_ref()
    }

    /// Whether the resident texture was uploaded with repeat wrapping.
    pub fn tiled(&self) -> bool {
        self.tiled
    }

    /// Number of times the decoder has been invoked.
    pub fn decode_count(&self) -> u64 {
        self.decode_count
    }

    /// Load the configured image unless a load was already attempted.
    pub fn ensure_loaded(
        &mut self,
        config: &dyn ConfigSource,
        gfx: &mut dyn GraphicsApi,
    ) -> LoadOutcome {
        if self.loaded {
            if let Some(outcome) = &self.last_outcome {
                return outcome.clone();
            }
        }

        let _span = tracing::info_span!("texture_load").entered();
        let settings = Settings::new(config);

        let path = match settings.image_path() {
            Ok(Some(path)) => path,
            Ok(None) => {
                tracing::info!("background path is empty, clearing texture");
                self.drop_texture(gfx);
                return LoadOutcome::Disabled;
            }
            Err(e) => {
                if !self.config_error_reported {
                    tracing::error!(error = %e, "failed to get background config value");
                    self.config_error_reported = true;
                }
                return LoadOutcome::Failed(LoadFailure::Config(e));
            }
        };

        self.drop_texture(gfx);
        let handle = match gfx.create_texture() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(error = %e, "failed to allocate texture");
                return self.finish(LoadOutcome::Failed(LoadFailure::Gfx(e)));
            }
        };
        self.texture = Some(Texture::empty(handle));

        if !path.exists() {
            // The empty texture stays allocated; the pass clears to a solid color.
            tracing::error!(path = %path.display(), "background path does not exist");
            return self.finish(LoadOutcome::Failed(LoadFailure::FileNotFound { path }));
        }

        tracing::info!(path = %path.display(), "loading background texture");
        self.decode_count += 1;
        let image = match self.decoder.decode(&path) {
            Ok(image) => image,
            Err(DecodeError::NotFound(path)) => {
                tracing::error!(path = %path.display(), "background vanished before decode");
                return self.finish(LoadOutcome::Failed(LoadFailure::FileNotFound { path }));
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to decode background");
                return self.finish(LoadOutcome::Failed(LoadFailure::Decode {
                    path,
                    reason: e.to_string(),
                }));
            }
        };

        let nearest = settings.nearest().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "nearest filter setting unavailable, using linear");
            false
        });
        let tiled = settings.tiled().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "tiled setting unavailable, stretching");
            false
        });

        if let Err(e) = upload(gfx, handle, &image, nearest, tiled) {
            tracing::error!(error = %e, %handle, "failed to upload background");
            return self.finish(LoadOutcome::Failed(LoadFailure::Gfx(e)));
        }

        let size = DVec2::new(f64::from(image.width), f64::from(image.height));
        self.texture = Some(Texture { handle, size });
        self.tiled = tiled;
        tracing::info!(
            %handle,
            width = image.width,
            height = image.height,
            nearest,
            tiled,
            "loaded background texture"
        );
        self.finish(LoadOutcome::Loaded { size })
    }

    /// Forget the previous attempt so the next pass reloads from config.
    pub fn invalidate(&mut self) {
        tracing::debug!("texture cache invalidated");
        self.loaded = false;
        self.last_outcome = None;
        self.config_error_reported = false;
    }

    /// Release the texture and reset to the initial state.
    pub fn release(&mut self, gfx: &mut dyn GraphicsApi) {
        self.drop_texture(gfx);
        self.invalidate();
    }

    fn drop_texture(&mut self, gfx: &mut dyn GraphicsApi) {
        self.tiled = false;
        if let Some(texture) = self.texture.take() {
            tracing::debug!(handle = %texture.handle, "destroying texture");
            gfx.destroy_texture(texture.handle);
        }
    }

    fn finish(&mut self, outcome: LoadOutcome) -> LoadOutcome {
        self.loaded = true;
        self.last_outcome = Some(outcome.clone());
        outcome
    }
}

impl std::fmt::Debug for TextureCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureCache")
            .field("texture", &self.texture)
            .field("loaded", &self.loaded)
            .field("last_outcome", &self.last_outcome)
            .field("decode_count", &self.decode_count)
            .finish_non_exhaustive()
    }
}

fn upload(
    gfx: &mut dyn GraphicsApi,
    handle: TextureHandle,
    image: &DecodedImage,
    nearest: bool,
    tiled: bool,
) -> Result<(), GfxError> {
    let filter = if nearest {
        FilterMode::Nearest
    } else {
        FilterMode::Linear
    };
    let wrap = if tiled {
        WrapMode::Repeat
    } else {
        WrapMode::ClampToEdge
    };
    gfx.set_filter(handle, filter)?;
    gfx.set_wrap(handle, wrap)?;

    let swizzle = Swizzle::between(image.order, gfx.upload_channel_order());
    if swizzle != Swizzle::Identity {
        tracing::debug!(%handle, source = ?image.order, "swizzling red and blue");
        gfx.set_swizzle(handle, swizzle)?;
    }

    gfx.upload_rgba8(handle, image.width, image.height, &image.pixels)
}
