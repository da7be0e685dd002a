use hyprlens_render::ChannelOrder;
use std::path::{Path, PathBuf};

/// Pixels decoded from an image file.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Byte order of each pixel in `pixels`.
    pub order: ChannelOrder,
    /// Tightly packed 4-channel, 8-bit pixels, row-major.
    pub pixels: Vec<u8>,
}

/// Errors from decoding an image file.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("image not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {}: {reason}", .path.display())]
    Format { path: PathBuf, reason: String },
}

/// Turns a file on disk into pixels.
pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, DecodeError>;
}

/// Decoder backed by the `image` crate. Produces RGBA bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageFileDecoder;

impl ImageFileDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ImageDecoder for ImageFileDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, DecodeError> {
        let img = image::open(path).map_err(|e| match e {
            image::ImageError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                DecodeError::NotFound(path.to_path_buf())
            }
            image::ImageError::IoError(io) => DecodeError::Io {
                path: path.to_path_buf(),
                source: io,
            },
            other => DecodeError::Format {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        tracing::debug!(path = %path.display(), width, height, "decoded image");
        Ok(DecodedImage {
            width,
            height,
            order: ChannelOrder::Rgba,
            pixels: rgba.into_raw(),
        })
    }
}
