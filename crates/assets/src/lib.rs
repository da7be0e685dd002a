//! Asset loading: decode the configured image and keep it resident as a
//! single GPU texture.
//!
//! # Invariants
//! - The cache owns at most one texture; a previous texture is released
//!   before a new one is allocated.
//! - Once a load has been attempted the cache does not touch the decoder
//!   or the GPU again until [`TextureCache::invalidate`] is called.
//! - An empty or unset image path disables the background; it is not an error.

mod cache;
mod decode;

pub use cache::{LoadFailure, LoadOutcome, TextureCache};
pub use decode::{DecodeError, DecodedImage, ImageDecoder, ImageFileDecoder};

pub fn crate_info() -> &'static str {
    "hyprlens-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }
}
