//! Rendering adapter: the graphics API the plugin draws through and the
//! slice of host render state it is allowed to touch.
//!
//! # Invariants
//! - A texture handle of 0 is never drawable.
//! - Every mutation of the host render modifier made under a
//!   [`RenderSnapshot`] is undone when the snapshot is dropped.
//! - Draws go through [`Frame::draw_texture`], which applies the host's
//!   current render modifier exactly as the compositor would.
//!
//! [`SoftwareGraphics`] is a CPU implementation of [`GraphicsApi`] that
//! records every call and rasterizes into RGBA buffers. It stands in for
//! the compositor's GL context in tests and in the CLI simulator.

mod gfx;
mod snapshot;
mod software;
mod state;

pub use gfx::{
    ChannelOrder, FilterMode, FramebufferId, GfxError, GraphicsApi, Swizzle, Texture,
    TextureHandle, WrapMode,
};
pub use snapshot::RenderSnapshot;
pub use software::{GfxCommand, SoftwareGraphics, TextureParams};
pub use state::{Frame, Modification, MonitorInfo, MonitorRenderData, RenderData, RenderModifier};

pub fn crate_info() -> &'static str {
    "hyprlens-render v0.1.0"
}
