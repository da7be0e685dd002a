//! Shared types for the hyprlens workspace.
//!
//! Geometry is expressed in real-valued host pixels (`DVec2`), matching how
//! the compositor reports monitor and texture sizes.

mod types;

pub use glam::{DVec2, UVec2};
pub use types::{Color, Rect, UvRect};

pub fn crate_info() -> &'static str {
    "hyprlens-common v0.1.0"
}
