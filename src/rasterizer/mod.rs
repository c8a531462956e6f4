//! CPU software rasterizer
//!
//! Features:
//! - Vertex transform with the homogeneous w kept for interpolation
//! - Edge-function scan conversion over a clamped bounding box
//! - Perspective-correct texture coordinates
//! - Less-than z-buffer
//! - Depth and bounding box debug views

mod buffer;
mod math;
mod render;
mod texture;
mod transform;
mod types;

pub use buffer::*;
pub use math::*;
pub use render::*;
pub use texture::*;
pub use transform::*;
pub use types::*;

/// Default window dimensions
pub const WIDTH: usize = 640;
pub const HEIGHT: usize = 480;
