//! softraster: textured meshes rendered entirely on the CPU
//!
//! - Vertex transform with perspective divide (w kept for interpolation)
//! - Edge-function rasterization with perspective-correct uvs
//! - Z-buffer, nearest-neighbor texturing
//! - Depth and bounding box debug views

pub mod app;
pub mod assets;
pub mod camera;
pub mod config;
pub mod error;
pub mod rasterizer;
pub mod renderer;

pub use error::{AssetError, RasterError};
pub use renderer::{Frame, Renderer, SoftwareRenderer};
