//! Asset loading: meshes and textures from disk, with built-in fallbacks

mod obj;

pub use obj::*;

use std::path::Path;
use crate::rasterizer::{Color, Mesh, Texture};

/// Load the configured mesh, or the built-in cube if none is set or loading fails
pub fn load_mesh_or_default(path: Option<&Path>) -> Mesh {
    match path.map(load_obj) {
        Some(Ok(mesh)) => mesh,
        Some(Err(e)) => {
            log::warn!("Failed to load mesh, using built-in cube: {}", e);
            Mesh::cube(20.0)
        }
        None => Mesh::cube(20.0),
    }
}

/// Load the configured texture, or a checkerboard if none is set or loading fails
pub fn load_texture_or_default(path: Option<&Path>) -> Texture {
    match path.map(Texture::from_file) {
        Some(Ok(texture)) => texture,
        Some(Err(e)) => {
            log::warn!("Failed to load texture, using checkerboard: {}", e);
            default_texture()
        }
        None => default_texture(),
    }
}

fn default_texture() -> Texture {
    Texture::checkerboard(64, 64, 8, Color::new(230, 230, 230), Color::new(200, 60, 40))
}
