//! Error types

use std::collections::TryReserveError;
use thiserror::Error;

/// Errors raised by the software pipeline.
///
/// Degenerate geometry is not an error; those triangles are skipped and counted in
/// [`RasterStats`](crate::rasterizer::RasterStats).
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("Buffer dimensions must be non-zero, got {width}x{height}")]
    EmptyBuffer { width: usize, height: usize },
    #[error("Failed to allocate {width}x{height} buffer: {source}")]
    Allocation {
        width: usize,
        height: usize,
        #[source]
        source: TryReserveError,
    },
    #[error("Frame buffer is {}x{} but depth buffer is {}x{}", .frame.0, .frame.1, .depth.0, .depth.1)]
    BufferMismatch {
        frame: (usize, usize),
        depth: (usize, usize),
    },
}

/// Errors raised while loading meshes, textures and configuration
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("OBJ parse error on line {line}: {message}")]
    Obj { line: usize, message: String },
    #[error("Config parse error: {0}")]
    Config(#[from] ron::error::SpannedError),
    #[error("Config serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Mesh has no triangles")]
    EmptyMesh,
}
