//! Renderer abstraction
//!
//! A [`Renderer`] turns one [`Frame`] description into pixels. Only the software variant lives
//! in this crate; other backends plug in behind the same trait.

use crate::error::RasterError;
use crate::rasterizer::{
    rasterize_mesh, transform_vertices_into, Color, DepthBuffer, FrameBuffer, Mat4, Mesh,
    RasterOptions, RasterStats, Texture, TransformedVertex,
};

/// Everything needed to draw one frame, borrowed for the duration of the call
pub struct Frame<'a> {
    pub mesh: &'a Mesh,
    pub texture: &'a Texture,
    pub world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub clear_color: Color,
}

pub trait Renderer {
    fn name(&self) -> &'static str;

    fn render(&mut self, frame: &Frame<'_>) -> Result<RasterStats, RasterError>;
}

/// CPU renderer owning its color, depth and transformed-vertex storage
pub struct SoftwareRenderer {
    frame_buffer: FrameBuffer,
    depth_buffer: DepthBuffer,
    transformed: Vec<TransformedVertex>,
    pub options: RasterOptions,
}

impl SoftwareRenderer {
    /// Allocate buffers once; they are never resized afterwards
    pub fn new(width: usize, height: usize, options: RasterOptions) -> Result<Self, RasterError> {
        Ok(Self {
            frame_buffer: FrameBuffer::new(width, height)?,
            depth_buffer: DepthBuffer::new(width, height)?,
            transformed: Vec::new(),
            options,
        })
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth_buffer
    }

    pub fn width(&self) -> usize {
        self.frame_buffer.width
    }

    pub fn height(&self) -> usize {
        self.frame_buffer.height
    }
}

impl Renderer for SoftwareRenderer {
    fn name(&self) -> &'static str {
        "software"
    }

    fn render(&mut self, frame: &Frame<'_>) -> Result<RasterStats, RasterError> {
        self.frame_buffer.clear(frame.clear_color);
        self.depth_buffer.reset();

        transform_vertices_into(frame.mesh, &frame.world, &frame.view, &frame.projection, &mut self.transformed);

        rasterize_mesh(
            &self.transformed,
            &frame.mesh.indices,
            frame.mesh.topology,
            frame.texture,
            &mut self.frame_buffer,
            &mut self.depth_buffer,
            &self.options,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;

    #[test]
    fn test_renders_cube_from_default_camera() {
        let mesh = Mesh::cube(20.0);
        let texture = Texture::solid(4, 4, Color::GREEN);
        let camera = Camera::default();
        let mut renderer = SoftwareRenderer::new(64, 48, RasterOptions::default()).unwrap();

        let frame = Frame {
            mesh: &mesh,
            texture: &texture,
            world: Mat4::IDENTITY,
            view: camera.view_matrix(),
            projection: camera.projection_matrix(64.0 / 48.0),
            clear_color: Color::BLACK,
        };

        let stats = renderer.render(&frame).unwrap();
        assert_eq!(stats.triangles, 12);
        assert!(stats.pixels_written > 0);

        let fb = renderer.frame_buffer();
        assert_eq!(fb.get_pixel(32, 24), Color::GREEN);
        assert_eq!(fb.get_pixel(0, 0), Color::BLACK);
        assert!(renderer.depth_buffer().get(32, 24) < 1.0);
    }

    #[test]
    fn test_each_frame_starts_clean() {
        let mesh = Mesh::quad(2.0);
        let texture = Texture::solid(1, 1, Color::WHITE);
        let mut renderer = SoftwareRenderer::new(16, 16, RasterOptions::default()).unwrap();

        let visible = Frame {
            mesh: &mesh,
            texture: &texture,
            world: Mat4::translation(crate::rasterizer::Vec3::new(0.0, 0.0, 1.0)),
            view: Mat4::IDENTITY,
            projection: Mat4::orthographic_lh(4.0, 4.0, 0.0, 2.0),
            clear_color: Color::BLACK,
        };
        renderer.render(&visible).unwrap();
        assert!(renderer.frame_buffer().count(Color::WHITE) > 0);

        // behind the far plane: nothing passes the depth range check
        let hidden = Frame {
            world: Mat4::translation(crate::rasterizer::Vec3::new(0.0, 0.0, 5.0)),
            ..visible
        };
        let stats = renderer.render(&hidden).unwrap();
        assert_eq!(stats.pixels_written, 0);
        assert_eq!(renderer.frame_buffer().count(Color::WHITE), 0);
        assert_eq!(renderer.name(), "software");
    }
}
