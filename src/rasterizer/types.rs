//! Core types for the rasterizer

use serde::{Serialize, Deserialize};
use super::math::{Vec2, Vec3, Vec4};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    /// Bounding box overlay color
    pub const DARK_RED: Color = Color { r: 100, g: 0, b: 0, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pack as `0xRRGGBBAA`
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 24) | ((self.g as u32) << 16) | ((self.b as u32) << 8) | (self.a as u32)
    }

    pub fn from_u32(packed: u32) -> Self {
        let [r, g, b, a] = packed.to_be_bytes();
        Self { r, g, b, a }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Floating point color used while shading a pixel
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorRGB {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl ColorRGB {
    pub const BLACK: ColorRGB = ColorRGB { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: ColorRGB = ColorRGB { r: 1.0, g: 1.0, b: 1.0 };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn grey(v: f32) -> Self {
        Self { r: v, g: v, b: v }
    }

    pub fn from_color(c: Color) -> Self {
        Self {
            r: c.r as f32 / 255.0,
            g: c.g as f32 / 255.0,
            b: c.b as f32 / 255.0,
        }
    }

    /// Clamp every channel to [0, 1]. NaN becomes 0.
    pub fn saturate(self) -> Self {
        let s = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self { r: s(self.r), g: s(self.g), b: s(self.b) }
    }

    /// Saturate and quantize to 8 bits per channel (opaque)
    pub fn to_color(self) -> Color {
        let c = self.saturate();
        Color::new(
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
        )
    }
}

/// A mesh vertex as produced by asset loading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub color: ColorRGB,
    pub uv: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            color: ColorRGB::WHITE,
            uv: Vec2::ZERO,
            normal: Vec3::ZERO,
            tangent: Vec3::ZERO,
        }
    }
}

impl Vertex {
    pub fn new(position: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self {
            position,
            uv,
            normal,
            ..Default::default()
        }
    }

    pub fn from_pos(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            ..Default::default()
        }
    }
}

/// How an index sequence groups into triangles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    /// Independent triples
    #[default]
    TriangleList,
    /// Sliding window of three, every odd window has its last two indices swapped
    TriangleStrip,
}

/// Indexed triangle mesh, immutable while a frame is rendered
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub topology: Topology,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>, topology: Topology) -> Self {
        Self { vertices, indices, topology }
    }

    /// Number of triangles the index sequence describes
    pub fn triangle_count(&self) -> usize {
        match self.topology {
            Topology::TriangleList => self.indices.len() / 3,
            Topology::TriangleStrip => self.indices.len().saturating_sub(2),
        }
    }

    /// Axis aligned square in the XY plane, facing -Z, as a 4 vertex strip.
    /// Corners are top-left, top-right, bottom-left, bottom-right with uvs from (0,0) to (1,1).
    pub fn quad(size: f32) -> Self {
        let h = size / 2.0;
        let normal = Vec3::new(0.0, 0.0, -1.0);
        let corners = [
            (Vec3::new(-h, h, 0.0), Vec2::new(0.0, 0.0)),
            (Vec3::new(h, h, 0.0), Vec2::new(1.0, 0.0)),
            (Vec3::new(-h, -h, 0.0), Vec2::new(0.0, 1.0)),
            (Vec3::new(h, -h, 0.0), Vec2::new(1.0, 1.0)),
        ];
        let vertices = corners
            .iter()
            .map(|&(position, uv)| Vertex {
                position,
                uv,
                normal,
                tangent: Vec3::new(1.0, 0.0, 0.0),
                ..Default::default()
            })
            .collect();

        Self::new(vertices, vec![0, 1, 2, 3], Topology::TriangleStrip)
    }

    /// Cube centered on the origin with four vertices per face (so each face gets the full texture)
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;

        // (normal, tangent) per face; the face's up axis is normal x tangent
        let faces = [
            (Vec3::new(0.0, 0.0, -1.0), Vec3::new(1.0, 0.0, 0.0)),  // Front
            (Vec3::new(0.0, 0.0, 1.0), Vec3::new(-1.0, 0.0, 0.0)),  // Back
            (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),   // Right
            (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0)), // Left
            (Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),   // Top
            (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),  // Bottom
        ];

        let uvs = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, tangent) in faces {
            let up = tangent.cross(normal);
            let center = normal * h;
            let corners = [
                center - tangent * h + up * h,
                center + tangent * h + up * h,
                center - tangent * h - up * h,
                center + tangent * h - up * h,
            ];

            let base = vertices.len() as u32;
            for (position, uv) in corners.into_iter().zip(uvs) {
                vertices.push(Vertex {
                    position,
                    uv,
                    normal,
                    tangent,
                    ..Default::default()
                });
            }

            // Two clockwise triangles per face (seen from outside)
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
        }

        Self::new(vertices, indices, Topology::TriangleList)
    }
}

/// One vertex after the transform stage.
///
/// `position.x/y/z` are divided by the clip-space w, `position.w` keeps that w
/// for perspective-correct interpolation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformedVertex {
    pub position: Vec4,
    pub color: ColorRGB,
    pub uv: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
}

/// Which screen-space winding to discard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CullMode {
    #[default]
    None,
    /// Skip counter-clockwise (negative area) triangles
    Back,
    /// Skip clockwise (positive area) triangles
    Front,
}

impl CullMode {
    pub fn next(self) -> Self {
        match self {
            CullMode::None => CullMode::Back,
            CullMode::Back => CullMode::Front,
            CullMode::Front => CullMode::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CullMode::None => "NONE",
            CullMode::Back => "BACK",
            CullMode::Front => "FRONT",
        }
    }

    /// Whether a triangle with this signed screen area is discarded
    pub fn culls(self, signed_area: f32) -> bool {
        match self {
            CullMode::None => false,
            CullMode::Back => signed_area < 0.0,
            CullMode::Front => signed_area > 0.0,
        }
    }
}

/// Per-draw rasterizer options
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterOptions {
    /// Replace texture color with a greyscale remap of depth
    pub show_depth_buffer: bool,
    /// Outline every triangle's clamped screen bounding box
    pub show_bounding_boxes: bool,
    pub cull_mode: CullMode,
}

/// Counters for one rasterization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterStats {
    pub triangles: usize,
    pub drawn: usize,
    pub culled: usize,
    pub degenerate: usize,
    pub pixels_written: usize,
}

impl std::ops::AddAssign for RasterStats {
    fn add_assign(&mut self, other: RasterStats) {
        self.triangles += other.triangles;
        self.drawn += other.drawn;
        self.culled += other.culled;
        self.degenerate += other.degenerate;
        self.pixels_written += other.pixels_written;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_packing() {
        let c = Color::with_alpha(1, 2, 3, 4);
        assert_eq!(c.to_u32(), 0x01020304);
        assert_eq!(Color::from_u32(c.to_u32()), c);
    }

    #[test]
    fn test_to_color_saturates() {
        let c = ColorRGB::new(1.5, -0.2, 0.5).to_color();
        assert_eq!(c, Color::new(255, 0, 128));
    }

    #[test]
    fn test_color_round_trips_through_float() {
        for v in 0..=255u8 {
            let c = Color::new(v, v, v);
            assert_eq!(ColorRGB::from_color(c).to_color(), c);
        }
    }

    #[test]
    fn test_triangle_count() {
        assert_eq!(Mesh::quad(1.0).triangle_count(), 2);
        assert_eq!(Mesh::cube(1.0).triangle_count(), 12);
        let empty = Mesh::new(Vec::new(), vec![0], Topology::TriangleStrip);
        assert_eq!(empty.triangle_count(), 0);
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.vertices.len(), 24);
        for v in &cube.vertices {
            assert!(v.position.dot(v.normal) > 0.0);
        }
    }

    #[test]
    fn test_cull_mode_cycle() {
        assert_eq!(CullMode::None.next().next().next(), CullMode::None);
        assert!(CullMode::Back.culls(-1.0));
        assert!(!CullMode::Back.culls(1.0));
        assert!(CullMode::Front.culls(1.0));
        assert!(!CullMode::None.culls(-1.0));
    }
}
