//! Triangle rasterization
//!
//! Per triangle: map NDC to pixels, walk the clamped bounding box, test pixel centers with
//! edge functions, depth test, then shade with perspective-correct uvs.
//!
//! Winding: a triangle whose screen-space area `cross(B - A, C - A)` is positive is clockwise
//! on screen (y down) and counts as front-facing.

use crate::error::RasterError;
use super::buffer::{DepthBuffer, FrameBuffer};
use super::math::Vec2;
use super::texture::Texture;
use super::types::{Color, ColorRGB, RasterOptions, RasterStats, Topology, TransformedVertex};

/// Triangles with less screen area than this (in pixels, doubled) are skipped
const AREA_EPSILON: f32 = 1e-6;

/// Vertices with |w| below this cannot be interpolated
const W_EPSILON: f32 = 1e-6;

/// Depth sub-range stretched to black..white by the depth visualization
const DEPTH_VIEW_NEAR: f32 = 0.985;
const DEPTH_VIEW_FAR: f32 = 1.0;

/// Map NDC x,y in [-1, 1] to pixel coordinates with the origin at the top-left
pub fn ndc_to_screen(ndc: Vec2, width: usize, height: usize) -> Vec2 {
    Vec2::new(
        (ndc.x + 1.0) / 2.0 * width as f32,
        (1.0 - ndc.y) / 2.0 * height as f32,
    )
}

/// Unnormalized edge-function weights of `p`, one per vertex (each from the edge opposite it)
pub fn edge_weights(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> [f32; 3] {
    [
        (c - b).cross(p - b),
        (a - c).cross(p - c),
        (b - a).cross(p - a),
    ]
}

/// Normalized barycentric weights of `p`, or `None` for a degenerate triangle.
/// `p` is inside (or on an edge) iff all three are >= 0, for either winding.
pub fn barycentric(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> Option<[f32; 3]> {
    let area = (b - a).cross(c - a);
    if !area.is_finite() || area.abs() < AREA_EPSILON {
        return None;
    }
    let [w0, w1, w2] = edge_weights(p, a, b, c);
    Some([w0 / area, w1 / area, w2 / area])
}

/// Interpolate an attribute with the vertices' homogeneous w:
/// `(sum(wi * attr_i / w_i)) / (sum(wi / w_i))`
pub fn perspective_correct(weights: [f32; 3], ws: [f32; 3], attrs: [Vec2; 3]) -> Vec2 {
    let f0 = weights[0] / ws[0];
    let f1 = weights[1] / ws[1];
    let f2 = weights[2] / ws[2];
    let inv_w = f0 + f1 + f2;
    (attrs[0] * f0 + attrs[1] * f1 + attrs[2] * f2) / inv_w
}

/// Interpolated NDC depth, `1 / sum(wi / z_i)`
pub fn interpolate_depth(weights: [f32; 3], zs: [f32; 3]) -> f32 {
    1.0 / (weights[0] / zs[0] + weights[1] / zs[1] + weights[2] / zs[2])
}

/// Linearly map `value` from `low1..high1` to `low2..high2`
pub fn remap(value: f32, low1: f32, high1: f32, low2: f32, high2: f32) -> f32 {
    (value - low1) / (high1 - low1) * (high2 - low2) + low2
}

/// Group an index sequence into triangles.
/// Strips swap the last two indices of every odd window so all triangles keep one winding.
pub fn resolve_triangles(indices: &[u32], topology: Topology) -> impl Iterator<Item = [u32; 3]> + '_ {
    let (count, step) = match topology {
        Topology::TriangleList => (indices.len() / 3, 3),
        Topology::TriangleStrip => (indices.len().saturating_sub(2), 1),
    };

    (0..count).map(move |t| {
        let i = t * step;
        if topology == Topology::TriangleStrip && i % 2 == 1 {
            [indices[i], indices[i + 2], indices[i + 1]]
        } else {
            [indices[i], indices[i + 1], indices[i + 2]]
        }
    })
}

/// Fail fast on any index the draw would read past the vertex list
fn validate_indices(indices: &[u32], topology: Topology, vertex_count: usize) -> Result<(), RasterError> {
    let used = match topology {
        Topology::TriangleList => indices.len() / 3 * 3,
        Topology::TriangleStrip if indices.len() >= 3 => indices.len(),
        Topology::TriangleStrip => 0,
    };

    match indices[..used].iter().position(|&i| i as usize >= vertex_count) {
        Some(position) => Err(RasterError::IndexOutOfRange {
            position,
            index: indices[position],
            vertex_count,
        }),
        None => Ok(()),
    }
}

/// Inclusive pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBounds {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl PixelBounds {
    /// Bounding box of the points, clamped to the buffer. `None` if it lies fully outside.
    pub fn of_points(points: [Vec2; 3], width: usize, height: usize) -> Option<Self> {
        let min_x = points[0].x.min(points[1].x).min(points[2].x).floor().max(0.0);
        let min_y = points[0].y.min(points[1].y).min(points[2].y).floor().max(0.0);
        let max_x = points[0].x.max(points[1].x).max(points[2].x).ceil().min((width - 1) as f32);
        let max_y = points[0].y.max(points[1].y).max(points[2].y).ceil().min((height - 1) as f32);

        if !(min_x <= max_x && min_y <= max_y) {
            return None;
        }

        Some(Self {
            min_x: min_x as usize,
            min_y: min_y as usize,
            max_x: max_x as usize,
            max_y: max_y as usize,
        })
    }
}

/// A triangle mapped to pixel space, ready for scan conversion
struct ScreenTriangle {
    points: [Vec2; 3],
    zs: [f32; 3],
    ws: [f32; 3],
    uvs: [Vec2; 3],
    area: f32,
}

enum Setup {
    Ready(ScreenTriangle),
    Degenerate,
    Culled,
}

fn setup_triangle(verts: [&TransformedVertex; 3], width: usize, height: usize, options: &RasterOptions) -> Setup {
    for v in verts {
        let p = v.position;
        if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite() && p.w.is_finite()) || p.w.abs() < W_EPSILON {
            return Setup::Degenerate;
        }
    }

    let points = verts.map(|v| ndc_to_screen(v.position.xy(), width, height));
    let area = (points[1] - points[0]).cross(points[2] - points[0]);

    if !area.is_finite() || area.abs() < AREA_EPSILON {
        return Setup::Degenerate;
    }

    if options.cull_mode.culls(area) {
        return Setup::Culled;
    }

    Setup::Ready(ScreenTriangle {
        points,
        zs: verts.map(|v| v.position.z),
        ws: verts.map(|v| v.position.w),
        uvs: verts.map(|v| v.uv),
        area,
    })
}

/// Scan-convert one triangle, returning the number of pixels written
fn rasterize_triangle(
    tri: &ScreenTriangle,
    texture: &Texture,
    fb: &mut FrameBuffer,
    db: &mut DepthBuffer,
    options: &RasterOptions,
) -> usize {
    let Some(bounds) = PixelBounds::of_points(tri.points, fb.width, fb.height) else {
        return 0;
    };

    let [a, b, c] = tri.points;
    let mut written = 0;

    for py in bounds.min_y..=bounds.max_y {
        for px in bounds.min_x..=bounds.max_x {
            let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);

            let [w0, w1, w2] = edge_weights(p, a, b, c);
            let weights = [w0 / tri.area, w1 / tri.area, w2 / tri.area];

            if weights.iter().any(|&w| w < 0.0) {
                continue;
            }

            let z = interpolate_depth(weights, tri.zs);
            if !(z > 0.0 && z < 1.0) {
                continue;
            }

            if !db.test_and_set(px, py, z) {
                continue;
            }

            let shaded = if options.show_depth_buffer {
                ColorRGB::grey(remap(z, DEPTH_VIEW_NEAR, DEPTH_VIEW_FAR, 0.0, 1.0))
            } else {
                let uv = perspective_correct(weights, tri.ws, tri.uvs);
                ColorRGB::from_color(texture.sample(uv))
            };

            fb.set_pixel(px, py, shaded.to_color());
            written += 1;
        }
    }

    if options.show_bounding_boxes {
        fb.draw_rect_outline(bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y, Color::DARK_RED);
    }

    written
}

/// Rasterize every triangle of a transformed mesh into the frame and depth buffers.
///
/// Indices are validated up front; an out-of-range index fails the call before any pixel is
/// written. Degenerate and culled triangles are skipped and counted.
pub fn rasterize_mesh(
    vertices: &[TransformedVertex],
    indices: &[u32],
    topology: Topology,
    texture: &Texture,
    fb: &mut FrameBuffer,
    db: &mut DepthBuffer,
    options: &RasterOptions,
) -> Result<RasterStats, RasterError> {
    if fb.width != db.width || fb.height != db.height {
        return Err(RasterError::BufferMismatch {
            frame: (fb.width, fb.height),
            depth: (db.width, db.height),
        });
    }
    validate_indices(indices, topology, vertices.len())?;

    let mut stats = RasterStats::default();

    for (t, [i0, i1, i2]) in resolve_triangles(indices, topology).enumerate() {
        stats.triangles += 1;
        let verts = [
            &vertices[i0 as usize],
            &vertices[i1 as usize],
            &vertices[i2 as usize],
        ];

        match setup_triangle(verts, fb.width, fb.height, options) {
            Setup::Ready(tri) => {
                stats.drawn += 1;
                stats.pixels_written += rasterize_triangle(&tri, texture, fb, db, options);
            }
            Setup::Degenerate => {
                log::debug!("Skipping degenerate triangle {} ({}, {}, {})", t, i0, i1, i2);
                stats.degenerate += 1;
            }
            Setup::Culled => stats.culled += 1,
        }
    }

    log::trace!(
        "Rasterized {}/{} triangles ({} culled, {} degenerate), {} pixels",
        stats.drawn,
        stats.triangles,
        stats.culled,
        stats.degenerate,
        stats.pixels_written
    );

    Ok(stats)
}
