//! Vertex transform stage: object space to clip space, then the perspective divide

use super::math::{Mat4, Vec4};
use super::types::{Mesh, TransformedVertex};

/// Transform every mesh vertex, in order, into a fresh list
pub fn transform_vertices(mesh: &Mesh, world: &Mat4, view: &Mat4, projection: &Mat4) -> Vec<TransformedVertex> {
    let mut out = Vec::with_capacity(mesh.vertices.len());
    transform_vertices_into(mesh, world, view, projection, &mut out);
    out
}

/// Same as [`transform_vertices`] but reuses `out`'s storage across frames
pub fn transform_vertices_into(
    mesh: &Mesh,
    world: &Mat4,
    view: &Mat4,
    projection: &Mat4,
    out: &mut Vec<TransformedVertex>,
) {
    let wvp = *projection * *view * *world;

    out.clear();
    out.reserve(mesh.vertices.len());

    for v in &mesh.vertices {
        let clip = wvp.transform(Vec4::from_vec3(v.position, 1.0));

        // w is kept undivided for perspective-correct interpolation.
        // A w near zero yields huge or non-finite values; the rasterizer rejects those triangles.
        let position = Vec4::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w, clip.w);

        out.push(TransformedVertex {
            position,
            color: v.color,
            uv: v.uv,
            normal: world.transform_vector(v.normal).normalize(),
            tangent: world.transform_vector(v.tangent).normalize(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::{Vec2, Vec3};
    use crate::rasterizer::types::{Topology, Vertex};

    fn single(position: Vec3) -> Mesh {
        let mut v = Vertex::from_pos(position.x, position.y, position.z);
        v.uv = Vec2::new(0.25, 0.75);
        v.normal = Vec3::new(0.0, 0.0, -2.0);
        v.tangent = Vec3::new(3.0, 0.0, 0.0);
        Mesh::new(vec![v], vec![], Topology::TriangleList)
    }

    #[test]
    fn test_divides_xyz_and_keeps_w() {
        let mesh = single(Vec3::new(2.0, 4.0, 10.0));
        let projection = Mat4::perspective_lh(std::f32::consts::FRAC_PI_2, 1.0, 1.0, 100.0);
        let out = transform_vertices(&mesh, &Mat4::IDENTITY, &Mat4::IDENTITY, &projection);

        assert_eq!(out.len(), 1);
        let p = out[0].position;
        assert!((p.w - 10.0).abs() < 1e-5);
        assert!((p.x - 0.2).abs() < 1e-5);
        assert!((p.y - 0.4).abs() < 1e-5);
        assert!(p.z > 0.0 && p.z < 1.0);
        assert_eq!(out[0].uv, Vec2::new(0.25, 0.75));
    }

    #[test]
    fn test_normals_use_linear_part_only() {
        let mesh = single(Vec3::ZERO);
        let world = Mat4::translation(Vec3::new(5.0, 5.0, 5.0)) * Mat4::rotation_y(std::f32::consts::PI);
        let out = transform_vertices(&mesh, &world, &Mat4::IDENTITY, &Mat4::IDENTITY);

        let n = out[0].normal;
        let t = out[0].tangent;
        assert!((n.z - 1.0).abs() < 1e-5 && n.x.abs() < 1e-5);
        assert!((t.x + 1.0).abs() < 1e-5 && t.z.abs() < 1e-5);
        // translation still applies to the position
        assert!((out[0].position.x - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_preserves_order_and_reuses_storage() {
        let mut mesh = Mesh::quad(2.0);
        mesh.vertices[3].color.r = 0.5;
        let mut out = vec![TransformedVertex::default(); 10];
        transform_vertices_into(&mesh, &Mat4::IDENTITY, &Mat4::IDENTITY, &Mat4::IDENTITY, &mut out);

        assert_eq!(out.len(), 4);
        for (src, dst) in mesh.vertices.iter().zip(&out) {
            assert_eq!(src.position, dst.position.xyz());
            assert_eq!(src.color, dst.color);
        }
    }

    #[test]
    fn test_zero_w_is_not_fatal() {
        let mesh = single(Vec3::new(1.0, 1.0, 0.0));
        let projection = Mat4::perspective_lh(1.0, 1.0, 1.0, 10.0);
        let out = transform_vertices(&mesh, &Mat4::IDENTITY, &Mat4::IDENTITY, &projection);
        assert_eq!(out[0].position.w, 0.0);
        assert!(!out[0].position.x.is_finite());
    }
}
