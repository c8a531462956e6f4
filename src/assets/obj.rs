//! Wavefront OBJ loading
//!
//! Supports `v`, `vt`, `vn` and `f` statements. Faces with more than three corners are fan
//! triangulated. Everything else (`o`, `g`, `s`, `usemtl`, `mtllib`, ...) is ignored.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, i64 as integer, space0, space1},
    combinator::{all_consuming, map, opt},
    multi::separated_list1,
    number::complete::float,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::error::AssetError;
use crate::rasterizer::{Mesh, Topology, Vec2, Vec3, Vertex};

/// One `a/b/c` face corner, indices as written (1-based or negative)
#[derive(Debug, Clone, Copy, PartialEq)]
struct Corner {
    position: i64,
    uv: Option<i64>,
    normal: Option<i64>,
}

#[derive(Debug, PartialEq)]
enum Statement {
    Position(Vec3),
    TexCoord(Vec2),
    Normal(Vec3),
    Face(Vec<Corner>),
    Other,
}

fn vec3(input: &str) -> IResult<&str, Vec3> {
    map(
        tuple((float, preceded(space1, float), preceded(space1, float))),
        |(x, y, z)| Vec3::new(x, y, z),
    )(input)
}

fn position(input: &str) -> IResult<&str, Statement> {
    // optional w is accepted and dropped
    map(
        terminated(preceded(tuple((tag("v"), space1)), vec3), opt(preceded(space1, float))),
        Statement::Position,
    )(input)
}

fn tex_coord(input: &str) -> IResult<&str, Statement> {
    map(
        terminated(
            preceded(tuple((tag("vt"), space1)), tuple((float, preceded(space1, float)))),
            opt(preceded(space1, float)),
        ),
        |(u, v)| Statement::TexCoord(Vec2::new(u, v)),
    )(input)
}

fn normal(input: &str) -> IResult<&str, Statement> {
    map(preceded(tuple((tag("vn"), space1)), vec3), Statement::Normal)(input)
}

fn corner(input: &str) -> IResult<&str, Corner> {
    let (input, position) = integer(input)?;
    let (input, rest) = opt(preceded(char('/'), tuple((opt(integer), opt(preceded(char('/'), integer))))))(input)?;
    let (uv, normal) = rest.unwrap_or((None, None));
    Ok((input, Corner { position, uv, normal }))
}

fn face(input: &str) -> IResult<&str, Statement> {
    map(
        preceded(tuple((tag("f"), space1)), separated_list1(space1, corner)),
        Statement::Face,
    )(input)
}

fn other(input: &str) -> IResult<&str, Statement> {
    let keyword = alt((tag("o"), tag("g"), tag("s"), tag("usemtl"), tag("mtllib"), tag("l"), tag("p")));
    map(
        tuple((keyword, nom::combinator::rest)),
        |_| Statement::Other,
    )(input)
}

fn statement(line: &str) -> IResult<&str, Statement> {
    all_consuming(terminated(alt((tex_coord, normal, position, face, other)), space0))(line)
}

/// Resolve a 1-based or negative OBJ index against `len` already-defined elements
fn resolve(index: i64, len: usize, what: &str, line: usize) -> Result<usize, AssetError> {
    let resolved = if index > 0 {
        index - 1
    } else {
        len as i64 + index
    };

    if index == 0 || resolved < 0 || resolved as usize >= len {
        return Err(AssetError::Obj {
            line,
            message: format!("{} index {} out of range ({} defined)", what, index, len),
        });
    }
    Ok(resolved as usize)
}

/// Parse OBJ source into a triangle list mesh
pub fn parse_obj(source: &str) -> Result<Mesh, AssetError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();

    let mut vertices: Vec<Vertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    let mut lookup: HashMap<(usize, Option<usize>, Option<usize>), u32> = HashMap::new();

    for (i, raw) in source.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let (_, parsed) = statement(line).map_err(|e| AssetError::Obj {
            line: line_no,
            message: format!("cannot parse `{}` ({:?})", line, e),
        })?;

        match parsed {
            Statement::Position(p) => positions.push(p),
            // flip v so (0,0) is the top-left of the image
            Statement::TexCoord(t) => uvs.push(Vec2::new(t.x, 1.0 - t.y)),
            Statement::Normal(n) => normals.push(n),
            Statement::Face(corners) => {
                if corners.len() < 3 {
                    return Err(AssetError::Obj {
                        line: line_no,
                        message: "face needs at least three corners".to_string(),
                    });
                }

                let mut face_indices = Vec::with_capacity(corners.len());
                for c in &corners {
                    let p = resolve(c.position, positions.len(), "position", line_no)?;
                    let t = c.uv.map(|t| resolve(t, uvs.len(), "uv", line_no)).transpose()?;
                    let n = c.normal.map(|n| resolve(n, normals.len(), "normal", line_no)).transpose()?;

                    let index = *lookup.entry((p, t, n)).or_insert_with(|| {
                        vertices.push(Vertex {
                            position: positions[p],
                            uv: t.map(|t| uvs[t]).unwrap_or_default(),
                            normal: n.map(|n| normals[n]).unwrap_or_default(),
                            ..Default::default()
                        });
                        (vertices.len() - 1) as u32
                    });
                    face_indices.push(index);
                }

                for k in 1..face_indices.len() - 1 {
                    indices.extend_from_slice(&[face_indices[0], face_indices[k], face_indices[k + 1]]);
                }
            }
            Statement::Other => {}
        }
    }

    if indices.is_empty() {
        return Err(AssetError::EmptyMesh);
    }

    compute_tangents(&mut vertices, &indices);
    Ok(Mesh::new(vertices, indices, Topology::TriangleList))
}

/// Load and parse an OBJ file
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, AssetError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    let mesh = parse_obj(&source)?;
    log::info!(
        "Loaded mesh: {} ({} vertices, {} triangles)",
        path.display(),
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Accumulate per-triangle tangents from uv gradients, then orthogonalize against the normal
fn compute_tangents(vertices: &mut [Vertex], indices: &[u32]) {
    let mut accum = vec![Vec3::ZERO; vertices.len()];

    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (v0, v1, v2) = (&vertices[i0], &vertices[i1], &vertices[i2]);

        let edge0 = v1.position - v0.position;
        let edge1 = v2.position - v0.position;
        let diff_x = Vec2::new(v1.uv.x - v0.uv.x, v2.uv.x - v0.uv.x);
        let diff_y = Vec2::new(v1.uv.y - v0.uv.y, v2.uv.y - v0.uv.y);

        let r = 1.0 / diff_x.cross(diff_y);
        if !r.is_finite() {
            continue;
        }

        let tangent = (edge0 * diff_y.y - edge1 * diff_y.x) * r;
        for i in [i0, i1, i2] {
            accum[i] = accum[i] + tangent;
        }
    }

    for (v, t) in vertices.iter_mut().zip(accum) {
        v.tangent = (t - v.normal * v.normal.dot(t)).normalize();
    }
}
