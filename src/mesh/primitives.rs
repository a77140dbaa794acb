//! Primitive solids used as growth segments
//!
//! Every face owns its vertices, so adjacent faces never share a normal and
//! shading stays hard-edged. Triangles wind counter-clockwise when viewed from
//! outside the solid. All shapes stand on the origin and extend one unit
//! along +y, which is the axis growth extends along.

use super::colors::{ColorMapper, VertexColor};
use super::MeshData;
use glam::Vec3;
use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Corner UVs for quad faces, in corner order
const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Number of sides on the cylinder primitive
const CYLINDER_SIDES: usize = 5;

/// Produces a self-contained mesh for a segment emitted at a given depth
pub trait PrimitiveFactory {
    fn build(&self, depth: u32) -> MeshData;
}

/// The solid a segment is built from
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PrimitiveShape {
    /// Unit cube
    #[default]
    Cube,
    /// Cube whose top face is scaled by `taper` in x and z
    TaperedCube { taper: f32 },
    /// One unit tall pentagonal prism
    PentagonalCylinder,
}

impl PrimitiveShape {
    /// Build the shape with a single color on every vertex
    pub fn mesh(self, color: VertexColor) -> MeshData {
        match self {
            PrimitiveShape::Cube => cube(color),
            PrimitiveShape::TaperedCube { taper } => tapered_cube(taper, color),
            PrimitiveShape::PentagonalCylinder => pentagonal_cylinder(color),
        }
    }
}

/// A shape colored by depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeFactory<C> {
    pub shape: PrimitiveShape,
    pub colors: C,
}

impl<C: ColorMapper> ShapeFactory<C> {
    pub fn new(shape: PrimitiveShape, colors: C) -> Self {
        Self { shape, colors }
    }
}

impl<C: ColorMapper> PrimitiveFactory for ShapeFactory<C> {
    fn build(&self, depth: u32) -> MeshData {
        self.shape.mesh(self.colors.map_color(depth))
    }
}

/// Unit cube with its base centered on the origin
///
/// 24 vertices (4 per face) and 12 triangles.
pub fn cube(color: VertexColor) -> MeshData {
    tapered_cube(1.0, color)
}

/// Cube whose top face is shrunk (or grown) by `taper` around the y axis
///
/// A non-positive taper collapses the top face to a point-sized square.
pub fn tapered_cube(taper: f32, color: VertexColor) -> MeshData {
    let taper = taper.max(f32::EPSILON);

    // Signed corner in [-1, 1]^3 to local position
    let corner = |s: Vec3| {
        let width = if s.y > 0.0 { taper } else { 1.0 };
        Vec3::new(s.x * 0.5 * width, (s.y + 1.0) * 0.5, s.z * 0.5 * width)
    };

    // (outward axis, u, v) with u x v == outward
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];

    let mut mesh = MeshData::default();
    for (n, u, v) in faces {
        let corners = [n - u - v, n + u - v, n + u + v, n - u + v].map(corner);
        push_face(&mut mesh, &corners, &QUAD_UVS, color);
    }
    mesh
}

/// One unit tall pentagonal prism of radius 0.5 around the y axis
///
/// Caps are triangle fans; each side is its own quad.
pub fn pentagonal_cylinder(color: VertexColor) -> MeshData {
    let ring = |k: usize, y: f32| {
        let theta = TAU * (k % CYLINDER_SIDES) as f32 / CYLINDER_SIDES as f32;
        Vec3::new(0.5 * theta.cos(), y, -0.5 * theta.sin())
    };
    let cap_uv = |p: Vec3| [p.x + 0.5, p.z + 0.5];

    let mut mesh = MeshData::default();

    let top: Vec<Vec3> = (0..CYLINDER_SIDES).map(|k| ring(k, 1.0)).collect();
    let top_uvs: Vec<[f32; 2]> = top.iter().copied().map(cap_uv).collect();
    push_face(&mut mesh, &top, &top_uvs, color);

    let bottom: Vec<Vec3> = (0..CYLINDER_SIDES).rev().map(|k| ring(k, 0.0)).collect();
    let bottom_uvs: Vec<[f32; 2]> = bottom.iter().copied().map(cap_uv).collect();
    push_face(&mut mesh, &bottom, &bottom_uvs, color);

    for k in 0..CYLINDER_SIDES {
        let corners = [ring(k, 0.0), ring(k + 1, 0.0), ring(k + 1, 1.0), ring(k, 1.0)];
        let u0 = k as f32 / CYLINDER_SIDES as f32;
        let u1 = (k + 1) as f32 / CYLINDER_SIDES as f32;
        let uvs = [[u0, 0.0], [u1, 0.0], [u1, 1.0], [u0, 1.0]];
        push_face(&mut mesh, &corners, &uvs, color);
    }

    mesh
}

/// Append a planar convex polygon (counter-clockwise from outside) as a fan
fn push_face(mesh: &mut MeshData, corners: &[Vec3], uvs: &[[f32; 2]], color: VertexColor) {
    let base = mesh.positions.len() as u32;
    let normal = (corners[1] - corners[0])
        .cross(corners[2] - corners[0])
        .normalize_or_zero()
        .to_array();

    for (corner, uv) in corners.iter().zip(uvs) {
        mesh.positions.push(corner.to_array());
        mesh.normals.push(normal);
        mesh.uvs.push(*uv);
        mesh.colors.push(color);
    }

    for i in 1..corners.len() as u32 - 1 {
        mesh.indices.extend_from_slice(&[base, base + i, base + i + 1]);
    }
}
