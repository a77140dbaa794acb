//! Mesh data, primitive shapes, assembly and welding
//!
//! Everything here produces or consumes engine-agnostic [`MeshData`].

mod colors;
mod combine;
mod primitives;
mod weld;

pub use colors::{hsv_to_rgba, rgb_to_hue, ColorMapper, HueGradient, SolidColor, VertexColor, WHITE};
pub use combine::combine_segments;
pub use primitives::{cube, pentagonal_cylinder, tapered_cube, PrimitiveFactory, PrimitiveShape, ShapeFactory};
pub use weld::{remove_duplicates, WeldOptions};

use crate::error::{GrowthError, Result};
use glam::Vec3;
use std::io::{self, Write};

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any rendering engine:
/// - Bevy: Convert to `Mesh` with attributes
/// - Godot: Convert to `ArrayMesh`
/// - wgpu: Use directly as vertex buffers
///
/// Attribute arrays (`normals`, `uvs`, `colors`) are either the same length
/// as `positions` or empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates
    pub uvs: Vec<[f32; 2]>,
    /// Vertex colors (RGBA)
    pub colors: Vec<VertexColor>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Verify that indices are in range and attributes are fully populated or absent
    pub fn check_integrity(&self) -> Result<()> {
        let vertex_count = self.positions.len();

        if self.indices.len() % 3 != 0 {
            return Err(GrowthError::MeshIntegrity(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }

        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(GrowthError::MeshIntegrity(format!(
                "index {} out of range for {} vertices",
                bad, vertex_count
            )));
        }

        let partial = [
            ("normals", self.normals.len()),
            ("uvs", self.uvs.len()),
            ("colors", self.colors.len()),
        ]
        .into_iter()
        .find(|&(_, len)| len != 0 && len != vertex_count);

        if let Some((name, len)) = partial {
            return Err(GrowthError::MeshIntegrity(format!(
                "{} has {} entries for {} vertices",
                name, len, vertex_count
            )));
        }

        Ok(())
    }

    /// Write the mesh as Wavefront OBJ
    ///
    /// Vertex colors are appended to `v` lines as RGB, a common extension
    /// most viewers accept. Normals and UVs are written when present.
    pub fn write_obj<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let with_colors = self.colors.len() == self.positions.len();
        for (i, p) in self.positions.iter().enumerate() {
            if with_colors {
                let [r, g, b, _] = self.colors[i];
                writeln!(out, "v {} {} {} {} {} {}", p[0], p[1], p[2], r, g, b)?;
            } else {
                writeln!(out, "v {} {} {}", p[0], p[1], p[2])?;
            }
        }

        let with_uvs = !self.uvs.is_empty() && self.uvs.len() == self.positions.len();
        let with_normals = !self.normals.is_empty() && self.normals.len() == self.positions.len();
        for uv in self.uvs.iter().filter(|_| with_uvs) {
            writeln!(out, "vt {} {}", uv[0], uv[1])?;
        }
        for n in self.normals.iter().filter(|_| with_normals) {
            writeln!(out, "vn {} {} {}", n[0], n[1], n[2])?;
        }

        // OBJ indices are 1-based
        for tri in self.triangles() {
            let [a, b, c] = tri.map(|i| i + 1);
            match (with_uvs, with_normals) {
                (true, true) => writeln!(out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?,
                (false, true) => writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?,
                (true, false) => writeln!(out, "f {a}/{a} {b}/{b} {c}/{c}")?,
                (false, false) => writeln!(out, "f {a} {b} {c}")?,
            }
        }
        Ok(())
    }

    /// Per-vertex normals averaged from the area-weighted normals of adjacent faces
    pub(crate) fn face_averaged_normals(&self) -> Vec<[f32; 3]> {
        let mut accumulated = vec![Vec3::ZERO; self.positions.len()];

        for [a, b, c] in self.triangles() {
            let p0 = Vec3::from(self.positions[a as usize]);
            let p1 = Vec3::from(self.positions[b as usize]);
            let p2 = Vec3::from(self.positions[c as usize]);
            // Unnormalized cross product weights by triangle area
            let face = (p1 - p0).cross(p2 - p0);
            accumulated[a as usize] += face;
            accumulated[b as usize] += face;
            accumulated[c as usize] += face;
        }

        accumulated
            .into_iter()
            .map(|n| n.normalize_or_zero().to_array())
            .collect()
    }
}
