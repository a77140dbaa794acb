//! Mesh assembly
//!
//! Bakes every segment's placement into its vertices and concatenates the
//! results into one mesh. Nothing is welded; segments stay independent.

use super::colors::WHITE;
use super::MeshData;
use crate::growth::Segment;
use glam::Vec3;

/// Combine placed segments into a single mesh
///
/// Positions are transformed by each segment's full placement, normals by the
/// inverse-transpose of its linear part. Index offsets are adjusted
/// automatically. An attribute present on any segment is present on the
/// result: missing UVs are padded with zeros, missing colors with white and
/// missing normals are recomputed from that segment's faces.
///
/// # Example
/// ```
/// use reef_growth::*;
///
/// let mut coral = Organism::coral(CoralConfigBuilder::new().seed(7).build().unwrap());
/// let mesh = coral.build().unwrap().clone();
///
/// let again = combine_segments(coral.segments());
/// assert_eq!(mesh, again);
/// ```
pub fn combine_segments(segments: &[Segment]) -> MeshData {
    let mut result = MeshData::default();

    let total_vertices: usize = segments.iter().map(|s| s.mesh.positions.len()).sum();
    let total_indices: usize = segments.iter().map(|s| s.mesh.indices.len()).sum();
    let has_normals = segments.iter().any(|s| !s.mesh.normals.is_empty());
    let has_uvs = segments.iter().any(|s| !s.mesh.uvs.is_empty());
    let has_colors = segments.iter().any(|s| !s.mesh.colors.is_empty());

    result.positions.reserve(total_vertices);
    result.indices.reserve(total_indices);
    if has_normals {
        result.normals.reserve(total_vertices);
    }
    if has_uvs {
        result.uvs.reserve(total_vertices);
    }
    if has_colors {
        result.colors.reserve(total_vertices);
    }

    for segment in segments {
        let mesh = &segment.mesh;
        if mesh.positions.is_empty() {
            continue;
        }

        let vertex_offset = result.positions.len() as u32;
        let matrix = segment.transform.matrix();
        let normal_matrix = segment.transform.normal_matrix();

        result.positions.extend(
            mesh.positions
                .iter()
                .map(|&p| matrix.transform_point3(Vec3::from(p)).to_array()),
        );

        if has_normals {
            let recomputed;
            let source = if mesh.normals.len() == mesh.positions.len() {
                &mesh.normals
            } else {
                recomputed = mesh.face_averaged_normals();
                &recomputed
            };
            result.normals.extend(
                source
                    .iter()
                    .map(|&n| (normal_matrix * Vec3::from(n)).normalize_or_zero().to_array()),
            );
        }

        if has_uvs {
            if mesh.uvs.len() == mesh.positions.len() {
                result.uvs.extend_from_slice(&mesh.uvs);
            } else {
                result.uvs.resize(result.positions.len(), [0.0, 0.0]);
            }
        }

        if has_colors {
            if mesh.colors.len() == mesh.positions.len() {
                result.colors.extend_from_slice(&mesh.colors);
            } else {
                result.colors.resize(result.positions.len(), WHITE);
            }
        }

        result
            .indices
            .extend(mesh.indices.iter().map(|&idx| vertex_offset + idx));
    }

    result
}
