//! Vertex welding
//!
//! Collapses vertices whose positions are exactly equal. Grown meshes keep
//! per-face vertices for hard edges; welding is the opt-in path to smooth
//! shading.

use super::MeshData;
use crate::error::{GrowthError, Result};
use std::collections::HashMap;

/// Options for [`remove_duplicates`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeldOptions {
    /// Recompute normals from the welded faces
    pub smooth: bool,
    /// Log the vertex count before and after welding
    pub debug: bool,
}

impl Default for WeldOptions {
    fn default() -> Self {
        Self {
            smooth: true,
            debug: false,
        }
    }
}

/// Merge vertices with identical positions
///
/// The first occurrence of a position survives and keeps its UV and color.
/// With `smooth` set, normals are recomputed from the welded faces;
/// otherwise the surviving vertex keeps its own normal. Welding a mesh that
/// has no duplicate positions returns the same vertices and triangles.
///
/// # Errors
///
/// Returns `MeshIntegrity` if an index references a vertex that does not
/// exist in `mesh`.
///
/// # Example
/// ```
/// use reef_growth::*;
///
/// let faceted = cube(WHITE);
/// let welded = remove_duplicates(&faceted, WeldOptions::default()).unwrap();
/// assert_eq!(faceted.vertex_count(), 24);
/// assert_eq!(welded.vertex_count(), 8);
/// ```
pub fn remove_duplicates(mesh: &MeshData, options: WeldOptions) -> Result<MeshData> {
    let vertex_count = mesh.positions.len();
    let keep_normals = !options.smooth && mesh.normals.len() == vertex_count;
    let keep_uvs = mesh.uvs.len() == vertex_count && vertex_count > 0;
    let keep_colors = mesh.colors.len() == vertex_count && vertex_count > 0;

    let mut welded = MeshData::default();
    let mut first_by_position: HashMap<[u32; 3], u32> = HashMap::with_capacity(vertex_count);
    let mut remap: Vec<u32> = Vec::with_capacity(vertex_count);

    for (i, position) in mesh.positions.iter().enumerate() {
        let existing = position_key(position).and_then(|key| {
            let next = welded.positions.len() as u32;
            match first_by_position.get(&key) {
                Some(&index) => Some(index),
                None => {
                    first_by_position.insert(key, next);
                    None
                }
            }
        });

        if let Some(index) = existing {
            remap.push(index);
            continue;
        }

        remap.push(welded.positions.len() as u32);
        welded.positions.push(*position);
        if keep_normals {
            welded.normals.push(mesh.normals[i]);
        }
        if keep_uvs {
            welded.uvs.push(mesh.uvs[i]);
        }
        if keep_colors {
            welded.colors.push(mesh.colors[i]);
        }
    }

    welded.indices = mesh
        .indices
        .iter()
        .map(|&old| {
            remap.get(old as usize).copied().ok_or_else(|| {
                GrowthError::MeshIntegrity(format!(
                    "index {} references a vertex outside the {} recorded",
                    old, vertex_count
                ))
            })
        })
        .collect::<Result<Vec<u32>>>()?;

    if options.smooth {
        welded.normals = welded.face_averaged_normals();
    }

    if options.debug {
        tracing::debug!(
            before = vertex_count,
            after = welded.positions.len(),
            "{} reduced to {}",
            vertex_count,
            welded.positions.len()
        );
    }

    Ok(welded)
}

/// Hash key that compares like `f32` equality: -0.0 matches 0.0, NaN matches nothing
fn position_key(position: &[f32; 3]) -> Option<[u32; 3]> {
    if position.iter().any(|c| c.is_nan()) {
        return None;
    }
    Some(position.map(|c| if c == 0.0 { 0 } else { c.to_bits() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{cube, pentagonal_cylinder, WHITE};
    use glam::Vec3;
    use tracing_test::traced_test;

    #[test]
    fn test_cube_welds_to_eight_corners() {
        let welded = remove_duplicates(&cube(WHITE), WeldOptions::default()).unwrap();
        assert_eq!(welded.vertex_count(), 8);
        assert_eq!(welded.triangle_count(), 12);
        assert!(welded.check_integrity().is_ok());
    }

    #[test]
    fn test_smooth_normals_point_away_from_center() {
        let welded = remove_duplicates(&cube(WHITE), WeldOptions::default()).unwrap();
        let center = Vec3::new(0.0, 0.5, 0.0);
        for (p, n) in welded.positions.iter().zip(&welded.normals) {
            let outward = (Vec3::from(*p) - center).normalize();
            assert!(Vec3::from(*n).dot(outward) > 0.5);
        }
    }

    #[test]
    fn test_welding_without_duplicates_is_identity() {
        let once = remove_duplicates(&pentagonal_cylinder(WHITE), WeldOptions::default()).unwrap();
        let twice = remove_duplicates(&once, WeldOptions::default()).unwrap();

        assert_eq!(once.vertex_count(), twice.vertex_count());
        assert_eq!(once.indices, twice.indices);
        assert_eq!(once.positions, twice.positions);
    }

    #[test]
    fn test_hard_normals_kept_without_smoothing() {
        let options = WeldOptions {
            smooth: false,
            debug: false,
        };
        let source = cube(WHITE);
        let welded = remove_duplicates(&source, options).unwrap();

        assert_eq!(welded.normals.len(), welded.vertex_count());
        // First vertex of the mesh survives with its own face normal
        assert_eq!(welded.normals[0], source.normals[0]);
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        let mesh = MeshData {
            positions: vec![[0.0, 1.0, 0.0], [-0.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
            indices: vec![0, 1, 2],
            ..Default::default()
        };
        let welded = remove_duplicates(&mesh, WeldOptions::default()).unwrap();
        assert_eq!(welded.vertex_count(), 2);
        assert_eq!(welded.indices, vec![0, 0, 1]);
    }

    #[test]
    fn test_dangling_index_is_an_error() {
        let mut mesh = cube(WHITE);
        mesh.indices.push(999);
        mesh.indices.push(0);
        mesh.indices.push(1);

        let result = remove_duplicates(&mesh, WeldOptions::default());
        assert!(matches!(result, Err(GrowthError::MeshIntegrity(_))));
    }

    #[test]
    fn test_colors_and_uvs_survive() {
        let welded = remove_duplicates(&cube([0.1, 0.2, 0.3, 1.0]), WeldOptions::default()).unwrap();
        assert_eq!(welded.colors.len(), 8);
        assert_eq!(welded.uvs.len(), 8);
        assert!(welded.colors.iter().all(|&c| c == [0.1, 0.2, 0.3, 1.0]));
    }

    #[traced_test]
    #[test]
    fn test_debug_logs_counts() {
        let options = WeldOptions {
            smooth: true,
            debug: true,
        };
        remove_duplicates(&cube(WHITE), options).unwrap();
        assert!(logs_contain("24 reduced to 8"));
    }
}
