//! Spatial indexing for repulsor lookups
//!
//! With the `spatial-index` feature the snapshot is backed by a KD-tree;
//! without it every query scans the snapshot linearly. Results are the same
//! either way.

use crate::creature::{Repulsor, RepulsorId};
use glam::Vec3;

#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

/// A repulsor found by a query, with its distance to the query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepulsorHit {
    pub id: RepulsorId,
    pub repulsor: Repulsor,
    pub distance: f32,
}

/// Immutable snapshot of registered repulsors
///
/// Built by [`RepulsorRegistry::index`](crate::creature::RepulsorRegistry::index).
/// Later changes to the registry are not reflected; rebuild the index
/// when repulsors move.
///
/// # Example
///
/// ```
/// use reef_growth::*;
///
/// let mut registry = RepulsorRegistry::new();
/// let rock = registry.register(Repulsor::new(Vec3::new(4.0, 0.0, 0.0), 2.0).unwrap());
/// registry.register(Repulsor::new(Vec3::new(-9.0, 0.0, 0.0), 1.0).unwrap());
///
/// let index = registry.index();
/// let hit = index.nearest(Vec3::new(3.0, 0.5, 0.0)).unwrap();
/// assert_eq!(hit.id, rock);
/// ```
#[derive(Clone)]
pub struct RepulsorIndex {
    entries: Vec<(RepulsorId, Repulsor)>,
    largest_radius: f32,
    #[cfg(feature = "spatial-index")]
    tree: Option<ImmutableKdTree<f32, usize, 3, 32>>,
}

impl RepulsorIndex {
    /// Build an index over a snapshot of repulsors
    pub fn new(entries: Vec<(RepulsorId, Repulsor)>) -> Self {
        let largest_radius = entries
            .iter()
            .map(|(_, r)| r.radius)
            .fold(0.0_f32, f32::max);

        #[cfg(feature = "spatial-index")]
        let tree = if entries.is_empty() {
            None
        } else {
            let points: Vec<[f32; 3]> = entries.iter().map(|(_, r)| r.position.to_array()).collect();
            Some(ImmutableKdTree::new_from_slice(&points))
        };

        Self {
            entries,
            largest_radius,
            #[cfg(feature = "spatial-index")]
            tree,
        }
    }

    /// An index with no repulsors
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn hit(&self, slot: usize, position: Vec3) -> RepulsorHit {
        let (id, repulsor) = self.entries[slot];
        RepulsorHit {
            id,
            repulsor,
            distance: repulsor.position.distance(position),
        }
    }

    /// Closest repulsor center to `position`
    #[cfg(feature = "spatial-index")]
    pub fn nearest(&self, position: Vec3) -> Option<RepulsorHit> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&position.to_array());
        Some(self.hit(result.item as usize, position))
    }

    /// Closest repulsor center to `position`
    #[cfg(not(feature = "spatial-index"))]
    pub fn nearest(&self, position: Vec3) -> Option<RepulsorHit> {
        (0..self.entries.len())
            .map(|slot| self.hit(slot, position))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Repulsors whose radius reaches `position`
    #[cfg(feature = "spatial-index")]
    pub fn affecting(&self, position: Vec3) -> Vec<RepulsorHit> {
        let Some(tree) = self.tree.as_ref() else {
            return Vec::new();
        };
        let reach = self.largest_radius * self.largest_radius;
        let mut hits: Vec<RepulsorHit> = tree
            .within_unsorted::<SquaredEuclidean>(&position.to_array(), reach)
            .into_iter()
            .map(|n| self.hit(n.item as usize, position))
            .filter(|h| h.distance < h.repulsor.radius)
            .collect();
        hits.sort_by_key(|h| h.id);
        hits
    }

    /// Repulsors whose radius reaches `position`
    #[cfg(not(feature = "spatial-index"))]
    pub fn affecting(&self, position: Vec3) -> Vec<RepulsorHit> {
        let mut hits: Vec<RepulsorHit> = (0..self.entries.len())
            .map(|slot| self.hit(slot, position))
            .filter(|h| h.distance < h.repulsor.radius)
            .collect();
        hits.sort_by_key(|h| h.id);
        hits
    }
}

impl Default for RepulsorIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for RepulsorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepulsorIndex")
            .field("entries", &self.entries)
            .field("largest_radius", &self.largest_radius)
            .finish()
    }
}
