//! Recursive branch growth
//!
//! A grower walks a conceptual branching tree and emits one [`Segment`] per
//! node, parents before children. Two strategies are provided:
//!
//! - [`CoralGrower`]: each node picks distinct faces out of five candidate
//!   slots and branches into them with decaying scale.
//! - [`KelpGrower`]: each node emits a stem plus a ring of leaves, then
//!   continues from the stem tip in a progressively randomized direction.

mod coral;
mod kelp;

pub use coral::{BranchSlot, CoralGrower};
pub use kelp::KelpGrower;

use crate::mesh::MeshData;
use crate::transform::Transform;
use rand::Rng;

/// What part of a structure a segment represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentRole {
    /// Coral branch body
    Branch,
    /// Kelp stalk piece
    Stem,
    /// Kelp leaf attached beside a stem
    Leaf,
}

/// One placed primitive within a grown structure
///
/// `mesh` is in segment-local space; `transform` places it in the
/// structure's frame with all ancestor placements already composed.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub mesh: MeshData,
    pub transform: Transform,
    /// Remaining iterations at the node that emitted this segment
    pub depth: u32,
    pub role: SegmentRole,
}

impl Segment {
    pub fn new(mesh: MeshData, transform: Transform, depth: u32, role: SegmentRole) -> Self {
        Self {
            mesh,
            transform,
            depth,
            role,
        }
    }
}

/// A strategy that grows a whole structure from its root
pub trait Grower {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Grow from the structure's origin, appending segments in pre-order
    fn grow_from_root<R: Rng + ?Sized>(&self, rng: &mut R, segments: &mut Vec<Segment>);
}

/// Count segments of a given role
pub fn count_role(segments: &[Segment], role: SegmentRole) -> usize {
    segments.iter().filter(|s| s.role == role).count()
}
