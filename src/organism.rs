//! Organism builder
//!
//! Owns a grower, its random stream and the geometry of the last build.

use crate::config::{CoralConfig, KelpConfig};
use crate::error::Result;
use crate::growth::{CoralGrower, Grower, KelpGrower, Segment};
use crate::mesh::{combine_segments, MeshData};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A growable structure and its current geometry
///
/// Every [`build`](Organism::build) advances the random stream, so repeated
/// builds produce new variations. Two organisms created with the same seed
/// produce the same sequence of builds.
///
/// # Example
/// ```
/// use reef_growth::*;
///
/// let config = KelpConfigBuilder::new().seed(11).build().unwrap();
/// let mut kelp = Organism::kelp(config);
///
/// let mesh = kelp.build().unwrap();
/// assert!(mesh.triangle_count() > 0);
/// assert_eq!(kelp.segments().len(), config.expected_segments());
/// ```
#[derive(Debug, Clone)]
pub struct Organism<G> {
    grower: G,
    rng: ChaCha8Rng,
    segments: Vec<Segment>,
    mesh: MeshData,
}

impl Organism<CoralGrower> {
    /// Create a coral organism seeded from its configuration
    pub fn coral(config: CoralConfig) -> Self {
        Self::new(CoralGrower::new(config), config.seed)
    }
}

impl Organism<KelpGrower> {
    /// Create a kelp organism seeded from its configuration
    pub fn kelp(config: KelpConfig) -> Self {
        Self::new(KelpGrower::new(config), config.seed)
    }
}

impl<G: Grower> Organism<G> {
    /// Wrap any grower with its own random stream
    pub fn new(grower: G, seed: u32) -> Self {
        Self {
            grower,
            rng: ChaCha8Rng::seed_from_u64(seed as u64),
            segments: Vec::new(),
            mesh: MeshData::default(),
        }
    }

    /// Grow the structure from scratch and replace the stored geometry
    ///
    /// # Errors
    ///
    /// Returns `MeshIntegrity` if the combined mesh is inconsistent. The
    /// previous geometry is kept in that case.
    pub fn build(&mut self) -> Result<&MeshData> {
        let mut segments = Vec::new();
        self.grower.grow_from_root(&mut self.rng, &mut segments);

        let mesh = combine_segments(&segments);
        mesh.check_integrity()?;

        tracing::debug!(
            grower = self.grower.name(),
            segments = segments.len(),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "organism built"
        );

        self.segments = segments;
        self.mesh = mesh;
        Ok(&self.mesh)
    }

    /// Geometry of the last successful build; empty before the first
    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    /// Placed segments of the last successful build
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn grower(&self) -> &G {
        &self.grower
    }
}
