//! Recursive branch-growth mesh generation
//!
//! A standalone library for growing coral- and kelp-like structures out of
//! primitive solids and combining them into a single static mesh, suitable
//! for use with any game engine (Bevy, Godot, etc.). It also classifies
//! world positions into biomes from seeded noise.
//!
//! # Quick Start
//!
//! ```rust
//! use reef_growth::*;
//!
//! // Grow a coral
//! let config = CoralConfigBuilder::new()
//!     .seed(42)
//!     .iterations(4).unwrap()
//!     .branches(3).unwrap()
//!     .build().unwrap();
//!
//! let mut coral = Organism::coral(config);
//! let mesh = coral.build().unwrap();
//! println!("Generated {} triangles", mesh.triangle_count());
//!
//! // Optionally weld for smooth shading
//! let smooth = remove_duplicates(mesh, WeldOptions::default()).unwrap();
//! assert!(smooth.vertex_count() < mesh.vertex_count());
//!
//! // Classify a position
//! let biome = BiomeField::new(42).sample(Vec3::new(10.0, 0.0, -3.0));
//! assert!(biome.index() < BiomeId::COUNT);
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): KD-tree backed repulsor queries; without it they scan linearly
//! - `serde`: Enables serialization support for configurations and biome types

// Modules
pub mod error;
pub mod config;
pub mod transform;
pub mod mesh;
pub mod growth;
pub mod organism;
pub mod biome;
pub mod creature;
pub mod spatial;

// Re-export core types for convenience
pub use error::{GrowthError, Result};
pub use config::{
    ChaosFalloff, CoralConfig, CoralConfigBuilder, KelpConfig, KelpConfigBuilder, RandomRange,
    CORAL_SLOT_COUNT, MAX_ITERATIONS, MAX_LEAF_COUNT,
};
pub use transform::{euler_degrees, Transform};
pub use mesh::{
    combine_segments, cube, hsv_to_rgba, pentagonal_cylinder, remove_duplicates, rgb_to_hue,
    tapered_cube, ColorMapper, HueGradient, MeshData, PrimitiveFactory, PrimitiveShape,
    ShapeFactory, SolidColor, VertexColor, WeldOptions, WHITE,
};
pub use growth::{BranchSlot, CoralGrower, Grower, KelpGrower, Segment, SegmentRole};
pub use organism::Organism;
pub use biome::{BiomeField, BiomeId, FieldSampler, NoiseConfig, PerlinNoise};
pub use creature::{
    probe, step, Obstacle, ProbeDirection, ProbeHit, Repulsor, RepulsorId, RepulsorRegistry,
    WanderConfig, WanderState,
};
pub use spatial::{RepulsorHit, RepulsorIndex};

// Re-export glam types for convenience
pub use glam::{Quat, Vec3};
