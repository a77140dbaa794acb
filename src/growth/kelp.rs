//! Radial-plus-continuation growth
//!
//! Every node emits a stem piece with a fan of leaves around its base, then
//! continues from the stem tip. Each continuation leans between upright and a
//! jittered orientation; [`ChaosFalloff`] decides how that blend changes along
//! the stalk.

use super::{Grower, Segment, SegmentRole};
use crate::config::{ChaosFalloff, KelpConfig};
use crate::mesh::{HueGradient, PrimitiveFactory, PrimitiveShape, ShapeFactory};
use crate::transform::{euler_degrees, Transform};
use glam::{Quat, Vec3};
use rand::Rng;

/// Kelp-style recursive grower
#[derive(Debug, Clone)]
pub struct KelpGrower {
    config: KelpConfig,
    stem: ShapeFactory<HueGradient>,
    leaf: ShapeFactory<HueGradient>,
}

impl KelpGrower {
    pub fn new(config: KelpConfig) -> Self {
        // Base takes hue.max, the tip hue.min
        let colors = HueGradient::new(config.hue.min, config.hue.max, config.iterations);
        Self {
            config,
            stem: ShapeFactory::new(PrimitiveShape::PentagonalCylinder, colors),
            leaf: ShapeFactory::new(PrimitiveShape::Cube, colors),
        }
    }

    pub fn config(&self) -> &KelpConfig {
        &self.config
    }

    /// Grow a stem piece, its leaves and everything above it
    ///
    /// Nothing is emitted when `depth` is 0. Scale never changes along a
    /// stalk.
    pub fn grow<R: Rng + ?Sized>(
        &self,
        depth: u32,
        segments: &mut Vec<Segment>,
        position: Vec3,
        rotation: Quat,
        rng: &mut R,
    ) {
        if depth == 0 {
            return;
        }

        let c = &self.config;
        let stem = Transform::new(position, rotation, c.stem_scale);
        segments.push(Segment::new(
            self.stem.build(depth),
            stem,
            depth,
            SegmentRole::Stem,
        ));

        for i in 1..=c.leaf_count {
            segments.push(Segment::new(
                self.leaf.build(depth),
                Transform::new(position, rotation * self.leaf_tilt(i), c.leaf_scale),
                depth,
                SegmentRole::Leaf,
            ));
        }

        let tip = stem.transform_point(Vec3::Y);
        let next_depth = depth - 1;
        let next = self.continuation(next_depth, rng);
        tracing::trace!(depth, ?tip, "kelp node");

        self.grow(next_depth, segments, tip, next, rng);
    }

    /// Rotation of leaf `i` (1-based) relative to its stem
    ///
    /// The y offset is scaled by `360 / (leaf_count * i)`, so later leaves
    /// turn less.
    pub fn leaf_tilt(&self, i: u32) -> Quat {
        let c = &self.config;
        let step = 360.0 / (c.leaf_count as f32 * i as f32);
        euler_degrees(c.leaf_offset.x, c.leaf_offset.y * step, c.leaf_offset.z)
    }

    /// Orientation of the stem grown at `next_depth`
    pub fn continuation<R: Rng + ?Sized>(&self, next_depth: u32, rng: &mut R) -> Quat {
        let c = &self.config;
        let upright = Quat::from_rotation_arc(c.up, Vec3::Y);
        let random = euler_degrees(
            c.angle.x + c.jitter.sample(rng),
            c.angle.y + c.jitter.sample(rng),
            c.angle.z + c.jitter.sample(rng),
        );
        let t = c.chaos.weight(next_depth, c.iterations);
        upright.slerp(random, t).normalize()
    }

    /// Falloff in use
    pub fn chaos(&self) -> ChaosFalloff {
        self.config.chaos
    }
}

impl Grower for KelpGrower {
    fn name(&self) -> &'static str {
        "kelp"
    }

    fn grow_from_root<R: Rng + ?Sized>(&self, rng: &mut R, segments: &mut Vec<Segment>) {
        self.grow(
            self.config.iterations,
            segments,
            Vec3::ZERO,
            Quat::IDENTITY,
            rng,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KelpConfigBuilder, MAX_LEAF_COUNT};
    use crate::growth::count_role;
    use crate::mesh::rgb_to_hue;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn builder(iterations: u32, leaves: u32) -> KelpConfigBuilder {
        KelpConfigBuilder::new()
            .seed(3)
            .iterations(iterations)
            .unwrap()
            .leaf_count(leaves)
            .unwrap()
    }

    fn grow_all(grower: &KelpGrower, seed: u64) -> Vec<Segment> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut segments = Vec::new();
        grower.grow_from_root(&mut rng, &mut segments);
        segments
    }

    fn stems(segments: &[Segment]) -> Vec<&Segment> {
        segments
            .iter()
            .filter(|s| s.role == SegmentRole::Stem)
            .collect()
    }

    #[test]
    fn test_counts() {
        let g = KelpGrower::new(builder(3, 2).build().unwrap());
        let segments = grow_all(&g, 1);

        assert_eq!(segments.len(), 9);
        assert_eq!(count_role(&segments, SegmentRole::Stem), 3);
        assert_eq!(count_role(&segments, SegmentRole::Leaf), 6);
        assert_eq!(segments.len(), g.config().expected_segments());
    }

    #[test]
    fn test_zero_depth_emits_nothing() {
        let g = KelpGrower::new(builder(3, 2).build().unwrap());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut segments = Vec::new();
        g.grow(0, &mut segments, Vec3::ZERO, Quat::IDENTITY, &mut rng);
        assert!(segments.is_empty());

        let empty = KelpGrower::new(builder(0, 4).build().unwrap());
        assert!(grow_all(&empty, 1).is_empty());
    }

    #[test]
    fn test_node_layout_is_stem_then_leaves() {
        let g = KelpGrower::new(builder(2, 4).build().unwrap());
        let segments = grow_all(&g, 2);

        for node in segments.chunks(5) {
            assert_eq!(node[0].role, SegmentRole::Stem);
            assert!(node[1..].iter().all(|s| s.role == SegmentRole::Leaf));
            assert!(node.iter().all(|s| s.depth == node[0].depth));
        }
    }

    #[test]
    fn test_leaves_share_stem_position() {
        let g = KelpGrower::new(builder(3, 5).build().unwrap());
        let segments = grow_all(&g, 4);

        for node in segments.chunks(6) {
            let stem = &node[0];
            for leaf in &node[1..] {
                assert_eq!(leaf.transform.translation, stem.transform.translation);
                assert_eq!(leaf.transform.scale, g.config().leaf_scale);
            }
        }
    }

    #[test]
    fn test_leaf_rotations_follow_fan_step() {
        let g = KelpGrower::new(builder(1, 3).build().unwrap());
        let segments = grow_all(&g, 5);
        let stem = &segments[0];

        for (i, leaf) in segments[1..].iter().enumerate() {
            let expected = stem.transform.rotation * g.leaf_tilt(i as u32 + 1);
            assert!(leaf.transform.rotation.dot(expected).abs() > 1.0 - 1e-5);
        }
        // 90 * 360 / 3 for the first leaf
        let first = euler_degrees(90.0, 10800.0, 90.0);
        assert!(g.leaf_tilt(1).dot(first).abs() > 1.0 - 1e-4);
    }

    #[test]
    fn test_leaf_tilt_at_leaf_bound() {
        let g = KelpGrower::new(builder(2, MAX_LEAF_COUNT).build().unwrap());
        let segments = grow_all(&g, 7);
        assert_eq!(count_role(&segments, SegmentRole::Leaf), 2 * MAX_LEAF_COUNT as usize);

        // 90 * 360 / (10 * 10) for the last leaf
        let last = euler_degrees(90.0, 324.0, 90.0);
        assert!(g.leaf_tilt(MAX_LEAF_COUNT).dot(last).abs() > 1.0 - 1e-5);
        // Large indices stay finite
        assert!(g.leaf_tilt(u32::MAX).is_finite());
    }

    #[test]
    fn test_next_stem_starts_at_tip() {
        let g = KelpGrower::new(builder(4, 2).build().unwrap());
        let segments = grow_all(&g, 6);
        let stems = stems(&segments);

        assert_eq!(stems[0].transform.translation, Vec3::ZERO);
        for pair in stems.windows(2) {
            let tip = pair[0].transform.transform_point(Vec3::Y);
            assert!((pair[1].transform.translation - tip).length() < 1e-5);
        }
    }

    #[test]
    fn test_scale_constant_along_stalk() {
        let g = KelpGrower::new(builder(5, 1).build().unwrap());
        for stem in stems(&grow_all(&g, 7)) {
            assert_eq!(stem.transform.scale, g.config().stem_scale);
        }
    }

    #[test]
    fn test_zero_weight_continuation_is_upright() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        let remaining = KelpGrower::new(builder(4, 1).build().unwrap());
        let axis = remaining.continuation(0, &mut rng) * Vec3::Y;
        assert!((axis - Vec3::Y).length() < 1e-4, "axis {:?}", axis);

        let progress = KelpGrower::new(
            builder(4, 1)
                .chaos(ChaosFalloff::GrowthProgress)
                .build()
                .unwrap(),
        );
        let axis = progress.continuation(4, &mut rng) * Vec3::Y;
        assert!((axis - Vec3::Y).length() < 1e-4, "axis {:?}", axis);
    }

    #[test]
    fn test_upright_follows_configured_up_axis() {
        let g = KelpGrower::new(builder(2, 1).up(Vec3::Z).unwrap().build().unwrap());
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let expected = Quat::from_rotation_arc(Vec3::Z, Vec3::Y);
        let upright = g.continuation(0, &mut rng);
        assert!(upright.dot(expected).abs() > 1.0 - 1e-4);
    }

    #[test]
    fn test_falloffs_differ() {
        let remaining = KelpGrower::new(builder(4, 1).build().unwrap());
        let progress = KelpGrower::new(
            builder(4, 1)
                .chaos(ChaosFalloff::GrowthProgress)
                .build()
                .unwrap(),
        );
        assert_eq!(progress.chaos(), ChaosFalloff::GrowthProgress);
        assert_ne!(grow_all(&remaining, 10), grow_all(&progress, 10));
    }

    #[test]
    fn test_hue_falls_toward_tip() {
        let g = KelpGrower::new(builder(4, 1).hue(0.2, 0.8).build().unwrap());
        let segments = grow_all(&g, 11);
        let hues: Vec<f32> = stems(&segments)
            .iter()
            .map(|s| {
                let [r, gr, b, _] = s.mesh.colors[0];
                rgb_to_hue(r, gr, b)
            })
            .collect();

        assert!((hues[0] - 0.8).abs() < 1e-4);
        for pair in hues.windows(2) {
            assert!(pair[1] < pair[0], "hues not falling toward tip: {:?}", hues);
        }
    }

    #[test]
    fn test_segment_primitives() {
        let g = KelpGrower::new(builder(1, 1).build().unwrap());
        let segments = grow_all(&g, 12);
        // Pentagonal prism for the stem, cube for the leaf
        assert_eq!(segments[0].mesh.vertex_count(), 30);
        assert_eq!(segments[1].mesh.vertex_count(), 24);
    }

    #[test]
    fn test_same_seed_same_stalk() {
        let g = KelpGrower::new(builder(5, 3).build().unwrap());
        assert_eq!(grow_all(&g, 13), grow_all(&g, 13));
        assert_ne!(grow_all(&g, 13), grow_all(&g, 14));
    }
}
