//! Discrete-face growth
//!
//! Each node places one segment, then branches off up to five of its faces.
//! A face hosts at most one branch per node. Scale shrinks every level, so
//! the structure thins toward the tips.

use super::{Grower, Segment, SegmentRole};
use crate::config::{CoralConfig, RandomRange, CORAL_SLOT_COUNT};
use crate::mesh::{HueGradient, PrimitiveFactory, ShapeFactory};
use crate::transform::{euler_degrees, Transform};
use glam::{Quat, Vec3};
use rand::seq::SliceRandom;
use rand::Rng;

/// Candidate branch direction on a coral segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchSlot {
    Front,
    Back,
    Left,
    Right,
    Top,
}

impl BranchSlot {
    pub const ALL: [BranchSlot; CORAL_SLOT_COUNT as usize] = [
        BranchSlot::Front,
        BranchSlot::Back,
        BranchSlot::Left,
        BranchSlot::Right,
        BranchSlot::Top,
    ];

    /// Position in [`BranchSlot::ALL`]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Coral-style recursive grower
#[derive(Debug, Clone)]
pub struct CoralGrower {
    config: CoralConfig,
    factory: ShapeFactory<HueGradient>,
}

impl CoralGrower {
    pub fn new(config: CoralConfig) -> Self {
        // Young tips take hue.max, the old base hue.min
        let colors = HueGradient::new(config.hue.max, config.hue.min, config.iterations);
        Self {
            config,
            factory: ShapeFactory::new(config.shape, colors),
        }
    }

    pub fn config(&self) -> &CoralConfig {
        &self.config
    }

    /// Grow a node and its subtree, appending segments in pre-order
    ///
    /// Nothing is emitted when `depth` is 0. Otherwise one segment is placed
    /// at `(position, rotation, scale)` and `min(branches, 5)` distinct slots
    /// are grown one level shallower with the decayed scale.
    pub fn grow<R: Rng + ?Sized>(
        &self,
        depth: u32,
        segments: &mut Vec<Segment>,
        position: Vec3,
        rotation: Quat,
        scale: Vec3,
        rng: &mut R,
    ) {
        if depth == 0 {
            return;
        }

        let placement = Transform::new(position, rotation, scale);
        segments.push(Segment::new(
            self.factory.build(depth),
            placement,
            depth,
            SegmentRole::Branch,
        ));

        let child_depth = depth - 1;
        let child_scale = scale * self.config.decay;
        let anchors = BranchSlot::ALL.map(|slot| self.slot_anchor(slot, &placement, rng));

        let chosen = self.pick_slots(rng);
        tracing::trace!(depth, ?chosen, "coral node");

        for slot in chosen {
            let (anchor, orientation) = anchors[slot.index()];
            self.grow(child_depth, segments, anchor, orientation, child_scale, rng);
        }
    }

    /// Distinct slots to branch into, in random order
    pub fn pick_slots<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<BranchSlot> {
        let mut slots = BranchSlot::ALL;
        slots.shuffle(rng);
        slots[..self.config.fan_out() as usize].to_vec()
    }

    /// Anchor point and orientation of a branch grown from `slot`
    ///
    /// Anchors sit on the segment's own axis: the top one near its tip, side
    /// ones at a random height. Orientations compose the node rotation with a
    /// per-slot tilt.
    pub fn slot_anchor<R: Rng + ?Sized>(
        &self,
        slot: BranchSlot,
        placement: &Transform,
        rng: &mut R,
    ) -> (Vec3, Quat) {
        let c = &self.config;
        let height = match slot {
            BranchSlot::Top => c.top_anchor,
            _ => c.side_anchor.sample(rng),
        };

        let tilt = match slot {
            BranchSlot::Top => {
                let jitter = RandomRange::new(-c.top_jitter, c.top_jitter);
                euler_degrees(jitter.sample(rng), jitter.sample(rng), jitter.sample(rng))
            }
            BranchSlot::Front => euler_degrees(0.0, 0.0, c.roll.sample(rng)),
            BranchSlot::Back => euler_degrees(0.0, 0.0, -c.roll.sample(rng)),
            BranchSlot::Left => euler_degrees(c.pitch.sample(rng), 0.0, 0.0),
            BranchSlot::Right => euler_degrees(-c.pitch.sample(rng), 0.0, 0.0),
        };

        let anchor = placement.transform_point(Vec3::new(0.0, height, 0.0));
        (anchor, (placement.rotation * tilt).normalize())
    }
}

impl Grower for CoralGrower {
    fn name(&self) -> &'static str {
        "coral"
    }

    fn grow_from_root<R: Rng + ?Sized>(&self, rng: &mut R, segments: &mut Vec<Segment>) {
        self.grow(
            self.config.iterations,
            segments,
            Vec3::ZERO,
            Quat::IDENTITY,
            self.config.scale,
            rng,
        );
    }
}
