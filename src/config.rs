//! Growth configuration and builders
//!
//! Configurations are plain data, read once per build. Builders validate
//! structural limits up front and quietly repair degenerate random ranges,
//! so a config that builds is always growable.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, Result};
use crate::mesh::PrimitiveShape;
use glam::Vec3;
use rand::Rng;

/// Deepest recursion a grower accepts
pub const MAX_ITERATIONS: u32 = 20;

/// Most leaves a kelp stem segment accepts
pub const MAX_LEAF_COUNT: u32 = 10;

/// Number of candidate branch slots on a coral segment
pub const CORAL_SLOT_COUNT: u32 = 5;

/// Inclusive range sampled uniformly
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomRange {
    pub min: f32,
    pub max: f32,
}

impl RandomRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draw a value in `[min, max]`
    ///
    /// Swapped bounds are sampled as if ordered.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        if lo == hi {
            lo
        } else {
            rng.gen_range(lo..=hi)
        }
    }

    /// Whether `min` is strictly below `max`
    pub fn is_ordered(&self) -> bool {
        self.min < self.max
    }

    /// Repair a range whose `min` is not below `max` by moving `min` to `max - spread`
    fn widened(self, spread: f32) -> Self {
        if self.is_ordered() {
            self
        } else {
            Self {
                min: self.max - spread,
                max: self.max,
            }
        }
    }
}

/// How strongly each kelp segment leans toward its random orientation
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChaosFalloff {
    /// Blend factor is `remaining depth / iterations`
    #[default]
    RemainingDepth,
    /// Blend factor is `1 - remaining depth / iterations`; the tips wander most
    GrowthProgress,
}

impl ChaosFalloff {
    /// Weight given to the random orientation for a node with `depth` remaining
    pub fn weight(self, depth: u32, iterations: u32) -> f32 {
        let remaining = if iterations == 0 {
            0.0
        } else {
            (depth as f32 / iterations as f32).clamp(0.0, 1.0)
        };
        match self {
            ChaosFalloff::RemainingDepth => remaining,
            ChaosFalloff::GrowthProgress => 1.0 - remaining,
        }
    }
}

fn check_iterations(iterations: u32) -> Result<u32> {
    if iterations > MAX_ITERATIONS {
        return Err(GrowthError::InvalidConfig(format!(
            "iterations must be <= {} (got {})",
            MAX_ITERATIONS, iterations
        )));
    }
    Ok(iterations)
}

fn check_positive(name: &str, v: Vec3) -> Result<Vec3> {
    if v.cmple(Vec3::ZERO).any() || !v.is_finite() {
        return Err(GrowthError::InvalidConfig(format!(
            "{} components must be positive (got {})",
            name, v
        )));
    }
    Ok(v)
}

fn repaired_hue(hue: RandomRange) -> RandomRange {
    if !hue.is_ordered() {
        let fixed = hue.widened(0.1);
        tracing::warn!(
            min = hue.min,
            max = hue.max,
            "hue range is empty; using [{}, {}]",
            fixed.min,
            fixed.max
        );
        return fixed;
    }
    hue
}

// ============================================================================
// CORAL
// ============================================================================

/// Configuration for discrete-face coral growth
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoralConfig {
    /// Seed for the organism's random stream
    pub seed: u32,
    /// Recursion depth; 0 grows nothing
    pub iterations: u32,
    /// Requested branches per node; at most [`CORAL_SLOT_COUNT`] are grown
    pub branches: u32,
    /// Scale of the root segment
    pub scale: Vec3,
    /// Per-axis factor applied to the scale at every level
    pub decay: Vec3,
    /// Hue at the tips (`max`) and at the base (`min`)
    pub hue: RandomRange,
    /// Height of the top anchor along the segment
    pub top_anchor: f32,
    /// Height range of the four side anchors
    pub side_anchor: RandomRange,
    /// Per-axis jitter of top branches, in degrees
    pub top_jitter: f32,
    /// Roll applied to front branches (back branches use the negated range), in degrees
    pub roll: RandomRange,
    /// Pitch applied to left branches (right branches use the negated range), in degrees
    pub pitch: RandomRange,
    /// Solid each segment is built from
    pub shape: PrimitiveShape,
}

impl CoralConfig {
    /// Branches actually grown per node
    #[inline]
    pub fn fan_out(&self) -> u32 {
        self.branches.min(CORAL_SLOT_COUNT)
    }

    /// Number of segments a full build emits
    pub fn expected_segments(&self) -> usize {
        let fan_out = self.fan_out() as usize;
        (0..self.iterations).map(|level| fan_out.pow(level)).sum()
    }
}

impl Default for CoralConfig {
    fn default() -> Self {
        CoralConfigBuilder::new().seed(0).build_unchecked()
    }
}

/// Builder for creating CoralConfig with validation
///
/// # Example
///
/// ```rust
/// use reef_growth::*;
///
/// let config = CoralConfigBuilder::new()
///     .seed(12345)
///     .iterations(4)
///     .unwrap()
///     .branches(2)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.expected_segments(), 1 + 2 + 4 + 8);
/// ```
#[derive(Debug, Clone)]
pub struct CoralConfigBuilder {
    seed: Option<u32>,
    iterations: u32,
    branches: u32,
    scale: Vec3,
    decay: Vec3,
    hue: RandomRange,
    top_anchor: f32,
    side_anchor: RandomRange,
    top_jitter: f32,
    roll: RandomRange,
    pitch: RandomRange,
    shape: PrimitiveShape,
}

impl CoralConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - iterations: 3
    /// - branches: 3
    /// - scale: (0.15, 1.0, 0.15), decaying by (0.8, 0.65, 0.8) per level
    /// - hue: 0.94 at the base to 0.99 at the tips
    /// - anchors: top at 0.9, sides in [0.5, 0.8]
    /// - angles: top jitter 15°, roll 45°-95°, pitch 75°-95°
    pub fn new() -> Self {
        Self {
            seed: None,
            iterations: 3,
            branches: 3,
            scale: Vec3::new(0.15, 1.0, 0.15),
            decay: Vec3::new(0.8, 0.65, 0.8),
            hue: RandomRange::new(0.94, 0.99),
            top_anchor: 0.9,
            side_anchor: RandomRange::new(0.5, 0.8),
            top_jitter: 15.0,
            roll: RandomRange::new(45.0, 95.0),
            pitch: RandomRange::new(75.0, 95.0),
            shape: PrimitiveShape::Cube,
        }
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the recursion depth
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations > 20
    pub fn iterations(mut self, iterations: u32) -> Result<Self> {
        self.iterations = check_iterations(iterations)?;
        Ok(self)
    }

    /// Set the number of branches per node
    ///
    /// Values above five are accepted and clamped when growing.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if branches is 0
    pub fn branches(mut self, branches: u32) -> Result<Self> {
        if branches == 0 {
            return Err(GrowthError::InvalidConfig(
                "coral needs at least one branch per node".to_string(),
            ));
        }
        self.branches = branches;
        Ok(self)
    }

    /// Set the root segment scale
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if any component is not positive
    pub fn scale(mut self, scale: Vec3) -> Result<Self> {
        self.scale = check_positive("scale", scale)?;
        Ok(self)
    }

    /// Set the per-level scale decay
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if any component is not positive
    pub fn decay(mut self, decay: Vec3) -> Result<Self> {
        self.decay = check_positive("decay", decay)?;
        Ok(self)
    }

    /// Set the hue range; an empty range is repaired on build
    pub fn hue(mut self, min: f32, max: f32) -> Self {
        self.hue = RandomRange::new(min, max);
        self
    }

    /// Set the top and side anchor heights
    pub fn anchors(mut self, top: f32, sides: RandomRange) -> Self {
        self.top_anchor = top;
        self.side_anchor = sides;
        self
    }

    /// Set the branch angle ranges, in degrees
    pub fn angles(mut self, top_jitter: f32, roll: RandomRange, pitch: RandomRange) -> Self {
        self.top_jitter = top_jitter.abs();
        self.roll = roll;
        self.pitch = pitch;
        self
    }

    /// Set the segment solid
    pub fn shape(mut self, shape: PrimitiveShape) -> Self {
        self.shape = shape;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    pub fn build(self) -> Result<CoralConfig> {
        if self.branches > CORAL_SLOT_COUNT {
            tracing::warn!(
                requested = self.branches,
                "coral nodes have {} slots; growing {} branches per node",
                CORAL_SLOT_COUNT,
                CORAL_SLOT_COUNT
            );
        }
        Ok(self.build_unchecked())
    }

    fn build_unchecked(self) -> CoralConfig {
        CoralConfig {
            seed: self.seed.unwrap_or_else(rand::random),
            iterations: self.iterations,
            branches: self.branches,
            scale: self.scale,
            decay: self.decay,
            hue: repaired_hue(self.hue),
            top_anchor: self.top_anchor,
            side_anchor: self.side_anchor,
            top_jitter: self.top_jitter,
            roll: self.roll,
            pitch: self.pitch,
            shape: self.shape,
        }
    }
}

impl Default for CoralConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// KELP
// ============================================================================

/// Configuration for radial-plus-continuation kelp growth
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KelpConfig {
    /// Seed for the organism's random stream
    pub seed: u32,
    /// Number of stem segments; 0 grows nothing
    pub iterations: u32,
    /// Leaves emitted beside every stem segment
    pub leaf_count: u32,
    /// Scale of every stem segment
    pub stem_scale: Vec3,
    /// Scale of every leaf
    pub leaf_scale: Vec3,
    /// Base stem angles per axis, in degrees
    pub angle: Vec3,
    /// Random jitter added to each stem angle, in degrees
    pub jitter: RandomRange,
    /// Leaf rotation offset per axis, in degrees; y is multiplied by the leaf's fan step
    pub leaf_offset: Vec3,
    /// Hue at the tips (`min`) and at the base (`max`)
    pub hue: RandomRange,
    /// Organism's local up axis, aligned to world up for upright segments
    pub up: Vec3,
    /// Blend between upright and random orientation along the stalk
    pub chaos: ChaosFalloff,
}

impl KelpConfig {
    /// Number of segments a full build emits
    pub fn expected_segments(&self) -> usize {
        self.iterations as usize * (1 + self.leaf_count as usize)
    }
}

impl Default for KelpConfig {
    fn default() -> Self {
        KelpConfigBuilder::new().seed(0).build_unchecked()
    }
}

/// Builder for creating KelpConfig with validation
///
/// # Example
///
/// ```rust
/// use reef_growth::*;
///
/// let config = KelpConfigBuilder::new()
///     .seed(7)
///     .iterations(3)
///     .unwrap()
///     .leaf_count(2)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.expected_segments(), 9);
/// ```
#[derive(Debug, Clone)]
pub struct KelpConfigBuilder {
    seed: Option<u32>,
    iterations: u32,
    leaf_count: u32,
    stem_scale: Vec3,
    leaf_scale: Vec3,
    angle: Vec3,
    jitter: RandomRange,
    leaf_offset: Vec3,
    hue: RandomRange,
    up: Vec3,
    chaos: ChaosFalloff,
}

impl KelpConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - iterations: 3, leaf_count: 5
    /// - stem scale (0.25, 1, 0.25), leaf scale (0.25, 1, 0.35)
    /// - stem angles (0°, 45°, 45°) plus jitter in [0°, 30°]
    /// - leaf offset (90°, 90°, 90°)
    /// - hue: 0.1 at the tips to 1.0 at the base
    pub fn new() -> Self {
        Self {
            seed: None,
            iterations: 3,
            leaf_count: 5,
            stem_scale: Vec3::new(0.25, 1.0, 0.25),
            leaf_scale: Vec3::new(0.25, 1.0, 0.35),
            angle: Vec3::new(0.0, 45.0, 45.0),
            jitter: RandomRange::new(0.0, 30.0),
            leaf_offset: Vec3::splat(90.0),
            hue: RandomRange::new(0.1, 1.0),
            up: Vec3::Y,
            chaos: ChaosFalloff::default(),
        }
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of stem segments
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations > 20
    pub fn iterations(mut self, iterations: u32) -> Result<Self> {
        self.iterations = check_iterations(iterations)?;
        Ok(self)
    }

    /// Set the number of leaves per stem segment
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if count is 0 or above [`MAX_LEAF_COUNT`]
    pub fn leaf_count(mut self, count: u32) -> Result<Self> {
        if count == 0 {
            return Err(GrowthError::InvalidConfig(
                "kelp needs at least one leaf per segment".to_string(),
            ));
        }
        if count > MAX_LEAF_COUNT {
            return Err(GrowthError::InvalidConfig(format!(
                "leaf_count must be at most {}, got {}",
                MAX_LEAF_COUNT, count
            )));
        }
        self.leaf_count = count;
        Ok(self)
    }

    /// Set stem and leaf scales
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if any component is not positive
    pub fn scales(mut self, stem: Vec3, leaf: Vec3) -> Result<Self> {
        self.stem_scale = check_positive("stem scale", stem)?;
        self.leaf_scale = check_positive("leaf scale", leaf)?;
        Ok(self)
    }

    /// Set the base stem angles, in degrees
    pub fn angle(mut self, angle: Vec3) -> Self {
        self.angle = angle;
        self
    }

    /// Set the stem angle jitter; an empty range is repaired on build
    pub fn jitter(mut self, min: f32, max: f32) -> Self {
        self.jitter = RandomRange::new(min, max);
        self
    }

    /// Set the leaf rotation offset, in degrees
    pub fn leaf_offset(mut self, offset: Vec3) -> Self {
        self.leaf_offset = offset;
        self
    }

    /// Set the hue range; an empty range is repaired on build
    pub fn hue(mut self, min: f32, max: f32) -> Self {
        self.hue = RandomRange::new(min, max);
        self
    }

    /// Set the organism's local up axis
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `up` has zero length
    pub fn up(mut self, up: Vec3) -> Result<Self> {
        self.up = up.try_normalize().ok_or_else(|| {
            GrowthError::InvalidConfig(format!("up axis must be non-zero (got {})", up))
        })?;
        Ok(self)
    }

    /// Set how orientation randomness is spread along the stalk
    pub fn chaos(mut self, chaos: ChaosFalloff) -> Self {
        self.chaos = chaos;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    pub fn build(self) -> Result<KelpConfig> {
        Ok(self.build_unchecked())
    }

    fn build_unchecked(self) -> KelpConfig {
        let jitter = if self.jitter.is_ordered() {
            self.jitter
        } else {
            let fixed = self.jitter.widened(1.0);
            tracing::warn!(
                min = self.jitter.min,
                max = self.jitter.max,
                "jitter range is empty; using [{}, {}]",
                fixed.min,
                fixed.max
            );
            fixed
        };

        KelpConfig {
            seed: self.seed.unwrap_or_else(rand::random),
            iterations: self.iterations,
            leaf_count: self.leaf_count,
            stem_scale: self.stem_scale,
            leaf_scale: self.leaf_scale,
            angle: self.angle,
            jitter,
            leaf_offset: self.leaf_offset,
            hue: repaired_hue(self.hue),
            up: self.up,
            chaos: self.chaos,
        }
    }
}

impl Default for KelpConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_coral_builder_defaults() {
        let config = CoralConfigBuilder::new().build().unwrap();
        assert_eq!(config.iterations, 3);
        assert_eq!(config.branches, 3);
        assert_eq!(config.decay, Vec3::new(0.8, 0.65, 0.8));
        assert_eq!(config.hue, RandomRange::new(0.94, 0.99));
    }

    #[test]
    fn test_coral_builder_custom() {
        let config = CoralConfigBuilder::new()
            .seed(42)
            .iterations(5)
            .unwrap()
            .branches(2)
            .unwrap()
            .shape(PrimitiveShape::TaperedCube { taper: 0.6 })
            .build()
            .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.iterations, 5);
        assert_eq!(config.fan_out(), 2);
        assert_eq!(config.shape, PrimitiveShape::TaperedCube { taper: 0.6 });
    }

    #[test]
    fn test_too_many_iterations() {
        assert!(CoralConfigBuilder::new().iterations(21).is_err());
        assert!(KelpConfigBuilder::new().iterations(21).is_err());
        assert!(CoralConfigBuilder::new().iterations(20).is_ok());
    }

    #[test]
    fn test_zero_fan_out_rejected() {
        assert!(CoralConfigBuilder::new().branches(0).is_err());
        assert!(KelpConfigBuilder::new().leaf_count(0).is_err());
    }

    #[test]
    fn test_leaf_count_bound() {
        assert!(KelpConfigBuilder::new().leaf_count(MAX_LEAF_COUNT).is_ok());
        assert!(matches!(
            KelpConfigBuilder::new().leaf_count(MAX_LEAF_COUNT + 1),
            Err(GrowthError::InvalidConfig(_))
        ));
        assert!(KelpConfigBuilder::new().leaf_count(70_000).is_err());
    }

    #[test]
    fn test_non_positive_scale_rejected() {
        assert!(CoralConfigBuilder::new().scale(Vec3::new(0.1, 0.0, 0.1)).is_err());
        assert!(CoralConfigBuilder::new().decay(Vec3::new(0.8, -0.65, 0.8)).is_err());
        assert!(KelpConfigBuilder::new()
            .scales(Vec3::ONE, Vec3::new(1.0, 1.0, f32::NAN))
            .is_err());
    }

    #[test]
    fn test_fan_out_clamped_to_slots() {
        let config = CoralConfigBuilder::new()
            .seed(1)
            .branches(9)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.branches, 9);
        assert_eq!(config.fan_out(), CORAL_SLOT_COUNT);
    }

    #[test]
    fn test_expected_segments() {
        let config = CoralConfigBuilder::new()
            .seed(1)
            .iterations(3)
            .unwrap()
            .branches(5)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.expected_segments(), 1 + 5 + 25);

        let empty = CoralConfigBuilder::new().seed(1).iterations(0).unwrap().build().unwrap();
        assert_eq!(empty.expected_segments(), 0);
    }

    #[test]
    fn test_empty_hue_range_repaired() {
        let config = KelpConfigBuilder::new().seed(1).hue(0.5, 0.5).build().unwrap();
        assert!((config.hue.min - 0.4).abs() < 1e-6);
        assert_eq!(config.hue.max, 0.5);

        let config = CoralConfigBuilder::new().seed(1).hue(0.9, 0.2).build().unwrap();
        assert!(config.hue.is_ordered());
        assert_eq!(config.hue.max, 0.2);
    }

    #[test]
    fn test_empty_jitter_repaired() {
        let config = KelpConfigBuilder::new().seed(1).jitter(30.0, 10.0).build().unwrap();
        assert_eq!(config.jitter, RandomRange::new(9.0, 10.0));
    }

    #[test]
    fn test_zero_up_rejected() {
        assert!(KelpConfigBuilder::new().up(Vec3::ZERO).is_err());
        let config = KelpConfigBuilder::new()
            .seed(1)
            .up(Vec3::new(0.0, 0.0, 2.0))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.up, Vec3::Z);
    }

    #[test]
    fn test_random_range_sampling() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let range = RandomRange::new(0.5, 0.8);
        for _ in 0..100 {
            let v = range.sample(&mut rng);
            assert!((0.5..=0.8).contains(&v));
        }

        let swapped = RandomRange::new(-45.0, -95.0);
        for _ in 0..100 {
            let v = swapped.sample(&mut rng);
            assert!((-95.0..=-45.0).contains(&v));
        }

        assert_eq!(RandomRange::new(2.0, 2.0).sample(&mut rng), 2.0);
    }

    #[test]
    fn test_chaos_weight() {
        assert_eq!(ChaosFalloff::RemainingDepth.weight(3, 4), 0.75);
        assert_eq!(ChaosFalloff::GrowthProgress.weight(3, 4), 0.25);
        assert_eq!(ChaosFalloff::RemainingDepth.weight(0, 0), 0.0);
    }

    #[test]
    fn test_default_configs_are_deterministic() {
        assert_eq!(CoralConfig::default(), CoralConfig::default());
        assert_eq!(KelpConfig::default().seed, 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = KelpConfigBuilder::new()
            .seed(12345)
            .chaos(ChaosFalloff::GrowthProgress)
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: KelpConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
