//! Wander steering
//!
//! A creature roams a box above its home point. It seeks a target, slows down
//! as it closes in, picks a fresh target on arrival and is pushed away by any
//! repulsor whose radius it enters.

use crate::config::RandomRange;
use crate::error::{GrowthError, Result};
use crate::spatial::RepulsorIndex;
use glam::Vec3;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tuning for [`step`]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WanderConfig {
    /// Speed cap in units per second
    pub max_speed: f32,
    /// Floor the speed cap never decays below
    pub min_speed: f32,
    /// Distance at which the target counts as reached
    pub arrive_distance: f32,
    /// Distance inside which the speed cap decays
    pub slow_distance: f32,
    /// Per-step decay of the speed cap near the target
    pub slow_factor: f32,
    /// Fraction of `max_speed` the creature aims to cruise at
    pub cruise: f32,
    /// Share of the steering impulse applied each step
    pub steer_blend: f32,
    /// Push along the current heading, as a fraction of `max_speed`
    pub forward_bias: f32,
    /// Target offsets from home, per axis
    pub range_x: RandomRange,
    pub range_y: RandomRange,
    pub range_z: RandomRange,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            max_speed: 0.5,
            min_speed: 0.05,
            arrive_distance: 1.0,
            slow_distance: 5.0,
            slow_factor: 0.9,
            cruise: 0.8,
            steer_blend: 0.6,
            forward_bias: 0.1,
            range_x: RandomRange::new(-30.0, 30.0),
            range_y: RandomRange::new(5.0, 20.0),
            range_z: RandomRange::new(-10.0, 10.0),
        }
    }
}

impl WanderConfig {
    /// Check the tuning for values that would stall or explode the creature
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when speeds are not positive, `min_speed`
    /// exceeds `max_speed`, or the arrival distance is not below the
    /// slow-down distance
    pub fn validate(&self) -> Result<()> {
        if !(self.max_speed > 0.0 && self.min_speed > 0.0) {
            return Err(GrowthError::InvalidConfig(
                "wander speeds must be positive".to_string(),
            ));
        }
        if self.min_speed > self.max_speed {
            return Err(GrowthError::InvalidConfig(format!(
                "min_speed {} exceeds max_speed {}",
                self.min_speed, self.max_speed
            )));
        }
        if self.arrive_distance >= self.slow_distance {
            return Err(GrowthError::InvalidConfig(format!(
                "arrive_distance {} must be below slow_distance {}",
                self.arrive_distance, self.slow_distance
            )));
        }
        Ok(())
    }

    /// A fresh target somewhere in the box around `home`
    pub fn pick_target<R: Rng + ?Sized>(&self, home: Vec3, rng: &mut R) -> Vec3 {
        home + Vec3::new(
            self.range_x.sample(rng),
            self.range_y.sample(rng),
            self.range_z.sample(rng),
        )
    }
}

/// Kinematic state of one wandering creature
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WanderState {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Unit direction of travel; kept when the creature is at rest
    pub heading: Vec3,
    /// Anchor the target box is measured from
    pub home: Vec3,
    pub target: Vec3,
    /// Current speed cap
    pub speed: f32,
}

impl WanderState {
    /// A creature at rest on `home`, facing +z, with its first target picked
    pub fn new<R: Rng + ?Sized>(home: Vec3, config: &WanderConfig, rng: &mut R) -> Self {
        Self {
            position: home,
            velocity: Vec3::ZERO,
            heading: Vec3::Z,
            home,
            target: config.pick_target(home, rng),
            speed: config.max_speed,
        }
    }
}

/// Advance a creature by `dt` seconds
///
/// A non-positive `dt` returns the state unchanged.
pub fn step<R: Rng + ?Sized>(
    state: &WanderState,
    config: &WanderConfig,
    dt: f32,
    repulsors: &RepulsorIndex,
    rng: &mut R,
) -> WanderState {
    let mut next = *state;
    if dt <= 0.0 {
        return next;
    }

    let mut to_target = next.target - next.position;
    if to_target.length() < config.arrive_distance {
        next.target = config.pick_target(next.home, rng);
        next.speed = config.max_speed;
        to_target = next.target - next.position;
        tracing::trace!(target = ?next.target, "new wander target");
    } else if to_target.length() < config.slow_distance {
        next.speed = (next.speed * config.slow_factor).max(config.min_speed);
    }

    let desired = to_target.normalize_or_zero() * config.max_speed * config.cruise;
    let steer = (desired - next.velocity).clamp_length_max(config.max_speed);

    let push: Vec3 = repulsors
        .affecting(next.position)
        .iter()
        .map(|hit| hit.repulsor.push(next.position))
        .sum();

    next.velocity += (steer + push) * config.steer_blend;
    next.velocity += next.heading * config.forward_bias * config.max_speed;
    next.velocity = next.velocity.clamp_length_max(next.speed);

    next.position += next.velocity * dt;
    if let Some(heading) = next.velocity.try_normalize() {
        next.heading = heading;
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::{Repulsor, RepulsorRegistry};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn state_with_target(position: Vec3, target: Vec3) -> WanderState {
        WanderState {
            position,
            velocity: Vec3::ZERO,
            heading: Vec3::Z,
            home: Vec3::ZERO,
            target,
            speed: 0.5,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(WanderConfig::default().validate().is_ok());

        let inverted = WanderConfig {
            min_speed: 2.0,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let overlapping = WanderConfig {
            arrive_distance: 6.0,
            ..Default::default()
        };
        assert!(overlapping.validate().is_err());
    }

    #[test]
    fn test_targets_stay_in_home_box() {
        let config = WanderConfig::default();
        let home = Vec3::new(10.0, -4.0, 2.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for _ in 0..200 {
            let offset = config.pick_target(home, &mut rng) - home;
            assert!((-30.0..=30.0).contains(&offset.x));
            assert!((5.0..=20.0).contains(&offset.y));
            assert!((-10.0..=10.0).contains(&offset.z));
        }
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let config = WanderConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let state = WanderState::new(Vec3::ZERO, &config, &mut rng);

        let next = step(&state, &config, 0.0, &RepulsorIndex::empty(), &mut rng);
        assert_eq!(next, state);
    }

    #[test]
    fn test_speed_never_exceeds_cap() {
        let config = WanderConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut state = WanderState::new(Vec3::ZERO, &config, &mut rng);

        for _ in 0..500 {
            state = step(&state, &config, 1.0, &RepulsorIndex::empty(), &mut rng);
            assert!(state.velocity.length() <= config.max_speed + 1e-5);
            assert!(state.speed >= config.min_speed);
        }
    }

    #[test]
    fn test_moves_toward_target() {
        let config = WanderConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let target = Vec3::new(20.0, 0.0, 0.0);
        let mut state = state_with_target(Vec3::ZERO, target);

        for _ in 0..30 {
            state = step(&state, &config, 1.0, &RepulsorIndex::empty(), &mut rng);
        }
        assert!(state.position.distance(target) < 15.0);
        assert_eq!(state.target, target);
    }

    #[test]
    fn test_arrival_picks_new_target() {
        let config = WanderConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let state = state_with_target(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.2, 10.0, 0.0));

        let next = step(&state, &config, 1.0, &RepulsorIndex::empty(), &mut rng);
        assert_ne!(next.target, state.target);
        assert_eq!(next.speed, config.max_speed);
    }

    #[test]
    fn test_slows_near_target() {
        let config = WanderConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let state = state_with_target(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0));

        let next = step(&state, &config, 1.0, &RepulsorIndex::empty(), &mut rng);
        assert!((next.speed - 0.45).abs() < 1e-6);
    }

    #[test]
    fn test_repulsor_pushes_away() {
        let config = WanderConfig::default();
        let start = Vec3::ZERO;
        let target = Vec3::new(0.0, 0.0, 20.0);
        let state = state_with_target(start, target);

        let mut registry = RepulsorRegistry::new();
        registry.register(
            Repulsor::new(Vec3::new(1.0, 0.0, 0.0), 3.0)
                .unwrap()
                .with_strength(2.0),
        );

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let free = step(&state, &config, 1.0, &RepulsorIndex::empty(), &mut rng);
        let pushed = step(&state, &config, 1.0, &registry.index(), &mut rng);

        assert!(pushed.position.x < free.position.x);
    }
}
