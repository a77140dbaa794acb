//! Creature collaborators
//!
//! Small pieces of world logic that live next to the grown structures:
//! a registry of repulsors that push wandering creatures away, a wander
//! steering step, and a six-direction proximity probe.

mod probe;
mod steering;

pub use probe::{probe, Obstacle, ProbeDirection, ProbeHit};
pub use steering::{step, WanderConfig, WanderState};

use crate::error::{GrowthError, Result};
use crate::spatial::RepulsorIndex;
use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Handle returned by [`RepulsorRegistry::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepulsorId(u32);

/// A point that pushes creatures away within `radius`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repulsor {
    pub position: Vec3,
    pub radius: f32,
    /// Push applied at the center; fades linearly to zero at `radius`
    pub strength: f32,
}

impl Repulsor {
    /// Create a repulsor with unit strength
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `radius` is not positive and finite
    pub fn new(position: Vec3, radius: f32) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(GrowthError::InvalidConfig(format!(
                "repulsor radius must be positive (got {})",
                radius
            )));
        }
        Ok(Self {
            position,
            radius,
            strength: 1.0,
        })
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    /// Push felt at `point`; zero at or beyond the radius
    pub fn push(&self, point: Vec3) -> Vec3 {
        let offset = point - self.position;
        let distance = offset.length();
        if distance >= self.radius {
            return Vec3::ZERO;
        }
        let falloff = 1.0 - distance / self.radius;
        offset.normalize_or_zero() * self.strength * falloff
    }
}

/// Caller-owned set of active repulsors
///
/// Ids are never reused, so a stale id cannot address a newer repulsor.
#[derive(Debug, Clone, Default)]
pub struct RepulsorRegistry {
    next_id: u32,
    entries: Vec<(RepulsorId, Repulsor)>,
}

impl RepulsorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a repulsor and return its handle
    pub fn register(&mut self, repulsor: Repulsor) -> RepulsorId {
        let id = RepulsorId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, repulsor));
        tracing::debug!(id = id.0, position = ?repulsor.position, "repulsor registered");
        id
    }

    /// Remove a repulsor, returning it if it was registered
    pub fn unregister(&mut self, id: RepulsorId) -> Option<Repulsor> {
        let slot = self.entries.iter().position(|(e, _)| *e == id)?;
        let (_, repulsor) = self.entries.remove(slot);
        tracing::debug!(id = id.0, "repulsor unregistered");
        Some(repulsor)
    }

    pub fn get(&self, id: RepulsorId) -> Option<&Repulsor> {
        self.entries.iter().find(|(e, _)| *e == id).map(|(_, r)| r)
    }

    /// Move a registered repulsor; returns false for unknown ids
    pub fn set_position(&mut self, id: RepulsorId, position: Vec3) -> bool {
        match self.entries.iter_mut().find(|(e, _)| *e == id) {
            Some((_, repulsor)) => {
                repulsor.position = position;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered repulsors in registration order
    pub fn iter(&self) -> impl Iterator<Item = (RepulsorId, &Repulsor)> {
        self.entries.iter().map(|(id, r)| (*id, r))
    }

    /// Snapshot the current repulsors for queries
    pub fn index(&self) -> RepulsorIndex {
        RepulsorIndex::new(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_unregister() {
        let mut registry = RepulsorRegistry::new();
        let a = registry.register(Repulsor::new(Vec3::ZERO, 1.0).unwrap());
        let b = registry.register(Repulsor::new(Vec3::X, 2.0).unwrap());

        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.unregister(a).unwrap().radius, 1.0);
        assert!(registry.unregister(a).is_none());
        assert_eq!(registry.len(), 1);
        assert!(registry.get(b).is_some());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut registry = RepulsorRegistry::new();
        let a = registry.register(Repulsor::new(Vec3::ZERO, 1.0).unwrap());
        registry.unregister(a);
        let b = registry.register(Repulsor::new(Vec3::ZERO, 1.0).unwrap());

        assert_ne!(a, b);
        assert!(registry.get(a).is_none());
    }

    #[test]
    fn test_set_position() {
        let mut registry = RepulsorRegistry::new();
        let id = registry.register(Repulsor::new(Vec3::ZERO, 1.0).unwrap());

        assert!(registry.set_position(id, Vec3::Y));
        assert_eq!(registry.get(id).unwrap().position, Vec3::Y);

        registry.unregister(id);
        assert!(!registry.set_position(id, Vec3::X));
    }

    #[test]
    fn test_invalid_radius() {
        assert!(Repulsor::new(Vec3::ZERO, 0.0).is_err());
        assert!(Repulsor::new(Vec3::ZERO, -1.0).is_err());
        assert!(Repulsor::new(Vec3::ZERO, f32::INFINITY).is_err());
    }

    #[test]
    fn test_push_fades_with_distance() {
        let rock = Repulsor::new(Vec3::ZERO, 4.0).unwrap().with_strength(2.0);

        let near = rock.push(Vec3::new(1.0, 0.0, 0.0));
        let far = rock.push(Vec3::new(3.0, 0.0, 0.0));
        assert!((near - Vec3::new(1.5, 0.0, 0.0)).length() < 1e-6);
        assert!((far - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);
        assert_eq!(rock.push(Vec3::new(0.0, 5.0, 0.0)), Vec3::ZERO);
    }
}
