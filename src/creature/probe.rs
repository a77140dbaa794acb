//! Six-direction proximity probe
//!
//! Casts short rays along an object's local axes and reports the first axis
//! that is blocked. Axes are tried in a fixed order, so an obstacle ahead
//! hides one behind.

use glam::{Quat, Vec3};
use parry3d::math::{Isometry, Point, Vector};
use parry3d::query::{Ray, RayCast};
use parry3d::shape::Ball;

/// Local axis a probe ray is cast along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeDirection {
    Forward,
    Back,
    Right,
    Left,
    Up,
    Down,
}

impl ProbeDirection {
    /// Every direction in probing order
    pub const ORDER: [ProbeDirection; 6] = [
        ProbeDirection::Forward,
        ProbeDirection::Back,
        ProbeDirection::Right,
        ProbeDirection::Left,
        ProbeDirection::Up,
        ProbeDirection::Down,
    ];

    /// Unit axis in the object's local frame; forward is +z
    pub fn local_axis(self) -> Vec3 {
        match self {
            ProbeDirection::Forward => Vec3::Z,
            ProbeDirection::Back => Vec3::NEG_Z,
            ProbeDirection::Right => Vec3::X,
            ProbeDirection::Left => Vec3::NEG_X,
            ProbeDirection::Up => Vec3::Y,
            ProbeDirection::Down => Vec3::NEG_Y,
        }
    }
}

impl std::fmt::Display for ProbeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProbeDirection::Forward => "in front of",
            ProbeDirection::Back => "behind",
            ProbeDirection::Right => "to the right of",
            ProbeDirection::Left => "to the left of",
            ProbeDirection::Up => "above",
            ProbeDirection::Down => "below",
        };
        f.write_str(name)
    }
}

/// Spherical obstacle a probe can hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub center: Vec3,
    pub radius: f32,
}

impl Obstacle {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Distance along `ray` to this obstacle, if within `max_distance`
    fn cast(&self, ray: &Ray, max_distance: f32) -> Option<f32> {
        let ball = Ball::new(self.radius.abs());
        let pose = Isometry::translation(self.center.x, self.center.y, self.center.z);
        ball.cast_ray(&pose, ray, max_distance, true)
    }
}

/// First blocked axis reported by [`probe`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    pub direction: ProbeDirection,
    /// Distance from the origin to the obstacle surface; 0 when inside it
    pub distance: f32,
    /// Index of the obstacle in the slice passed to [`probe`]
    pub obstacle: usize,
}

/// Look for obstacles within `max_distance` along the six local axes
///
/// Axes are rotated by `rotation` and tried in [`ProbeDirection::ORDER`].
/// Returns the closest obstacle on the first axis that hits anything.
pub fn probe(
    origin: Vec3,
    rotation: Quat,
    obstacles: &[Obstacle],
    max_distance: f32,
) -> Option<ProbeHit> {
    let start = Point::new(origin.x, origin.y, origin.z);

    for direction in ProbeDirection::ORDER {
        let axis = rotation * direction.local_axis();
        let ray = Ray::new(start, Vector::new(axis.x, axis.y, axis.z));

        let closest = obstacles
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.cast(&ray, max_distance).map(|d| (i, d)))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((obstacle, distance)) = closest {
            tracing::info!(%direction, distance, "there is something {} the object", direction);
            return Some(ProbeHit {
                direction,
                distance,
                obstacle,
            });
        }
    }

    None
}
