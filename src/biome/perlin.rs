//! Seeded 3D gradient noise
//!
//! Improved Perlin noise over Ken Perlin's reference permutation, with the
//! seed folded into the lattice hash so each seed gets its own field.

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Octave layering for [`PerlinNoise::fbm`]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseConfig {
    /// Number of layers; 1 is plain noise
    pub octaves: usize,
    /// Amplitude factor between layers
    pub persistence: f32,
    /// Frequency factor between layers
    pub lacunarity: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 1,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

// ============================================================================
// LATTICE
// ============================================================================

// Reference permutation; changing it changes every generated field
const PERM: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

// Twelve cube edge directions, padded to 16 so a 4-bit hash picks one
const GRADIENTS: [Vec3; 16] = [
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(-1.0, 1.0, 0.0),
    Vec3::new(1.0, -1.0, 0.0),
    Vec3::new(-1.0, -1.0, 0.0),
    Vec3::new(1.0, 0.0, 1.0),
    Vec3::new(-1.0, 0.0, 1.0),
    Vec3::new(1.0, 0.0, -1.0),
    Vec3::new(-1.0, 0.0, -1.0),
    Vec3::new(0.0, 1.0, 1.0),
    Vec3::new(0.0, -1.0, 1.0),
    Vec3::new(0.0, 1.0, -1.0),
    Vec3::new(0.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(0.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, 0.0),
    Vec3::new(0.0, -1.0, -1.0),
];

#[inline]
fn fade(t: Vec3) -> Vec3 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

// ============================================================================
// NOISE
// ============================================================================

/// Seeded improved Perlin noise
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerlinNoise {
    pub seed: u32,
}

impl PerlinNoise {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Lattice hash of an integer corner
    #[inline]
    fn corner(&self, x: i32, y: i32, z: i32) -> usize {
        let mix = self.seed.wrapping_mul(0x9E37_79B9).rotate_left(13);
        let ix = (x as u32 ^ mix) & 255;
        let iy = (y as u32 ^ (mix >> 8)) & 255;
        let iz = (z as u32 ^ (mix >> 16)) & 255;
        let a = PERM[ix as usize] as u32;
        let b = PERM[((a + iy) & 255) as usize] as u32;
        PERM[((b + iz) & 255) as usize] as usize
    }

    /// Contribution of one cube corner at `offset` from the sample point
    #[inline]
    fn influence(&self, cell: [i32; 3], corner: [i32; 3], local: Vec3) -> f32 {
        let hash = self.corner(cell[0] + corner[0], cell[1] + corner[1], cell[2] + corner[2]);
        let offset = local - Vec3::new(corner[0] as f32, corner[1] as f32, corner[2] as f32);
        GRADIENTS[hash & 15].dot(offset)
    }

    /// Single-octave noise at `position`, in [-1, 1]
    pub fn sample(&self, position: Vec3) -> f32 {
        let floor = position.floor();
        let cell = [floor.x as i32, floor.y as i32, floor.z as i32];
        let local = position - floor;
        let w = fade(local);

        let n = |x, y, z| self.influence(cell, [x, y, z], local);
        let x00 = lerp(n(0, 0, 0), n(1, 0, 0), w.x);
        let x10 = lerp(n(0, 1, 0), n(1, 1, 0), w.x);
        let x01 = lerp(n(0, 0, 1), n(1, 0, 1), w.x);
        let x11 = lerp(n(0, 1, 1), n(1, 1, 1), w.x);

        lerp(lerp(x00, x10, w.y), lerp(x01, x11, w.y), w.z).clamp(-1.0, 1.0)
    }

    /// Layered noise normalized by total amplitude, in [-1, 1]
    pub fn fbm(&self, position: Vec3, config: &NoiseConfig) -> f32 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut norm = 0.0;

        for _ in 0..config.octaves.max(1) {
            total += self.sample(position * frequency) * amplitude;
            norm += amplitude;
            amplitude *= config.persistence;
            frequency *= config.lacunarity;
        }

        if norm > 0.0 {
            total / norm
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let noise = PerlinNoise::new(42);
        let p = Vec3::new(0.5, 0.7, 0.3);
        assert_eq!(noise.sample(p), noise.sample(p));
    }

    #[test]
    fn test_zero_on_lattice_points() {
        let noise = PerlinNoise::new(7);
        for p in [Vec3::ZERO, Vec3::new(3.0, -2.0, 5.0), Vec3::new(-11.0, 4.0, 0.0)] {
            assert_eq!(noise.sample(p), 0.0);
        }
    }

    #[test]
    fn test_range() {
        let noise = PerlinNoise::new(12345);
        for i in 0..500 {
            let t = i as f32 * 0.137;
            let v = noise.sample(Vec3::new(t, t * 0.61 - 3.0, 40.0 - t * 1.3));
            assert!((-1.0..=1.0).contains(&v), "{} out of range", v);
        }
    }

    #[test]
    fn test_different_seeds() {
        let a = PerlinNoise::new(42);
        let b = PerlinNoise::new(999);
        let differs = (0..16).any(|i| {
            let p = Vec3::new(0.31 + i as f32 * 0.9, 0.77, 0.53 - i as f32 * 0.4);
            a.sample(p) != b.sample(p)
        });
        assert!(differs);
    }

    #[test]
    fn test_varies_across_space() {
        let noise = PerlinNoise::new(3);
        let first = noise.sample(Vec3::new(0.3, 0.3, 0.3));
        let varies = (1..16).any(|i| noise.sample(Vec3::new(0.3 + i as f32 * 1.1, 0.3, 0.7)) != first);
        assert!(varies);
    }

    #[test]
    fn test_fbm_single_octave_matches_sample() {
        let noise = PerlinNoise::new(5);
        let p = Vec3::new(1.25, -0.5, 3.75);
        assert_eq!(noise.fbm(p, &NoiseConfig::default()), noise.sample(p));
    }

    #[test]
    fn test_fbm_range() {
        let noise = PerlinNoise::new(123);
        let config = NoiseConfig {
            octaves: 5,
            ..Default::default()
        };
        for i in 0..100 {
            let v = noise.fbm(Vec3::splat(i as f32 * 0.37), &config);
            assert!((-1.0..=1.0).contains(&v));
        }
    }
}
