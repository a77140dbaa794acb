//! Biome classification from noise
//!
//! A position is mapped to one of [`BiomeId::COUNT`] biomes by sampling the
//! same noise field at three far-apart offsets, treating the samples as an
//! RGB color and posterizing its hue.

mod perlin;

pub use perlin::{NoiseConfig, PerlinNoise};

use crate::error::{GrowthError, Result};
use crate::mesh::{hsv_to_rgba, rgb_to_hue, VertexColor};
use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of one biome in a fixed table
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BiomeId(u8);

impl BiomeId {
    /// Number of biomes
    pub const COUNT: u8 = 13;

    /// Index in `0..COUNT`
    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    /// Hue in [0, 1) that encodes this biome
    pub fn hue(self) -> f32 {
        self.0 as f32 / Self::COUNT as f32
    }

    /// Fully saturated color that encodes this biome
    pub fn vertex_color(self) -> VertexColor {
        hsv_to_rgba(self.hue(), 1.0, 1.0)
    }

    /// Biome nearest to `hue`
    ///
    /// Hue is circular, so values that round up to `COUNT` wrap to biome 0.
    pub fn from_hue(hue: f32) -> Self {
        let count = Self::COUNT as f32;
        let posterized = (hue * count).round().rem_euclid(count);
        // rem_euclid can return `count` itself for tiny negative inputs
        Self((posterized as u8) % Self::COUNT)
    }

    /// Biome encoded by a vertex color's hue
    pub fn from_color(color: VertexColor) -> Self {
        Self::from_hue(rgb_to_hue(color[0], color[1], color[2]))
    }

    /// Every biome in index order
    pub fn all() -> impl Iterator<Item = BiomeId> {
        (0..Self::COUNT).map(BiomeId)
    }
}

impl TryFrom<u8> for BiomeId {
    type Error = GrowthError;

    fn try_from(index: u8) -> Result<Self> {
        if index < Self::COUNT {
            Ok(Self(index))
        } else {
            Err(GrowthError::UnknownBiome(index))
        }
    }
}

impl From<BiomeId> for u8 {
    fn from(id: BiomeId) -> u8 {
        id.0
    }
}

/// Trait for sampling a spatial field at world positions
pub trait FieldSampler {
    /// The value produced by this sampler
    type Output;

    /// Sample the field at a world position
    fn sample(&self, position: Vec3) -> Self::Output;
}

/// Noise-driven biome classifier
///
/// Stateless and deterministic: the same field and position always yield
/// the same biome.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomeField {
    /// Noise source
    pub noise: PerlinNoise,
    /// Octave layering applied to every channel
    pub octaves: NoiseConfig,
    /// World units per noise unit; larger means bigger biomes
    pub scale: f32,
    /// Multiplier applied to raw noise before squaring
    pub gain: f32,
    /// Divisor applied after squaring
    pub spread: f32,
    /// Sample offsets for the red, green and blue channels
    pub offsets: [Vec3; 3],
}

impl Default for BiomeField {
    fn default() -> Self {
        Self {
            noise: PerlinNoise::default(),
            octaves: NoiseConfig::default(),
            scale: 1.0,
            gain: 1.1,
            spread: 2.4,
            offsets: [
                Vec3::new(123.0, 456.0, 789.0),
                Vec3::new(-99.0, 999.0, 300.0),
                Vec3::new(900.0, 500.0, -99.0),
            ],
        }
    }
}

impl BiomeField {
    /// Create a field with the given seed and default shaping
    pub fn new(seed: u32) -> Self {
        Self {
            noise: PerlinNoise::new(seed),
            ..Default::default()
        }
    }

    /// Set the world-space scale
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `scale` is not a positive finite number
    pub fn with_scale(mut self, scale: f32) -> Result<Self> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(GrowthError::InvalidConfig(format!(
                "biome scale must be positive (got {})",
                scale
            )));
        }
        self.scale = scale;
        Ok(self)
    }

    /// Set the octave layering
    pub fn with_octaves(mut self, octaves: NoiseConfig) -> Self {
        self.octaves = octaves;
        self
    }

    /// The three shaped channels at `position`, each in [0, 1]
    pub fn channels(&self, position: Vec3) -> [f32; 3] {
        let p = position / self.scale;
        self.offsets.map(|offset| {
            let n = self.noise.fbm(p + offset, &self.octaves) * self.gain;
            (n * n / self.spread + 0.5).clamp(0.0, 1.0)
        })
    }
}

impl FieldSampler for BiomeField {
    type Output = BiomeId;

    fn sample(&self, position: Vec3) -> BiomeId {
        let [r, g, b] = self.channels(position);
        BiomeId::from_hue(rgb_to_hue(r, g, b))
    }
}
