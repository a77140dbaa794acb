//! Vertex color assignment for grown segments

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RGBA color type
pub type VertexColor = [f32; 4];

/// Opaque white, used to pad segments that carry no colors
pub const WHITE: VertexColor = [1.0, 1.0, 1.0, 1.0];

/// Trait for mapping a segment's recursion depth to a vertex color
pub trait ColorMapper {
    /// Map a depth (remaining iterations at the emitting node) to an RGBA color
    fn map_color(&self, depth: u32) -> VertexColor;
}

/// Uniform color regardless of depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidColor(pub VertexColor);

impl ColorMapper for SolidColor {
    fn map_color(&self, _depth: u32) -> VertexColor {
        self.0
    }
}

/// Hue interpolated linearly over `depth / max_depth`, at full saturation and value
///
/// `start` is the hue at depth 0 and `end` the hue at `max_depth`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueGradient {
    pub start: f32,
    pub end: f32,
    pub max_depth: u32,
}

impl HueGradient {
    pub fn new(start: f32, end: f32, max_depth: u32) -> Self {
        Self {
            start,
            end,
            max_depth,
        }
    }

    /// Hue assigned to a segment emitted at `depth`
    pub fn hue_at(&self, depth: u32) -> f32 {
        let t = if self.max_depth == 0 {
            0.0
        } else {
            (depth as f32 / self.max_depth as f32).clamp(0.0, 1.0)
        };
        self.start + (self.end - self.start) * t
    }
}

impl ColorMapper for HueGradient {
    fn map_color(&self, depth: u32) -> VertexColor {
        hsv_to_rgba(self.hue_at(depth), 1.0, 1.0)
    }
}

/// Convert HSV (all components in [0, 1]) to an opaque RGBA color
pub fn hsv_to_rgba(hue: f32, saturation: f32, value: f32) -> VertexColor {
    let h = hue.rem_euclid(1.0) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));

    let (r, g, b) = match sector as u32 {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    };
    [r, g, b, 1.0]
}

/// Hue in [0, 1) of an RGB color; grays map to 0
pub fn rgb_to_hue(r: f32, g: f32, b: f32) -> f32 {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    if delta <= f32::EPSILON {
        return 0.0;
    }

    let sector = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    (sector / 6.0).rem_euclid(1.0)
}
