//! Foliage point appearance.
//!
//! The GPU evaluates all of this per vertex and per fragment. These CPU
//! versions share their constants with the generated shader and exist so the
//! behaviour can be inspected and tested without a device.

use glam::Vec3;

use crate::easing::staggered;

/// Random scalars strictly above this get the near-white sparkle.
pub const SPARKLE_THRESHOLD: f32 = 0.95;
/// Color the sparkle blends toward.
pub const SPARKLE_COLOR: Vec3 = Vec3::new(1.0, 1.0, 0.8);
/// How far the accent hue can pull a particle away from the base hue.
pub const ACCENT_INFLUENCE: f32 = 0.3;

/// Oscillation amplitude in chaos and once formed.
pub const WANDER_CHAOS: f32 = 0.5;
pub const WANDER_FORMED: f32 = 0.05;

#[inline]
pub fn is_sparkle(random: f32) -> bool {
    random > SPARKLE_THRESHOLD
}

/// Base and accent hue of the foliage, in linear RGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoliageShading {
    pub base: Vec3,
    pub accent: Vec3,
}

impl FoliageShading {
    /// Fragment color before glow and alpha.
    pub fn color(&self, random: f32) -> Vec3 {
        let color = self.base.lerp(self.accent, random * ACCENT_INFLUENCE);
        if is_sparkle(random) {
            color.lerp(SPARKLE_COLOR, 0.5)
        } else {
            color
        }
    }
}

/// World position of a foliage vertex at global `progress` and `time`.
pub fn position(chaos: Vec3, target: Vec3, random: f32, progress: f32, time: f32) -> Vec3 {
    let t = staggered(progress, random);
    let wander = WANDER_CHAOS + (WANDER_FORMED - WANDER_CHAOS) * t;
    chaos.lerp(target, t)
        + Vec3::new(
            (time * 2.0 + random * 100.0).sin(),
            (time * 1.5 + random * 50.0).cos(),
            (time + random * 25.0).sin(),
        ) * wander
}

/// Point diameter in pixels at view depth `depth` (positive, in front of
/// the camera), for eased progress `t`.
pub fn point_size(t: f32, random: f32, depth: f32) -> f32 {
    let base = 6.0 + (4.0 - 6.0) * t;
    (base * random + 2.0) * (20.0 / depth)
}

/// Point opacity for eased progress `t`.
#[inline]
pub fn alpha(t: f32) -> f32 {
    0.6 + 0.4 * t
}
