//! Easing and stagger curves.
//!
//! These are the CPU versions of the curves the foliage vertex shader runs.
//! The shader source is generated from the same constants, see
//! [`crate::shaders`].

/// Fraction of the global progress range over which foliage starts are spread.
pub const STAGGER_SPREAD: f32 = 0.3;

/// Cubic ease-in-out.
///
/// `t < 0.5 ? 4t³ : 1 - (-2t + 2)³ / 2`
#[inline]
pub fn cubic_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let f = -2.0 * t + 2.0;
        1.0 - f * f * f / 2.0
    }
}

/// Hermite smoothstep with the input clamped to `[edge0, edge1]`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Eased progress for a single foliage particle.
///
/// The particle's random scalar delays its start; `progress * (1 + stagger)`
/// may exceed 1 and saturates through the smoothstep clamp.
#[inline]
pub fn staggered(progress: f32, random: f32) -> f32 {
    let stagger = random * STAGGER_SPREAD;
    let effective = smoothstep(stagger, 1.0, progress * (1.0 + stagger));
    cubic_in_out(effective)
}
