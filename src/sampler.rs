//! Spatial sampling for the two formations.
//!
//! The free functions here are stateless: each call draws from the RNG it
//! is handed and returns one point. [`Sampler`] bundles a seeded RNG with
//! the scene's cone so dataset construction reads naturally:
//!
//! ```ignore
//! let mut sampler = Sampler::new(config.cone(), Some(42));
//! let chaos = sampler.chaos(30.0);
//! let target = sampler.cone_volume();
//! ```
//!
//! Zero radius or height collapses every sample to the apex. That is
//! degenerate but not an error; callers are expected to pass positive
//! dimensions.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform random point inside a sphere of `radius` centred at the origin.
///
/// Inverse-transform sampling: `cos φ` is uniform in `[-1, 1]` and the radius
/// is scaled by a cube root so density is uniform by volume rather than
/// piling up near the centre.
pub fn chaos_volume<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let theta = TAU * rng.gen::<f32>();
    let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
    let r = radius * rng.gen::<f32>().cbrt();

    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// The tree silhouette: a cone with its apex up, centred vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cone {
    pub height: f32,
    pub base_radius: f32,
}

impl Cone {
    pub fn new(height: f32, base_radius: f32) -> Self {
        Self {
            height,
            base_radius,
        }
    }

    /// Lowest y of the cone.
    #[inline]
    pub fn base_y(&self) -> f32 {
        -self.height / 2.0
    }

    /// Lateral radius at world height `y`. Zero at and above the apex.
    pub fn radius_at(&self, y: f32) -> f32 {
        if self.height <= 0.0 {
            return 0.0;
        }
        let ratio = ((y - self.base_y()) / self.height).clamp(0.0, 1.0);
        self.base_radius * (1.0 - ratio)
    }

    fn point_at(&self, height_ratio: f32, r: f32, theta: f32) -> Vec3 {
        Vec3::new(
            r * theta.cos(),
            height_ratio * self.height + self.base_y(),
            r * theta.sin(),
        )
    }

    /// Random point inside the cone.
    ///
    /// `height_ratio` pins the height fraction (0 = base, 1 = apex). When
    /// `None` it is drawn as `sqrt(U)`.
    pub fn sample_volume<R: Rng + ?Sized>(&self, rng: &mut R, height_ratio: Option<f32>) -> Vec3 {
        let ratio = height_ratio.unwrap_or_else(|| rng.gen::<f32>().sqrt());
        let r_at_height = self.base_radius * (1.0 - ratio);
        let theta = TAU * rng.gen::<f32>();
        // sqrt for uniform disk
        let r = rng.gen::<f32>().sqrt() * r_at_height;
        self.point_at(ratio, r, theta)
    }

    /// Random point on the lateral surface, height fraction uniform.
    pub fn sample_surface<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let ratio = rng.gen::<f32>();
        let r_at_height = self.base_radius * (1.0 - ratio);
        let theta = TAU * rng.gen::<f32>();
        self.point_at(ratio, r_at_height, theta)
    }

    /// Random point on a disk around the foot of the tree.
    ///
    /// The disk radius is `base_radius * spread`; the point sits `0.5` above
    /// the base plus up to `lift` more.
    pub fn sample_base_disk<R: Rng + ?Sized>(&self, rng: &mut R, spread: f32, lift: f32) -> Vec3 {
        let r = rng.gen::<f32>().sqrt() * self.base_radius * spread;
        let theta = TAU * rng.gen::<f32>();
        Vec3::new(
            r * theta.cos(),
            self.base_y() + 0.5 + rng.gen::<f32>() * lift,
            r * theta.sin(),
        )
    }
}

/// Seeded RNG plus the scene cone.
pub struct Sampler {
    cone: Cone,
    rng: SmallRng,
}

impl Sampler {
    /// Create a sampler. Without a seed the layout differs every run.
    pub fn new(cone: Cone, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });

        Self {
            cone,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn cone(&self) -> Cone {
        self.cone
    }

    /// Random f32 in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.rng.gen::<f32>() * (max - min)
    }

    /// Random index in `0..len`.
    #[inline]
    pub fn random_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    pub fn chaos(&mut self, radius: f32) -> Vec3 {
        chaos_volume(&mut self.rng, radius)
    }

    pub fn cone_volume(&mut self) -> Vec3 {
        self.cone.sample_volume(&mut self.rng, None)
    }

    pub fn cone_surface(&mut self) -> Vec3 {
        self.cone.sample_surface(&mut self.rng)
    }

    pub fn base_disk(&mut self, spread: f32, lift: f32) -> Vec3 {
        self.cone.sample_base_disk(&mut self.rng, spread, lift)
    }

    /// Unit vector with non-negative components, for spin axes.
    pub fn positive_axis(&mut self) -> Vec3 {
        Vec3::new(self.random(), self.random(), self.random())
            .try_normalize()
            .unwrap_or(Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: usize = 20_000;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn test_chaos_within_radius() {
        let mut rng = rng();
        for _ in 0..SAMPLES {
            assert!(chaos_volume(&mut rng, 30.0).length() <= 30.0 + 1e-3);
        }
    }

    #[test]
    fn test_chaos_is_uniform_by_volume() {
        // For a volume-uniform sphere (r/R)^3 is uniform on [0, 1).
        let mut rng = rng();
        let radius = 10.0;
        let mut bins = [0usize; 10];
        for _ in 0..SAMPLES {
            let u = (chaos_volume(&mut rng, radius).length() / radius).powi(3);
            bins[((u * 10.0) as usize).min(9)] += 1;
        }
        let expected = SAMPLES as f32 / 10.0;
        for (i, &count) in bins.iter().enumerate() {
            let deviation = (count as f32 - expected).abs() / expected;
            assert!(deviation < 0.1, "bin {} has {} samples", i, count);
        }

        // And not uniform in r: the outer half shell holds 7/8 of the points.
        let mut rng = self::rng();
        let outer = (0..SAMPLES)
            .filter(|_| chaos_volume(&mut rng, radius).length() > radius / 2.0)
            .count();
        let fraction = outer as f32 / SAMPLES as f32;
        assert!((fraction - 0.875).abs() < 0.02, "outer fraction {}", fraction);
    }

    #[test]
    fn test_chaos_covers_all_octants() {
        let mut rng = rng();
        let mut octants = [0usize; 8];
        for _ in 0..SAMPLES {
            let p = chaos_volume(&mut rng, 1.0);
            let idx = (p.x > 0.0) as usize | ((p.y > 0.0) as usize) << 1 | ((p.z > 0.0) as usize) << 2;
            octants[idx] += 1;
        }
        for count in octants {
            assert!(count > SAMPLES / 8 - SAMPLES / 40);
        }
    }

    #[test]
    fn test_cone_volume_inside_silhouette() {
        let cone = Cone::new(14.0, 5.0);
        let mut rng = rng();
        for _ in 0..SAMPLES {
            let p = cone.sample_volume(&mut rng, None);
            assert!(p.y >= -7.0 - 1e-4 && p.y <= 7.0 + 1e-4);
            let axial = Vec3::new(p.x, 0.0, p.z).length();
            assert!(axial <= cone.radius_at(p.y) + 1e-3);
        }
    }

    #[test]
    fn test_cone_volume_favours_the_base() {
        let cone = Cone::new(14.0, 5.0);
        let mut rng = rng();
        let lower = (0..SAMPLES)
            .filter(|_| cone.sample_volume(&mut rng, None).y < 0.0)
            .count();
        // sqrt(U) < 0.5 with probability 0.25
        let fraction = lower as f32 / SAMPLES as f32;
        assert!((fraction - 0.25).abs() < 0.02, "lower fraction {}", fraction);
    }

    #[test]
    fn test_cone_volume_fixed_ratio() {
        let cone = Cone::new(10.0, 4.0);
        let mut rng = rng();
        for _ in 0..100 {
            let p = cone.sample_volume(&mut rng, Some(0.5));
            assert!((p.y - 0.0).abs() < 1e-5);
            assert!(Vec3::new(p.x, 0.0, p.z).length() <= 2.0 + 1e-4);
        }
        let apex = cone.sample_volume(&mut rng, Some(1.0));
        assert!((apex - Vec3::new(0.0, 5.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_cone_surface_on_silhouette() {
        let cone = Cone::new(14.0, 5.0);
        let mut rng = rng();
        for _ in 0..SAMPLES {
            let p = cone.sample_surface(&mut rng);
            let axial = Vec3::new(p.x, 0.0, p.z).length();
            assert!((axial - cone.radius_at(p.y)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_degenerate_cone_collapses_to_apex() {
        let cone = Cone::new(0.0, 0.0);
        let mut rng = rng();
        for _ in 0..100 {
            assert_eq!(cone.sample_volume(&mut rng, None), Vec3::ZERO);
            assert_eq!(cone.sample_surface(&mut rng), Vec3::ZERO);
        }
        assert_eq!(chaos_volume(&mut rng, 0.0), Vec3::ZERO);
    }

    #[test]
    fn test_base_disk_placement() {
        let cone = Cone::new(14.0, 5.0);
        let mut rng = rng();
        for _ in 0..1000 {
            let p = cone.sample_base_disk(&mut rng, 1.2, 1.0);
            assert!(Vec3::new(p.x, 0.0, p.z).length() <= 6.0 + 1e-4);
            assert!(p.y >= -6.5 - 1e-4 && p.y <= -5.5 + 1e-4);
        }
    }

    #[test]
    fn test_seeded_sampler_is_reproducible() {
        let cone = Cone::new(14.0, 5.0);
        let mut a = Sampler::new(cone, Some(123));
        let mut b = Sampler::new(cone, Some(123));
        for _ in 0..10 {
            assert_eq!(a.chaos(30.0), b.chaos(30.0));
            assert_eq!(a.cone_volume(), b.cone_volume());
        }
    }

    #[test]
    fn test_positive_axis_is_unit() {
        let mut sampler = Sampler::new(Cone::new(1.0, 1.0), Some(5));
        for _ in 0..100 {
            let axis = sampler.positive_axis();
            assert!((axis.length() - 1.0).abs() < 1e-4);
            assert!(axis.min_element() >= 0.0);
        }
    }
}
