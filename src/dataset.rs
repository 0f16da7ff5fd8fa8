//! Dual-position datasets.
//!
//! Every particle and ornament gets its chaos position and its tree position
//! up front. After construction only ornament progress changes.

use std::ops::Range;

use glam::Vec3;

use crate::animator::Progress;
use crate::config::TreeConfig;
use crate::sampler::Sampler;
use crate::state::TreeState;

/// Kind of ornament; decides where it lands, how heavy it is and how it is
/// drawn. Foliage is not an ornament and lives in [`FoliageData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Light sphere sitting on the cone surface.
    Bauble,
    /// Heavy box resting around the foot of the tree.
    Gift,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Bauble, Role::Gift];

    /// Range the record weight is drawn from. Gifts are systematically heavier.
    pub fn weight_range(self) -> Range<f32> {
        match self {
            Role::Bauble => 0.5..1.0,
            Role::Gift => 0.8..1.2,
        }
    }

    /// Range of uniform mesh scale.
    pub fn scale_range(self) -> Range<f32> {
        match self {
            Role::Bauble => 0.2..0.4,
            Role::Gift => 0.5..1.0,
        }
    }

    /// Whether instances bob up and down once placed.
    pub fn bobs(self) -> bool {
        matches!(self, Role::Bauble)
    }
}

/// Foliage data laid out as the four parallel vertex arrays the point
/// shader consumes.
#[derive(Debug, Clone)]
pub struct FoliageData {
    /// Always zero; the vertex stage computes the real position.
    pub positions: Vec<[f32; 3]>,
    pub chaos: Vec<[f32; 3]>,
    pub target: Vec<[f32; 3]>,
    pub random: Vec<f32>,
}

impl FoliageData {
    /// Sample `config.foliage_count` points.
    ///
    /// # Panics
    ///
    /// Panics if the count is zero or the scatter radius is not positive.
    pub fn build(config: &TreeConfig, sampler: &mut Sampler) -> Self {
        let count = config.foliage_count as usize;
        assert!(count > 0, "foliage count must be positive");

        let radius = config.foliage_scatter_radius;
        assert!(
            radius.is_finite() && radius > 0.0,
            "foliage scatter radius must be positive, got {}",
            radius
        );
        let mut data = Self {
            positions: vec![[0.0; 3]; count],
            chaos: Vec::with_capacity(count),
            target: Vec::with_capacity(count),
            random: Vec::with_capacity(count),
        };

        for _ in 0..count {
            data.chaos.push(sampler.chaos(radius).to_array());
            data.target.push(sampler.cone_volume().to_array());
            data.random.push(sampler.random());
        }

        data
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.random.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.random.is_empty()
    }
}

/// One bauble or gift.
#[derive(Debug, Clone)]
pub struct Ornament {
    pub chaos: Vec3,
    pub target: Vec3,
    /// Uniform scalar in `[0, 1)`; the weight is derived from it.
    pub random: f32,
    pub progress: Progress,
    /// Linear RGB, fixed for the record's lifetime.
    pub color: Vec3,
    pub scale: f32,
    /// Unit spin axis.
    pub rotation_axis: Vec3,
}

impl Ornament {
    /// `1 / speed_factor`; heavier ornaments move slower.
    #[inline]
    pub fn weight(&self) -> f32 {
        1.0 / self.progress.speed_factor()
    }
}

/// Sample `count` ornaments for `role`, at rest in `initial` state.
///
/// # Panics
///
/// Panics if `count` is zero or the ornament scatter radius is not positive.
pub fn build_ornaments(
    role: Role,
    count: u32,
    config: &TreeConfig,
    sampler: &mut Sampler,
    initial: TreeState,
) -> Vec<Ornament> {
    assert!(count > 0, "{:?} count must be positive", role);
    let radius = config.ornament_scatter_radius;
    assert!(
        radius.is_finite() && radius > 0.0,
        "ornament scatter radius must be positive, got {}",
        radius
    );

    let palette: Vec<Vec3> = config
        .palette
        .ornament_colors()
        .iter()
        .map(|c| c.to_linear())
        .collect();
    let weights = role.weight_range();
    let scales = role.scale_range();

    (0..count)
        .map(|_| {
            let random = sampler.random();
            let weight = weights.start + random * (weights.end - weights.start);
            let chaos = sampler.chaos(radius);
            let target = match role {
                Role::Gift => sampler.base_disk(1.2, 1.0),
                Role::Bauble => sampler.cone_surface(),
            };
            let scale = sampler.random_range(scales.start, scales.end);
            let color = palette[sampler.random_index(palette.len())];

            Ornament {
                chaos,
                target,
                random,
                progress: Progress::new(initial.target(), 1.0 / weight),
                color,
                scale,
                rotation_axis: sampler.positive_axis(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> TreeConfig {
        TreeConfig {
            foliage_count: 500,
            bauble_count: 40,
            gift_count: 10,
            seed: Some(11),
            ..Default::default()
        }
    }

    #[test]
    fn test_foliage_parallel_arrays() {
        let config = small_config();
        let mut sampler = Sampler::new(config.cone(), config.seed);
        let data = FoliageData::build(&config, &mut sampler);

        assert_eq!(data.len(), 500);
        assert_eq!(data.positions.len(), 500);
        assert_eq!(data.chaos.len(), 500);
        assert_eq!(data.target.len(), 500);
        assert!(data.positions.iter().all(|p| *p == [0.0; 3]));
        assert!(data.random.iter().all(|r| (0.0..1.0).contains(r)));

        let cone = config.cone();
        for t in &data.target {
            let p = Vec3::from_array(*t);
            assert!(Vec3::new(p.x, 0.0, p.z).length() <= cone.radius_at(p.y) + 1e-3);
        }
        for c in &data.chaos {
            assert!(Vec3::from_array(*c).length() <= config.foliage_scatter_radius + 1e-3);
        }
    }

    #[test]
    fn test_baubles_sit_on_surface() {
        let config = small_config();
        let mut sampler = Sampler::new(config.cone(), config.seed);
        let baubles = build_ornaments(Role::Bauble, 40, &config, &mut sampler, TreeState::Chaos);

        let cone = config.cone();
        for b in &baubles {
            let axial = Vec3::new(b.target.x, 0.0, b.target.z).length();
            assert!((axial - cone.radius_at(b.target.y)).abs() < 1e-3);
            assert!(b.chaos.length() <= config.ornament_scatter_radius + 1e-3);
            assert!((0.2..=0.4).contains(&b.scale));
            assert!(b.weight() >= 0.5 - 1e-5 && b.weight() <= 1.0 + 1e-5);
            assert_eq!(b.progress.value(), 0.0);
        }
    }

    #[test]
    fn test_gifts_are_heavier_than_baubles() {
        let config = small_config();
        let mut sampler = Sampler::new(config.cone(), config.seed);
        let baubles = build_ornaments(Role::Bauble, 200, &config, &mut sampler, TreeState::Chaos);
        let gifts = build_ornaments(Role::Gift, 200, &config, &mut sampler, TreeState::Chaos);

        let mean = |items: &[Ornament]| items.iter().map(Ornament::weight).sum::<f32>() / items.len() as f32;
        assert!(mean(&gifts) > mean(&baubles));
        for g in &gifts {
            assert!(g.weight() >= 0.8 - 1e-5 && g.weight() <= 1.2 + 1e-5);
            assert!(g.target.y < config.cone().base_y() + 1.6);
        }
    }

    #[test]
    fn test_colors_come_from_palette() {
        let config = small_config();
        let mut sampler = Sampler::new(config.cone(), config.seed);
        let gifts = build_ornaments(Role::Gift, 100, &config, &mut sampler, TreeState::Formed);
        let palette: Vec<Vec3> = config.palette.ornament_colors().iter().map(|c| c.to_linear()).collect();

        for g in &gifts {
            assert!(palette.contains(&g.color));
            assert_eq!(g.progress.value(), 1.0);
            assert!((g.rotation_axis.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    #[should_panic(expected = "count must be positive")]
    fn test_zero_count_panics() {
        let config = small_config();
        let mut sampler = Sampler::new(config.cone(), config.seed);
        build_ornaments(Role::Gift, 0, &config, &mut sampler, TreeState::Chaos);
    }

    #[test]
    #[should_panic(expected = "foliage scatter radius must be positive")]
    fn test_zero_foliage_scatter_panics() {
        let config = TreeConfig {
            foliage_scatter_radius: 0.0,
            ..small_config()
        };
        let mut sampler = Sampler::new(config.cone(), config.seed);
        FoliageData::build(&config, &mut sampler);
    }

    #[test]
    fn test_role_ranges_are_real_intervals() {
        for role in Role::ALL {
            let weights = role.weight_range();
            let scales = role.scale_range();
            assert!(weights.start > 0.0 && weights.start < weights.end, "{:?}", role);
            assert!(scales.start > 0.0 && scales.start < scales.end, "{:?}", role);
        }
    }
}
