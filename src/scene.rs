//! Per-frame scene state.
//!
//! [`TreeScene`] owns every dataset and advances them all from one call per
//! frame. Foliage moves as a single group; each ornament carries its own
//! progress and writes its transform into a buffer that is allocated once
//! and reused every frame.

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::animator::Progress;
use crate::config::TreeConfig;
use crate::dataset::{build_ornaments, FoliageData, Ornament, Role};
use crate::sampler::Sampler;
use crate::state::TreeState;

/// Vertical amplitude of the bauble bob.
pub const BOB_AMPLITUDE: f32 = 0.02;

/// Baubles or gifts, plus their per-frame transforms.
#[derive(Debug, Clone)]
pub struct OrnamentGroup {
    role: Role,
    records: Vec<Ornament>,
    transforms: Vec<Mat4>,
}

impl OrnamentGroup {
    pub fn new(role: Role, records: Vec<Ornament>) -> Self {
        let transforms = records.iter().map(|r| ornament_transform(role, r, 0, 0.0)).collect();
        Self {
            role,
            records,
            transforms,
        }
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    #[inline]
    pub fn records(&self) -> &[Ornament] {
        &self.records
    }

    /// Transforms written by the last [`tick`](Self::tick), one per record.
    #[inline]
    pub fn transforms(&self) -> &[Mat4] {
        &self.transforms
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Linear RGB colors, in record order. Fixed after construction.
    pub fn colors(&self) -> Vec<[f32; 3]> {
        self.records.iter().map(|r| r.color.to_array()).collect()
    }

    /// Advance every record toward `target` and rewrite the transforms.
    pub fn tick(&mut self, target: f32, delta: f32, duration: f32, elapsed: f32) {
        for (i, (record, transform)) in self.records.iter_mut().zip(self.transforms.iter_mut()).enumerate() {
            record.progress.advance(target, delta, duration);
            *transform = ornament_transform(self.role, record, i, elapsed);
        }
    }
}

/// Model matrix of one ornament at its current progress.
///
/// Spin around x and z fades out as the ornament settles; spin around y
/// keeps going. Baubles bob slightly, phase-shifted by their index.
pub fn ornament_transform(role: Role, ornament: &Ornament, index: usize, elapsed: f32) -> Mat4 {
    let t = ornament.progress.eased();
    let mut position = ornament.chaos.lerp(ornament.target, t);
    if role.bobs() {
        position.y += (elapsed + index as f32).sin() * BOB_AMPLITUDE;
    }

    let spin = ornament.rotation_axis * elapsed;
    let rotation = Quat::from_euler(EulerRot::XYZ, spin.x * (1.0 - t), spin.y, spin.z * (1.0 - t));

    Mat4::from_scale_rotation_translation(Vec3::splat(ornament.scale), rotation, position)
}

/// Everything that animates.
#[derive(Debug, Clone)]
pub struct TreeScene {
    config: TreeConfig,
    foliage: FoliageData,
    foliage_progress: Progress,
    baubles: OrnamentGroup,
    gifts: OrnamentGroup,
}

impl TreeScene {
    /// Sample every dataset from `config`, at rest in `initial`.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`TreeConfig::validate`]: a zero count, or a
    /// non-positive dimension or duration.
    pub fn new(config: TreeConfig, initial: TreeState) -> Self {
        if let Err(e) = config.validate() {
            panic!("{}", e);
        }

        let mut sampler = Sampler::new(config.cone(), config.seed);

        let foliage = FoliageData::build(&config, &mut sampler);
        let baubles = build_ornaments(Role::Bauble, config.bauble_count, &config, &mut sampler, initial);
        let gifts = build_ornaments(Role::Gift, config.gift_count, &config, &mut sampler, initial);

        log::info!(
            "Built scene: {} foliage points, {} baubles, {} gifts",
            foliage.len(),
            baubles.len(),
            gifts.len()
        );

        Self {
            foliage,
            foliage_progress: Progress::new(initial.target(), 1.0),
            baubles: OrnamentGroup::new(Role::Bauble, baubles),
            gifts: OrnamentGroup::new(Role::Gift, gifts),
            config,
        }
    }

    /// Advance all progress values toward `state` by `delta` seconds.
    ///
    /// `elapsed` drives the spin and bob, which never stop.
    pub fn tick(&mut self, state: TreeState, delta: f32, elapsed: f32) {
        let target = state.target();
        let duration = self.config.transition_duration;

        self.foliage_progress.advance(target, delta, duration);
        self.baubles.tick(target, delta, duration, elapsed);
        self.gifts.tick(target, delta, duration, elapsed);
    }

    /// Whether every record has arrived at `state`.
    pub fn is_settled(&self, state: TreeState) -> bool {
        let target = state.target();
        self.foliage_progress.is_at(target)
            && self.baubles.records().iter().all(|r| r.progress.is_at(target))
            && self.gifts.records().iter().all(|r| r.progress.is_at(target))
    }

    #[inline]
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    #[inline]
    pub fn foliage(&self) -> &FoliageData {
        &self.foliage
    }

    /// Raw global foliage progress. The shader applies stagger and easing.
    #[inline]
    pub fn foliage_progress(&self) -> f32 {
        self.foliage_progress.value()
    }

    #[inline]
    pub fn baubles(&self) -> &OrnamentGroup {
        &self.baubles
    }

    #[inline]
    pub fn gifts(&self) -> &OrnamentGroup {
        &self.gifts
    }
}
