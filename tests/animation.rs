//! End-to-end animation scenarios.
//!
//! These drive a whole [`TreeScene`] frame by frame, the way the window
//! loop does, and check what a viewer would see.

use morphtree::easing::staggered;
use morphtree::foliage::is_sparkle;
use morphtree::prelude::*;

const FRAME: f32 = 1.0 / 60.0;

fn config() -> TreeConfig {
    TreeConfig {
        foliage_count: 2_000,
        bauble_count: 60,
        gift_count: 20,
        seed: Some(2024),
        ..Default::default()
    }
}

fn run_frames(scene: &mut TreeScene, state: TreeState, frames: usize, start: usize) {
    for i in start..start + frames {
        scene.tick(state, FRAME, i as f32 * FRAME);
    }
}

// ============================================================================
// Global transition
// ============================================================================

#[test]
fn test_foliage_assembles_in_transition_duration() {
    let mut scene = TreeScene::new(config(), TreeState::Chaos);

    // 1.5 s at 60 fps, plus one frame for float accumulation
    run_frames(&mut scene, TreeState::Formed, 91, 0);
    assert_eq!(scene.foliage_progress(), 1.0);

    let data = scene.foliage();
    for &r in &data.random {
        assert_eq!(staggered(scene.foliage_progress(), r), 1.0);
    }
}

#[test]
fn test_foliage_assembles_in_exactly_one_and_a_half_seconds() {
    let mut scene = TreeScene::new(config(), TreeState::Chaos);

    run_frames(&mut scene, TreeState::Formed, 90, 0);
    let p = scene.foliage_progress();
    assert!((p - 1.0).abs() < 1e-5, "progress {}", p);

    for &r in &scene.foliage().random {
        assert!((staggered(p, r) - 1.0).abs() < 1e-4);
    }
}

#[test]
fn test_chaos_start_is_fully_scattered() {
    let scene = TreeScene::new(config(), TreeState::Chaos);
    assert_eq!(scene.foliage_progress(), 0.0);
    for &r in &scene.foliage().random {
        assert_eq!(staggered(0.0, r), 0.0);
    }
    for (record, transform) in scene.gifts().records().iter().zip(scene.gifts().transforms()) {
        let translation = transform.w_axis.truncate();
        assert!((translation - record.chaos).length() < 1e-4);
    }
}

#[test]
fn test_toggle_mid_flight_reverses_without_jump() {
    let mut scene = TreeScene::new(config(), TreeState::Chaos);
    run_frames(&mut scene, TreeState::Formed, 30, 0);
    let before = scene.foliage_progress();
    assert!(before > 0.0 && before < 1.0);

    run_frames(&mut scene, TreeState::Chaos, 1, 30);
    let after = scene.foliage_progress();
    assert!(after < before);
    assert!(before - after <= FRAME / 1.5 + 1e-6);

    run_frames(&mut scene, TreeState::Chaos, 200, 31);
    assert!(scene.is_settled(TreeState::Chaos));
}

// ============================================================================
// Per-record speed
// ============================================================================

#[test]
fn test_lighter_ornaments_lead() {
    let mut scene = TreeScene::new(config(), TreeState::Chaos);
    run_frames(&mut scene, TreeState::Formed, 20, 0);

    let mut records: Vec<&Ornament> = scene
        .baubles()
        .records()
        .iter()
        .chain(scene.gifts().records())
        .collect();
    records.sort_by(|a, b| a.weight().total_cmp(&b.weight()));

    // Same elapsed time, so lighter records are never behind heavier ones
    for pair in records.windows(2) {
        assert!(pair[0].progress.value() >= pair[1].progress.value() - 1e-6);
    }
}

#[test]
fn test_fast_bauble_beats_slow_gift() {
    let mut gift = Progress::new(0.0, 0.7);
    let mut bauble = Progress::new(0.0, 1.8);

    for _ in 0..120 {
        gift.advance(1.0, FRAME, 1.5);
        bauble.advance(1.0, FRAME, 1.5);
        assert!(bauble.value() >= gift.value());
    }
    assert_eq!(bauble.value(), 1.0);
    assert!(gift.value() < 1.0);
}

#[test]
fn test_progress_matches_speed_factor() {
    let mut scene = TreeScene::new(config(), TreeState::Chaos);
    run_frames(&mut scene, TreeState::Formed, 30, 0);

    let duration = scene.config().transition_duration;
    for record in scene.gifts().records() {
        let expected = (30.0 * FRAME / duration * record.progress.speed_factor()).min(1.0);
        assert!((record.progress.value() - expected).abs() < 1e-4);
    }
}

#[test]
fn test_jittery_frames_stay_in_range() {
    let mut scene = TreeScene::new(config(), TreeState::Chaos);
    let deltas = [0.0, 0.001, 0.25, 0.016, 3.0, 0.033, 0.0005];
    let mut state = TreeState::Formed;
    let mut elapsed = 0.0;

    for i in 0..200 {
        let delta = deltas[i % deltas.len()];
        elapsed += delta;
        if i % 17 == 0 {
            state = state.toggled();
        }
        scene.tick(state, delta, elapsed);

        assert!((0.0..=1.0).contains(&scene.foliage_progress()));
        for record in scene.baubles().records().iter().chain(scene.gifts().records()) {
            assert!((0.0..=1.0).contains(&record.progress.value()));
        }
    }
}

#[test]
fn test_progress_is_monotone_while_target_is_fixed() {
    let deltas = [0.0, 1e-6, 0.016, f32::NAN, 2.5, 0.033, 0.0];

    for (initial, state) in [(TreeState::Chaos, TreeState::Formed), (TreeState::Formed, TreeState::Chaos)] {
        let mut scene = TreeScene::new(config(), initial);
        let target = state.target();
        let mut elapsed = 0.0;

        for i in 0..60 {
            let delta = deltas[i % deltas.len()];
            let distance = |scene: &TreeScene| -> Vec<f32> {
                std::iter::once(scene.foliage_progress())
                    .chain(scene.baubles().records().iter().map(|r| r.progress.value()))
                    .chain(scene.gifts().records().iter().map(|r| r.progress.value()))
                    .map(|v| (target - v).abs())
                    .collect()
            };

            let before = distance(&scene);
            if delta.is_finite() {
                elapsed += delta;
            }
            scene.tick(state, delta, elapsed);
            let after = distance(&scene);

            for (b, a) in before.iter().zip(&after) {
                assert!(a <= b, "moved away from {}: {} -> {}", target, b, a);
            }
        }
        assert!(scene.is_settled(state));
    }
}

#[test]
fn test_settled_scene_is_idempotent() {
    let mut scene = TreeScene::new(config(), TreeState::Formed);
    let progress: Vec<f32> = scene.gifts().records().iter().map(|r| r.progress.value()).collect();

    run_frames(&mut scene, TreeState::Formed, 60, 0);
    let after: Vec<f32> = scene.gifts().records().iter().map(|r| r.progress.value()).collect();
    assert_eq!(progress, after);
    assert!(scene.is_settled(TreeState::Formed));
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_same_seed_same_layout() {
    let a = TreeScene::new(config(), TreeState::Chaos);
    let b = TreeScene::new(config(), TreeState::Chaos);
    assert_eq!(a.foliage().target, b.foliage().target);
    assert_eq!(a.baubles().transforms(), b.baubles().transforms());
}

#[test]
fn test_about_one_in_twenty_points_sparkle() {
    let scene = TreeScene::new(
        TreeConfig {
            foliage_count: 20_000,
            ..config()
        },
        TreeState::Chaos,
    );
    let sparkles = scene.foliage().random.iter().filter(|&&r| is_sparkle(r)).count();
    let fraction = sparkles as f32 / scene.foliage().len() as f32;
    assert!((fraction - 0.05).abs() < 0.01, "sparkle fraction {}", fraction);
}

#[test]
fn test_gifts_land_around_the_foot() {
    let mut scene = TreeScene::new(config(), TreeState::Chaos);
    run_frames(&mut scene, TreeState::Formed, 150, 0);

    let cone = scene.config().cone();
    for transform in scene.gifts().transforms() {
        let p = transform.w_axis.truncate();
        assert!(p.y >= cone.base_y() + 0.5 - 1e-4);
        assert!(p.y <= cone.base_y() + 1.5 + 1e-4);
        assert!(Vec3::new(p.x, 0.0, p.z).length() <= cone.base_radius * 1.2 + 1e-4);
    }
}
