//! Benchmarks for scene construction and the per-frame tick.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use morphtree::prelude::*;
use morphtree::shaders::foliage_wgsl;

fn config(foliage_count: u32) -> TreeConfig {
    TreeConfig {
        foliage_count,
        seed: Some(1),
        ..Default::default()
    }
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_scene");

    for count in [5_000u32, 25_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("foliage", count), &count, |b, &count| {
            let config = config(count);
            b.iter(|| black_box(TreeScene::new(config.clone(), TreeState::Chaos)))
        });
    }

    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    group.bench_function("transitioning", |b| {
        let mut scene = TreeScene::new(config(1_000), TreeState::Chaos);
        let mut state = TreeState::Formed;
        let mut frame = 0u32;
        b.iter(|| {
            frame += 1;
            // Flip often enough that records never settle
            if frame % 45 == 0 {
                state = state.toggled();
            }
            scene.tick(state, 1.0 / 60.0, frame as f32 / 60.0);
            black_box(scene.baubles().transforms());
        })
    });

    group.bench_function("settled", |b| {
        let mut scene = TreeScene::new(config(1_000), TreeState::Formed);
        let mut frame = 0u32;
        b.iter(|| {
            frame += 1;
            scene.tick(TreeState::Formed, 1.0 / 60.0, frame as f32 / 60.0);
            black_box(scene.gifts().transforms());
        })
    });

    group.finish();
}

fn bench_shader_gen(c: &mut Criterion) {
    c.bench_function("foliage_wgsl", |b| b.iter(|| black_box(foliage_wgsl())));
}

criterion_group!(benches, bench_build, bench_tick, bench_shader_gen);
criterion_main!(benches);
