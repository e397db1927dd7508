//! Benchmarks for gesture resolution.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{Vec2, Vec3};

use cubeturn::disambiguation::{resolve, Thresholds};
use cubeturn::geometry::{Axis, Sign};
use cubeturn::pieces::FacePlate;
use cubeturn::{grid, picking};
use cubeturn::{Camera, CubeScene, Interaction, InteractionConfig};

/// Benchmark one disambiguation step on a decisive drag.
fn bench_resolve(c: &mut Criterion) {
    let face = FacePlate::new(Axis::Z, Sign::Pos);
    let thresholds = Thresholds::default();

    c.bench_function("resolve", |b| {
        b.iter(|| {
            resolve(
                black_box(Vec3::new(0.0, 0.0, 1.5)),
                black_box(Vec3::new(0.4, 0.02, 1.5)),
                face,
                black_box(Vec2::new(0.05, 0.0)),
                &thresholds,
            )
        })
    });
}

/// Benchmark picking a piece from an oblique view.
fn bench_intersect(c: &mut Criterion) {
    let scene = CubeScene::new();
    let camera = Camera::new(Vec3::new(5.0, 4.0, 6.0), Vec3::Y, 1.0);

    c.bench_function("intersect", |b| {
        b.iter(|| picking::intersect(&scene, &camera, black_box(Vec2::new(0.05, -0.1))))
    });
}

/// Benchmark a full press, drag, release and settle.
fn bench_gesture_cycle(c: &mut Criterion) {
    c.bench_function("gesture_cycle", |b| {
        b.iter(|| {
            let mut interaction = Interaction::new(
                CubeScene::new(),
                Camera::default(),
                InteractionConfig::default(),
            );
            let mut now = Duration::ZERO;
            interaction.pointer_down(Vec2::ZERO, now).ok();
            for step in 1..=10 {
                interaction.pointer_move(Vec2::new(step as f32 * 0.03, 0.0)).ok();
            }
            now += Duration::from_millis(16);
            interaction.pointer_up(now).ok();
            while interaction.tick(now).unwrap_or(false) {
                now += Duration::from_millis(16);
            }
            black_box(interaction)
        })
    });
}

/// Benchmark formatting the cube state for display.
fn bench_format_cube(c: &mut Criterion) {
    let scene = CubeScene::new();

    c.bench_function("format_cube", |b| {
        b.iter(|| grid::format_cube(black_box(scene.pieces())))
    });
}

criterion_group!(
    benches,
    bench_resolve,
    bench_intersect,
    bench_gesture_cycle,
    bench_format_cube
);
criterion_main!(benches);
