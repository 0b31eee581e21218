use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use keybed::{KeyboardConfig, KeyboardLayout, NullSink, Point, PointerInteraction};

fn layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let full = KeyboardConfig::default()
        .with_start_pitch(24)
        .with_octaves(8);

    group.bench_function("build_8_octaves", |b| {
        b.iter(|| KeyboardLayout::build(black_box(&full)).expect("layout"));
    });
    group.finish();
}

fn hit_testing(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_test");
    let config = KeyboardConfig::default()
        .with_start_pitch(24)
        .with_octaves(8);
    let keyboard = KeyboardLayout::build(&config).expect("layout");

    group.bench_function("sweep_top_row", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for x in (0..config.width()).step_by(3) {
                if keyboard.hit_test(black_box(Point::new(x, 1))).is_some() {
                    hits += 1;
                }
            }
            hits
        });
    });

    group.bench_function("glissando_drag", |b| {
        b.iter(|| {
            let mut input = PointerInteraction::new(NullSink);
            input.press(&keyboard, Point::new(0, 150));
            for x in 0..config.width() {
                input.drag(&keyboard, black_box(Point::new(x, 150)));
            }
            input.release(&keyboard, Point::new(0, 150));
        });
    });
    group.finish();
}

criterion_group!(benches, layout, hit_testing);
criterion_main!(benches);
