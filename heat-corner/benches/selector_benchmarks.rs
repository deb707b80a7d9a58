use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use heat_core::ConfidenceMap;
use heat_corner::SelectorBuilder;

/// Confidence map with synthetic corner responses
fn create_benchmark_map(size: usize, complexity: &str) -> ConfidenceMap {
    let mut map = ConfidenceMap::zeros(size, size);

    let splat = |map: &mut ConfidenceMap, cx: usize, cy: usize, peak: f32| {
        for dy in -3i32..=3 {
            for dx in -3i32..=3 {
                let x = cx as i32 + dx;
                let y = cy as i32 + dy;
                if x >= 0 && y >= 0 && (x as usize) < size && (y as usize) < size {
                    let falloff = 1.0 / (1.0 + (dx * dx + dy * dy) as f32);
                    map.set(x as usize, y as usize, peak * falloff);
                }
            }
        }
    };

    match complexity {
        "sparse" => {
            for &(cx, cy) in &[(size / 4, size / 4), (3 * size / 4, size / 4), (size / 2, 3 * size / 4)] {
                splat(&mut map, cx, cy, 0.9);
            }
        }
        "dense" => {
            for i in 0..60 {
                let cx = (i * 37) % size;
                let cy = (i * 61) % size;
                splat(&mut map, cx, cy, 0.3 + (i % 7) as f32 * 0.1);
            }
        }
        "noisy" => {
            for y in 0..size {
                for x in 0..size {
                    map.set(x, y, ((x * 7 + y * 13) % 5) as f32 * 0.004);
                }
            }
            for i in 0..20 {
                splat(&mut map, (i * size / 20) % size, (i * size / 13) % size, 0.8);
            }
        }
        _ => {}
    }

    map
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("corner_selection");

    for &size in &[64usize, 128, 256, 512] {
        for complexity in &["sparse", "dense", "noisy"] {
            let map = create_benchmark_map(size, complexity);
            let selector = SelectorBuilder::new().max_filter(5).build().unwrap();

            group.bench_with_input(
                BenchmarkId::new(format!("{}x{}", size, size), complexity),
                &map,
                |b, map| b.iter(|| black_box(selector.select(black_box(map)).unwrap())),
            );
        }
    }

    group.finish();
}

fn bench_nms_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("nms_strategy");
    let map = create_benchmark_map(256, "dense");

    let max_filter = SelectorBuilder::new().max_filter(5).build().unwrap();
    let radius = SelectorBuilder::new().radius(3.0).build().unwrap();

    group.bench_function("max_filter", |b| b.iter(|| black_box(max_filter.select(&map).unwrap())));
    group.bench_function("radius", |b| b.iter(|| black_box(radius.select(&map).unwrap())));

    group.finish();
}

criterion_group!(benches, bench_selection, bench_nms_strategies);
criterion_main!(benches);
