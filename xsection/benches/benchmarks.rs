use criterion::{criterion_group, criterion_main, Criterion};
use geo::geometry::Coord;
use xsection::Centerline;

/// A sinuous centerline of `n` vertices about 5 m apart.
fn meander(n: usize) -> Centerline {
    let vertices = (0..n)
        .map(|i| {
            let t = i as f64 * 0.05;
            Coord {
                x: 500_000.0 + t * 100.0 + 40.0 * (t * 3.0).sin(),
                y: 4_100_000.0 + t * 20.0,
            }
        })
        .collect();
    Centerline::new(vertices).unwrap()
}

fn cross_sections(c: &mut Criterion) {
    let mut group = c.benchmark_group("Cross Sections");

    let short = meander(100);
    let long = meander(5_000);
    let _25m = 25.0;
    let _20m = 20.0;

    group.bench_with_input("short", &short, |b, line| {
        b.iter(|| line.generate(_25m, _20m).unwrap())
    });
    group.bench_with_input("long", &long, |b, line| {
        b.iter(|| line.generate(_25m, _20m).unwrap())
    });
}

criterion_group!(benches, cross_sections);
criterion_main!(benches);
