use criterion::{criterion_group, criterion_main, Criterion};
use dem::ElevationGrid;
use geo::{coord, point};
use terrain::{ElevationSampler, Resolver, SensorPose};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// One degree square at 3 arcsecond resolution, rising gently to the
/// north-east.
fn sloped_grid() -> ElevationGrid {
    let res = 3.0 / 3600.0;
    let posts = 1201;
    let mut samples = Vec::with_capacity(posts * posts);
    for row in 0..posts {
        for col in 0..posts {
            #[allow(clippy::cast_precision_loss)]
            let elevation = (posts - row + col) as f32 * 0.5;
            samples.push(elevation);
        }
    }
    ElevationGrid::new(
        coord!(x: -72.0, y: 45.0),
        coord!(x: res, y: -res),
        (posts, posts),
        samples,
    )
    .unwrap()
}

fn resolve_target(c: &mut Criterion) {
    let mut group = c.benchmark_group("Resolve Target");

    let grid = sloped_grid();
    let sampler = ElevationSampler::new(&grid);
    let resolver = Resolver::default();

    let steep = SensorPose::new(point!(x: -71.5, y: 44.5), 2500.0, 45.0, 60.0).unwrap();
    let shallow = SensorPose::new(point!(x: -71.5, y: 44.5), 2500.0, 45.0, 15.0).unwrap();

    group.bench_with_input("steep", &steep, |b, pose| {
        b.iter(|| resolver.resolve(pose, &sampler).unwrap())
    });
    group.bench_with_input("shallow", &shallow, |b, pose| {
        b.iter(|| resolver.resolve(pose, &sampler).unwrap())
    });
}

criterion_group!(benches, resolve_target);
criterion_main!(benches);
