use criterion::{Criterion, black_box, criterion_group, criterion_main};
use geotable::{GeoPoint, GeohashRange, cell_position, hash_key};

fn bench_cell_position(c: &mut Criterion) {
    let point = GeoPoint::new(52.1, 2.0);
    c.bench_function("cell_position", |b| {
        b.iter(|| cell_position(black_box(&point)))
    });
}

fn bench_hash_key(c: &mut Criterion) {
    c.bench_function("hash_key/length_6", |b| {
        b.iter(|| hash_key(black_box(5177531549489041509), black_box(6)))
    });
}

fn bench_try_split(c: &mut Criterion) {
    let range = GeohashRange::new(1000000000000000000, 1000000000010000000);

    let mut group = c.benchmark_group("try_split");
    group.bench_function("no_split", |b| {
        b.iter(|| black_box(&range).try_split(black_box(6)))
    });
    group.bench_function("eleven_way", |b| {
        b.iter(|| black_box(&range).try_split(black_box(13)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_cell_position,
    bench_hash_key,
    bench_try_split
);
criterion_main!(benches);
