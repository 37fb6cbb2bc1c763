use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use live_map_core::protocol::{decode_payload, encode_payload, resolve_read};
use live_map_core::tracking::Calibration;
use live_map_core::{AddressSpec, WorldPosition};

fn benchmark_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_payload");
    for size in [4usize, 12, 0x100, 0x1000] {
        let bytes: Vec<u8> = (0..size).map(|i| i as u8).collect();
        let frame = encode_payload(&bytes);
        group.bench_with_input(BenchmarkId::from_parameter(size), &frame, |b, frame| {
            b.iter(|| decode_payload(black_box(frame), size));
        });
    }
    group.finish();
}

fn benchmark_encode(c: &mut Criterion) {
    let chain = AddressSpec::pointer("[[[main+0x42D6110]+0x10]+0x20]+0x8").unwrap();
    c.bench_function("encode_pointer_peek", |b| {
        b.iter(|| resolve_read(black_box(&chain), 12).encode());
    });
    c.bench_function("encode_peek_main", |b| {
        let spec = AddressSpec::main(0x42D6110);
        b.iter(|| resolve_read(black_box(&spec), 12).encode());
    });
}

fn benchmark_projection(c: &mut Criterion) {
    let calibration = Calibration::default();
    let world = WorldPosition::new(100.0, -50.0, 200.0);
    c.bench_function("project_position", |b| {
        b.iter(|| calibration.to_map(black_box(world)));
    });
}

criterion_group!(benches, benchmark_decode, benchmark_encode, benchmark_projection);
criterion_main!(benches);
