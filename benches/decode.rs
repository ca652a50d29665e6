use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use raidwatch::{render, Blacklist, Decoder, Snapshot, Thresholds};

/// A controller with `devices` rows cycling through every documented type.
fn snapshot(devices: usize) -> Snapshot {
    let rows: [(i64, i64, i64, i64); 8] = [
        (1, 0, 0, 0),
        (2, 0b1, 12292, -1),
        (3, 0b0110, 318, 1000),
        (5, 0b1000, 0, 0),
        (9, 0b100_0010, 0, 0),
        (11, 0b0110, 0, 0),
        (17, 0b100_0000, 0, 0),
        (99, 0, 0, 0),
    ];

    let mut builder = Snapshot::builder()
        .timestamp_ms(1703160000000)
        .vendor("Infortrend")
        .model("EonStor")
        .firmware(3, 48)
        .logical_drive(0, 4, 1, 0)
        .drive_status(1)
        .drive_status(255)
        .drive_identity(1, "ST3500630NS", "9QG3ABCD");

    for i in 0..devices {
        let (type_code, status, value, unit) = rows[i % rows.len()];
        builder = builder.device(format!("Device {}", i), type_code, status, value, unit);
    }
    builder.build()
}

/// Benchmark a full decode pass with varying device table sizes
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let decoder = Decoder::new(Blacklist::new(), Thresholds::default());

    for devices in [8, 64, 512].iter() {
        let snapshot = snapshot(*devices);
        group.throughput(Throughput::Elements(*devices as u64));
        group.bench_with_input(BenchmarkId::new("devices", devices), &snapshot, |b, snapshot| {
            b.iter(|| decoder.run(black_box(snapshot)).unwrap());
        });
    }
    group.finish();
}

/// Benchmark decoding plus rendering the status line
fn bench_decode_and_render(c: &mut Criterion) {
    let decoder = Decoder::new(Blacklist::new(), Thresholds::default());
    let snapshot = snapshot(64);

    c.bench_function("decode_and_render", |b| {
        b.iter(|| {
            let report = decoder.run(black_box(&snapshot)).unwrap();
            render::status_line(&report)
        });
    });
}

criterion_group!(benches, bench_decode, bench_decode_and_render);
criterion_main!(benches);
