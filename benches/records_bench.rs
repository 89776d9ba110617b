use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sdlookup::records::{ServiceRecord, TextRecord};
use std::collections::BTreeSet;

fn services(count: u16) -> Vec<ServiceRecord> {
    (0..count)
        .map(|i| {
            ServiceRecord::new(
                format!("Device\\032{i}._coap._udp.example.com."),
                format!("host{}.example.com.", i % 7),
                5683 + i % 3,
                i % 5,
                i % 11,
                3600,
            )
        })
        .collect()
}

fn bench_service_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("service_ordering");

    for count in [16u16, 256] {
        let records = services(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &records, |b, records| {
            b.iter(|| {
                let set: BTreeSet<_> = records.iter().cloned().collect();
                black_box(set.first().map(|r| r.priority()));
            });
        });
    }

    group.finish();
}

fn bench_text_merge(c: &mut Criterion) {
    let fragments: BTreeSet<TextRecord> = (0..32)
        .map(|i| TextRecord::new("Lamp._coap._udp.example.com.", format!("\"key{i}=value{i}\""), 60 + i))
        .collect();

    c.bench_function("text_merge_32", |b| {
        b.iter(|| black_box(TextRecord::merge(black_box(&fragments))));
    });
}

criterion_group!(benches, bench_service_ordering, bench_text_merge);
criterion_main!(benches);
