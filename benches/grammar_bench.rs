use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sdlookup::names::rdata::{dns_sd_description, text_to_name};
use sdlookup::names::{CompoundLabel, DnsCertPrefix, Fqdn};

fn bench_labels(c: &mut Criterion) {
    let mut group = c.benchmark_group("compound_label");

    let labels = vec!["coap", "coap:udp", "coap:subcoap:udp", "http:printer:TCP"];

    group.bench_function("parse_and_prefix", |b| {
        b.iter(|| {
            for label in &labels {
                let parsed = CompoundLabel::parse(black_box(label)).unwrap();
                black_box(parsed.prefix_string_for("udp").unwrap());
            }
        });
    });

    group.bench_function("cert_prefix", |b| {
        b.iter(|| {
            for init in ["443", ":udp", "8443:tcp"] {
                black_box(DnsCertPrefix::parse(Some(black_box(init))).unwrap());
            }
        });
    });

    group.finish();
}

fn bench_names(c: &mut Criterion) {
    let mut group = c.benchmark_group("names");

    let domain = Fqdn::new("iot.end-points.example.com").unwrap();
    group.bench_function("with_prefix", |b| {
        b.iter(|| black_box(domain.with_prefix(black_box("_services._dns-sd._udp"))));
    });

    let owner = "Service\\032Test\\032Caf\\195\\169._coap._udp.iot.example.com.";
    group.bench_function("description", |b| {
        b.iter(|| black_box(dns_sd_description(black_box(owner))));
    });

    group.bench_function("text_to_name", |b| {
        b.iter(|| black_box(text_to_name(black_box(owner)).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_labels, bench_names);
criterion_main!(benches);
