use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mpc_toolkit::mpec::{parse, sections::split_sections};

fn bench_parse(c: &mut Criterion) {
    let discovery = std::fs::read_to_string("tests/data/2026CE3.mpec.txt").expect("fixture file");
    let recovery =
        std::fs::read_to_string("tests/data/2020AB12.recovery.txt").expect("fixture file");

    c.bench_function("mpec/split_sections", |b| {
        b.iter(|| split_sections(black_box(&discovery)))
    });
    c.bench_function("mpec/parse_discovery", |b| {
        b.iter(|| parse(black_box(&discovery), None, None, Some("/mpec/K26/K26CA5.html")))
    });
    c.bench_function("mpec/parse_recovery", |b| {
        b.iter(|| parse(black_box(&recovery), None, Some("2020 AB12"), None))
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
