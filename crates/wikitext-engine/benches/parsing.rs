use criterion::{Criterion, criterion_group, criterion_main};
use wikitext_engine::{DialectName, MarkupOptions, MarkupParser, NoOpBuilder};

fn bench_dialects(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let content = include_str!("sample.txt").repeat(20);
    for name in DialectName::ALL {
        let dialect = name
            .create(MarkupOptions::default())
            .expect("built-in dialect");
        group.bench_function(name.as_str(), |b| {
            b.iter(|| {
                let mut builder = NoOpBuilder;
                MarkupParser::new(&dialect).parse(std::hint::black_box(&content), &mut builder);
            });
        });
    }

    group.finish();
}

fn bench_dialect_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");
    group.sample_size(10);

    for name in DialectName::ALL {
        group.bench_function(name.as_str(), |b| {
            b.iter(|| std::hint::black_box(name.create(MarkupOptions::default())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dialects, bench_dialect_assembly);
criterion_main!(benches);
