use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pagechunk_core::{ChunkConfig, MarkdownConverter, chunk, fingerprint};

fn synthetic_markdown(sections: usize) -> String {
    (0..sections)
        .map(|s| {
            let body = (0..4)
                .map(|p| (0..40).map(|w| format!("s{s}p{p}w{w}")).collect::<Vec<_>>().join(" "))
                .collect::<Vec<_>>()
                .join("\n\n");
            format!("## Section {s}\n\n{body}")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn bench_chunk(c: &mut Criterion) {
    let small = synthetic_markdown(5);
    let large = synthetic_markdown(200);

    let mut group = c.benchmark_group("chunk");

    for target in [200usize, 1000] {
        let config = ChunkConfig::new(target, (target / 5).min(250));
        group.bench_with_input(BenchmarkId::new("small", target), &small, |b, md| {
            b.iter(|| chunk(black_box(md), &config))
        });
        group.bench_with_input(BenchmarkId::new("large", target), &large, |b, md| {
            b.iter(|| chunk(black_box(md), &config))
        });
    }

    group.finish();
}

fn bench_convert(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/article.html").unwrap();
    let converter = MarkdownConverter::new();

    c.bench_function("html_to_markdown", |b| b.iter(|| converter.convert(black_box(&html))));
}

fn bench_fingerprint(c: &mut Criterion) {
    let md = synthetic_markdown(200);

    c.bench_function("content_hash", |b| b.iter(|| fingerprint(black_box(&md))));
}

criterion_group!(benches, bench_chunk, bench_convert, bench_fingerprint);
criterion_main!(benches);
