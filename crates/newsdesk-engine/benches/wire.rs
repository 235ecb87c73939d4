use criterion::{Criterion, criterion_group, criterion_main};
use newsdesk_engine::wire;
mod common;

fn bench_wire_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("wire");
    group.sample_size(10);

    let editor = common::generate_document(100);
    let json = wire::render_content_json(editor.blocks()).unwrap();

    group.bench_function("render_content_json", |b| {
        b.iter(|| {
            let text = wire::render_content_json(std::hint::black_box(editor.blocks())).unwrap();
            std::hint::black_box(text);
        });
    });

    group.bench_function("parse_content_json", |b| {
        b.iter(|| {
            let blocks = wire::parse_content_json(std::hint::black_box(&json)).unwrap();
            std::hint::black_box(blocks);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_wire_format);
criterion_main!(benches);
