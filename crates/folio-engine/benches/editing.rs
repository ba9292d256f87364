use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use folio_engine::Cursor;
mod common;

fn bench_range_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_delete");
    group.sample_size(10);

    for size in [10, 100, 1000] {
        let raw = common::generate_paragraphs(size);
        group.bench_function(format!("across_{size}_paragraphs"), |b| {
            b.iter_batched(
                || common::document(&raw),
                |mut doc| {
                    let blocks = doc.text_blocks();
                    let (first, last) = (blocks[0], blocks[blocks.len() - 1]);
                    let start = Cursor::new(first, 3);
                    let focus = doc.delete_selection(start, Some(Cursor::new(last, 5)));
                    std::hint::black_box(focus)
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_list_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("lists");
    group.sample_size(10);

    let raw = common::generate_lists(20, 20);
    group.bench_function("empty_and_tick", |b| {
        b.iter_batched(
            || common::document(&raw),
            |mut doc| {
                let lists = doc
                    .node(doc.root())
                    .map(|root| root.children().to_vec())
                    .unwrap_or_default();
                for list in lists {
                    let _ = doc.remove_children(list, 0, Some(20));
                }
                std::hint::black_box(doc.tick())
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("typing", |b| {
        let mut doc = common::document(&raw);
        let target = doc.text_blocks()[0];
        b.iter(|| {
            let focus = doc.insert_text(target, 0, std::hint::black_box("x"));
            std::hint::black_box(focus)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_range_delete, bench_list_operations);
criterion_main!(benches);
